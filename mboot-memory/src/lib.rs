//! Memory model of the McuBoot bootloader
//!
//! McuBoot describes the memories of a device in two ways. The internal RAM and
//! flash are reported as a list of regions, each with a start address and a size
//! (and a sector size for flash). External memories, such as a serial NOR flash
//! or an SD card, are identified by a numeric id and described by a vector of
//! property words whose first word says which of the remaining words are valid.
//!
//! This crate contains the types for both, the registry of known memory ids and
//! the decoder for the property words. Getting the words off the device is up to
//! the caller.
//!
//! ```
//! use mboot_memory::{ExtMemDescriptor, ExtMemId};
//!
//! let raw = [0x3, 0x6000_0000, 0x4000];
//! let flash = ExtMemDescriptor::decode(ExtMemId::FlexSpiNor.id(), Some(&raw[..]))?;
//!
//! assert_eq!(flash.name()?, "FLEX-SPI-NOR");
//! assert_eq!(flash.total_size(), Some(16 * 1024 * 1024));
//! assert_eq!(flash.page_size(), None);
//! # Ok::<(), mboot_memory::MemoryError>(())
//! ```
#![warn(missing_docs)]

mod error;
mod ext_memory;
mod memory;
mod memory_id;
mod property_tags;
pub(crate) mod serialize;

pub use error::{Lookup, MemoryError};
pub use ext_memory::ExtMemDescriptor;
pub use memory::{size_fmt, FlashRegion, MemoryRegion, RamRegion};
pub use memory_id::{ExtMemId, MemId};
pub use property_tags::ExtMemPropTags;
