use std::fmt;

use serde::Serialize;

use crate::error::MemoryError;
use crate::memory::size_fmt;
use crate::memory_id::MemId;
use crate::property_tags::ExtMemPropTags;
use crate::serialize::{hex_option, hex_u_int};

/// Properties of an external memory, as reported by McuBoot.
///
/// A descriptor is either *unconfigured*, when the device returned no
/// property words for the memory, or *configured*. A configured descriptor
/// carries the presence mask and exactly those fields whose flag is set in it.
/// A field that was not reported is `None`, which is not the same as a
/// reported zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExtMemDescriptor {
    mem_id: u32,
    properties: Option<ExtMemProperties>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
struct ExtMemProperties {
    #[serde(serialize_with = "hex_u_int")]
    mask: u32,
    #[serde(serialize_with = "hex_option", skip_serializing_if = "Option::is_none")]
    start_address: Option<u32>,
    #[serde(serialize_with = "hex_option", skip_serializing_if = "Option::is_none")]
    total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sector_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_size: Option<u32>,
}

impl ExtMemDescriptor {
    /// A descriptor for a memory the device reported no properties for.
    pub fn unconfigured(mem_id: u32) -> Self {
        Self {
            mem_id,
            properties: None,
        }
    }

    /// Decodes the property words McuBoot reported for the memory `mem_id`.
    ///
    /// Word 0 of `raw` is the presence mask, see [`ExtMemPropTags`]. A field is
    /// only read if its flag is set, whatever value the word at its position holds.
    /// `None` or an empty slice yield an [unconfigured](Self::unconfigured) descriptor.
    ///
    /// The memory id itself is not checked here, see [`name`](Self::name).
    pub fn decode(mem_id: u32, raw: Option<&[u32]>) -> Result<Self, MemoryError> {
        let words = raw.unwrap_or_default();
        let Some(&mask) = words.first() else {
            tracing::debug!("External memory {mem_id} is not configured");
            return Ok(Self::unconfigured(mem_id));
        };

        let tags = ExtMemPropTags::from_bits_retain(mask);
        let required = tags.required_len();
        if words.len() < required {
            return Err(MemoryError::MalformedPropertyVector {
                mask,
                required,
                len: words.len(),
            });
        }

        let unknown = tags.difference(ExtMemPropTags::all());
        if !unknown.is_empty() {
            tracing::warn!(
                "External memory {mem_id} reports unknown property flags {:#x}, ignoring them",
                unknown.bits()
            );
        }

        let field = |tag: ExtMemPropTags| -> Option<u32> {
            let index = tag.word_index()?;
            let value = words.get(index).copied();
            if tags.contains(tag) {
                tracing::trace!("{tag:?} = {value:#x?}");
                value
            } else {
                if let Some(stale) = value.filter(|&v| v != 0) {
                    tracing::debug!("Ignoring word {index} = {stale:#x}, {tag:?} is not flagged");
                }
                None
            }
        };

        let properties = ExtMemProperties {
            mask,
            start_address: field(ExtMemPropTags::START_ADDRESS),
            total_size: field(ExtMemPropTags::SIZE_IN_KBYTES).map(|kb| u64::from(kb) * 1024),
            page_size: field(ExtMemPropTags::PAGE_SIZE),
            sector_size: field(ExtMemPropTags::SECTOR_SIZE),
            block_size: field(ExtMemPropTags::BLOCK_SIZE),
        };
        tracing::debug!("External memory {mem_id}: {properties:?}");

        Ok(Self {
            mem_id,
            properties: Some(properties),
        })
    }

    /// The numeric id of the memory.
    pub fn mem_id(&self) -> u32 {
        self.mem_id
    }

    /// Resolves the memory id.
    pub fn memory(&self) -> Result<MemId, MemoryError> {
        MemId::lookup(self.mem_id)
    }

    /// The tag of the memory, e.g. `FLEX-SPI-NOR`.
    pub fn name(&self) -> Result<&'static str, MemoryError> {
        self.memory().map(MemId::tag)
    }

    /// A human readable description of the memory.
    pub fn description(&self) -> Result<&'static str, MemoryError> {
        self.memory().map(MemId::description)
    }

    /// Returns `true` if the device reported property words for the memory.
    pub fn is_configured(&self) -> bool {
        self.properties.is_some()
    }

    /// The raw presence mask, including flags this crate does not know.
    pub fn presence_mask(&self) -> Option<u32> {
        self.properties.map(|p| p.mask)
    }

    /// The flags of the fields this descriptor holds a value for.
    pub fn reported_tags(&self) -> ExtMemPropTags {
        let Some(p) = self.properties else {
            return ExtMemPropTags::INIT_STATUS;
        };

        let mut tags = ExtMemPropTags::empty();
        tags.set(ExtMemPropTags::START_ADDRESS, p.start_address.is_some());
        tags.set(ExtMemPropTags::SIZE_IN_KBYTES, p.total_size.is_some());
        tags.set(ExtMemPropTags::PAGE_SIZE, p.page_size.is_some());
        tags.set(ExtMemPropTags::SECTOR_SIZE, p.sector_size.is_some());
        tags.set(ExtMemPropTags::BLOCK_SIZE, p.block_size.is_some());
        tags
    }

    /// The start address of the memory.
    pub fn start_address(&self) -> Option<u32> {
        self.properties.and_then(|p| p.start_address)
    }

    /// The total size of the memory in bytes.
    pub fn total_size(&self) -> Option<u64> {
        self.properties.and_then(|p| p.total_size)
    }

    /// The page size of the memory in bytes.
    pub fn page_size(&self) -> Option<u32> {
        self.properties.and_then(|p| p.page_size)
    }

    /// The sector size of the memory in bytes.
    pub fn sector_size(&self) -> Option<u32> {
        self.properties.and_then(|p| p.sector_size)
    }

    /// The block size of the memory in bytes.
    pub fn block_size(&self) -> Option<u32> {
        self.properties.and_then(|p| p.block_size)
    }
}

impl fmt::Display for ExtMemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(p) = self.properties else {
            return f.write_str("Not Configured");
        };

        let fragments = [
            p.start_address.map(|address| format!("Start Address = 0x{address:08X}")),
            p.total_size.map(|size| format!("Total Size = {}", size_fmt(size))),
            p.page_size.map(|size| format!("Page Size = {size}")),
            p.sector_size.map(|size| format!("Sector Size = {size}")),
            p.block_size.map(|size| format!("Block Size = {size}")),
        ];
        let info = fragments.into_iter().flatten().collect::<Vec<_>>();

        // A memory that is present but reports nothing reads the same as an absent one.
        if info.is_empty() {
            f.write_str("Not Configured")
        } else {
            f.write_str(&info.join("  "))
        }
    }
}
