use crate::error::MemoryError;
use crate::serialize::{hex_or_u64, hex_u_int};
use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Formats a byte count with the largest binary unit that keeps the value at or above one,
/// e.g. `512 B` or `64.0 KiB`.
pub fn size_fmt(size: u64) -> String {
    ByteSize(size).display().iec().to_string()
}

/// Computes the inclusive end address of a region of `size` bytes starting at `start`.
fn end_address(start: u64, size: u64) -> Result<u64, MemoryError> {
    if size == 0 {
        return Err(MemoryError::InvalidRegionBounds {
            start,
            size,
            reason: "the region is empty",
        });
    }

    start
        .checked_add(size - 1)
        .ok_or(MemoryError::InvalidRegionBounds {
            start,
            size,
            reason: "the region exceeds the address space",
        })
}

fn fmt_bounds(f: &mut fmt::Formatter<'_>, start: u64, end: u64) -> fmt::Result {
    write!(
        f,
        "0x{start:08X} - 0x{end:08X}; Total Size: {}",
        size_fmt(end - start + 1)
    )
}

/// Represents a region in RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RamRegionSpec", into = "RamRegionSpec")]
pub struct RamRegion {
    index: u32,
    start: u64,
    end: u64,
}

impl RamRegion {
    /// Creates the RAM region number `index`, covering `size` bytes from `start`.
    pub fn new(index: u32, start: u64, size: u64) -> Result<Self, MemoryError> {
        let end = end_address(start, size)?;
        Ok(Self { index, start, end })
    }

    /// Position of the region among the RAM regions of the device.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// First address of the region.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last address of the region (inclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes in the region.
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for RamRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region {}: ", self.index)?;
        fmt_bounds(f, self.start, self.end)
    }
}

/// Represents a region in internal flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FlashRegionSpec", into = "FlashRegionSpec")]
pub struct FlashRegion {
    index: u32,
    start: u64,
    end: u64,
    sector_size: u64,
}

impl FlashRegion {
    /// Creates the flash region number `index`, covering `size` bytes from `start`
    /// and erasable in units of `sector_size` bytes.
    pub fn new(index: u32, start: u64, size: u64, sector_size: u64) -> Result<Self, MemoryError> {
        let end = end_address(start, size)?;
        if sector_size == 0 {
            return Err(MemoryError::InvalidRegionBounds {
                start,
                size,
                reason: "the sector size is zero",
            });
        }

        Ok(Self {
            index,
            start,
            end,
            sector_size,
        })
    }

    /// Position of the region among the flash regions of the device.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// First address of the region.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last address of the region (inclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes in the region.
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Erase granularity of the region.
    pub fn sector_size(&self) -> u64 {
        self.sector_size
    }
}

impl fmt::Display for FlashRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region {}: ", self.index)?;
        fmt_bounds(f, self.start, self.end)?;
        write!(f, " Sector size: {}", size_fmt(self.sector_size))
    }
}

/// Declares the type of a memory region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryRegion {
    /// Memory region describing RAM.
    Ram(RamRegion),
    /// Memory region describing internal flash.
    Flash(FlashRegion),
}

impl MemoryRegion {
    /// Returns the RAM region if this is a RAM region, otherwise None.
    pub fn as_ram_region(&self) -> Option<&RamRegion> {
        match self {
            MemoryRegion::Ram(region) => Some(region),
            _ => None,
        }
    }

    /// Returns the flash region if this is a flash region, otherwise None.
    pub fn as_flash_region(&self) -> Option<&FlashRegion> {
        match self {
            MemoryRegion::Flash(region) => Some(region),
            _ => None,
        }
    }

    /// First address of the region.
    pub fn start(&self) -> u64 {
        match self {
            MemoryRegion::Ram(region) => region.start(),
            MemoryRegion::Flash(region) => region.start(),
        }
    }

    /// Last address of the region (inclusive).
    pub fn end(&self) -> u64 {
        match self {
            MemoryRegion::Ram(region) => region.end(),
            MemoryRegion::Flash(region) => region.end(),
        }
    }

    /// Number of bytes in the region.
    pub fn size(&self) -> u64 {
        self.end() - self.start() + 1
    }

    /// Returns the address range of the memory region.
    pub fn address_range(&self) -> RangeInclusive<u64> {
        self.start()..=self.end()
    }

    /// Returns whether the memory region contains the given address.
    pub fn contains(&self, address: u64) -> bool {
        self.address_range().contains(&address)
    }

    /// Returns `true` if the memory region is [`Ram`].
    ///
    /// [`Ram`]: MemoryRegion::Ram
    #[must_use]
    pub fn is_ram(&self) -> bool {
        matches!(self, Self::Ram(..))
    }

    /// Returns `true` if the memory region is [`Flash`].
    ///
    /// [`Flash`]: MemoryRegion::Flash
    #[must_use]
    pub fn is_flash(&self) -> bool {
        matches!(self, Self::Flash(..))
    }
}

impl From<RamRegion> for MemoryRegion {
    fn from(region: RamRegion) -> Self {
        MemoryRegion::Ram(region)
    }
}

impl From<FlashRegion> for MemoryRegion {
    fn from(region: FlashRegion) -> Self {
        MemoryRegion::Flash(region)
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryRegion::Ram(region) => fmt::Display::fmt(region, f),
            MemoryRegion::Flash(region) => fmt::Display::fmt(region, f),
        }
    }
}

/// Serialized form of a [`RamRegion`]. The end address is always derived.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RamRegionSpec {
    index: u32,
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_or_u64")]
    start: u64,
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_or_u64")]
    size: u64,
}

impl TryFrom<RamRegionSpec> for RamRegion {
    type Error = MemoryError;

    fn try_from(spec: RamRegionSpec) -> Result<Self, Self::Error> {
        RamRegion::new(spec.index, spec.start, spec.size)
    }
}

impl From<RamRegion> for RamRegionSpec {
    fn from(region: RamRegion) -> Self {
        RamRegionSpec {
            index: region.index,
            start: region.start,
            size: region.size(),
        }
    }
}

/// Serialized form of a [`FlashRegion`].
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlashRegionSpec {
    index: u32,
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_or_u64")]
    start: u64,
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_or_u64")]
    size: u64,
    #[serde(serialize_with = "hex_u_int", deserialize_with = "hex_or_u64")]
    sector_size: u64,
}

impl TryFrom<FlashRegionSpec> for FlashRegion {
    type Error = MemoryError;

    fn try_from(spec: FlashRegionSpec) -> Result<Self, Self::Error> {
        FlashRegion::new(spec.index, spec.start, spec.size, spec.sector_size)
    }
}

impl From<FlashRegion> for FlashRegionSpec {
    fn from(region: FlashRegion) -> Self {
        FlashRegionSpec {
            index: region.index,
            start: region.start,
            size: region.size(),
            sector_size: region.sector_size,
        }
    }
}
