//! Identifiers of the memories McuBoot can address.
//!
//! There are two registries. [`ExtMemId`] only knows memories attached to the
//! chip, [`MemId`] additionally knows the chip's own RAM/flash. Code that can
//! only ever deal with external devices uses the narrower type, so an internal
//! id is rejected when the value is built instead of silently slipping through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::MemoryError;

/// A memory attached to, but not part of, the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "IdOrTag")]
pub enum ExtMemId {
    /// Quad SPI Memory 0
    QuadSpi0,
    /// Nonvolatile information register 0 (only used by SB loader)
    Ifr0,
    /// SEMC NOR Memory
    SemcNor,
    /// Flex SPI NOR Memory
    FlexSpiNor,
    /// SPIFI NOR Memory
    SpifiNor,
    /// Execute-Only region on internal Flash
    FlashExecOnly,
    /// SEMC NAND Memory
    SemcNand,
    /// SPI NAND Memory
    SpiNand,
    /// SPI NOR/EEPROM Memory
    SpiNorEeprom,
    /// I2C NOR/EEPROM Memory
    I2cNorEeprom,
    /// eSD/SD/SDHC/SDXC Memory Card
    SdCard,
    /// MMC/eMMC Memory Card
    MmcCard,
}

impl ExtMemId {
    /// Every external memory, in ascending id order.
    pub const ALL: [ExtMemId; 12] = [
        ExtMemId::QuadSpi0,
        ExtMemId::Ifr0,
        ExtMemId::SemcNor,
        ExtMemId::FlexSpiNor,
        ExtMemId::SpifiNor,
        ExtMemId::FlashExecOnly,
        ExtMemId::SemcNand,
        ExtMemId::SpiNand,
        ExtMemId::SpiNorEeprom,
        ExtMemId::I2cNorEeprom,
        ExtMemId::SdCard,
        ExtMemId::MmcCard,
    ];

    const fn entry(self) -> (u32, &'static str, &'static str) {
        match self {
            ExtMemId::QuadSpi0 => (1, "QSPI", "Quad SPI Memory 0"),
            ExtMemId::Ifr0 => (
                4,
                "IFR0",
                "Nonvolatile information register 0 (only used by SB loader)",
            ),
            ExtMemId::SemcNor => (8, "SEMC-NOR", "SEMC NOR Memory"),
            ExtMemId::FlexSpiNor => (9, "FLEX-SPI-NOR", "Flex SPI NOR Memory"),
            ExtMemId::SpifiNor => (10, "SPIFI-NOR", "SPIFI NOR Memory"),
            ExtMemId::FlashExecOnly => (16, "FLASH-EXEC", "Execute-Only region on internal Flash"),
            ExtMemId::SemcNand => (256, "SEMC-NAND", "SEMC NAND Memory"),
            ExtMemId::SpiNand => (257, "SPI-NAND", "SPI NAND Memory"),
            ExtMemId::SpiNorEeprom => (272, "SPI-MEM", "SPI NOR/EEPROM Memory"),
            ExtMemId::I2cNorEeprom => (273, "I2C-MEM", "I2C NOR/EEPROM Memory"),
            ExtMemId::SdCard => (288, "SD", "eSD/SD/SDHC/SDXC Memory Card"),
            ExtMemId::MmcCard => (289, "MMC", "MMC/eMMC Memory Card"),
        }
    }

    /// The numeric id used by McuBoot commands.
    pub const fn id(self) -> u32 {
        self.entry().0
    }

    /// The short tag, e.g. `FLEX-SPI-NOR`.
    pub const fn tag(self) -> &'static str {
        self.entry().1
    }

    /// A human readable description of the memory.
    pub const fn description(self) -> &'static str {
        self.entry().2
    }

    /// Resolves a numeric id.
    pub fn lookup(id: u32) -> Result<Self, MemoryError> {
        Self::ALL
            .into_iter()
            .find(|mem| mem.id() == id)
            .ok_or_else(|| MemoryError::unknown_id(id))
    }

    /// Resolves a tag. The comparison ignores ASCII case.
    pub fn lookup_by_tag(tag: &str) -> Result<Self, MemoryError> {
        Self::ALL
            .into_iter()
            .find(|mem| mem.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| MemoryError::unknown_tag(tag))
    }
}

/// Any memory McuBoot can address: the chip's own memory or an external one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "IdOrTag")]
pub enum MemId {
    /// Internal RAM/FLASH (Used for the PRINCE configuration)
    Internal,
    /// An external memory.
    External(ExtMemId),
}

impl MemId {
    const INTERNAL_ID: u32 = 0;
    const INTERNAL_TAG: &'static str = "RAM/FLASH";
    const INTERNAL_DESCRIPTION: &'static str =
        "Internal RAM/FLASH (Used for the PRINCE configuration)";

    /// Iterates over every memory, internal first, then the external ones in id order.
    pub fn iter() -> impl Iterator<Item = MemId> {
        std::iter::once(MemId::Internal).chain(ExtMemId::ALL.into_iter().map(MemId::External))
    }

    /// The numeric id used by McuBoot commands.
    pub const fn id(self) -> u32 {
        match self {
            MemId::Internal => Self::INTERNAL_ID,
            MemId::External(ext) => ext.id(),
        }
    }

    /// The short tag, e.g. `RAM/FLASH`.
    pub const fn tag(self) -> &'static str {
        match self {
            MemId::Internal => Self::INTERNAL_TAG,
            MemId::External(ext) => ext.tag(),
        }
    }

    /// A human readable description of the memory.
    pub const fn description(self) -> &'static str {
        match self {
            MemId::Internal => Self::INTERNAL_DESCRIPTION,
            MemId::External(ext) => ext.description(),
        }
    }

    /// Returns `true` for the chip's own memory.
    pub const fn is_internal(self) -> bool {
        matches!(self, MemId::Internal)
    }

    /// Resolves a numeric id.
    pub fn lookup(id: u32) -> Result<Self, MemoryError> {
        if id == Self::INTERNAL_ID {
            return Ok(MemId::Internal);
        }
        ExtMemId::lookup(id).map(MemId::External)
    }

    /// Resolves a tag. The comparison ignores ASCII case.
    pub fn lookup_by_tag(tag: &str) -> Result<Self, MemoryError> {
        if Self::INTERNAL_TAG.eq_ignore_ascii_case(tag) {
            return Ok(MemId::Internal);
        }
        ExtMemId::lookup_by_tag(tag).map(MemId::External)
    }
}

impl From<ExtMemId> for MemId {
    fn from(ext: ExtMemId) -> Self {
        MemId::External(ext)
    }
}

impl TryFrom<MemId> for ExtMemId {
    type Error = MemoryError;

    fn try_from(mem: MemId) -> Result<Self, Self::Error> {
        match mem {
            MemId::External(ext) => Ok(ext),
            MemId::Internal => Err(MemoryError::unknown_id(mem.id())),
        }
    }
}

impl TryFrom<u32> for ExtMemId {
    type Error = MemoryError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::lookup(id)
    }
}

impl TryFrom<u32> for MemId {
    type Error = MemoryError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::lookup(id)
    }
}

impl FromStr for ExtMemId {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup_by_tag(s)
    }
}

impl FromStr for MemId {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup_by_tag(s)
    }
}

impl fmt::Display for ExtMemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl fmt::Display for MemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// Identifiers are written as their tag, which is what users type on the command line.
impl Serialize for ExtMemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl Serialize for MemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Either spelling of a memory identifier accepted when deserializing.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrTag {
    Id(u32),
    Tag(String),
}

impl TryFrom<IdOrTag> for ExtMemId {
    type Error = MemoryError;

    fn try_from(value: IdOrTag) -> Result<Self, Self::Error> {
        match value {
            IdOrTag::Id(id) => Self::lookup(id),
            IdOrTag::Tag(tag) => Self::lookup_by_tag(&tag),
        }
    }
}

impl TryFrom<IdOrTag> for MemId {
    type Error = MemoryError;

    fn try_from(value: IdOrTag) -> Result<Self, Self::Error> {
        match value {
            IdOrTag::Id(id) => Self::lookup(id),
            IdOrTag::Tag(tag) => Self::lookup_by_tag(&tag),
        }
    }
}
