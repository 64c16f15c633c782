/// The key that was used for a failed memory identifier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, docsplay::Display)]
pub enum Lookup {
    /// id {0}
    Id(u32),
    /// tag `{0}`
    Tag(String),
}

/// Errors raised while building memory regions or decoding external memory properties.
///
/// All of them are validation failures of the input handed to the constructor
/// or decoder. Retrying with the same input gives the same result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, docsplay::Display)]
pub enum MemoryError {
    /// Unknown memory identifier: {0}.
    UnknownIdentifier(Lookup),

    /// Invalid bounds for the region starting at {start:#010x} with size {size:#x}: {reason}.
    InvalidRegionBounds {
        /// Start address of the rejected region.
        start: u64,
        /// Requested size of the rejected region.
        size: u64,
        /// What is wrong with the region.
        reason: &'static str,
    },

    /// Property mask {mask:#x} requires {required} words, but only {len} were supplied.
    MalformedPropertyVector {
        /// The presence mask (word 0 of the property vector).
        mask: u32,
        /// The number of words the mask refers to.
        required: usize,
        /// The number of words in the supplied vector.
        len: usize,
    },
}

impl MemoryError {
    pub(crate) fn unknown_id(id: u32) -> Self {
        MemoryError::UnknownIdentifier(Lookup::Id(id))
    }

    pub(crate) fn unknown_tag(tag: &str) -> Self {
        MemoryError::UnknownIdentifier(Lookup::Tag(tag.to_string()))
    }
}
