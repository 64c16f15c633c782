use bitflags::bitflags;

bitflags! {
    /// Presence flags of an external memory property vector.
    ///
    /// McuBoot answers an external memory attribute query with a list of words.
    /// Word 0 is a combination of these flags, telling which of the following
    /// words carry a value the device actually reported.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtMemPropTags: u32 {
        /// Word 1 holds the start address.
        const START_ADDRESS  = 1 << 0;
        /// Word 2 holds the total size in kilobytes.
        const SIZE_IN_KBYTES = 1 << 1;
        /// Word 3 holds the page size.
        const PAGE_SIZE      = 1 << 2;
        /// Word 4 holds the sector size.
        const SECTOR_SIZE    = 1 << 3;
        /// Word 5 holds the block size.
        const BLOCK_SIZE     = 1 << 4;
    }
}

impl ExtMemPropTags {
    /// The mask of a memory that has been initialized but reports no property.
    pub const INIT_STATUS: Self = Self::empty();

    /// Position of the word carrying the value of a single flag.
    ///
    /// Returns `None` if `self` is not exactly one known flag.
    pub fn word_index(self) -> Option<usize> {
        const WORDS: [(ExtMemPropTags, usize); 5] = [
            (ExtMemPropTags::START_ADDRESS, 1),
            (ExtMemPropTags::SIZE_IN_KBYTES, 2),
            (ExtMemPropTags::PAGE_SIZE, 3),
            (ExtMemPropTags::SECTOR_SIZE, 4),
            (ExtMemPropTags::BLOCK_SIZE, 5),
        ];

        WORDS
            .iter()
            .find(|(tag, _)| *tag == self)
            .map(|&(_, index)| index)
    }

    /// Number of words a property vector needs to hold every field flagged in `self`,
    /// including the mask word itself.
    pub fn required_len(self) -> usize {
        self.iter()
            .filter_map(Self::word_index)
            .max()
            .map_or(1, |index| index + 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test]
    fn every_tag_is_a_single_bit() {
        for (_, tag) in ExtMemPropTags::all().iter_names() {
            assert_eq!(tag.bits().count_ones(), 1);
        }
        assert!(ExtMemPropTags::INIT_STATUS.is_empty());
    }

    #[test]
    fn word_index_only_for_single_flags() {
        assert_eq!(ExtMemPropTags::START_ADDRESS.word_index(), Some(1));
        assert_eq!(ExtMemPropTags::BLOCK_SIZE.word_index(), Some(5));
        assert_eq!(
            (ExtMemPropTags::START_ADDRESS | ExtMemPropTags::PAGE_SIZE).word_index(),
            None
        );
        assert_eq!(ExtMemPropTags::empty().word_index(), None);
    }

    #[test_case(0x00, 1; "init status only")]
    #[test_case(0x03, 3; "start address and size")]
    #[test_case(0x08, 5; "sector size")]
    #[test_case(0x10, 6; "block size")]
    #[test_case(0x1f, 6; "everything")]
    fn required_len(mask: u32, len: usize) {
        assert_eq!(ExtMemPropTags::from_bits_truncate(mask).required_len(), len);
    }
}
