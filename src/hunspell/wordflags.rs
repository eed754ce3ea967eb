#![allow(non_upper_case_globals)]

use bitflags::bitflags;

bitflags! {
    /// The named policies a word's flag set can carry, precomputed at
    /// insertion time so lookups don't rescan flag lists.
    #[derive(Default)]
    pub struct WordFlags: u8 {
        /// This word can only appear as part of compound words.
        const OnlyInCompound = 0x01;
        /// This word should not have its case changed.
        const KeepCase = 0x02;
        /// This word must not be suggested as a correction.
        const NoSuggest = 0x04;
        /// This word is not valid without an affix.
        const NeedAffix = 0x08;
    }
}
