use anyhow::{anyhow, bail, Error, Result};
use fnv::FnvHashMap;
use itertools::Itertools;

use crate::hunspell::condition::AffixCondition;
use crate::hunspell::replacements::Replacements;
use crate::hunspell::wordflags::WordFlags;

/// Represents the format of the flags after words in the dictionary file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagMode {
    /// Single-character flags
    CharFlags,
    /// Two-character flags
    DoubleCharFlags,
    /// Flags are comma-separated ASCII integers
    NumericFlags,
    /// Flags are Unicode codepoints in UTF-8 format
    Utf8Flags,
}

pub type AffixFlag = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// Continuation classes may name each other; expansion stops rather than
/// chase such a loop forever.
const MAX_CONTINUATION_DEPTH: usize = 8;

/// One alternative of an affix rule. `strip` is removed from the word
/// (front for prefixes, back for suffixes) before `add` goes on, and the
/// entry only applies to words matching `condition`.
#[derive(Clone, Debug)]
pub struct AffixEntry {
    pub strip: Option<AffixCondition>,
    pub add: String,
    pub condition: Option<AffixCondition>,
    pub continuation: Vec<AffixFlag>,
}

#[derive(Clone, Debug)]
pub struct AffixRule {
    pub kind: AffixKind,
    pub combineable: bool,
    pub entries: Vec<AffixEntry>,
}

impl AffixRule {
    /// Collect every surface form this rule derives from `word`, in entry
    /// order, each direct derivation before the forms its continuation
    /// classes add. Duplicates are kept; the word table copes with them.
    pub fn apply(&self, word: &str, ad: &AffixData, out: &mut Vec<String>) {
        self.apply_at_depth(word, ad, 0, out);
    }

    fn apply_at_depth(
        &self,
        word: &str,
        ad: &AffixData,
        depth: usize,
        out: &mut Vec<String>,
    ) {
        if depth >= MAX_CONTINUATION_DEPTH {
            return;
        }
        for entry in &self.entries {
            let derived = match entry.derive(word, self.kind) {
                Some(derived) => derived,
                None => continue,
            };
            out.push(derived.clone());
            for flag in &entry.continuation {
                // Unknown continuation classes are stray codes; skip them.
                if let Some(next) = ad.rules.get(flag) {
                    next.apply_at_depth(&derived, ad, depth + 1, out);
                }
            }
        }
    }
}

impl AffixEntry {
    fn derive(&self, word: &str, kind: AffixKind) -> Option<String> {
        match kind {
            AffixKind::Prefix => {
                if let Some(cond) = &self.condition {
                    if !cond.matches_start(word) {
                        return None;
                    }
                }
                let stem = match &self.strip {
                    // A strip that doesn't match leaves the word whole.
                    Some(strip) => strip.strip_start(word).unwrap_or(word),
                    None => word,
                };
                let mut derived =
                    String::with_capacity(self.add.len() + stem.len());
                derived.push_str(&self.add);
                derived.push_str(stem);
                Some(derived)
            }
            AffixKind::Suffix => {
                if let Some(cond) = &self.condition {
                    if !cond.matches_end(word) {
                        return None;
                    }
                }
                let stem = match &self.strip {
                    Some(strip) => strip.strip_end(word).unwrap_or(word),
                    None => word,
                };
                let mut derived =
                    String::with_capacity(stem.len() + self.add.len());
                derived.push_str(stem);
                derived.push_str(&self.add);
                Some(derived)
            }
        }
    }
}

/// Everything parsed out of the affix file: the flag scheme, the affix
/// rule tables, compound rule strings, the replacement table, and both
/// the interpreted and the raw settings.
#[derive(Debug)]
pub struct AffixData {
    pub flag_mode: FlagMode,
    pub rules: FnvHashMap<AffixFlag, AffixRule>,
    pub compound_rules: Vec<String>,
    pub replacements: Replacements,
    /// Every KEY value directive as it appeared, recognized or not.
    pub settings: FnvHashMap<String, String>,
    pub only_in_compound: Option<AffixFlag>,
    pub keep_case: Option<AffixFlag>,
    pub need_affix: Option<AffixFlag>,
    pub no_suggest: Option<AffixFlag>,
    pub compound_min: Option<usize>,
    pub try_string: Option<String>,
}

impl AffixData {
    pub fn new() -> Self {
        AffixData {
            flag_mode: FlagMode::CharFlags,
            rules: FnvHashMap::default(),
            compound_rules: Vec::new(),
            replacements: Replacements::default(),
            settings: FnvHashMap::default(),
            only_in_compound: None,
            keep_case: None,
            need_affix: None,
            no_suggest: None,
            compound_min: None,
            try_string: None,
        }
    }

    pub fn parse_flags(&self, flags: &str) -> Result<Vec<AffixFlag>> {
        match self.flag_mode {
            FlagMode::CharFlags | FlagMode::Utf8Flags => {
                Ok(flags.chars().map(|c| c as u32).collect())
            }
            FlagMode::DoubleCharFlags => flags
                .chars()
                .chunks(2)
                .into_iter()
                .map(|mut pair| {
                    let c1 = pair.next().unwrap() as u32;
                    let c2 = match pair.next() {
                        Some(c) => c as u32,
                        None => bail!("Odd number of characters in long flags"),
                    };
                    if c1 > 255 || c2 > 255 {
                        bail!("Invalid characters in long flag");
                    }
                    Ok(c1 * 256 + c2)
                })
                .collect(),
            FlagMode::NumericFlags => flags
                .split(',')
                .map(|d| d.parse::<AffixFlag>().map_err(Error::from))
                .collect(),
        }
    }

    pub fn parse_single_flag(&self, value: &str) -> Result<AffixFlag> {
        let flags = self.parse_flags(value)?;
        if flags.len() != 1 {
            bail!("Expected a single flag, got {:?}", value);
        }
        Ok(flags[0])
    }

    /// Record a KEY value directive, whether it came from the affix file
    /// or from caller-supplied settings.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "FLAG" => {
                self.flag_mode = match value {
                    "long" => FlagMode::DoubleCharFlags,
                    "num" => FlagMode::NumericFlags,
                    "UTF-8" => FlagMode::Utf8Flags,
                    // Anything else gets the single-character default.
                    _ => FlagMode::CharFlags,
                };
            }
            "ONLYINCOMPOUND" => {
                self.only_in_compound = Some(self.parse_single_flag(value)?);
            }
            "KEEPCASE" => self.keep_case = Some(self.parse_single_flag(value)?),
            "NEEDAFFIX" => {
                self.need_affix = Some(self.parse_single_flag(value)?);
            }
            "NOSUGGEST" => {
                self.no_suggest = Some(self.parse_single_flag(value)?);
            }
            "COMPOUNDMIN" => {
                self.compound_min = Some(value.parse().map_err(|_| {
                    anyhow!("COMPOUNDMIN: expected a number, got {:?}", value)
                })?);
            }
            "TRY" => self.try_string = Some(value.to_string()),
            _ => (),
        }
        self.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// The policy bits carried by a flag set. Policies without a
    /// configured flag never set their bit.
    pub fn special_flags(&self, flags: &[AffixFlag]) -> WordFlags {
        let mut wf = WordFlags::empty();
        if matches!(self.only_in_compound, Some(f) if flags.contains(&f)) {
            wf |= WordFlags::OnlyInCompound;
        }
        if matches!(self.keep_case, Some(f) if flags.contains(&f)) {
            wf |= WordFlags::KeepCase;
        }
        if matches!(self.no_suggest, Some(f) if flags.contains(&f)) {
            wf |= WordFlags::NoSuggest;
        }
        if matches!(self.need_affix, Some(f) if flags.contains(&f)) {
            wf |= WordFlags::NeedAffix;
        }
        wf
    }
}
