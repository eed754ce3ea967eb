use anyhow::Result;
use fnv::FnvHashMap;
use regex::Regex;

mod affixdata;
mod compoundrule;
mod condition;
mod parse_aff;
mod parse_dic;
mod replacements;
mod suggestions;
mod wordflags;

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::compoundrule::compile_compound_rules;
use crate::hunspell::parse_aff::parse_affix_data;
use crate::hunspell::parse_dic::parse_dict_data;
use crate::hunspell::suggestions::{edits1, SuggRanker, LATIN_ALPHABET};
use crate::hunspell::wordflags::WordFlags;
use crate::Speller;

/// The suggestion count callers customarily ask for.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// A speller built from Hunspell-format affix and dictionary text.
///
/// Construction expands every base word under its affix rules into a
/// lookup table of surface forms, so queries are plain table probes.
/// Everything is frozen once `new` returns.
#[derive(Debug)]
pub struct SpellerHunspellDict {
    affix_data: AffixData,
    words: FnvHashMap<String, Vec<WordInfo>>,
    compound_rules: Vec<Regex>,
}

/// One sense of a surface form: the policy bits its flag set carries.
/// Base dictionary entries get theirs from the word-list line; forms
/// derived via affix rules carry an empty set.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WordInfo {
    word_flags: WordFlags,
}

impl WordInfo {
    pub(crate) fn new(word_flags: WordFlags) -> Self {
        WordInfo { word_flags }
    }

    fn has(&self, wf: WordFlags) -> bool {
        self.word_flags.contains(wf)
    }
}

impl SpellerHunspellDict {
    /// Build a dictionary from decoded `.aff` and `.dic` text.
    pub fn new(affixes: &str, words: &str) -> Result<Self> {
        Self::with_settings(affixes, words, &[])
    }

    /// Like [`SpellerHunspellDict::new`], with caller-supplied fallbacks
    /// for affix settings (`("FLAG", "long")` and the like). A value from
    /// the affix text always wins over a fallback for the same key.
    pub fn with_settings(
        affixes: &str,
        words: &str,
        fallback: &[(&str, &str)],
    ) -> Result<Self> {
        let affix_data = parse_affix_data(affixes, fallback)?;
        let dict_data = parse_dict_data(words, &affix_data);
        let compound_rules = compile_compound_rules(
            &affix_data.compound_rules,
            &dict_data.compound_words,
        )?;
        Ok(SpellerHunspellDict {
            affix_data,
            words: dict_data.words,
            compound_rules,
        })
    }

    /// Check a word against the table exactly as given, falling back to
    /// the compound rules for words not in the table.
    pub fn check_exact(&self, word: &str) -> bool {
        match self.words.get(word) {
            Some(infos) => {
                // Compound-only senses don't make a standalone word good.
                infos.iter().any(|wi| !wi.has(WordFlags::OnlyInCompound))
            }
            None => {
                if let Some(min) = self.affix_data.compound_min {
                    if word.chars().count() >= min {
                        return self
                            .compound_rules
                            .iter()
                            .any(|rule| rule.is_match(word));
                    }
                }
                false
            }
        }
    }

    /// Check a word, also trying the capitalization variants that
    /// dictionaries conventionally accept: all-caps input matches a
    /// capitalized or lower-case entry, capitalized input a lower-case
    /// entry. `KEEPCASE` entries only match in their exact case.
    pub fn check(&self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() {
            return false;
        }
        if Self::is_numeric(word) {
            return true;
        }
        if self.check_exact(word) {
            return true;
        }

        if word == word.to_uppercase() {
            let capitalized = capitalize(word);
            if self.keep_case(&capitalized) {
                return false;
            }
            if self.check_exact(&capitalized) {
                return true;
            }
        }

        let lower = word.to_lowercase();
        if lower != word {
            if self.keep_case(&lower) {
                return false;
            }
            return self.check_exact(&lower);
        }
        false
    }

    /// Propose corrections for a misspelled word, best candidates first.
    /// Returns an empty list if `word` is already accepted, and at most
    /// `max` suggestions otherwise.
    pub fn suggest(&self, word: &str, max: usize) -> Vec<String> {
        let word = word.trim();
        if self.check(word) {
            return Vec::new();
        }

        // A hit from the replacement table beats everything else.
        for cand in self.affix_data.replacements.candidates(word) {
            if self.check(&cand) {
                return vec![cand];
            }
        }

        let alphabet = self
            .affix_data
            .try_string
            .as_deref()
            .unwrap_or(LATIN_ALPHABET);

        let mut edits = Vec::new();
        edits1(word, alphabet, &mut |cand| edits.push(cand));

        // Candidates are weighted by how many edit paths reach them, so
        // duplicates from the generators are counted, not skipped.
        let mut ranker = SuggRanker::default();
        for cand in &edits {
            if self.suggestable(cand) {
                ranker.add(cand.clone());
            }
        }
        for cand in &edits {
            edits1(cand, alphabet, &mut |cand2| {
                if self.suggestable(&cand2) {
                    ranker.add(cand2);
                }
            });
        }
        ranker.into_ranked(max)
    }

    fn suggestable(&self, cand: &str) -> bool {
        self.check(cand) && !self.union_flags(cand).contains(WordFlags::NoSuggest)
    }

    fn keep_case(&self, word: &str) -> bool {
        self.union_flags(word).contains(WordFlags::KeepCase)
    }

    /// Policy flags over all senses of a word. Unknown words and
    /// unconfigured policies both come out empty.
    fn union_flags(&self, word: &str) -> WordFlags {
        match self.words.get(word) {
            Some(infos) => infos
                .iter()
                .fold(WordFlags::empty(), |acc, wi| acc | wi.word_flags),
            None => WordFlags::empty(),
        }
    }

    fn is_numeric(word: &str) -> bool {
        // allow numbers with dots or commas
        // allow -- at the end and - at the front
        let word = word.strip_suffix("--").unwrap_or(word);
        let word = word.strip_prefix('-').unwrap_or(word);
        if word.is_empty() {
            return false;
        }
        let mut seen_sep = false;
        for c in word.chars() {
            if c == '.' || c == ',' {
                if seen_sep {
                    return false;
                }
                seen_sep = true;
            } else if c.is_ascii_digit() {
                seen_sep = false;
            } else {
                return false;
            }
        }
        true
    }
}

impl Speller for SpellerHunspellDict {
    fn spellcheck(&self, word: &str) -> bool {
        self.check(word)
    }

    fn suggestions(&self, word: &str, max: usize) -> Vec<String> {
        self.suggest(word, max)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
