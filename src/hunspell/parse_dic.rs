/// Parser for hunspell-format .dic files: every base word goes into the
/// lookup table together with all the surface forms its affix flags
/// derive, and compound-rule codes collect their member words.
use fnv::FnvHashMap;

use crate::hunspell::affixdata::{AffixData, AffixFlag};
use crate::hunspell::wordflags::WordFlags;
use crate::hunspell::WordInfo;

pub struct DictData {
    pub words: FnvHashMap<String, Vec<WordInfo>>,
    /// For each flag code used by a compound rule, the words that carry
    /// the code. Codes nothing carries are dropped.
    pub compound_words: FnvHashMap<AffixFlag, Vec<String>>,
}

pub fn parse_dict_data(text: &str, ad: &AffixData) -> DictData {
    let mut words: FnvHashMap<String, Vec<WordInfo>> = FnvHashMap::default();
    let mut compound_words: FnvHashMap<AffixFlag, Vec<String>> =
        FnvHashMap::default();

    // Every character of a compound rule gets a bucket up front; the
    // ones that stay empty (regex operators, unused codes) are removed
    // again below. ONLYINCOMPOUND words are collected the same way.
    for rule in &ad.compound_rules {
        for c in rule.chars() {
            compound_words.entry(c as u32).or_default();
        }
    }
    if let Some(flag) = ad.only_in_compound {
        compound_words.entry(flag).or_default();
    }

    let mut lines = text
        .lines()
        .filter(|line| !line.starts_with('\t'))
        .map(str::trim)
        .filter(|line| !line.is_empty());
    // The first line is the word count; it is not worth verifying.
    lines.next();

    for line in lines {
        let line = strip_morphological_fields(line);
        let (word, flagstr) = line.split_once('/').unwrap_or((line, ""));
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        // If the flag string doesn't parse, keep the word without flags.
        let flags = ad.parse_flags(flagstr).unwrap_or_default();

        let special = ad.special_flags(&flags);
        if !special.contains(WordFlags::NeedAffix) {
            add_word(&mut words, word.to_string(), special);
        }

        for (i, code) in flags.iter().enumerate() {
            if let Some(rule) = ad.rules.get(code) {
                let mut derived = Vec::new();
                rule.apply(word, ad, &mut derived);
                if rule.combineable {
                    // A combineable rule pairs up with every later
                    // combineable rule of the opposite kind.
                    let mut crossed = Vec::new();
                    for other in &flags[i + 1..] {
                        let partner = match ad.rules.get(other) {
                            Some(r)
                                if r.combineable && r.kind != rule.kind =>
                            {
                                r
                            }
                            _ => continue,
                        };
                        for form in &derived {
                            partner.apply(form, ad, &mut crossed);
                        }
                    }
                    derived.append(&mut crossed);
                }
                for form in derived {
                    add_word(&mut words, form, WordFlags::empty());
                }
            }
            if let Some(bucket) = compound_words.get_mut(code) {
                bucket.push(word.to_string());
            }
        }
    }

    compound_words.retain(|_, bucket| !bucket.is_empty());
    DictData { words, compound_words }
}

fn add_word(
    words: &mut FnvHashMap<String, Vec<WordInfo>>,
    word: String,
    special: WordFlags,
) {
    if word.is_empty() {
        return;
    }
    words.entry(word).or_default().push(WordInfo::new(special));
}

/// Morphological fields look like `po:noun st:stem` after the word. The
/// word itself may contain spaces, so only a space followed by a
/// two-character tag and a colon counts as the start of the fields.
fn strip_morphological_fields(line: &str) -> &str {
    let mut last_space = None;
    for (i, c) in line.char_indices() {
        if let Some(spos) = last_space {
            let off = i - spos;
            if off <= 2 && !c.is_alphanumeric() {
                last_space =
                    if c == ' ' || c == '\t' { Some(i) } else { None };
            } else if off == 3 {
                if c == ':' {
                    return &line[..spos];
                }
                last_space = None;
            }
        } else if c == ' ' || c == '\t' {
            last_space = Some(i);
        }
    }
    line
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strip_morphological_fields() {
        assert_eq!("walk", strip_morphological_fields("walk po:verb"));
        assert_eq!("walk/DG", strip_morphological_fields("walk/DG po:verb"));
        assert_eq!(
            "walk/DG",
            strip_morphological_fields("walk/DG po:verb st:walk")
        );
        // Spaces alone don't start the fields.
        assert_eq!("a lot", strip_morphological_fields("a lot"));
        assert_eq!("a posteriori", strip_morphological_fields("a posteriori"));
        assert_eq!("word", strip_morphological_fields("word"));
    }

    #[test]
    fn test_tab_comments_and_count_line() {
        let ad = AffixData::new();
        let dict = parse_dict_data("2\n\tcommented out\nfoo\nbar\n", &ad);
        assert!(dict.words.contains_key("foo"));
        assert!(dict.words.contains_key("bar"));
        assert!(!dict.words.contains_key("commented out"));
        assert_eq!(2, dict.words.len());
    }

    #[test]
    fn test_multiple_senses_append() {
        let mut ad = AffixData::new();
        ad.apply_setting("KEEPCASE", "K").unwrap();
        let dict = parse_dict_data("2\nfoo/K\nfoo\n", &ad);
        assert_eq!(2, dict.words["foo"].len());
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        let ad = AffixData::new();
        let dict = parse_dict_data("1\nfoo/XYZ\n", &ad);
        assert_eq!(1, dict.words["foo"].len());
    }
}
