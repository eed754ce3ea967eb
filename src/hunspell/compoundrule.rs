use anyhow::{Context, Result};
use fnv::FnvHashMap;
use itertools::Itertools;
use regex::{Regex, RegexBuilder};

use crate::hunspell::affixdata::AffixFlag;

/// Compile COMPOUNDRULE strings into anchored, case-insensitive regexes
/// over word concatenations. Each rule character that has a bucket of
/// words becomes an alternation group of those words; every other
/// character, including the operators `*`, `?` and `+`, is copied
/// through as written.
pub fn compile_compound_rules(
    rules: &[String],
    buckets: &FnvHashMap<AffixFlag, Vec<String>>,
) -> Result<Vec<Regex>> {
    rules
        .iter()
        .map(|rule| {
            let mut pattern = String::from("^");
            for c in rule.chars() {
                match buckets.get(&(c as u32)) {
                    Some(bucket) => {
                        pattern.push('(');
                        pattern.push_str(
                            &bucket.iter().map(|w| regex::escape(w)).join("|"),
                        );
                        pattern.push(')');
                    }
                    None => pattern.push(c),
                }
            }
            pattern.push('$');
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("COMPOUNDRULE {}", rule))
        })
        .collect()
}
