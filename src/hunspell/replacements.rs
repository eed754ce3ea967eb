/// The REP table: ordered pairs of literal strings covering misspellings
/// that are common enough to fix by substitution before any edit-distance
/// search runs.
#[derive(Clone, Debug, Default)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn push(&mut self, from: &str, to: &str) {
        self.pairs.push((from.to_string(), to.to_string()));
    }

    /// The word with each applicable pair substituted at its first
    /// occurrence, in table order.
    pub fn candidates<'a>(
        &'a self,
        word: &'a str,
    ) -> impl Iterator<Item = String> + 'a {
        self.pairs.iter().filter_map(move |(from, to)| {
            if word.contains(from.as_str()) {
                Some(word.replacen(from.as_str(), to.as_str(), 1))
            } else {
                None
            }
        })
    }
}
