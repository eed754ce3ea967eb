use fnv::FnvHashMap;

/// Letters tried for the replace and insert edits. Dictionaries for other
/// scripts supply their own set through the TRY directive; without one,
/// suggestions outside basic Latin will be poor.
pub const LATIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Emit every string one edit away from `word`: deletes, adjacent
/// transposes, per-letter replaces and inserts, in that order. Duplicate
/// strings are emitted as often as they are produced; the ranker counts
/// them as separate derivation paths.
pub fn edits1(word: &str, alphabet: &str, emit: &mut impl FnMut(String)) {
    delete_char_edits(word, emit);
    transpose_char_edits(word, emit);
    replace_char_edits(word, alphabet, emit);
    insert_char_edits(word, alphabet, emit);
}

pub fn delete_char_edits(word: &str, emit: &mut impl FnMut(String)) {
    for (i, c) in word.char_indices() {
        let mut cand = String::with_capacity(word.len());
        cand.push_str(&word[..i]);
        cand.push_str(&word[i + c.len_utf8()..]);
        emit(cand);
    }
}

pub fn transpose_char_edits(word: &str, emit: &mut impl FnMut(String)) {
    let mut prev: Option<(usize, char)> = None;
    for (i, c) in word.char_indices() {
        if let Some((prev_i, prev_c)) = prev {
            let mut cand = String::with_capacity(word.len());
            cand.push_str(&word[..prev_i]);
            cand.push(c);
            cand.push(prev_c);
            cand.push_str(&word[i + c.len_utf8()..]);
            emit(cand);
        }
        prev = Some((i, c));
    }
}

pub fn replace_char_edits(
    word: &str,
    alphabet: &str,
    emit: &mut impl FnMut(String),
) {
    for (i, c) in word.char_indices() {
        for letter in alphabet.chars() {
            let mut cand =
                String::with_capacity(word.len() + letter.len_utf8());
            cand.push_str(&word[..i]);
            cand.push(letter);
            cand.push_str(&word[i + c.len_utf8()..]);
            emit(cand);
        }
    }
}

pub fn insert_char_edits(
    word: &str,
    alphabet: &str,
    emit: &mut impl FnMut(String),
) {
    for letter in alphabet.chars() {
        // In front of each char, and at the end.
        for (i, _) in word.char_indices() {
            let mut cand =
                String::with_capacity(word.len() + letter.len_utf8());
            cand.push_str(&word[..i]);
            cand.push(letter);
            cand.push_str(&word[i..]);
            emit(cand);
        }
        let mut cand = String::with_capacity(word.len() + letter.len_utf8());
        cand.push_str(word);
        cand.push(letter);
        emit(cand);
    }
}

/// Collects candidates that passed the dictionary check and ranks them by
/// how many edit paths produced them; more paths, better candidate.
#[derive(Clone, Debug, Default)]
pub struct SuggRanker {
    counts: FnvHashMap<String, usize>,
}

impl SuggRanker {
    pub fn add(&mut self, cand: String) {
        *self.counts.entry(cand).or_insert(0) += 1;
    }

    /// The `max` most-produced candidates, best first. Order among equal
    /// counts is not specified.
    pub fn into_ranked(self, max: usize) -> Vec<String> {
        let mut ranked: Vec<(String, usize)> = self.counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max);
        ranked.into_iter().map(|(cand, _)| cand).collect()
    }
}
