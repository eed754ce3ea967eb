/// Affix conditions and strip fields are a tiny regex subset: literal
/// characters, '.' as a wildcard, [abc] classes and [^abc] negated
/// classes. Each atom matches exactly one character, so a condition has a
/// fixed length and can be matched against either end of a word.

#[derive(Clone, Debug)]
enum CondAtom {
    Any,
    Literal(char),
    Class { set: String, negated: bool },
}

impl CondAtom {
    fn matches(&self, c: char) -> bool {
        match self {
            CondAtom::Any => true,
            CondAtom::Literal(l) => *l == c,
            CondAtom::Class { set, negated } => set.contains(c) != *negated,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AffixCondition {
    atoms: Vec<CondAtom>,
}

impl AffixCondition {
    pub fn new(pattern: &str) -> Self {
        enum State {
            Plain,
            ClassStart,
            InClass { negated: bool, start: usize },
        }
        let mut atoms = Vec::new();
        let mut state = State::Plain;
        for (i, c) in pattern.char_indices() {
            match state {
                State::Plain => match c {
                    '[' => state = State::ClassStart,
                    '.' => atoms.push(CondAtom::Any),
                    _ => atoms.push(CondAtom::Literal(c)),
                },
                State::ClassStart => {
                    state = if c == '^' {
                        State::InClass { negated: true, start: i + 1 }
                    } else {
                        State::InClass { negated: false, start: i }
                    };
                }
                State::InClass { negated, start } => {
                    if c == ']' {
                        atoms.push(CondAtom::Class {
                            set: pattern[start..i].to_string(),
                            negated,
                        });
                        state = State::Plain;
                    }
                }
            }
        }
        if !matches!(state, State::Plain) {
            // An unterminated class disables the whole condition.
            atoms.push(CondAtom::Class { set: String::new(), negated: false });
        }
        AffixCondition { atoms }
    }

    /// Number of word characters the condition covers.
    pub fn char_len(&self) -> usize {
        self.atoms.len()
    }

    pub fn matches_start(&self, word: &str) -> bool {
        self.strip_start(word).is_some()
    }

    pub fn matches_end(&self, word: &str) -> bool {
        self.strip_end(word).is_some()
    }

    /// If the front of `word` matches, return the rest of the word.
    pub fn strip_start<'a>(&self, word: &'a str) -> Option<&'a str> {
        let mut chars = word.char_indices();
        for atom in &self.atoms {
            let (_, c) = chars.next()?;
            if !atom.matches(c) {
                return None;
            }
        }
        match chars.next() {
            Some((i, _)) => Some(&word[i..]),
            None => Some(""),
        }
    }

    /// If the back of `word` matches, return the rest of the word.
    pub fn strip_end<'a>(&self, word: &'a str) -> Option<&'a str> {
        let mut chars = word.char_indices().rev();
        let mut end = word.len();
        for atom in self.atoms.iter().rev() {
            let (i, c) = chars.next()?;
            if !atom.matches(c) {
                return None;
            }
            end = i;
        }
        Some(&word[..end])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn starts(pattern: &str, word: &str) -> bool {
        AffixCondition::new(pattern).matches_start(word)
    }

    fn ends(pattern: &str, word: &str) -> bool {
        AffixCondition::new(pattern).matches_end(word)
    }

    #[test]
    fn test_start_matching() {
        assert!(starts("", "anything"));
        assert!(starts("[aeoui]", "a vowel"));
        assert!(starts("[^hx]", "a negation"));
        assert!(starts("literal", "literal matching"));
        assert!(starts("any.letter", "anylletter"));
        // a dot inside a class is just a dot
        assert!(!starts("any[.]letter", "anylletter"));
        assert!(starts("any[.]letter", "any.letter"));
        // a caret not at the start of a class is an ordinary member
        assert!(starts("[ae^oui]", "^ vowel"));

        assert!(!starts("[^hx]", "h fails"));
        assert!(!starts("literal", "litteral"));
        assert!(!starts("longer", "long"));
    }

    #[test]
    fn test_end_matching() {
        assert!(ends("", "anything"));
        assert!(ends("[aeoui]", "vowel a"));
        assert!(ends("literal", "matching literal"));
        assert!(ends("c[om]pli[^ca]ted", "very cmplixted"));
        assert!(!ends("[^hx]", "fails h"));
        assert!(!ends("literal", "litteral"));
        assert!(!ends("longer", "nger"));
    }

    #[test]
    fn test_unterminated_class_never_matches() {
        assert!(!starts("[abc", "a"));
        assert!(!ends("x[", "x"));
    }

    #[test]
    fn test_strip() {
        let cond = AffixCondition::new("ed");
        assert_eq!(Some("walk"), cond.strip_end("walked"));
        assert_eq!(None, cond.strip_end("walks"));
        assert_eq!(Some(""), cond.strip_end("ed"));

        let cond = AffixCondition::new("re");
        assert_eq!(Some("do"), cond.strip_start("redo"));
        assert_eq!(None, cond.strip_start("undo"));
        assert_eq!(2, cond.char_len());
    }
}
