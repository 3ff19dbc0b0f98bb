//! Porter stemmer.
//!
//! Implements the suffix-stripping algorithm from Porter (1980) with the
//! extensions NLTK applies by default:
//!
//! - a small table of irregular forms (`dying` -> `die`, `news` -> `news`)
//! - four-letter `ies`/`ied` words keep their `ie` (`dies` -> `die`)
//! - terminal `y` becomes `i` only after a consonant that is not the first
//!   letter (`says` -> `say`, `happy` -> `happi`)
//! - `alli` is rewritten before the other step 2 rules, and `fulli`,
//!   `lessli`, `logi` are extra step 2 suffixes
//! - a two-letter vowel-consonant stem counts as a cvc ending
//!
//! Words of two letters or fewer are returned unchanged, as are words
//! containing non-ASCII characters.

/// Whole-word stems that bypass the suffix rules.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("skies", "sky"),
    ("sky", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("fulli", "ful"),
    ("lessli", "less"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    pub fn stem(&self, word: &str) -> String {
        if let Some((_, stem)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word) {
            return stem.to_string();
        }
        if word.len() <= 2 || !word.is_ascii() {
            return word.to_string();
        }

        let mut w = Word {
            b: word.as_bytes().to_vec(),
            j: 0,
        };
        w.step1ab();
        if w.b.len() > 1 {
            w.step1c();
            w.step2();
            w.step3();
            w.step4();
            w.step5();
        }

        w.b.into_iter().map(char::from).collect()
    }
}

/// Working buffer. `j` is the length of the stem left in front of the
/// suffix most recently matched by `ends`.
struct Word {
    b: Vec<u8>,
    j: usize,
}

impl Word {
    fn cons(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.cons(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in the stem `b[..j]`.
    fn m(&self) -> usize {
        (1..self.j)
            .filter(|&i| self.cons(i) && !self.cons(i - 1))
            .count()
    }

    fn vowel_in_stem(&self) -> bool {
        (0..self.j).any(|i| !self.cons(i))
    }

    fn double_cons(&self, i: usize) -> bool {
        i >= 1 && self.b[i] == self.b[i - 1] && self.cons(i)
    }

    /// consonant-vowel-consonant ending at `i`, last consonant not w, x or y.
    /// A two-letter vowel-consonant prefix also counts.
    fn cvc(&self, i: usize) -> bool {
        if i == 1 {
            return !self.cons(0) && self.cons(1);
        }
        if i < 2 || !self.cons(i) || self.cons(i - 1) || !self.cons(i - 2) {
            return false;
        }
        !matches!(self.b[i], b'w' | b'x' | b'y')
    }

    fn last(&self) -> usize {
        self.b.len() - 1
    }

    fn ends(&mut self, suffix: &str) -> bool {
        let suffix = suffix.as_bytes();
        if suffix.len() > self.b.len() || !self.b.ends_with(suffix) {
            return false;
        }
        self.j = self.b.len() - suffix.len();
        true
    }

    fn set_to(&mut self, replacement: &str) {
        self.b.truncate(self.j);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    fn replace_if_measured(&mut self, replacement: &str) {
        if self.m() > 0 {
            self.set_to(replacement);
        }
    }

    /// Applies the first rule whose suffix matches, if any.
    fn apply_first(&mut self, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if self.ends(suffix) {
                self.replace_if_measured(replacement);
                return;
            }
        }
    }

    /// Plurals, -ed and -ing.
    fn step1ab(&mut self) {
        if self.b[self.last()] == b's' {
            if self.ends("sses") {
                self.b.truncate(self.b.len() - 2);
            } else if self.ends("ies") {
                if self.b.len() == 4 {
                    self.b.pop();
                } else {
                    self.set_to("i");
                }
            } else if self.b[self.last() - 1] != b's' {
                self.b.pop();
            }
        }

        if self.ends("ied") {
            let replacement = if self.b.len() == 4 { "ie" } else { "i" };
            self.set_to(replacement);
        } else if self.ends("eed") {
            if self.m() > 0 {
                self.b.pop();
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.b.truncate(self.j);
            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_cons(self.last()) {
                if !matches!(self.b[self.last()], b'l' | b's' | b'z') {
                    self.b.pop();
                }
            } else {
                self.j = self.b.len();
                if self.m() == 1 && self.cvc(self.last()) {
                    self.set_to("e");
                }
            }
        }
    }

    /// Terminal y to i after a consonant that is not the first letter.
    fn step1c(&mut self) {
        if self.ends("y") && self.j > 1 && self.cons(self.j - 1) {
            let last = self.last();
            self.b[last] = b'i';
        }
    }

    fn step2(&mut self) {
        if self.ends("alli") && self.m() > 0 {
            self.set_to("al");
            self.step2();
        } else if self.ends("logi") {
            // measured with the `l` kept in the stem
            self.j += 1;
            if self.m() > 0 {
                self.b.pop();
            }
        } else {
            self.apply_first(STEP2_RULES);
        }
    }

    fn step3(&mut self) {
        self.apply_first(STEP3_RULES);
    }

    fn step4(&mut self) {
        for suffix in STEP4_SUFFIXES {
            if !self.ends(suffix) {
                continue;
            }
            if *suffix == "ion" && (self.j == 0 || !matches!(self.b[self.j - 1], b's' | b't')) {
                continue;
            }
            if self.m() > 1 {
                self.b.truncate(self.j);
            }
            return;
        }
    }

    /// Final -e and -ll.
    fn step5(&mut self) {
        self.j = self.b.len();
        let last = self.last();
        if self.b[last] == b'e' {
            let m = self.m();
            if m > 1 || (m == 1 && !self.cvc(last - 1)) {
                self.b.pop();
            }
        }
        let last = self.last();
        if self.b[last] == b'l' && self.double_cons(last) && self.m() > 1 {
            self.b.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word)
    }

    #[test]
    fn test_plurals() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("caress"), "caress");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("books"), "book");
    }

    #[test]
    fn test_ed_ing() {
        assert_eq!(stem("feed"), "feed");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("plastered"), "plaster");
        assert_eq!(stem("bled"), "bled");
        assert_eq!(stem("motoring"), "motor");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("hissing"), "hiss");
        assert_eq!(stem("filing"), "file");
        assert_eq!(stem("conflated"), "conflat");
    }

    #[test]
    fn test_terminal_y() {
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("sky"), "sky");
    }

    #[test]
    fn test_irregular_forms() {
        assert_eq!(stem("news"), "news");
        assert_eq!(stem("dying"), "die");
        assert_eq!(stem("skies"), "sky");
        assert_eq!(stem("innings"), "inning");
        assert_eq!(stem("succeed"), "succeed");
    }

    #[test]
    fn test_short_ies_ied_keep_ie() {
        assert_eq!(stem("dies"), "die");
        assert_eq!(stem("ties"), "tie");
        assert_eq!(stem("died"), "die");
        assert_eq!(stem("cried"), "cri");
        assert_eq!(stem("studies"), "studi");
    }

    #[test]
    fn test_y_after_vowel_is_kept() {
        assert_eq!(stem("says"), "say");
        assert_eq!(stem("boy"), "boy");
        assert_eq!(stem("cry"), "cri");
    }

    #[test]
    fn test_two_letter_cvc() {
        assert_eq!(stem("aging"), "age");
        assert_eq!(stem("age"), "age");
    }

    #[test]
    fn test_extra_step2_suffixes() {
        assert_eq!(stem("hopefully"), "hope");
        assert_eq!(stem("archaeology"), "archaeolog");
        assert_eq!(stem("radically"), "radic");
    }

    #[test]
    fn test_derivational_suffixes() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("conditional"), "condit");
        assert_eq!(stem("generalization"), "gener");
        assert_eq!(stem("hopefulness"), "hope");
        assert_eq!(stem("electrical"), "electr");
        assert_eq!(stem("adoption"), "adopt");
        assert_eq!(stem("controlling"), "control");
    }

    #[test]
    fn test_final_e_and_ll() {
        assert_eq!(stem("probate"), "probat");
        assert_eq!(stem("rate"), "rate");
        assert_eq!(stem("cease"), "ceas");
        assert_eq!(stem("controll"), "control");
        assert_eq!(stem("roll"), "roll");
    }

    #[test]
    fn test_domain_words() {
        assert_eq!(stem("science"), "scienc");
        assert_eq!(stem("fiction"), "fiction");
        assert_eq!(stem("fantasy"), "fantasi");
    }

    #[test]
    fn test_short_and_non_ascii_untouched() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("as"), "as");
        assert_eq!(stem("café"), "café");
        assert_eq!(stem("₂₂ing"), "₂₂ing");
    }

    #[test]
    fn test_deterministic() {
        for word in ["generously", "organizations", "dune", "foundation"] {
            assert_eq!(stem(word), stem(word));
        }
    }
}
