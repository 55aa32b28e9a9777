//! Letters, diacritics and the token model the transformation rules work on.
//!
//! Surface words are kept as a flat sequence of [`Token`]s: a base letter or a
//! combining mark (short vowel, sukun, shadda, tanween). Rewrites are expressed
//! as splices over that sequence instead of character-index arithmetic.
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::ops::Range;

pub const HAMZA: char = '\u{0621}';
pub const ALEF_MADDA: char = '\u{0622}';
pub const HAMZA_ON_ALEF: char = '\u{0623}';
pub const HAMZA_ON_WAW: char = '\u{0624}';
pub const HAMZA_UNDER_ALEF: char = '\u{0625}';
pub const HAMZA_ON_YA: char = '\u{0626}';
pub const ALEF: char = '\u{0627}';
pub const TATWEEL: char = '\u{0640}';
pub const MIM: char = '\u{0645}';
pub const WAW: char = '\u{0648}';
pub const ALEF_MAQSURA: char = '\u{0649}';
pub const YA: char = '\u{064A}';

pub const KASRATAN: char = '\u{064D}';
pub const FATHA: char = '\u{064E}';
pub const DAMMA: char = '\u{064F}';
pub const KASRA: char = '\u{0650}';
pub const SHADDA: char = '\u{0651}';
pub const SUKUN: char = '\u{0652}';

lazy_static! {
    static ref MARKS: Regex = Regex::new("[\u{064B}-\u{065F}]").unwrap();
}

/// Base letters of the Arabic block (hamza through ya).
pub fn is_consonant(c: char) -> bool {
    ('\u{0621}'..='\u{064A}').contains(&c) && c != TATWEEL
}

/// Combining marks: tanween, short vowels, shadda, sukun and the rarer
/// Quranic marks up to U+065F.
pub fn is_mark(c: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&c)
}

pub fn is_short_vowel(c: char) -> bool {
    matches!(c, FATHA | DAMMA | KASRA)
}

pub fn is_semivowel(c: char) -> bool {
    matches!(c, WAW | YA)
}

/// Every written form of the glottal stop.
pub fn is_glottal(c: char) -> bool {
    matches!(
        c,
        HAMZA | ALEF_MADDA | HAMZA_ON_ALEF | HAMZA_ON_WAW | HAMZA_UNDER_ALEF | HAMZA_ON_YA
    )
}

/// Rewrites every alef maqsura as ya. Alef maqsura only ever stands for a
/// word-final ya, so both spellings then compare equal.
pub fn maqsura_to_ya(text: &str) -> String {
    text.replace(ALEF_MAQSURA, &YA.to_string())
}

pub fn strip_marks(text: &str) -> String {
    MARKS.replace_all(text, "").into_owned()
}

pub fn has_marks(text: &str) -> bool {
    MARKS.is_match(text)
}

/// The consonant skeleton of a text: trimmed, ya-normalized, with marks and
/// anything outside the letter block dropped.
pub fn consonants(text: &str) -> Vec<char> {
    maqsura_to_ya(text.trim())
        .chars()
        .filter(|c| is_consonant(*c))
        .collect()
}

/// Comparable form of a vocalized word. Marks stacked on one letter may be
/// typed in any order (shadda before or after its vowel), so each run of marks
/// is sorted; tatweel and the alef maqsura spelling are normalized away.
pub fn canonical(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Vec<char> = Vec::new();
    for c in maqsura_to_ya(text.trim()).chars() {
        if c == TATWEEL {
            continue;
        }
        if is_mark(c) {
            run.push(c);
            continue;
        }
        run.sort_unstable();
        out.extend(run.drain(..));
        out.push(c);
    }
    run.sort_unstable();
    out.extend(run);
    out
}

// ------------- Token -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Letter(char),
    Mark(char),
}

impl Token {
    pub fn from_char(c: char) -> Self {
        if is_mark(c) { Token::Mark(c) } else { Token::Letter(c) }
    }
    pub fn as_char(self) -> char {
        match self {
            Token::Letter(c) | Token::Mark(c) => c,
        }
    }
    pub fn is_letter(self, letter: char) -> bool {
        self == Token::Letter(letter)
    }
    pub fn is_mark(self, mark: char) -> bool {
        self == Token::Mark(mark)
    }
    pub fn is_any_mark(self) -> bool {
        matches!(self, Token::Mark(_))
    }
    pub fn short_vowel(self) -> Option<char> {
        match self {
            Token::Mark(c) if is_short_vowel(c) => Some(c),
            _ => None,
        }
    }
}

// ------------- Word -------------
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Word {
    tokens: Vec<Token>,
}

impl Word {
    pub fn parse(text: &str) -> Self {
        Self {
            tokens: text.chars().map(Token::from_char).collect(),
        }
    }
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn get(&self, i: usize) -> Option<Token> {
        self.tokens.get(i).copied()
    }
    /// The token right before position `i`, if any.
    pub fn before(&self, i: usize) -> Option<Token> {
        i.checked_sub(1).and_then(|j| self.get(j))
    }
    pub fn after(&self, i: usize) -> Option<Token> {
        self.get(i + 1)
    }
    pub fn first_letter(&self, letter: char) -> Option<usize> {
        self.tokens.iter().position(|t| t.is_letter(letter))
    }
    pub fn last_letter(&self, letter: char) -> Option<usize> {
        self.tokens.iter().rposition(|t| t.is_letter(letter))
    }
    /// True when nothing but marks follows position `i`.
    pub fn only_marks_after(&self, i: usize) -> bool {
        self.tokens[i + 1..].iter().all(|t| t.is_any_mark())
    }
    pub fn starts_with(&self, prefix: &[Token]) -> bool {
        self.tokens.starts_with(prefix)
    }
    pub fn find_from(&self, start: usize, needle: &[Token]) -> Option<usize> {
        if needle.is_empty() || start >= self.tokens.len() {
            return None;
        }
        self.tokens[start..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| p + start)
    }
    pub fn find(&self, needle: &[Token]) -> Option<usize> {
        self.find_from(0, needle)
    }
    pub fn splice(&mut self, range: Range<usize>, replacement: &[Token]) {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens.splice(start..end, replacement.iter().copied());
    }
    pub fn set(&mut self, i: usize, token: Token) {
        if let Some(slot) = self.tokens.get_mut(i) {
            *slot = token;
        }
    }
    pub fn truncate(&mut self, len: usize) {
        self.tokens.truncate(len);
    }
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
    pub fn last(&self) -> Option<Token> {
        self.tokens.last().copied()
    }
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }
    /// Rewrites every occurrence of `from` into `to`, scanning left to right
    /// over the rewritten word.
    pub fn replace_all(&mut self, from: &[Token], to: &[Token]) {
        let mut start = 0;
        while let Some(at) = self.find_from(start, from) {
            self.splice(at..at + from.len(), to);
            start = at + to.len();
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.tokens {
            write!(f, "{}", t.as_char())?;
        }
        Ok(())
    }
}
