//! Template substitution and the shape classifier for template ids.
//!
//! The transformation rules need to know a little about the grammar of the
//! template that produced a word: its tense and whether it builds one of the
//! noun patterns that protect or rewrite weak letters. That knowledge is
//! computed once per template here, from its id, so that the rules themselves
//! only ever match on closed tags.
use serde::Serialize;

use crate::alphabet::{self, WAW, YA};
use crate::construct::Template;
use crate::error::{Result, SarfError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Present,
    Past,
    #[default]
    Unmarked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nominal {
    ActiveParticiple,
    PassiveParticiple,
    Instrument,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateShape {
    pub tense: Tense,
    pub nominal: Option<Nominal>,
    /// A semivowel the template fixes as a long vowel (تفعيل, مفعول).
    pub long_vowel: Option<char>,
}

const PRESENT_PREFIXES: [&str; 6] = ["يفع", "يفاع", "يتفع", "ينفع", "يفتع", "يستف"];
const PAST_PREFIXES: [&str; 8] = [
    "فعل", "فاعل", "أفعل", "تفعل", "تفاعل", "انفعل", "افتعل", "استفعل",
];

impl TemplateShape {
    /// Sniffs the shape from a template id. Marks are ignored, so فَعَّلَ and
    /// فعل look the same; Latin ids are matched on keywords.
    pub fn of(id: &str) -> Self {
        let bare = alphabet::strip_marks(id.trim());
        let latin = id.to_uppercase();

        let tense = if PRESENT_PREFIXES.iter().any(|p| bare.starts_with(p)) || latin.contains("PRESENT") {
            Tense::Present
        } else if PAST_PREFIXES.iter().any(|p| bare.starts_with(p))
            || latin.contains("PASSE")
            || latin.contains("MADI")
        {
            Tense::Past
        } else {
            Tense::Unmarked
        };

        let nominal = if bare.contains("مفعول") || latin.contains("MAFOUL") {
            Some(Nominal::PassiveParticiple)
        } else if bare.contains("مفعال") || latin.contains("MIFAAL") {
            Some(Nominal::Instrument)
        } else if bare.contains("فاعل") || latin.contains("FAIL") {
            Some(Nominal::ActiveParticiple)
        } else if bare.contains("مفعل") || latin.contains("MAFAL") {
            Some(Nominal::Other)
        } else {
            None
        };

        let long_vowel = if bare.contains("تفعيل") {
            Some(YA)
        } else if bare.contains("فعول") {
            Some(WAW)
        } else {
            None
        };

        Self { tense, nominal, long_vowel }
    }
    pub fn is_present(&self) -> bool {
        self.tense == Tense::Present
    }
    pub fn is_past(&self) -> bool {
        self.tense == Tense::Past
    }
    pub fn is_nominal(&self) -> bool {
        self.nominal.is_some()
    }
    pub fn is(&self, nominal: Nominal) -> bool {
        self.nominal == Some(nominal)
    }
}

/// Substitutes the root letters for the markers `1`, `2` and `3` in the rule.
/// The letters are re-read from the root text, so a vocalized or
/// alef-maqsura spelling of a root works as well as the bare one.
pub fn apply(template: &Template, root_text: &str) -> Result<String> {
    let letters = alphabet::consonants(root_text);
    if letters.len() != 3 {
        return Err(SarfError::invalid_root(
            root_text.trim(),
            format!("a root needs exactly 3 consonants, found {}", letters.len()),
        ));
    }
    if template.rule().is_empty() {
        return Err(SarfError::invalid_template(template.name(), "rule is empty"));
    }
    let surface: String = template
        .rule()
        .chars()
        .map(|c| match c {
            '1' => letters[0],
            '2' => letters[1],
            '3' => letters[2],
            other => other,
        })
        .collect();
    if surface.trim().is_empty() {
        return Err(SarfError::invalid_template(template.name(), "substitution produced an empty word"));
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_and_past_ids() {
        assert_eq!(TemplateShape::of("يَفْعَلُ").tense, Tense::Present);
        assert_eq!(TemplateShape::of("فَعَلَ").tense, Tense::Past);
        assert_eq!(TemplateShape::of("استفعل").tense, Tense::Past);
        assert_eq!(TemplateShape::of("verb_present").tense, Tense::Present);
        assert_eq!(TemplateShape::of("madi").tense, Tense::Past);
        assert_eq!(TemplateShape::of("افعل").tense, Tense::Unmarked);
    }

    #[test]
    fn nominal_patterns() {
        assert!(TemplateShape::of("مفعول").is(Nominal::PassiveParticiple));
        assert!(TemplateShape::of("مِفْعَال").is(Nominal::Instrument));
        assert!(TemplateShape::of("فاعل").is(Nominal::ActiveParticiple));
        assert!(TemplateShape::of("مفاعل").is(Nominal::ActiveParticiple));
        assert!(TemplateShape::of("مَفْعَل").is(Nominal::Other));
        assert!(!TemplateShape::of("فعل").is_nominal());
    }

    #[test]
    fn fixed_long_vowels() {
        assert_eq!(TemplateShape::of("تفعيل").long_vowel, Some(YA));
        assert_eq!(TemplateShape::of("مفعول").long_vowel, Some(WAW));
        assert_eq!(TemplateShape::of("فعل").long_vowel, None);
    }

    #[test]
    fn substitution_copies_everything_but_markers() {
        let t = Template::new("فعل", "1َ2ِ3").unwrap();
        assert_eq!(apply(&t, "درب").unwrap(), "دَرِب");
        assert_eq!(apply(&t, " دَرَبَ ").unwrap(), "دَرِب");
        assert_eq!(apply(&t, "رمى").unwrap(), "رَمِي");
        assert!(apply(&t, "در").is_err());
    }
}
