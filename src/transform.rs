//! Category-specific rewriting of a mechanically substituted word.
//!
//! Each category is a short list of rules tried in order, the first rule that
//! matches rewrites the word and ends the branch. A word no rule matches comes
//! back unchanged, which callers treat as a valid result. The glottal stop
//! orthography runs after every structural rewrite because those rewrites can
//! add or remove the vowels it reads.
use tracing::debug;

use crate::alphabet::{
    self, Token, Word, ALEF, ALEF_MADDA, ALEF_MAQSURA, DAMMA, FATHA, HAMZA, HAMZA_ON_ALEF,
    HAMZA_ON_WAW, HAMZA_ON_YA, HAMZA_UNDER_ALEF, KASRA, KASRATAN, MIM, SHADDA, SUKUN, WAW, YA,
};
use crate::construct::{Category, Root};
use crate::scheme::{Nominal, TemplateShape};

use crate::alphabet::Token::{Letter, Mark};

pub fn transform(surface: &str, root: &Root, shape: TemplateShape) -> String {
    if surface.is_empty() {
        return String::new();
    }
    // a final ya may arrive as alef maqsura, the defective rules put it back
    let original = alphabet::maqsura_to_ya(surface);
    let mut word = Word::parse(&original);
    let [l1, l2, l3] = root.letters();

    match root.category() {
        Category::Regular => {
            if root.has_glottal() {
                glottal(&mut word);
            }
            return word.to_string();
        }
        Category::Glottal => glottal(&mut word),
        Category::Geminate => geminate(&mut word, l2),
        Category::Assimilated => assimilated(&mut word, l1, shape),
        Category::Hollow => hollow(&mut word, l2, l3, shape, false),
        Category::Defective => defective(&mut word, l3, shape),
        Category::DoublyWeak => {
            let connected = alphabet::is_semivowel(l2) && alphabet::is_semivowel(l3);
            if alphabet::is_semivowel(l1) {
                assimilated(&mut word, l1, shape);
            }
            if alphabet::is_semivowel(l2) {
                hollow(&mut word, l2, l3, shape, connected);
            }
            if alphabet::is_semivowel(l3) {
                defective(&mut word, l3, shape);
            }
        }
    }

    if root.has_glottal() && root.category() != Category::Glottal {
        glottal(&mut word);
    }
    // the template may leave a nominative damma at the end
    if word.last() == Some(Mark(DAMMA)) {
        word.pop();
    }

    let result = word.to_string();
    if result != original {
        debug!(root = %root, category = %root.category(), from = %original, to = %result, "transformed");
    } else {
        debug!(root = %root, category = %root.category(), word = %original, "no rule applied");
    }
    result
}

// ------------- Glottal stop -------------
/// Reseats every glottal stop according to its neighbours, then contracts
/// hamza followed by alef into a madda. Running it twice changes nothing.
pub fn glottal(word: &mut Word) {
    for i in 0..word.len() {
        if let Some(Letter(c)) = word.get(i) {
            if matches!(c, HAMZA_ON_ALEF | HAMZA_UNDER_ALEF | HAMZA_ON_WAW | HAMZA_ON_YA) {
                word.set(i, Letter(HAMZA));
            }
        }
    }
    for i in 0..word.len() {
        if word.get(i) != Some(Letter(HAMZA)) {
            continue;
        }
        let before = word.before(i);
        let after = word.after(i);
        let near = |mark: char| before == Some(Mark(mark)) || after == Some(Mark(mark));
        let seat = if after.is_none() && matches!(before, Some(Letter(ALEF | WAW | YA))) {
            HAMZA
        } else if i == 0 {
            if after == Some(Mark(KASRA)) { HAMZA_UNDER_ALEF } else { HAMZA_ON_ALEF }
        } else if near(KASRA) {
            HAMZA_ON_YA
        } else if near(DAMMA) {
            HAMZA_ON_WAW
        } else if near(FATHA) {
            HAMZA_ON_ALEF
        } else {
            HAMZA
        };
        word.set(i, Letter(seat));
    }
    let madda = [Letter(ALEF_MADDA)];
    for pattern in [
        &[Letter(HAMZA_ON_ALEF), Mark(FATHA), Letter(HAMZA_ON_ALEF), Mark(SUKUN)][..],
        &[Letter(HAMZA_ON_ALEF), Mark(FATHA), Letter(HAMZA_ON_ALEF), Mark(FATHA)][..],
        &[Letter(HAMZA_ON_ALEF), Mark(FATHA), Letter(ALEF)][..],
        &[Letter(HAMZA_ON_ALEF), Mark(SUKUN), Letter(ALEF)][..],
        &[Letter(HAMZA_ON_ALEF), Letter(ALEF)][..],
    ] {
        word.replace_all(pattern, &madda);
    }
}

// ------------- Geminate -------------
fn geminate(word: &mut Word, letter: char) {
    for i in 0..word.len() {
        if word.get(i) != Some(Letter(letter)) {
            continue;
        }
        // adjacent, or split by a single short vowel that the fusion absorbs
        let span = if word.after(i) == Some(Letter(letter)) {
            2
        } else if word.after(i).and_then(Token::short_vowel).is_some() && word.get(i + 2) == Some(Letter(letter)) {
            3
        } else {
            continue;
        };
        word.splice(i..i + span, &[Letter(letter), Mark(SHADDA)]);
        if word.get(i + 2).and_then(Token::short_vowel).is_some() {
            word.splice(i + 2..i + 3, &[]);
        }
        return;
    }
}

// ------------- Assimilated -------------
fn assimilated(word: &mut Word, l1: char, shape: TemplateShape) {
    if !alphabet::is_semivowel(l1) {
        return;
    }
    // instrument nouns: مِوْ becomes مِيْ
    if l1 == WAW && shape.is(Nominal::Instrument) {
        if let Some(at) = word.find(&[Letter(MIM), Mark(KASRA), Letter(WAW)]) {
            word.set(at + 2, Letter(YA));
            return;
        }
    }
    if shape.is_nominal() || shape.is_past() {
        return;
    }
    let cluster = [Letter(l1), Mark(SUKUN)];
    if word.get(0) == Some(Letter(YA)) {
        if let Some(at) = word.find_from(1, &cluster) {
            word.splice(at..at + 2, &[]);
            return;
        }
    }
    if word.starts_with(&[Letter(ALEF), Letter(l1), Mark(SUKUN)]) {
        word.splice(0..3, &[]);
    } else if word.starts_with(&cluster) {
        word.splice(0..2, &[]);
    }
}

// ------------- Hollow -------------
/// `connected` is set for doubly weak roots whose second and third letters
/// are both semivowels; the second letter is then left for the defective
/// rules to see.
fn hollow(word: &mut Word, l2: char, l3: char, shape: TemplateShape, connected: bool) {
    if !alphabet::is_semivowel(l2) {
        return;
    }
    let Some(pos) = word.first_letter(l2) else {
        return;
    };
    let before = word.before(pos);
    let after = word.after(pos);

    let long_vowel = matches!(
        (before, l2),
        (Some(Mark(DAMMA)), WAW) | (Some(Mark(KASRA)), WAW) | (Some(Mark(KASRA)), YA)
    );
    if long_vowel || shape.is_present() {
        return;
    }
    if before == Some(Letter(ALEF)) && after == Some(Mark(KASRA)) {
        if !connected {
            word.splice(pos - 1..pos + 2, &[Letter(ALEF), Letter(HAMZA_ON_YA), Mark(KASRA)]);
        }
        return;
    }
    if before == Some(Mark(FATHA)) {
        if !connected && !alphabet::is_semivowel(l3) {
            let end = if after.and_then(Token::short_vowel).is_some() { pos + 2 } else { pos + 1 };
            word.splice(pos..end, &[Letter(ALEF)]);
        }
        return;
    }
    if before == Some(Mark(SUKUN)) && shape.is(Nominal::PassiveParticiple) {
        if l2 == YA && after == Some(Mark(DAMMA)) {
            // مَبْيُوع → مَبِيع
            let end = if word.get(pos + 2) == Some(Letter(WAW)) { pos + 3 } else { pos + 2 };
            word.splice(pos - 1..end, &[Mark(KASRA), Letter(YA)]);
        } else if let Some(vowel) = after.and_then(Token::short_vowel) {
            word.splice(pos - 1..pos + 2, &[Mark(vowel)]);
        } else {
            word.splice(pos - 1..pos + 1, &[]);
        }
    }
}

// ------------- Defective -------------
fn defective(word: &mut Word, l3: char, shape: TemplateShape) {
    if !alphabet::is_semivowel(l3) {
        return;
    }
    let len = word.len();
    if len >= 2 && word.get(len - 2) == Some(Letter(l3)) && word.get(len - 1) == Some(Letter(l3)) {
        word.splice(len - 2..len, &[Letter(l3), Mark(SHADDA)]);
        return;
    }
    if shape.long_vowel == Some(l3) {
        return;
    }
    // the last occurrence, so that a weak second letter is never mistaken for it
    let Some(pos) = word.last_letter(l3) else {
        return;
    };
    let before = word.before(pos);
    let after = word.after(pos);
    let final_letter = if shape.is_present() { YA } else { ALEF_MAQSURA };

    if after == Some(Mark(SUKUN)) {
        word.truncate(pos);
        word.push(Mark(KASRATAN));
    } else if shape.is(Nominal::ActiveParticiple) && word.only_marks_after(pos) {
        let cut = if before == Some(Mark(KASRA)) { pos - 1 } else { pos };
        word.truncate(cut);
        word.push(Mark(KASRATAN));
    } else if before == Some(Mark(FATHA)) {
        word.truncate(pos);
        word.push(Letter(if l3 == WAW { ALEF } else { final_letter }));
    } else if l3 == YA && after.is_none() && before != Some(Mark(KASRA)) {
        word.truncate(pos);
        word.push(Letter(final_letter));
    } else if l3 == WAW && before == Some(Mark(KASRA)) {
        word.truncate(pos);
        word.push(Letter(YA));
    }
}
