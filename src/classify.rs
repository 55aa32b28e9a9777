//! Turns raw root text into a validated [`Root`] with its category.
//!
//! Classification depends on nothing but the input text, so the category a
//! registry caches for a root is always the one a fresh call would compute.
use crate::alphabet::{self, ALEF};
use crate::construct::{Category, Root};
use crate::error::{Result, SarfError};

pub fn classify(text: &str) -> Result<Root> {
    let spelling = text.trim();
    if spelling.is_empty() {
        return Err(SarfError::invalid_root(text, "root is empty"));
    }
    let letters = alphabet::consonants(spelling);
    if letters.contains(&ALEF) {
        return Err(SarfError::invalid_root(
            spelling,
            "a bare alef cannot be a radical, write the glottal stop (أ, إ, ء) instead",
        ));
    }
    let letters: [char; 3] = match letters.as_slice() {
        [l1, l2, l3] => [*l1, *l2, *l3],
        other => {
            return Err(SarfError::invalid_root(
                spelling,
                format!("a root needs exactly 3 consonants, found {}", other.len()),
            ));
        }
    };
    let has_glottal = letters.iter().any(|c| alphabet::is_glottal(*c));
    let category = categorize(letters, has_glottal);
    Ok(Root::new(spelling.to_string(), letters, has_glottal, category))
}

/// Geminate wins over everything, a doubly weak root over any single weak
/// position, and positions are tested 1 to 3. The glottal flag only decides
/// the category when the root is otherwise sound.
pub fn categorize(letters: [char; 3], has_glottal: bool) -> Category {
    let [l1, l2, l3] = letters;
    let weak = letters.iter().filter(|c| alphabet::is_semivowel(**c)).count();
    if l2 == l3 {
        Category::Geminate
    } else if weak >= 2 {
        Category::DoublyWeak
    } else if alphabet::is_semivowel(l1) {
        Category::Assimilated
    } else if alphabet::is_semivowel(l2) {
        Category::Hollow
    } else if alphabet::is_semivowel(l3) {
        Category::Defective
    } else if has_glottal {
        Category::Glottal
    } else {
        Category::Regular
    }
}
