use sarf::classify::classify;
use sarf::construct::Category;
use sarf::error::SarfError;

fn category(text: &str) -> Category {
    classify(text).expect("valid root").category()
}

#[test]
fn every_category_is_reachable() {
    assert_eq!(category("كتب"), Category::Regular);
    assert_eq!(category("سأل"), Category::Glottal);
    assert_eq!(category("مدد"), Category::Geminate);
    assert_eq!(category("وعد"), Category::Assimilated);
    assert_eq!(category("قول"), Category::Hollow);
    assert_eq!(category("رمي"), Category::Defective);
    assert_eq!(category("روي"), Category::DoublyWeak);
    assert_eq!(category("وقي"), Category::DoublyWeak);
}

#[test]
fn geminate_wins_over_doubly_weak() {
    // second and third letters are both ya
    assert_eq!(category("حيي"), Category::Geminate);
}

#[test]
fn glottal_is_a_flag_under_structural_categories() {
    let root = classify("وأد").expect("valid root");
    assert_eq!(root.category(), Category::Assimilated);
    assert!(root.has_glottal());
    let root = classify("سأل").expect("valid root");
    assert!(root.has_glottal());
    assert!(!classify("كتب").expect("valid root").has_glottal());
    assert!(root.explanation().contains("glottal"));
}

#[test]
fn alef_maqsura_and_marks_are_normalized() {
    let root = classify("رمى").expect("valid root");
    assert_eq!(root.letters(), ['ر', 'م', 'ي']);
    assert_eq!(root.category(), Category::Defective);
    let root = classify("  كَتَبَ ").expect("valid root");
    assert_eq!(root.letters(), ['ك', 'ت', 'ب']);
    assert_eq!(root.spelling(), "كَتَبَ");
}

#[test]
fn invalid_roots_are_rejected_with_a_reason() {
    for text in ["", "   ", "كت", "كتبب", "كاتب", "قال", "abc"] {
        match classify(text) {
            Err(SarfError::InvalidRoot { reason, .. }) => assert!(!reason.is_empty()),
            other => panic!("{:?} should be invalid, got {:?}", text, other),
        }
    }
}

#[test]
fn classification_is_deterministic() {
    for text in ["كتب", "قول", "رمي", "مدد", "وعد", "روي", "سأل"] {
        let a = classify(text).expect("valid root");
        let b = classify(text).expect("valid root");
        assert_eq!(a, b);
        assert_eq!(a.letters().len(), 3);
    }
}
