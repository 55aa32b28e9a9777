use sarf::classify::classify;
use sarf::construct::Template;
use sarf::scheme::{self, TemplateShape};
use sarf::transform::transform;

fn derive(root: &str, name: &str, rule: &str) -> String {
    let root = classify(root).expect("valid root");
    let template = Template::new(name, rule).expect("valid template");
    let raw = scheme::apply(&template, root.spelling()).expect("substitution");
    transform(&raw, &root, template.shape())
}

#[test]
fn regular_words_pass_through() {
    assert_eq!(derive("درب", "فعل", "1َ2ِ3"), "دَرِب");
    // regular roots keep whatever the template wrote, final damma included
    assert_eq!(derive("كتب", "يفعل", "يَ1ْ2ُ3ُ"), "يَكْتُبُ");
}

#[test]
fn hollow_roots() {
    assert_eq!(derive("قول", "فعل", "1َ2َ3"), "قَال");
    assert_eq!(derive("قول", "فاعل", "1َا2ِ3"), "قَائِل");
    assert_eq!(derive("قول", "مفعول", "مَ1ْ2ُو3"), "مَقُول");
    assert_eq!(derive("بيع", "مفعول", "مَ1ْ2ُو3"), "مَبِيع");
}

#[test]
fn defective_roots() {
    assert_eq!(derive("رمي", "فعل", "1َ2َ3"), "رَمَى");
    assert_eq!(derive("دعو", "فعل", "1َ2َ3"), "دَعَا");
    assert_eq!(derive("رمي", "يفعل", "يَ1ْ2ِ3ُ"), "يَرْمِي");
    assert_eq!(derive("رمي", "فاعل", "1َا2ِ3"), "رَامٍ");
    assert_eq!(derive("دعو", "فعل", "1َ2ِ3َ"), "دَعِي");
}

#[test]
fn defective_endings() {
    // third letter under sukun becomes tanween
    assert_eq!(derive("رمي", "اسم", "1َا23ْ"), "رَامٍ");
    // present templates keep ya after a fatha
    assert_eq!(derive("سعي", "يفعل", "يَ1ْ2َ3ُ"), "يَسْعَي");
    // a bare final ya is written as alef maqsura
    assert_eq!(derive("رمي", "فعل", "1َ2ْ3"), "رَمْى");
    // a doubled final semivowel fuses under a shadda
    assert_eq!(derive("رمي", "نسبة", "تَ1ْ2ِ33"), "تَرْمِيّ");
    assert_eq!(derive("دعو", "مفعول", "مَ1ْ2ُو3"), "مَدْعُوّ");
}

#[test]
fn fixed_long_vowel_protects_the_third_letter() {
    assert_eq!(derive("دعو", "فعل", "1ُ2َ3"), "دُعَا");
    assert_eq!(derive("دعو", "فعول", "1ُ2َ3"), "دُعَو");
}

#[test]
fn hollow_rules_that_leave_the_word_alone() {
    assert_eq!(derive("قول", "يفعل", "يَ1ْ2ُ3ُ"), "يَقْوُل");
    assert_eq!(derive("بيع", "مجهول", "1ِ2َ3"), "بِيَع");
    assert_eq!(derive("قول", "مجهول", "1ُ2ِ3"), "قُوِل");
}

#[test]
fn geminate_roots() {
    assert_eq!(derive("مدد", "فعل", "1َ2َ3"), "مَدّ");
    // letters already adjacent
    assert_eq!(derive("مدد", "مفعل", "مَ1َ23"), "مَمَدّ");
}

#[test]
fn assimilated_roots() {
    assert_eq!(derive("وعد", "يفعل", "يَ1ْ2ِ3ُ"), "يَعِد");
    assert_eq!(derive("وعد", "فعل", "1َ2َ3"), "وَعَد");
    assert_eq!(derive("وعد", "امر", "1ْ2ِ3"), "عِد");
    assert_eq!(derive("وعد", "امر", "ا1ْ2ِ3"), "عِد");
    assert_eq!(derive("وزن", "مفعال", "مِ1ْ2َا3"), "مِيْزَان");
}

#[test]
fn doubly_weak_roots() {
    assert_eq!(derive("روي", "فاعل", "1َا2ِ3"), "رَاوٍ");
    assert_eq!(derive("روي", "فعل", "1َ2َ3"), "رَوَى");
    assert_eq!(derive("وقي", "يفعل", "يَ1ْ2ِ3ُ"), "يَقِي");
}

#[test]
fn glottal_stop_orthography() {
    assert_eq!(derive("سأل", "فعل", "1َ2َ3"), "سَأَل");
    assert_eq!(derive("سأل", "فاعل", "1َا2ِ3"), "سَائِل");
    assert_eq!(derive("أكل", "فعل", "1َ2َ3"), "أَكَل");
    assert_eq!(derive("أذن", "مصدر", "1ِ2ْ3"), "إِذْن");
    assert_eq!(derive("أمن", "أفعل", "أَ1ْ2َ3"), "آمَن");
    assert_eq!(derive("بدأ", "فعال", "1ِ2َا3"), "بِدَاء");
}

#[test]
fn glottal_pass_is_idempotent() {
    let root = classify("سأل").expect("valid root");
    let shape = TemplateShape::of("فاعل");
    let once = transform("سَاءِل", &root, shape);
    assert_eq!(transform(&once, &root, shape), once);
}

#[test]
fn unmatched_words_come_back_unchanged() {
    let root = classify("قول").expect("valid root");
    assert_eq!(transform("كتب", &root, TemplateShape::default()), "كتب");
    assert_eq!(transform("", &root, TemplateShape::default()), "");
}
