use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use sarf::classify::classify;
use sarf::construct::{Database, RootNode};
use sarf::engine::Engine;
use sarf::root_keeper::RootKeeper;

const LETTERS: &str = "بتجحدذرسشصعفقكلمنهوي";

fn roots(count: usize) -> Vec<String> {
    let letters: Vec<char> = LETTERS.chars().collect();
    let mut roots = Vec::with_capacity(count);
    'outer: for a in &letters {
        for b in &letters {
            for c in &letters {
                if roots.len() == count {
                    break 'outer;
                }
                roots.push([*a, *b, *c].iter().collect());
            }
        }
    }
    roots
}

fn seeded(db: &Database, count: usize) -> Engine<'_> {
    let engine = Engine::new(db);
    for root in roots(count) {
        engine.register_root(&root).expect("valid root");
    }
    for root in ["قول", "رمي", "كتب"] {
        engine.register_root(root).expect("valid root");
    }
    for (name, rule) in [
        ("فعل", "1َ2َ3"),
        ("فاعل", "1َا2ِ3"),
        ("مفعول", "مَ1ْ2ُو3"),
        ("يفعل", "يَ1ْ2ِ3ُ"),
        ("مفعال", "مِ1ْ2َا3"),
        ("تفعيل", "تَ1ْ2ِي3"),
    ] {
        engine.register_scheme(name, rule).expect("valid scheme");
    }
    engine
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let spellings = roots(1000);
    c.bench_function("insert 1k roots", |b| {
        b.iter(|| {
            let mut keeper = RootKeeper::new();
            for s in &spellings {
                keeper.insert(RootNode::new(classify(s).expect("valid root")));
            }
            black_box(keeper.height())
        })
    });

    let db = Database::new();
    let engine = seeded(&db, 1000);
    c.bench_function("family of a hollow root", |b| b.iter(|| engine.derive_family(black_box("قول"))));
    c.bench_function("family of a defective root", |b| b.iter(|| engine.derive_family(black_box("رمي"))));
    c.bench_function("decompose among 1k roots", |b| b.iter(|| engine.decompose(black_box("مَكْتُوب"))));
    c.bench_function("decompose bare word among 1k roots", |b| b.iter(|| engine.decompose_all(black_box("قائل"))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
