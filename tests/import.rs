use std::fs;
use std::io::Cursor;

use sarf::construct::Database;
use sarf::engine::Engine;
use sarf::import::{self, LineStatus};

#[test]
fn roots_with_comments_duplicates_and_junk() {
    let db = Database::new();
    let engine = Engine::new(&db);
    let text = "\u{FEFF}كتب\n# weak roots\n\nقول\n  رمي  \nكتب\nكاتب\nab\n";
    let report = import::import_roots(&engine, Cursor::new(text)).expect("import ok");
    assert_eq!(report.added, 3);
    assert_eq!(report.skipped, 3);
    let statuses: Vec<_> = report.lines.iter().map(|l| (l.line, l.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (1, LineStatus::Added),
            (4, LineStatus::Added),
            (5, LineStatus::Added),
            (6, LineStatus::Duplicate),
            (7, LineStatus::Invalid),
            (8, LineStatus::Invalid),
        ]
    );
    assert!(report.invalid().all(|l| l.reason.is_some()));
    assert_eq!(engine.count_roots(None).expect("count ok"), 3);
}

#[test]
fn bad_bytes_cost_only_their_line() {
    let db = Database::new();
    let engine = Engine::new(&db);
    let mut bytes = b"\xff\xfe\n".to_vec();
    bytes.extend_from_slice("كتب\n".as_bytes());
    let report = import::import_roots(&engine, Cursor::new(bytes)).expect("import ok");
    assert_eq!(report.added, 1);
    assert_eq!(report.invalid().count(), 1);
    assert_eq!(report.invalid().next().map(|l| l.line), Some(1));
}

#[test]
fn schemes_need_name_and_rule() {
    let db = Database::new();
    let engine = Engine::new(&db);
    let text = "فعل|1َ2َ3\nفاعل | 1َا2ِ3\nمفعول\nناقص|1َ2َ\nفعل|1ُ2ِ3\n";
    let report = import::import_schemes(&engine, Cursor::new(text)).expect("import ok");
    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 3);
    assert_eq!(report.lines[2].status, LineStatus::Invalid);
    assert_eq!(report.lines[3].status, LineStatus::Invalid);
    assert_eq!(report.lines[4].status, LineStatus::Duplicate);
    let names: Vec<_> = engine
        .list_schemes()
        .expect("list ok")
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, vec!["فعل".to_string(), "فاعل".to_string()]);
    assert_eq!(engine.find_scheme("فعل").expect("lookup ok").expect("kept").rule(), "1َ2َ3");
}

#[test]
fn importing_from_files() {
    let dir = std::env::temp_dir().join(format!("sarf-import-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let roots = dir.join("roots.txt");
    let schemes = dir.join("schemes.txt");
    fs::write(&roots, "كتب\nقول\n").expect("write roots");
    fs::write(&schemes, "فعل|1َ2َ3\n").expect("write schemes");

    let db = Database::new();
    let engine = Engine::new(&db);
    assert_eq!(import::import_roots_file(&engine, &roots).expect("import ok").added, 2);
    assert_eq!(import::import_schemes_file(&engine, &schemes).expect("import ok").added, 1);
    let word = engine.derive_word("قول", "فعل").expect("derive ok");
    assert_eq!(word.surface.as_deref(), Some("قَال"));

    assert!(import::import_roots_file(&engine, dir.join("missing.txt")).is_err());
    fs::remove_dir_all(&dir).expect("cleanup");
}
