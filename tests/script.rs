use serde_json::json;

use sarf::construct::Database;
use sarf::error::SarfError;
use sarf::script::Interpreter;

#[test]
fn a_session_in_one_script() {
    let db = Database::new();
    let interpreter = Interpreter::new(&db);
    let script = "
        # set up
        add root قول; add root كتب
        add scheme فعل 1َ2َ3
        add scheme فاعل 1َا2ِ3
        derive قول فعل
        decompose قَائِل
        count roots
        list roots limit 1
    ";
    let results = interpreter.execute_collect(script).expect("script runs");
    assert_eq!(results.len(), 8);
    assert_eq!(results[0], json!({ "command": "add root", "result": "added" }));
    assert_eq!(results[4]["result"]["surface"], json!("قَال"));
    assert_eq!(results[4]["result"]["success"], json!(true));
    assert_eq!(results[5]["result"]["root"], json!("قول"));
    assert_eq!(results[5]["result"]["scheme"], json!("فاعل"));
    assert_eq!(results[5]["result"]["category"], json!("hollow"));
    assert_eq!(results[6]["result"], json!(2));
    assert_eq!(results[7]["result"], json!(["قول"]));
}

#[test]
fn rejected_input_is_reported_in_place() {
    let db = Database::new();
    let interpreter = Interpreter::new(&db);
    let results = interpreter
        .execute_collect("add root كاتب; add root كتب; add scheme فعل 12")
        .expect("script runs");
    assert_eq!(results[0]["command"], json!("add root"));
    assert!(results[0]["error"].is_string());
    assert_eq!(results[1]["result"], json!("added"));
    assert!(results[2]["error"].is_string());
}

#[test]
fn unknown_commands_stop_before_running() {
    let db = Database::new();
    let interpreter = Interpreter::new(&db);
    match interpreter.execute_collect("add root كتب\nfly away") {
        Err(SarfError::Parse { line, .. }) => assert_eq!(line, Some(2)),
        other => panic!("expected a parse error, got {:?}", other),
    }
    assert_eq!(interpreter.engine().count_roots(None).expect("count ok"), 0);
}

#[test]
fn page_size_bounds_listings() {
    let db = Database::new();
    let interpreter = Interpreter::new(&db).with_page_size(2);
    let results = interpreter
        .execute_collect("add root كتب; add root درس; add root قول; list roots; list roots offset 2")
        .expect("script runs");
    assert_eq!(results[3]["result"], json!(["درس", "قول"]));
    assert_eq!(results[4]["result"], json!(["كتب"]));
}
