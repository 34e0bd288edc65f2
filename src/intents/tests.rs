use super::*;
use tempfile::TempDir;

fn table() -> IntentTable {
    IntentTable::builtin().expect("bundled intent table should parse")
}

fn english(text: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("en".to_string(), text.to_string())])
}

#[test]
fn builtin_table_loads_in_order() {
    let table = table();
    assert_eq!(table.len(), 10);
    assert_eq!(table.intents()[0].name, "fees");
    assert!(table.contains("hostel"));
    assert!(!table.contains("Hostel"));
    assert_eq!(
        table.english_response("exam"),
        Some("Semester exams will begin from December 10th.")
    );
}

#[test]
fn fee_and_tuition_match_fees_regardless_of_case() {
    let table = table();
    for input in ["What is the FEE?", "tuition details", "Tuition Fee structure", "fees"] {
        let intent = table.classify(input).map(|i| i.name.as_str());
        assert_eq!(intent, Some("fees"), "wrong intent for {input}");
    }
}

#[test]
fn unrelated_text_has_no_intent() {
    assert_eq!(table().classify("hello there"), None);
    assert_eq!(table().match_intent(""), None);
}

#[test]
fn exam_dates_match_exam() {
    let table = table();
    let cleaned = clean_text("exam dates please");
    assert_eq!(table.match_intent(&cleaned).map(|i| i.name.as_str()), Some("exam"));
}

#[test]
fn native_script_keywords_match() {
    let table = table();
    assert_eq!(
        table.classify("விடுதி பற்றி சொல்லுங்கள்").map(|i| i.name.as_str()),
        Some("hostel")
    );
    assert_eq!(
        table.classify("परीक्षा कब है?").map(|i| i.name.as_str()),
        Some("exam")
    );
}

#[test]
fn first_intent_in_table_order_wins() {
    let table = table();
    // "fee" (fees) and "hostel" both occur; fees comes first
    assert_eq!(
        table.classify("hostel fee amount").map(|i| i.name.as_str()),
        Some("fees")
    );
}

#[test]
fn keywords_are_normalized() {
    let table = IntentTable::new(
        vec![Intent {
            name: "fees".to_string(),
            keywords: vec!["  FEE!! ".to_string(), "???".to_string()],
        }],
        BTreeMap::from([("fees".to_string(), english("Rs. 85,000"))]),
    )
    .expect("table should build");

    assert_eq!(table.intents()[0].keywords, vec!["fee"]);
    assert!(table.classify("Fee?").is_some());
}

#[test]
fn invalid_tables_are_rejected() {
    let intent = |name: &str| Intent {
        name: name.to_string(),
        keywords: vec![name.to_string()],
    };

    // Duplicate names
    let result = IntentTable::new(
        vec![intent("fees"), intent("fees")],
        BTreeMap::from([("fees".to_string(), english("x"))]),
    );
    assert!(matches!(result, Err(FaqError::Data(m)) if m.contains("Duplicate")));

    // Missing English response
    let result = IntentTable::new(
        vec![intent("fees")],
        BTreeMap::from([(
            "fees".to_string(),
            BTreeMap::from([("hi".to_string(), "फीस".to_string())]),
        )]),
    );
    assert!(matches!(result, Err(FaqError::Data(m)) if m.contains("English")));

    // Response for an unknown intent
    let result = IntentTable::new(
        vec![intent("fees")],
        BTreeMap::from([
            ("fees".to_string(), english("x")),
            ("canteen".to_string(), english("y")),
        ]),
    );
    assert!(matches!(result, Err(FaqError::Data(m)) if m.contains("canteen")));

    // No intents at all
    assert!(IntentTable::new(Vec::new(), BTreeMap::new()).is_err());
}

#[test]
fn localized_responses_are_looked_up_by_language() {
    let json = r#"{
        "intents": [{ "name": "hostel", "keywords": ["hostel"] }],
        "responses": { "hostel": { "en": "Hostels are available.", "ta": "விடுதி வசதி உள்ளது." } }
    }"#;
    let table = IntentTable::from_json(json).expect("table should parse");

    assert_eq!(table.response("hostel", "ta"), Some("விடுதி வசதி உள்ளது."));
    assert_eq!(table.response("hostel", "hi"), None);
    assert_eq!(table.english_response("hostel"), Some("Hostels are available."));
}

#[test]
fn load_from_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("intents.json");
    fs::write(
        &path,
        r#"{
            "intents": [{ "name": "canteen", "keywords": ["food", "canteen"] }],
            "responses": { "canteen": { "en": "The canteen is open till 6 PM." } }
        }"#,
    )
    .expect("should write intents file");

    let table = IntentTable::load_or_builtin(Some(&path)).expect("should load file");
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.classify("Where can I get FOOD").map(|i| i.name.as_str()),
        Some("canteen")
    );
}
