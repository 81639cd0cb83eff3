use serde_json::json;
use tempfile::TempDir;

use msgdict::{
    config::DictionaryConfig,
    core::{DictionaryError, StoreState, dictionary::Dictionary},
    persist::PersistError,
    record::{Record, ValidationError},
    types::{
        MSG_ALREADY_EXISTS, MSG_DELETE_MISSING, MSG_DELETED, MSG_RELOADED, MSG_SAVED,
        MSG_UPDATE_MISSING, MSG_UPDATED, Outcome,
    },
};

fn config(tmp: &TempDir) -> DictionaryConfig {
    DictionaryConfig::default().with_directory(tmp.path())
}

fn extend(value: serde_json::Value) -> Option<serde_json::Value> {
    Some(value)
}

#[tokio::test]
async fn add_persists_and_reload_round_trips() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    assert!(dict.list().is_empty());
    assert_eq!(dict.state(), StoreState::Loaded);

    let out = dict
        .add("123", "Insert data successfully!", None)
        .await
        .expect("add");
    assert_eq!(out, Outcome::ok(MSG_SAVED));

    let out = dict.reload().await.expect("reload");
    assert_eq!(out, Outcome::ok(MSG_RELOADED));
    assert_eq!(
        dict.list().to_vec(),
        vec![Record::new("123", "Insert data successfully!")]
    );
}

#[tokio::test]
async fn second_instance_sees_persisted_records_with_extend_fields() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "Insert data successfully!", Some(json!("")))
        .await
        .expect("add 123");
    dict.add("234", "Insert data successfully!", extend(json!({"user": "doe"})))
        .await
        .expect("add 234");

    let reopened = Dictionary::open(config(&tmp));
    let listed = serde_json::to_value(reopened.list()).expect("encode");
    assert_eq!(
        listed,
        json!([
            {"code": "123", "message": "Insert data successfully!"},
            {"code": "234", "message": "Insert data successfully!", "user": "doe"}
        ])
    );
}

#[tokio::test]
async fn duplicate_add_is_soft_failure_and_leaves_table() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "first", None).await.expect("add");

    let out = dict.add("123", "second", None).await.expect("dup add");
    assert_eq!(out, Outcome::soft(MSG_ALREADY_EXISTS));
    assert_eq!(dict.list().to_vec(), vec![Record::new("123", "first")]);
}

#[tokio::test]
async fn update_replaces_message_and_merges_extend() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "Insert data successfully!", extend(json!({"lang": "en"})))
        .await
        .expect("add");

    let out = dict
        .update("123", "new text", extend(json!({"user": "john"})))
        .await
        .expect("update");
    assert_eq!(out, Outcome::ok(MSG_UPDATED));

    let expected = json!({"code": "123", "message": "new text", "lang": "en", "user": "john"});
    assert_eq!(serde_json::to_value(dict.get("123")).expect("encode"), expected);

    let reopened = Dictionary::open(config(&tmp));
    assert_eq!(serde_json::to_value(reopened.get("123")).expect("encode"), expected);
}

#[tokio::test]
async fn update_keeps_record_position() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    for code in ["a", "b", "c"] {
        dict.add(code, "x", None).await.expect("add");
    }
    dict.update("b", "y", None).await.expect("update");

    let codes: Vec<_> = dict.list().iter().map(|r| r.code.clone()).collect();
    assert_eq!(codes, ["a", "b", "c"]);
}

#[tokio::test]
async fn update_and_delete_against_missing_code_are_soft_failures() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));

    let out = dict.update("123", "tester", None).await.expect("update");
    assert_eq!(out, Outcome::soft(MSG_UPDATE_MISSING));

    let out = dict.delete("123").await.expect("delete");
    assert_eq!(out, Outcome::soft(MSG_DELETE_MISSING));
    assert!(!dict.path().exists());
}

#[tokio::test]
async fn delete_last_record_leaves_no_file_to_resurrect() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "Insert data successfully!", None)
        .await
        .expect("add");
    assert!(dict.path().exists());

    let out = dict.delete("123").await.expect("delete");
    assert_eq!(out, Outcome::ok(MSG_DELETED));
    assert!(dict.list().is_empty());
    assert!(Dictionary::open(config(&tmp)).list().is_empty());

    dict.drop().await.expect("drop");
    assert!(!dict.path().exists());
}

#[tokio::test]
async fn delete_keeps_other_records() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "one", None).await.expect("add");
    dict.add("234", "two", extend(json!({"user": "doe"})))
        .await
        .expect("add");

    dict.delete("123").await.expect("delete");

    let reopened = Dictionary::open(config(&tmp));
    assert_eq!(reopened.list().len(), 1);
    assert_eq!(reopened.list()[0].code, "234");
}

#[tokio::test]
async fn validation_errors_happen_before_any_io() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));

    let err = dict.add("", "x", None).await.expect_err("empty code");
    assert!(matches!(err, DictionaryError::Validation(ValidationError::EmptyCode)));

    let err = dict.add("1234", "", None).await.expect_err("empty message");
    assert!(matches!(err, DictionaryError::Validation(ValidationError::EmptyMessage)));

    let err = dict
        .add("1234", "abc", extend(json!([])))
        .await
        .expect_err("array extend");
    assert!(matches!(
        err,
        DictionaryError::Validation(ValidationError::ExtendNotObject(_))
    ));

    let err = dict
        .update("123", "abc", extend(json!(42)))
        .await
        .expect_err("number extend");
    assert!(matches!(
        err,
        DictionaryError::Validation(ValidationError::ExtendNotObject(_))
    ));

    let err = dict.delete("").await.expect_err("empty code");
    assert!(matches!(err, DictionaryError::Validation(ValidationError::EmptyCode)));

    assert!(dict.list().is_empty());
    assert!(!dict.path().exists());
}

#[tokio::test]
async fn unknown_code_returns_sentinel() {
    let tmp = TempDir::new().expect("tmp");
    let dict = Dictionary::open(config(&tmp));

    let rec = dict.get("000");
    assert_eq!(rec, Record::new("0", "Unknown error!"));
    assert!(rec.is_unknown());
}

#[tokio::test]
async fn stored_unknown_text_is_not_mistaken_for_sentinel() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("500", "Unknown error!", None).await.expect("add");

    let rec = dict.get("500");
    assert_eq!(rec.code, "500");
    assert!(!rec.is_unknown());
}

#[tokio::test]
async fn load_swallows_malformed_file_but_reload_surfaces_it() {
    let tmp = TempDir::new().expect("tmp");
    let cfg = config(&tmp);
    let path = cfg.file_path();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "{not json").expect("seed");

    let mut dict = Dictionary::open(cfg);
    assert!(dict.list().is_empty());

    let err = dict.reload().await.expect_err("malformed");
    assert!(matches!(err, DictionaryError::Persist(PersistError::Serde(_))));
}

#[tokio::test]
async fn reload_without_file_fails_and_keeps_state() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::new(config(&tmp));
    assert_eq!(dict.state(), StoreState::Configured);

    let err = dict.reload().await.expect_err("missing file");
    match err {
        DictionaryError::Persist(inner) => assert!(inner.is_not_found()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(dict.state(), StoreState::Configured);
}

#[tokio::test]
async fn drop_clears_table_and_tolerates_missing_file() {
    let tmp = TempDir::new().expect("tmp");
    let mut dict = Dictionary::open(config(&tmp));
    dict.add("123", "x", None).await.expect("add");

    dict.drop().await.expect("first drop");
    assert!(dict.list().is_empty());
    assert!(!dict.path().exists());

    dict.drop().await.expect("second drop");
}

#[tokio::test]
async fn write_failures_surface_as_persist_errors() {
    let tmp = TempDir::new().expect("tmp");
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").expect("seed");

    let mut dict = Dictionary::open(DictionaryConfig::default().with_directory(&blocker));
    let err = dict.add("123", "x", None).await.expect_err("unwritable");
    assert!(matches!(err, DictionaryError::Persist(PersistError::Io(_))));
}

#[tokio::test]
async fn locales_live_in_separate_files() {
    let tmp = TempDir::new().expect("tmp");
    let mut en = Dictionary::open(config(&tmp));
    let mut id = Dictionary::open(config(&tmp).with_locale("id"));
    assert_ne!(en.path(), id.path());

    en.add("1", "hello", None).await.expect("add en");
    id.add("1", "halo", None).await.expect("add id");

    assert_eq!(Dictionary::open(config(&tmp)).get("1"), Record::new("1", "hello"));
    assert_eq!(
        Dictionary::open(config(&tmp).with_locale("id")).get("1"),
        Record::new("1", "halo")
    );
}
