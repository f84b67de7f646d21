#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::PathBuf;

pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

/// A Cusdis export record with sensible defaults.
pub fn record(id: &str) -> Value {
    json!({
        "id": id,
        "pageId": format!("page-{id}"),
        "created_at": "2022-05-21T10:15:30.123Z",
        "updated_at": "2022-05-21T10:15:30.123Z",
        "deletedAt": null,
        "moderatorId": null,
        "by_email": null,
        "by_nickname": format!("user-{id}"),
        "content": format!("comment {id}"),
        "approved": true,
        "parentId": null,
        "url": format!("https://example.com/posts/{id}"),
    })
}

pub fn with(mut record: Value, key: &str, value: Value) -> Value {
    record[key] = value;
    record
}

pub fn document(records: Vec<Value>) -> String {
    Value::Array(records).to_string()
}
