use crate::error::{GenError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Credentials for one user, extracted from the users file.
///
/// The input field is spelled `shortId`; extra fields on a record are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uuid: String,
    pub short_id: String,
}

/// Map of display name to record. A `BTreeMap` keeps iteration order
/// deterministic (sorted by name), which makes batch output reproducible.
pub type UserStore = BTreeMap<String, UserRecord>;

/// Why a single record was rejected. Never fatal to the run; the offending
/// record is skipped and the rest of the store still loads.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {0} must be a string")]
    NotAString(&'static str),
}

impl UserRecord {
    /// Validates the decoded shape of one record and produces a typed record.
    /// Nothing downstream trusts the raw JSON beyond this boundary.
    pub fn from_value(value: &Value) -> std::result::Result<Self, RecordError> {
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject);
        };
        let uuid = string_field(fields, "uuid")?;
        let short_id = string_field(fields, "shortId")?;
        Ok(Self { uuid, short_id })
    }
}

fn string_field(
    fields: &Map<String, Value>,
    key: &'static str,
) -> std::result::Result<String, RecordError> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RecordError::NotAString(key)),
        None => Err(RecordError::MissingField(key)),
    }
}

/// Loads and validates the users file.
///
/// A missing or unparsable file and a non-object top level are fatal. An
/// individual record that fails validation is logged and skipped; it does not
/// appear in the store and is excluded from the batch entirely.
pub fn load_users(path: &Path) -> Result<UserStore> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(GenError::UsersNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(GenError::Io(e)),
    };

    let parsed: Value = serde_json::from_str(&raw).map_err(GenError::UsersParse)?;
    let Value::Object(entries) = parsed else {
        return Err(GenError::UsersSchema);
    };

    let mut store = UserStore::new();
    for (name, value) in entries {
        match UserRecord::from_value(&value) {
            Ok(record) => {
                store.insert(name, record);
            }
            Err(e) => warn!("skipping user {}: {}", name, e),
        }
    }
    Ok(store)
}
