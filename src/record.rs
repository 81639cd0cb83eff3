//! Message record, message body, and input validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{Code, Locale, UNKNOWN_CODE, UNKNOWN_MESSAGE};

/// Open set of extra fields flattened onto a record.
pub type Extend = Map<String, Value>;

/// Field names owned by [`Record`] itself; never taken from an extend map.
pub const RESERVED_FIELDS: [&str; 2] = ["code", "message"];

/// Caller-side input errors, raised before any mutation or I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `code` was empty.
    #[error("code is required and must be a non-empty string")]
    EmptyCode,
    /// `message` was empty.
    #[error("message is required and must be a non-empty string")]
    EmptyMessage,
    /// `locale` was empty.
    #[error("locale is required and must be a non-empty string")]
    EmptyLocale,
    /// `extend` was present but not a JSON object.
    #[error("extend must be an object, got {0}")]
    ExtendNotObject(&'static str),
}

/// Message body: one string, or one string per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Single-locale body.
    Text(String),
    /// Multi-locale body keyed by locale.
    Localized(BTreeMap<Locale, String>),
}

impl Message {
    /// Builds a multi-locale body holding one entry.
    pub fn localized(locale: impl Into<Locale>, text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(locale.into(), text.into());
        Self::Localized(map)
    }

    /// Returns the plain text of a single-locale body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Localized(_) => None,
        }
    }

    /// Returns the text stored for `locale` in a multi-locale body.
    pub fn for_locale(&self, locale: &str) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Localized(map) => map.get(locale).map(String::as_str),
        }
    }

    /// Sets `locale` to `text`, overwriting any previous value.
    ///
    /// A plain-text body has no locale to keep, so it is replaced by a
    /// single-entry map.
    pub fn set_locale(&mut self, locale: impl Into<Locale>, text: impl Into<String>) {
        match self {
            Self::Localized(map) => {
                map.insert(locale.into(), text.into());
            }
            Self::Text(_) => *self = Self::localized(locale, text),
        }
    }

    /// Removes `locale`; returns whether it was present.
    pub fn remove_locale(&mut self, locale: &str) -> bool {
        match self {
            Self::Localized(map) => map.remove(locale).is_some(),
            Self::Text(_) => false,
        }
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One addressable entry in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique record code.
    pub code: Code,
    /// Message body.
    pub message: Message,
    /// Caller-defined extra fields.
    #[serde(flatten)]
    pub extra: Extend,
}

impl Record {
    /// Builds a record with no extra fields.
    pub fn new(code: impl Into<Code>, message: impl Into<Message>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            extra: Extend::new(),
        }
    }

    /// Sentinel returned when no record matches.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CODE, UNKNOWN_MESSAGE)
    }

    /// Sentinel returned when `code` matched but the locale did not.
    pub fn unknown_for(code: impl Into<Code>) -> Self {
        Self::new(code, UNKNOWN_MESSAGE)
    }

    /// True only for the no-match sentinel from [`Record::unknown`].
    ///
    /// A locale miss is reported as [`Record::unknown_for`]; compare
    /// against that directly.
    pub fn is_unknown(&self) -> bool {
        self.code == UNKNOWN_CODE
            && self.message.as_text() == Some(UNKNOWN_MESSAGE)
            && self.extra.is_empty()
    }

    /// Merges `extend` into the extra fields, last write wins.
    pub fn merge_extend(&mut self, extend: Extend) {
        for (key, value) in extend {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                tracing::debug!(code = %self.code, field = %key, "ignoring reserved extend field");
                continue;
            }
            self.extra.insert(key, value);
        }
    }

    /// Builder form of [`Record::merge_extend`].
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.merge_extend(extend);
        self
    }
}

/// Rejects an empty code.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::EmptyCode);
    }
    Ok(())
}

/// Rejects an empty message.
pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

/// Rejects an empty locale.
pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    if locale.is_empty() {
        return Err(ValidationError::EmptyLocale);
    }
    Ok(())
}

/// Normalizes an optional extend value into a field map.
///
/// `None`, `null` and `""` mean "no extra fields". Any other non-object
/// value is rejected.
pub fn normalize_extend(extend: Option<Value>) -> Result<Extend, ValidationError> {
    match extend {
        None | Some(Value::Null) => Ok(Extend::new()),
        Some(Value::String(s)) if s.is_empty() => Ok(Extend::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ValidationError::ExtendNotObject(kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
