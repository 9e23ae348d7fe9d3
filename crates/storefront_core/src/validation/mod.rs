//! Inbound payload validation.
//!
//! # Responsibility
//! - Turn a raw JSON field map into a typed entity input, or an itemized
//!   per-field error set.
//! - Report unknown extra fields without blocking.
//!
//! # Invariants
//! - Validation has no storage side effects.
//! - Every failing declared field gets at least one message; field keys are
//!   reported in sorted order.

use crate::model::EntityKind;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod schemas;

pub const MSG_MISSING: &str = "Missing data for required field.";
pub const MSG_NULL: &str = "Field may not be null.";
pub const MSG_BLANK: &str = "Field may not be blank.";
pub const MSG_NOT_STRING: &str = "Not a valid string.";
pub const MSG_NOT_NUMBER: &str = "Not a valid number.";
pub const MSG_NOT_INTEGER: &str = "Not a valid integer.";
pub const MSG_NOT_DATE: &str = "Not a valid date.";
pub const MSG_NEGATIVE: &str = "Must be greater than or equal to 0.";
pub const MSG_NOT_POSITIVE: &str = "Must be a positive integer.";
pub const MSG_INVALID_INPUT: &str = "Invalid input type.";

/// Key used when the payload as a whole is unusable (e.g. not an object).
pub const SCHEMA_KEY: &str = "_schema";

/// Field name to error messages, sorted by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an error set with one message for one field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty when the field passed.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

impl Error for FieldErrors {}

/// A successfully validated payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    /// Keys present in the payload that the entity does not declare.
    pub unknown_fields: Vec<String>,
}

/// Declares how an entity input is read from a raw field map.
pub trait Schema: Sized {
    const KIND: EntityKind;
    /// Field names the entity accepts from clients.
    const FIELDS: &'static [&'static str];

    /// Reads declared fields, recording failures on `reader`.
    ///
    /// Returns `None` when at least one field failed.
    fn read(reader: &mut FieldReader<'_>) -> Option<Self>;
}

/// Validates `raw` against the schema of `T`.
///
/// # Errors
/// - Returns `FieldErrors` when `raw` is not a JSON object or any declared
///   field is missing or invalid.
pub fn validate<T: Schema>(raw: &Value) -> Result<Validated<T>, FieldErrors> {
    let Some(fields) = raw.as_object() else {
        return Err(FieldErrors::single(SCHEMA_KEY, MSG_INVALID_INPUT));
    };

    let mut reader = FieldReader::new(fields);
    let value = T::read(&mut reader);
    let errors = reader.into_errors();

    match value {
        Some(value) if errors.is_empty() => {
            let unknown_fields = unknown_fields(fields, T::FIELDS);
            if !unknown_fields.is_empty() {
                warn!(
                    "event=payload_unknown_fields module=validation entity={} fields={}",
                    T::KIND,
                    unknown_fields.join(",")
                );
            }
            Ok(Validated {
                value,
                unknown_fields,
            })
        }
        _ => Err(errors),
    }
}

fn unknown_fields(fields: &Map<String, Value>, declared: &[&str]) -> Vec<String> {
    fields
        .keys()
        .filter(|key| !declared.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// Typed accessors over a raw field map that accumulate errors.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>) -> Self {
        Self {
            fields,
            errors: FieldErrors::new(),
        }
    }

    fn into_errors(self) -> FieldErrors {
        self.errors
    }

    fn fail<T>(&mut self, field: &str, message: &str) -> Option<T> {
        self.errors.push(field, message);
        None
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let fields = self.fields;
        match fields.get(field) {
            None => self.fail(field, MSG_MISSING),
            Some(Value::Null) => self.fail(field, MSG_NULL),
            Some(value) => Some(value),
        }
    }

    /// Required, non-blank string of at most `max_len` characters.
    pub fn required_string(&mut self, field: &str, max_len: usize) -> Option<String> {
        let value = self.required(field)?;
        let Some(text) = value.as_str() else {
            return self.fail(field, MSG_NOT_STRING);
        };
        if text.trim().is_empty() {
            return self.fail(field, MSG_BLANK);
        }
        self.within_length(field, text, max_len)
    }

    /// Required string of at most `max_len` characters; empty is allowed.
    pub fn required_text(&mut self, field: &str, max_len: usize) -> Option<String> {
        let value = self.required(field)?;
        let Some(text) = value.as_str() else {
            return self.fail(field, MSG_NOT_STRING);
        };
        self.within_length(field, text, max_len)
    }

    /// Optional string; absent and `null` both read as `None`.
    ///
    /// The outer `Option` is `None` only when the field failed validation.
    pub fn optional_string(&mut self, field: &str, max_len: usize) -> Option<Option<String>> {
        let fields = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(text)) => self.within_length(field, text, max_len).map(Some),
            Some(_) => self.fail(field, MSG_NOT_STRING),
        }
    }

    /// Required finite number that is zero or greater.
    ///
    /// Numeric strings such as `"9.99"` are accepted. `-0` reads as `0`.
    pub fn required_non_negative(&mut self, field: &str) -> Option<f64> {
        let value = self.required(field)?;
        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(number) if !number.is_finite() => self.fail(field, MSG_NOT_NUMBER),
            Some(number) if number < 0.0 => self.fail(field, MSG_NEGATIVE),
            Some(number) => Some(number + 0.0),
            None => self.fail(field, MSG_NOT_NUMBER),
        }
    }

    /// Required integer id (`>= 1`); integer strings such as `"7"` are
    /// accepted.
    pub fn required_id(&mut self, field: &str) -> Option<i64> {
        let value = self.required(field)?;
        let id = match value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        };
        match id {
            Some(id) if id >= 1 => Some(id),
            Some(_) => self.fail(field, MSG_NOT_POSITIVE),
            None => self.fail(field, MSG_NOT_INTEGER),
        }
    }

    /// Required calendar date in `format`.
    pub fn required_date(&mut self, field: &str, format: &str) -> Option<chrono::NaiveDate> {
        let value = self.required(field)?;
        let Some(text) = value.as_str() else {
            return self.fail(field, MSG_NOT_DATE);
        };
        match chrono::NaiveDate::parse_from_str(text.trim(), format) {
            Ok(date) => Some(date),
            Err(_) => self.fail(field, MSG_NOT_DATE),
        }
    }

    fn within_length(&mut self, field: &str, text: &str, max_len: usize) -> Option<String> {
        if text.chars().count() > max_len {
            self.errors
                .push(field, format!("Longer than maximum length {max_len}."));
            return None;
        }
        Some(text.to_string())
    }
}
