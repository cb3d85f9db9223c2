//! # Pair Records
//!
//! Validation of one JSON-lines corpus record into a [`PairRecord`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    errors::{PCResult, PairchipperError},
    vocab::SpecialTokens,
};

/// The default source field name.
pub const DEFAULT_SOURCE_FIELD: &str = "listen";

/// The default target field name.
pub const DEFAULT_TARGET_FIELD: &str = "reply";

/// Configuration for one side of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConfig {
    /// The JSON field holding this side's text.
    pub field: String,

    /// The reserved tokens of this side's vocabulary.
    pub specials: SpecialTokens,
}

impl SideConfig {
    /// The default source side: ``"listen"``, no sequence markers.
    pub fn source() -> Self {
        Self {
            field: DEFAULT_SOURCE_FIELD.to_string(),
            specials: SpecialTokens::source(),
        }
    }

    /// The default target side: ``"reply"``, with sequence markers.
    pub fn target() -> Self {
        Self {
            field: DEFAULT_TARGET_FIELD.to_string(),
            specials: SpecialTokens::target(),
        }
    }

    /// Set the JSON field name.
    pub fn with_field<S: Into<String>>(
        self,
        field: S,
    ) -> Self {
        Self {
            field: field.into(),
            ..self
        }
    }

    /// Set the reserved tokens.
    pub fn with_specials(
        self,
        specials: SpecialTokens,
    ) -> Self {
        Self { specials, ..self }
    }
}

/// A validated raw record: the untokenized source and target texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    /// The source text.
    pub source: String,

    /// The target text.
    pub target: String,
}

impl PairRecord {
    /// Parse one JSON-lines record.
    ///
    /// ## Arguments
    /// * `line` - the record text.
    /// * `line_no` - the 1-based line number, for errors.
    /// * `source_field` - the source field name.
    /// * `target_field` - the target field name.
    ///
    /// ## Returns
    /// A [`PairchipperError::DataFormat`] if the line is not a JSON object,
    /// or either field is missing or not a string. Other keys are ignored.
    pub fn parse_line(
        line: &str,
        line_no: usize,
        source_field: &str,
        target_field: &str,
    ) -> PCResult<Self> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| PairchipperError::data_format(line_no, e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(PairchipperError::data_format(
                line_no,
                "record is not a JSON object",
            ));
        };

        Ok(Self {
            source: take_string_field(&map, source_field, line_no)?,
            target: take_string_field(&map, target_field, line_no)?,
        })
    }
}

fn take_string_field(
    map: &Map<String, Value>,
    field: &str,
    line_no: usize,
) -> PCResult<String> {
    match map.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(PairchipperError::data_format(
            line_no,
            format!("field {field:?} is not a string"),
        )),
        None => Err(PairchipperError::data_format(
            line_no,
            format!("missing field {field:?}"),
        )),
    }
}
