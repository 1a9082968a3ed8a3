//! Strategy parameters from JSON
//!
//! A parameter file is the flat record of one strategy, e.g.
//! `{"random_fill_percent": 0.45, "clean_map": false}`. Missing fields keep
//! their defaults. The `"kind"` tag is optional; without it the kind given
//! on the command line applies.

use std::fs;
use std::path::Path;

use mg_core::{Generator, GeneratorKind};
use serde_json::Value;

use crate::CliError;

/// Parse a parameter record for `kind`
pub fn parse_generator(kind: GeneratorKind, json: &str) -> Result<Generator, CliError> {
    let mut value: Value = serde_json::from_str(json)?;
    let Some(record) = value.as_object_mut() else {
        return Err(CliError::NotAnObject);
    };
    record
        .entry("kind")
        .or_insert_with(|| Value::String(kind.to_string()));
    Ok(serde_json::from_value(value)?)
}

/// Default parameters for `kind`, or the record stored at `path`
pub fn load_generator(kind: GeneratorKind, path: Option<&Path>) -> Result<Generator, CliError> {
    match path {
        Some(path) => parse_generator(kind, &fs::read_to_string(path)?),
        None => Ok(Generator::from(kind)),
    }
}
