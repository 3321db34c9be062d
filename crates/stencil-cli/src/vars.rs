//! Variable files

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Scalar JSON values accepted as template variables.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum VarValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null(()),
}

impl VarValue {
    fn into_text(self) -> String {
        match self {
            VarValue::Text(text) => text,
            VarValue::Number(number) => number.to_string(),
            VarValue::Bool(flag) => flag.to_string(),
            VarValue::Null(()) => String::new(),
        }
    }
}

/// Parse a JSON object of scalar values into name/value pairs, sorted by name.
pub fn parse_variables(json: &str) -> serde_json::Result<Vec<(String, String)>> {
    let variables: BTreeMap<String, VarValue> = serde_json::from_str(json)?;
    Ok(variables
        .into_iter()
        .map(|(name, value)| (name, value.into_text()))
        .collect())
}

/// Read and parse a variables file.
pub fn load_variables(path: &Path) -> Result<Vec<(String, String)>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read variables file `{}`", path.display()))?;
    parse_variables(&json).with_context(|| format!("invalid variables file `{}`", path.display()))
}
