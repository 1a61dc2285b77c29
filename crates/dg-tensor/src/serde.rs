use std::collections::BTreeMap;
use std::iter::FromIterator;

use dg_core::{DgError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::opts::EngineOpts;
use crate::report::TensorReport;

fn serde_error(code: &str, err: impl ToString) -> DgError {
    DgError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into JSON bytes with sorted object keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, DgError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    serde_json::to_vec(&canonicalize(value)).map_err(|err| serde_error("json-write", err))
}

fn from_json<T: DeserializeOwned>(data: &str) -> Result<T, DgError> {
    serde_json::from_str(data).map_err(|err| serde_error("json-deserialize", err))
}

fn from_yaml<T: DeserializeOwned>(data: &str) -> Result<T, DgError> {
    serde_yaml::from_str(data).map_err(|err| serde_error("yaml-deserialize", err))
}

/// Parses and validates engine options from JSON.
pub fn opts_from_json(data: &str) -> Result<EngineOpts, DgError> {
    let opts: EngineOpts = from_json(data)?;
    opts.validate()?;
    Ok(opts)
}

/// Parses and validates engine options from YAML.
pub fn opts_from_yaml(data: &str) -> Result<EngineOpts, DgError> {
    let opts: EngineOpts = from_yaml(data)?;
    opts.validate()?;
    Ok(opts)
}

/// Pretty JSON rendering of a report.
pub fn report_to_json(report: &TensorReport) -> Result<String, DgError> {
    serde_json::to_string_pretty(report).map_err(|err| serde_error("json-serialize", err))
}

/// Parses a JSON report and checks its hash.
pub fn report_from_json(data: &str) -> Result<TensorReport, DgError> {
    let report: TensorReport = from_json(data)?;
    report.verify()?;
    Ok(report)
}

/// YAML rendering of a report.
pub fn report_to_yaml(report: &TensorReport) -> Result<String, DgError> {
    serde_yaml::to_string(report).map_err(|err| serde_error("yaml-serialize", err))
}

/// Parses a YAML report and checks its hash.
pub fn report_from_yaml(data: &str) -> Result<TensorReport, DgError> {
    let report: TensorReport = from_yaml(data)?;
    report.verify()?;
    Ok(report)
}
