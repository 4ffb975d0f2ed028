//! Field coercion from intermediate-file entries to table rows
//!
//! Entries are read as untyped JSON so that files written by older crawls,
//! or edited by hand, still load: every field has a fallback.

use crate::record::NOT_AVAILABLE;
use crate::storage::ProviderRow;
use crate::HarvestError;
use serde_json::{Map, Value};

const NAME_KEY: &str = "Provider Name";
const COMPANY_KEY: &str = "Company Name";
const LOCATIONS_KEY: &str = "Number of Locations";
const ADDRESSES_KEY: &str = "Location Addresses";
const PHONE_KEY: &str = "Phone Number";
const WEBSITE_KEY: &str = "Website Link";

/// Flattens a document into its list of entries
///
/// An array is returned as-is. An object is treated as department -> array
/// and its array values are concatenated; non-array values are ignored.
pub fn flatten_entries(document: Value) -> Result<Vec<Value>, HarvestError> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(groups) => Ok(groups
            .into_iter()
            .filter_map(|(department, value)| match value {
                Value::Array(entries) => Some(entries),
                _ => {
                    tracing::warn!(department = %department, "Ignoring non-list department value");
                    None
                }
            })
            .flatten()
            .collect()),
        other => Err(HarvestError::InvalidInput(format!(
            "expected an array or an object of arrays, got {}",
            type_name(&other)
        ))),
    }
}

/// Converts one entry to a row, or `None` if the entry is not an object
pub fn coerce_entry(entry: &Value) -> Option<ProviderRow> {
    let fields = entry.as_object()?;

    Some(ProviderRow {
        provider_name: string_field(fields, NAME_KEY),
        company_name: string_field(fields, COMPANY_KEY),
        num_locations: fields
            .get(LOCATIONS_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(0),
        location_addresses: encode_addresses(fields.get(ADDRESSES_KEY)),
        phone_number: encode_phones(fields.get(PHONE_KEY)),
        website_link: string_field(fields, WEBSITE_KEY),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(other) => other.to_string(),
    }
}

/// A list is encoded as-is, a bare string is wrapped, anything else is the sentinel
pub fn encode_phones(value: Option<&Value>) -> String {
    let list = match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(Value::String(s)) => Value::Array(vec![Value::String(s.clone())]),
        _ => sentinel_list(),
    };
    list.to_string()
}

/// Always encodes an array: a list as-is, a missing or null field as the
/// sentinel, any other value wrapped in a one-element list
pub fn encode_addresses(value: Option<&Value>) -> String {
    let list = match value {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        None | Some(Value::Null) => sentinel_list(),
        Some(other) => Value::Array(vec![other.clone()]),
    };
    list.to_string()
}

fn sentinel_list() -> Value {
    Value::Array(vec![Value::String(NOT_AVAILABLE.to_string())])
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
