use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::SeqError;
use crate::table::ObservationTable;

/// Recursively rebuilds every object with sorted keys.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut inner) in entries {
                sort_keys(&mut inner);
                map.insert(key, inner);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Serializes a value into JSON bytes with deterministic key ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SeqError> {
    let mut value =
        serde_json::to_value(value).map_err(|err| SeqError::serde("json_serialize", err))?;
    sort_keys(&mut value);
    serde_json::to_vec(&value).map_err(|err| SeqError::serde("json_write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, SeqError> {
    serde_json::from_slice(data).map_err(|err| SeqError::serde("json_deserialize", err))
}

/// Parses a record-oriented JSON array into an observation table.
pub fn table_from_json_records(data: &[u8]) -> Result<ObservationTable, SeqError> {
    let records: Vec<Value> = from_json_slice(data)?;
    ObservationTable::from_records(&records)
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, SeqError> {
    serde_yaml::to_string(value).map_err(|err| SeqError::serde("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, SeqError> {
    serde_yaml::from_slice(data).map_err(|err| SeqError::serde("yaml_deserialize", err))
}
