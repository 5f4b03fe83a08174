//! bincode encoding of entities into store values

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(values: Vec<Vec<u8>>) -> Result<Vec<T>> {
    values.iter().map(|bytes| decode(bytes)).collect()
}
