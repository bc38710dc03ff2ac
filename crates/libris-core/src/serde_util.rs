//! Serde helpers for server payloads whose columns are nullable.

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as `T::default()`.
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
