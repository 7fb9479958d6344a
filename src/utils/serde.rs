use serde::{Deserialize, Deserializer};

/// Deserializer for update-DTO fields that must distinguish an absent key
/// (keep the stored value) from an explicit JSON `null` (clear it).
///
/// A plain `Option<Option<T>>` collapses both cases to `None`; combined
/// with `#[serde(default, deserialize_with = "double_option")]` the outer
/// option tracks presence and the inner one carries the value.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
