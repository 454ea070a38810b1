use serde::{Deserialize, Deserializer};

/// Hosted-store primary keys and owner references are UUIDs.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Deserialize a nullable column into `T::default()` when it is `null`.
///
/// The hosted store returns `null` for list columns that were never written
/// (e.g. `ai_steps` before the wizard ran).
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
