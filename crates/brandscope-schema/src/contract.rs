//! Typed records bound to their schemas

use crate::schema::Schema;
use crate::validation::ValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A serde record with a declared [`Schema`]
///
/// The schema is the authority: [`Contract::decode`] validates first and only
/// then hands the value to serde, so a decoded record never skipped a check.
pub trait Contract: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Structural contract for this record
    fn schema() -> Schema;

    /// Serialize into the JSON shape templates and guards work on
    ///
    /// # Errors
    /// Propagates serde failures (non-string map keys and similar).
    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Validate against [`Contract::schema`], then deserialize
    ///
    /// # Errors
    /// [`ContractError::Schema`] for violations, [`ContractError::Decode`]
    /// if serde still rejects a schema-valid value.
    fn decode(value: Value) -> Result<Self, ContractError> {
        Self::schema().validate(&value)?;
        serde_json::from_value(value).map_err(ContractError::Decode)
    }
}

/// Failure turning a JSON value into a typed record
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Value broke the schema
    #[error(transparent)]
    Schema(#[from] ValidationError),

    /// Schema-valid value that the record type still rejected
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
