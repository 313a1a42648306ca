use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{UcanError, UcanResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The `with` prefix of an attenuation that points into the token's proofs.
///
/// `prf:*` stands for every capability of every proof, `prf:<N>` for the capabilities of the
/// proof at index `N`.
pub const PROOF_PREFIX: &str = "prf:";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A capability as it appears in a token's attenuations.
///
/// It is an arbitrary JSON object that minimally carries a `with` resource and a `can` ability.
/// Nothing is checked here; fields can be missing or have the wrong type until a
/// [`CapabilitySemantics`][crate::CapabilitySemantics] parses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCapability(Map<String, Value>);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RawCapability {
    /// Creates a capability with the given resource and ability.
    pub fn new(with: impl Into<String>, can: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("with".into(), Value::String(with.into()));
        fields.insert("can".into(), Value::String(can.into()));
        Self(fields)
    }

    /// Adds or replaces a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the resource if it is a string.
    pub fn with(&self) -> Option<&str> {
        self.get("with").and_then(Value::as_str)
    }

    /// Returns the ability if it is a string.
    pub fn can(&self) -> Option<&str> {
        self.get("can").and_then(Value::as_str)
    }

    /// Returns a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the proof selector if this capability points into the token's proofs.
    pub fn proof_selector(&self) -> Option<&str> {
        self.with()?.strip_prefix(PROOF_PREFIX)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<Map<String, Value>> for RawCapability {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<RawCapability> for Value {
    fn from(capability: RawCapability) -> Self {
        Value::Object(capability.0)
    }
}

impl TryFrom<Value> for RawCapability {
    type Error = UcanError;

    fn try_from(value: Value) -> UcanResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl Display for RawCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
