use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ucan_storage_key::{GetKeyType, JwsAlgName, PublicKeyBytes, Sign};

use crate::{
    CapabilityParseError, CapabilitySemantics, DelegationError, RawCapability, UcanBuilder,
    UcanResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The resource prefix of every storage capability.
pub const STORAGE_PREFIX: &str = "storage://";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The semantics of `storage://` upload capabilities.
///
/// A child capability is granted when both resources are storage resources, the child's ability
/// is not above the parent's, and the child's resource contains the parent's resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageSemantics;

/// A parsed storage capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCapability {
    /// The storage resource, starting with `storage://`.
    pub with: String,

    /// The ability granted on the resource.
    pub can: StorageAbility,

    /// An optional multihash the capability is restricted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mh: Option<String>,
}

/// Abilities on storage resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageAbility {
    /// Every upload ability.
    #[serde(rename = "upload/*")]
    UploadAll,

    /// Importing uploads only.
    #[serde(rename = "upload/IMPORT")]
    UploadImport,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StorageSemantics {
    /// Signs a storage token after checking that every capability in `builder` is a storage
    /// capability. Returns the encoded token.
    pub fn build<K>(&self, builder: UcanBuilder<(), String>, keypair: &K) -> UcanResult<String>
    where
        K: Sign + JwsAlgName + PublicKeyBytes + GetKeyType,
    {
        for capability in builder.capabilities.iter() {
            self.try_parse(capability)?;
        }

        Ok(builder.sign(keypair)?.to_string())
    }
}

impl StorageAbility {
    /// The level of the ability. A child may not hold a higher level than its parent.
    pub fn level(&self) -> i8 {
        match self {
            StorageAbility::UploadAll => 0,
            StorageAbility::UploadImport => -1,
        }
    }

    /// Returns the ability as written in a capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageAbility::UploadAll => "upload/*",
            StorageAbility::UploadImport => "upload/IMPORT",
        }
    }
}

impl StorageCapability {
    /// Creates a storage capability without a multihash restriction.
    pub fn new(with: impl Into<String>, can: StorageAbility) -> Self {
        Self {
            with: with.into(),
            can,
            mh: None,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl CapabilitySemantics for StorageSemantics {
    type Capability = StorageCapability;

    fn try_parse(&self, raw: &RawCapability) -> Result<StorageCapability, CapabilityParseError> {
        let with = raw
            .with()
            .ok_or_else(|| CapabilityParseError::new(r#""with" must be a string."#, raw))?;

        let can = raw
            .can()
            .ok_or_else(|| CapabilityParseError::new(r#""can" must be a string."#, raw))?;

        let mh = match raw.get("mh") {
            None => None,
            Some(Value::String(mh)) => Some(mh.clone()),
            Some(_) => {
                return Err(CapabilityParseError::new(
                    r#""mh" must be a string or undefined."#,
                    raw,
                ))
            }
        };

        let can = StorageAbility::from_str(can).map_err(|_| {
            CapabilityParseError::new(format!("Ability {can} is not supported."), raw)
        })?;

        if !with.starts_with(STORAGE_PREFIX) {
            return Err(CapabilityParseError::new("Capability is not supported.", raw));
        }

        Ok(StorageCapability {
            with: with.to_string(),
            can,
            mh,
        })
    }

    fn try_delegate(
        &self,
        parent: &StorageCapability,
        child: &StorageCapability,
    ) -> Result<StorageCapability, DelegationError<StorageCapability>> {
        if !parent.with.starts_with(STORAGE_PREFIX) || !child.with.starts_with(STORAGE_PREFIX) {
            return Err(DelegationError::Unrelated {
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        if child.can.level() > parent.can.level() {
            return Err(DelegationError::Escalation {
                reason: "Capability level escalation".to_string(),
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        // Plain substring containment, so `storage://user12` is inside `storage://user1`.
        if !child.with.contains(parent.with.as_str()) {
            return Err(DelegationError::Escalation {
                reason: "Child resource does not match parent resource".to_string(),
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        Ok(child.clone())
    }
}

impl FromStr for StorageAbility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload/*" => Ok(StorageAbility::UploadAll),
            "upload/IMPORT" => Ok(StorageAbility::UploadImport),
            s => Err(s.to_string()),
        }
    }
}

impl Display for StorageAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&StorageCapability> for RawCapability {
    fn from(capability: &StorageCapability) -> Self {
        let raw = RawCapability::new(capability.with.clone(), capability.can.as_str());
        match &capability.mh {
            Some(mh) => raw.with_field("mh", mh.clone()),
            None => raw,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use ucan_storage_did::DidKey;
    use ucan_storage_key::{Ed25519KeyPair, KeyPairGenerate};

    use crate::{validate, Ucan, UcanError, ValidateOptions};

    use super::*;

    fn parse(raw: Value) -> anyhow::Result<Result<StorageCapability, CapabilityParseError>> {
        Ok(StorageSemantics.try_parse(&RawCapability::try_from(raw)?))
    }

    #[test]
    fn test_storage_parse_messages() -> anyhow::Result<()> {
        let cases = [
            (json!({ "can": "upload/*" }), r#""with" must be a string."#),
            (json!({ "with": 1, "can": "upload/*" }), r#""with" must be a string."#),
            (json!({ "with": "storage://a" }), r#""can" must be a string."#),
            (
                json!({ "with": "storage://a", "can": "upload/*", "mh": 7 }),
                r#""mh" must be a string or undefined."#,
            ),
            (
                json!({ "with": "storage://a", "can": "upload/DELETE" }),
                "Ability upload/DELETE is not supported.",
            ),
            (
                json!({ "with": "mailto:a@b.c", "can": "upload/*" }),
                "Capability is not supported.",
            ),
            // The ability is checked before the resource.
            (
                json!({ "with": "mailto:a@b.c", "can": "send" }),
                "Ability send is not supported.",
            ),
        ];

        for (raw, message) in cases {
            let err = parse(raw.clone())?.unwrap_err();
            assert_eq!(err.to_string(), message);
            assert_eq!(Value::from(err.capability), raw);
        }

        Ok(())
    }

    #[test]
    fn test_storage_parse_is_deterministic() -> anyhow::Result<()> {
        let raw = json!({ "with": "storage://a", "can": "upload/IMPORT", "mh": "bafy" });

        let first = parse(raw.clone())??;
        let second = parse(raw)??;
        assert_eq!(first, second);
        assert_eq!(first.can, StorageAbility::UploadImport);
        assert_eq!(first.mh.as_deref(), Some("bafy"));
        assert_eq!(RawCapability::from(&first), RawCapability::try_from(json!({
            "with": "storage://a", "can": "upload/IMPORT", "mh": "bafy"
        }))?);

        Ok(())
    }

    #[test]
    fn test_storage_delegation_rules() {
        let all = |with: &str| StorageCapability::new(with, StorageAbility::UploadAll);
        let import = |with: &str| StorageCapability::new(with, StorageAbility::UploadImport);

        // Narrowing the ability or the resource is fine.
        assert_eq!(
            StorageSemantics.try_delegate(&all("storage://a"), &import("storage://a")),
            Ok(import("storage://a"))
        );
        assert_eq!(
            StorageSemantics.try_delegate(&all("storage://a"), &all("storage://a/b")),
            Ok(all("storage://a/b"))
        );

        assert!(matches!(
            StorageSemantics.try_delegate(&import("storage://a"), &all("storage://a")),
            Err(DelegationError::Escalation { ref reason, .. }) if reason == "Capability level escalation"
        ));
        assert!(matches!(
            StorageSemantics.try_delegate(&all("storage://a"), &all("storage://b")),
            Err(DelegationError::Escalation { ref reason, .. })
                if reason == "Child resource does not match parent resource"
        ));
        assert!(matches!(
            StorageSemantics.try_delegate(&all("other://a"), &all("storage://a")),
            Err(DelegationError::Unrelated { .. })
        ));

        // The level check runs before the resource check.
        let err = StorageSemantics
            .try_delegate(&import("storage://a"), &all("storage://b"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Capability level escalation");
        assert_eq!(err.parent(), &import("storage://a"));
        assert_eq!(err.child(), &all("storage://b"));
    }

    #[test]
    fn test_storage_resource_containment_is_substring() {
        let user1 = StorageCapability::new("storage://user1", StorageAbility::UploadAll);
        let user12 = StorageCapability::new("storage://user12", StorageAbility::UploadAll);

        assert_eq!(StorageSemantics.try_delegate(&user1, &user12), Ok(user12.clone()));
        assert!(StorageSemantics.try_delegate(&user12, &user1).is_err());
    }

    #[test]
    fn test_storage_level_is_monotonic() {
        let abilities = [StorageAbility::UploadAll, StorageAbility::UploadImport];
        for parent in abilities {
            for child in abilities {
                let result = StorageSemantics.try_delegate(
                    &StorageCapability::new("storage://a", parent),
                    &StorageCapability::new("storage://a", child),
                );
                assert_eq!(result.is_ok(), child.level() <= parent.level());
            }
        }
    }

    #[test_log::test]
    fn test_storage_build() -> anyhow::Result<()> {
        let keypair = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        let did = DidKey::from_key(&keypair).to_string();

        let token = StorageSemantics.build(
            Ucan::builder()
                .audience(&did)
                .capability(RawCapability::new(format!("storage://{did}"), "upload/*")),
            &keypair,
        )?;
        validate(&token, &ValidateOptions::default())?;

        let err = StorageSemantics
            .build(
                Ucan::builder()
                    .audience(&did)
                    .capability(RawCapability::new("storage://x", "upload/*"))
                    .capability(RawCapability::new("storage://x", "upload/ALL")),
                &keypair,
            )
            .unwrap_err();
        assert!(matches!(err, UcanError::CapabilityParseError(ref e)
            if e.message == "Ability upload/ALL is not supported."));

        Ok(())
    }
}
