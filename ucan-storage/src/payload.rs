use std::{
    fmt::Display,
    str::FromStr,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{encoding, RawCapability, Segment, UcanError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Facts attached to a token. Each fact is an arbitrary JSON object.
pub type UcanFacts = Vec<Map<String, Value>>;

/// Represents the payload part of a UCAN token, which contains all the claims and data necessary
/// for the authorization process.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UcanPayload {
    /// The DID of the issuer who issued the UCAN.
    pub(crate) issuer: String,

    /// The DID of the audience the UCAN is delegated to.
    pub(crate) audience: String,

    /// The expiration time of the UCAN. `None` means the token does not expire.
    pub(crate) expiration: Option<SystemTime>,

    /// The time before which the UCAN should not be considered valid.
    pub(crate) not_before: Option<SystemTime>,

    /// A nonce used to ensure the uniqueness and to prevent replay attacks.
    pub(crate) nonce: Option<String>,

    /// Additional facts included in the UCAN.
    pub(crate) facts: Option<UcanFacts>,

    /// The capabilities granted by the UCAN, in order.
    pub(crate) attenuations: Vec<RawCapability>,

    /// Encoded proof tokens, in order.
    pub(crate) proofs: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Types: Serde
//--------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct UcanPayloadSerde {
    iss: String,

    aud: String,

    #[serde(default)]
    exp: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nbf: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nnc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    fct: Option<UcanFacts>,

    #[serde(default)]
    att: Vec<RawCapability>,

    #[serde(default)]
    prf: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanPayload {
    /// Returns the issuer of the UCAN.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the audience of the UCAN.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Returns the expiration time of the UCAN.
    pub fn expiration(&self) -> Option<SystemTime> {
        self.expiration
    }

    /// Returns the time before which the UCAN should not be considered valid.
    pub fn not_before(&self) -> Option<SystemTime> {
        self.not_before
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Returns the facts.
    pub fn facts(&self) -> Option<&UcanFacts> {
        self.facts.as_ref()
    }

    /// Returns the capabilities granted by the UCAN.
    pub fn attenuations(&self) -> &[RawCapability] {
        &self.attenuations
    }

    /// Returns the encoded proofs referenced by the UCAN.
    pub fn proofs(&self) -> &[String] {
        &self.proofs
    }

    /// Returns a copy of the payload with the proof list emptied.
    pub fn without_proofs(&self) -> Self {
        Self {
            proofs: Vec::new(),
            ..self.clone()
        }
    }

    /// Returns `true` if the token is expired at `now`, comparing whole seconds.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expiration
            .is_some_and(|exp| unix_seconds(exp) <= unix_seconds(now))
    }

    /// Returns `true` if the token is not active yet at `now`, comparing whole seconds.
    pub fn is_too_early_at(&self, now: SystemTime) -> bool {
        self.not_before
            .is_some_and(|nbf| unix_seconds(nbf) > unix_seconds(now))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Seconds since the unix epoch. Times before the epoch count as zero.
fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn from_unix_seconds<E>(seconds: u64) -> Result<SystemTime, E>
where
    E: serde::de::Error,
{
    UNIX_EPOCH
        .checked_add(Duration::from_secs(seconds))
        .ok_or_else(|| E::custom(format!("timestamp out of range: {seconds}")))
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Serialize for UcanPayload {
    fn serialize<T>(&self, serializer: T) -> Result<T::Ok, T::Error>
    where
        T: Serializer,
    {
        let serde = UcanPayloadSerde {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: self.expiration.map(unix_seconds),
            nbf: self.not_before.map(unix_seconds),
            nnc: self.nonce.clone(),
            fct: self.facts.clone(),
            att: self.attenuations.clone(),
            prf: self.proofs.clone(),
        };

        serde.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UcanPayload {
    fn deserialize<D>(deserializer: D) -> Result<UcanPayload, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let payload = UcanPayloadSerde::deserialize(deserializer)?;

        Ok(UcanPayload {
            issuer: payload.iss,
            audience: payload.aud,
            expiration: payload.exp.map(from_unix_seconds::<D::Error>).transpose()?,
            not_before: payload.nbf.map(from_unix_seconds::<D::Error>).transpose()?,
            nonce: payload.nnc,
            facts: payload.fct,
            attenuations: payload.att,
            proofs: payload.prf,
        })
    }
}

impl Display for UcanPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = encoding::encode_json(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", encoded)
    }
}

impl FromStr for UcanPayload {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        encoding::decode_json(Segment::Payload, s)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
