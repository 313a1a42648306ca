use std::fmt::Display;

use async_recursion::async_recursion;
use async_trait::async_trait;
use futures::future;

use crate::{
    validate, RawCapability, SignedUcan, UcanError, UcanHeader, UcanPayload, UcanResult,
    ValidateOptions,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The encoded tokens along the path from the top of the chain to the node being assembled.
pub type Trace = Vec<String>;

/// A validated token whose proofs have all been validated and assembled as well.
///
/// Every proof of a node was delegated to that node's issuer, that is
/// `proof.audience() == node.issuer()`. This is checked once during assembly and therefore
/// holds for the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UcanChain {
    encoded: String,
    ucan: SignedUcan,
    proofs: Vec<UcanChain>,
}

/// Turns the proof references found in a token's `prf` field into encoded tokens.
///
/// Proofs are embedded in the token by default, see [`InlineProofs`]. Other implementations can
/// treat references as keys into a store.
#[async_trait]
pub trait ProofResolver: Send + Sync {
    /// Returns the encoded token a proof reference stands for.
    async fn resolve(&self, reference: &str) -> UcanResult<String>;
}

/// A [`ProofResolver`] for proofs embedded as encoded tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineProofs;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanChain {
    /// Validates an encoded token and, recursively, every proof it embeds.
    pub async fn from_token(encoded: &str, options: &ValidateOptions) -> UcanResult<Self> {
        Self::from_token_with(encoded, options, &InlineProofs).await
    }

    /// Like [`from_token`][UcanChain::from_token] but looks proof references up with `resolver`.
    pub async fn from_token_with(
        encoded: &str,
        options: &ValidateOptions,
        resolver: &dyn ProofResolver,
    ) -> UcanResult<Self> {
        Self::assemble(encoded.to_string(), options, resolver, Trace::new()).await
    }

    #[async_recursion]
    async fn assemble(
        encoded: String,
        options: &ValidateOptions,
        resolver: &dyn ProofResolver,
        trace: Trace,
    ) -> UcanResult<Self> {
        if trace.len() > options.max_proof_depth {
            return Err(UcanError::ProofDepthExceeded(options.max_proof_depth));
        }

        if trace.contains(&encoded) {
            return Err(UcanError::ProofCycle(encoded));
        }

        let ucan = validate(&encoded, options)?;

        let mut trace = trace;
        trace.push(encoded.clone());

        // All siblings are assembled concurrently and must all succeed.
        let proofs = future::try_join_all(ucan.payload().proofs().iter().map(|reference| {
            let trace = trace.clone();
            async move {
                let token = resolver.resolve(reference).await?;
                Self::assemble(token, options, resolver, trace).await
            }
        }))
        .await?;

        let issuer = ucan.payload().issuer();
        if let Some(proof) = proofs.iter().find(|proof| proof.audience() != issuer) {
            tracing::warn!(
                audience = proof.audience(),
                issuer,
                "proof audience does not match issuer"
            );
            return Err(UcanError::AudienceMismatch {
                audience: proof.audience().to_string(),
                issuer: issuer.to_string(),
            });
        }

        tracing::debug!(
            issuer,
            audience = ucan.payload().audience(),
            proofs = proofs.len(),
            "assembled chain node"
        );

        Ok(Self {
            encoded,
            ucan,
            proofs,
        })
    }

    /// Returns the issuer DID.
    pub fn issuer(&self) -> &str {
        self.ucan.payload().issuer()
    }

    /// Returns the audience DID.
    pub fn audience(&self) -> &str {
        self.ucan.payload().audience()
    }

    /// Returns the assembled proofs in the order the token lists them.
    pub fn proofs(&self) -> &[UcanChain] {
        &self.proofs
    }

    /// Returns this token's own attenuations. Capabilities of proofs are not included.
    pub fn capabilities(&self) -> &[RawCapability] {
        self.ucan.payload().attenuations()
    }

    /// Returns the header.
    pub fn header(&self) -> &UcanHeader {
        self.ucan.header()
    }

    /// Returns this token's payload with its proof list emptied. Use
    /// [`proofs`][UcanChain::proofs] to reach the proofs.
    pub fn payload(&self) -> UcanPayload {
        self.ucan.payload().without_proofs()
    }

    /// Returns the token exactly as it was received.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Returns the decoded token.
    pub fn ucan(&self) -> &SignedUcan {
        &self.ucan
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates an encoded token and assembles its proof chain.
pub async fn assemble_chain(encoded: &str, options: &ValidateOptions) -> UcanResult<UcanChain> {
    UcanChain::from_token(encoded, options).await
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ProofResolver for InlineProofs {
    async fn resolve(&self, reference: &str) -> UcanResult<String> {
        Ok(reference.to_string())
    }
}

impl Display for UcanChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encoded)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
