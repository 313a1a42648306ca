use std::slice;

use thiserror::Error;

use crate::{CapabilityParseError, CapabilitySemantics, DelegationError, RawCapability, UcanChain};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Why a capability cannot be claimed from a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError<A> {
    /// The claimed capability could not be parsed.
    #[error(transparent)]
    Parse(#[from] CapabilityParseError),

    /// The last delegation attempt that failed.
    #[error(transparent)]
    Delegation(#[from] DelegationError<A>),

    /// No capability of the token could be compared with the claim.
    #[error("Not found.")]
    NotFound,
}

/// A capability of a chain together with the token at the root of its delegation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimable<'a, A> {
    /// The root-most token granting the capability.
    pub root: &'a UcanChain,

    /// The capability as held by the token the search started from.
    pub capability: A,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanChain {
    /// Finds the token at the root of the delegation of `raw` and returns it.
    ///
    /// The capability is parsed, then one of this token's own capabilities must grant it. From
    /// there proofs are followed up to a token that has no proofs.
    pub fn claim<S>(
        &self,
        raw: &RawCapability,
        semantics: &S,
    ) -> Result<&UcanChain, ClaimError<S::Capability>>
    where
        S: CapabilitySemantics,
    {
        let capability = semantics.try_parse(raw)?;
        let granted = self.can_delegate(&capability, semantics)?;
        self.find_root(&granted, semantics)
    }

    /// Returns every valid capability of this token for which a root can be found.
    ///
    /// Capabilities whose delegation does not hold are left out.
    pub fn find_all_claimable<S>(&self, semantics: &S) -> Vec<Claimable<'_, S::Capability>>
    where
        S: CapabilitySemantics,
    {
        find_valid_caps(semantics, self)
            .filter_map(|capability| match self.find_root(&capability, semantics) {
                Ok(root) => Some(Claimable { root, capability }),
                Err(error) => {
                    tracing::trace!(?capability, %error, "capability not claimable");
                    None
                }
            })
            .collect()
    }

    /// Returns the first valid capability of this token that grants `capability`.
    ///
    /// Candidates are tried in the order [`find_valid_caps`] yields them. When none grants it,
    /// the error of the last candidate tried is returned, or [`ClaimError::NotFound`] if there
    /// was no candidate.
    pub fn can_delegate<S>(
        &self,
        capability: &S::Capability,
        semantics: &S,
    ) -> Result<S::Capability, ClaimError<S::Capability>>
    where
        S: CapabilitySemantics,
    {
        let mut last_error = None;
        for candidate in find_valid_caps(semantics, self) {
            match semantics.try_delegate(&candidate, capability) {
                Ok(_) => return Ok(candidate),
                Err(error) => {
                    tracing::trace!(issuer = self.issuer(), ?candidate, %error, "delegation refused");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.map_or(ClaimError::NotFound, ClaimError::Delegation))
    }

    /// Follows proofs from this token to the root-most token granting `capability`.
    ///
    /// A token without proofs is its own root. Otherwise the first proof that can delegate the
    /// capability is followed and whatever that branch returns is the result. Later proofs are
    /// not tried once a proof has granted the capability.
    pub fn find_root<S>(
        &self,
        capability: &S::Capability,
        semantics: &S,
    ) -> Result<&UcanChain, ClaimError<S::Capability>>
    where
        S: CapabilitySemantics,
    {
        if self.proofs().is_empty() {
            return Ok(self);
        }

        let mut last_error = ClaimError::NotFound;

        for proof in self.proofs() {
            match proof.can_delegate(capability, semantics) {
                Ok(granted) => return proof.find_root(&granted, semantics),
                Err(error) => last_error = error,
            }
        }

        Err(last_error)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Lazily yields the capabilities of `node` that `semantics` can parse.
///
/// The node's own capabilities come first, in order. After them come the capabilities pointed to
/// by `prf:` attenuations: `prf:*` selects every proof and `prf:<N>` the proof at index `N`. Each
/// of those contributes its own capabilities, in attenuation order then proof order. Selectors
/// that name no proof select nothing. Capabilities that fail to parse are skipped, including the
/// `prf:` attenuations themselves unless the semantics accepts them.
pub fn find_valid_caps<'a, S>(
    semantics: &'a S,
    node: &'a UcanChain,
) -> impl Iterator<Item = S::Capability> + 'a
where
    S: CapabilitySemantics,
{
    let indirect = node
        .capabilities()
        .iter()
        .filter_map(RawCapability::proof_selector)
        .flat_map(move |selector| select_proofs(node, selector))
        .flat_map(|proof| proof.capabilities());

    node.capabilities()
        .iter()
        .chain(indirect)
        .filter_map(move |raw| match semantics.try_parse(raw) {
            Ok(capability) => Some(capability),
            Err(error) => {
                tracing::trace!(%raw, %error, "skipping capability");
                None
            }
        })
}

fn select_proofs<'a>(node: &'a UcanChain, selector: &str) -> &'a [UcanChain] {
    if selector == "*" {
        return node.proofs();
    }

    selector
        .parse::<usize>()
        .ok()
        .and_then(|index| node.proofs().get(index))
        .map(slice::from_ref)
        .unwrap_or_default()
}
