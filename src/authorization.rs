//! Role/ownership authorization gate.
//!
//! Default-deny, stateless per call: given an authenticated identity and a
//! requested capability, the decision is deterministic. The role match is
//! exhaustive on purpose — adding a role forces every capability site to
//! be revisited.

use uuid::Uuid;

use crate::models::{Identity, UserRole};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// What the caller is asking to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Submit a new screening for oneself.
    CreateOwnScreening,
    /// Read a screening owned by `owner`.
    ReadOwnScreening { owner: Uuid },
    /// Read any patient's screenings.
    ReadAnyScreening,
    /// Read cross-patient summaries and statistics.
    ReadAnyPatientSummary,
}

/// Errors from authorization checks.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,
    /// Authenticated but not permitted for this resource. Distinct from
    /// not-found at this layer; the HTTP boundary may mask it.
    #[error("Not permitted for this resource")]
    Forbidden,
}

// ═══════════════════════════════════════════════════════════
// Gate
// ═══════════════════════════════════════════════════════════

/// Check whether `identity` may exercise `capability`.
pub fn authorize(identity: &Identity, capability: Capability) -> Result<(), AuthError> {
    match identity.role {
        UserRole::Patient => match capability {
            Capability::CreateOwnScreening => Ok(()),
            Capability::ReadOwnScreening { owner } => {
                if owner == identity.id {
                    Ok(())
                } else {
                    Err(AuthError::Forbidden)
                }
            }
            Capability::ReadAnyScreening | Capability::ReadAnyPatientSummary => {
                Err(AuthError::Forbidden)
            }
        },
        UserRole::Admin => match capability {
            // Admin identities carry no patient profile, so they never
            // create screenings of their own.
            Capability::CreateOwnScreening => Err(AuthError::Forbidden),
            Capability::ReadOwnScreening { .. } => Err(AuthError::Forbidden),
            Capability::ReadAnyScreening | Capability::ReadAnyPatientSummary => Ok(()),
        },
    }
}
