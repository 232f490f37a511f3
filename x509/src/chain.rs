//! Certificate path validation.
//!
//! The walk starts at the leaf and follows issuer names through the supplied
//! certificates until it reaches a self-signed certificate or the trust
//! anchor (the last certificate supplied). Each hop checks, in order:
//!
//! 1. the validity window of the certificate at hand,
//! 2. that a certificate whose subject equals its issuer is available,
//! 3. that the issuer's key verifies its signature,
//! 4. the issuer's `pathLenConstraint`, if any.
//!
//! The first failing check ends the walk.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::certificate::Certificate;
use crate::extensions::BasicConstraints;
use crate::sign::now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationStatus {
    Valid,
    Expired,
    NotYetValid,
    SignatureMismatch,
    IssuerMismatch,
    PathTooLong,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Expired => "expired",
            ValidationStatus::NotYetValid => "not yet valid",
            ValidationStatus::SignatureMismatch => "signature mismatch",
            ValidationStatus::IssuerMismatch => "issuer mismatch",
            ValidationStatus::PathTooLong => "path too long",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of [`verify_chain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    /// Position in the walked path of the certificate that failed, the leaf
    /// being 0.
    pub failed_at: Option<usize>,
    /// Subjects of the walked path, leaf first.
    pub path: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

/// Validates `leaf` against `issuers` at the current time.
pub fn verify_chain(leaf: &Certificate, issuers: &[Certificate]) -> ValidationResult {
    verify_chain_at(leaf, issuers, now())
}

pub fn verify_chain_at(
    leaf: &Certificate,
    issuers: &[Certificate],
    at: NaiveDateTime,
) -> ValidationResult {
    let mut walk = Walk {
        path: vec![leaf],
        at,
    };
    let status = walk.run(issuers);
    let failed_at = (status != ValidationStatus::Valid).then(|| walk.path.len() - 1);
    debug!(
        leaf = %leaf.subject(),
        %status,
        depth = walk.path.len(),
        ?failed_at,
        "chain validation finished"
    );
    ValidationResult {
        status,
        failed_at,
        path: walk.path.iter().map(|c| c.subject().to_string()).collect(),
    }
}

struct Walk<'a> {
    path: Vec<&'a Certificate>,
    at: NaiveDateTime,
}

impl<'a> Walk<'a> {
    fn current(&self) -> &'a Certificate {
        self.path[self.path.len() - 1]
    }

    fn run(&mut self, issuers: &'a [Certificate]) -> ValidationStatus {
        let anchor = issuers.last();
        // Every hop consumes a distinct supplied certificate
        for _ in 0..=issuers.len() {
            let cert = self.current();
            trace!(subject = %cert.subject(), depth = self.path.len() - 1, "checking certificate");

            let validity = cert.validity();
            if self.at < validity.not_before {
                return ValidationStatus::NotYetValid;
            }
            if self.at > validity.not_after {
                return ValidationStatus::Expired;
            }

            if cert.is_self_issued() {
                return if verifies(cert, cert) {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::SignatureMismatch
                };
            }
            let candidates = issuers
                .iter()
                .filter(|candidate| candidate.subject().matches(cert.issuer()))
                .filter(|candidate| !self.path.iter().any(|seen| std::ptr::eq(*seen, *candidate)))
                .collect::<Vec<_>>();
            let Some(parent) = candidates
                .iter()
                .find(|candidate| verifies(cert, candidate))
                .copied()
            else {
                // The last supplied certificate is trusted when nothing above it was given
                if self.path.len() > 1 && anchor.is_some_and(|anchor| std::ptr::eq(anchor, cert)) {
                    return ValidationStatus::Valid;
                }
                return if candidates.is_empty() {
                    debug!(issuer = %cert.issuer(), "no issuer certificate found");
                    ValidationStatus::IssuerMismatch
                } else {
                    ValidationStatus::SignatureMismatch
                };
            };
            debug!(child = %cert.subject(), parent = %parent.subject(), "verified hop");

            self.path.push(parent);
            if !self.path_len_satisfied(parent) {
                return ValidationStatus::PathTooLong;
            }
        }
        ValidationStatus::IssuerMismatch
    }

    /// Non-self-issued intermediates below `parent`, excluding the leaf,
    /// must not exceed its pathLenConstraint.
    fn path_len_satisfied(&self, parent: &Certificate) -> bool {
        let Ok(Some(BasicConstraints {
            path_len_constraint: Some(max),
            ..
        })) = parent.extension::<BasicConstraints>()
        else {
            return true;
        };
        let below = &self.path[1..self.path.len() - 1];
        let intermediates = below.iter().filter(|c| !c.is_self_issued()).count();
        intermediates <= max as usize
    }
}

fn verifies(child: &Certificate, parent: &Certificate) -> bool {
    parent
        .public_key()
        .and_then(|key| child.verify_signature(&key))
        .unwrap_or(false)
}
