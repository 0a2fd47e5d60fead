//! Configuration for the SSA transform.
//!
//! One knob worth exposing (whether to pay for the extra bookkeeping behind
//! the transform's runtime invariant checks) and one naming convention (the
//! placeholder identifier used for an "empty" phi).

use serde::{Deserialize, Serialize};

/// Top level configuration for an [`crate::ssa::SsaDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsaConfig {
    /// Naming conventions used while generating synthetic identifiers.
    pub naming: NamingConfig,

    /// When `true`, [`crate::ssa::SsaDriver`] re-checks the universal
    /// invariants (single definition, version monotonicity, phi arity) after
    /// each transform and panics with a descriptive message if one is
    /// violated. Off by default since the checks are O(n) extra work on top
    /// of the transform itself; tests turn it on.
    pub validate_invariants: bool,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            validate_invariants: false,
        }
    }
}

/// Naming conventions for synthetic identifiers produced by the transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Placeholder name used for an "empty" phi before it is filled with
    /// operands: the identifier of the variable's width with no operands
    /// yet. Only the name is configurable; the shape of a filled phi is
    /// always `Operator("phi", ...)`.
    pub phi_symbol: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            phi_symbol: "phi".to_string(),
        }
    }
}
