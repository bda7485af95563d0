//! Content and administration policies.
//!
//! Two capability seams the node consults but never implements itself:
//! whether a payload is acceptable, and who is allowed to change a
//! node's whitelist.

use std::collections::HashSet;

// ---------------------------------------------------------------------------
// ContentPolicy
// ---------------------------------------------------------------------------

/// Screens payloads entering or leaving a node.
///
/// The contract is fixed across every call site: `true` means the data
/// is malicious and the operation must be rejected.
pub trait ContentPolicy: Send + Sync {
    /// Returns `true` if `data` must be rejected.
    fn is_malicious(&self, data: &[u8]) -> bool;
}

/// Accepts everything. The default for nodes that delegate screening to
/// an upstream layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl ContentPolicy for AllowAll {
    fn is_malicious(&self, _data: &[u8]) -> bool {
        false
    }
}

/// Rejects payloads containing any of a set of byte patterns.
#[derive(Clone, Debug, Default)]
pub struct DenyPatterns {
    patterns: Vec<Vec<u8>>,
}

impl DenyPatterns {
    pub fn new(patterns: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }
}

impl ContentPolicy for DenyPatterns {
    fn is_malicious(&self, data: &[u8]) -> bool {
        self.patterns
            .iter()
            .any(|p| !p.is_empty() && data.windows(p.len()).any(|w| w == p.as_slice()))
    }
}

// ---------------------------------------------------------------------------
// AdminPolicy
// ---------------------------------------------------------------------------

/// Decides who may mutate a node's whitelist.
///
/// Whitelist mutation is a privileged operation; every add/remove names
/// the caller and runs through this check first.
pub trait AdminPolicy: Send + Sync {
    /// Returns `true` if `caller` may add or remove whitelist entries.
    fn can_mutate_whitelist(&self, caller: &str) -> bool;
}

/// Anyone may administer. For demos and single-operator deployments
/// where the process boundary is the security boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenAdminPolicy;

impl AdminPolicy for OpenAdminPolicy {
    fn can_mutate_whitelist(&self, _caller: &str) -> bool {
        true
    }
}

/// Only allow-listed operator addresses may administer.
#[derive(Clone, Debug, Default)]
pub struct OperatorAdminPolicy {
    operators: HashSet<String>,
}

impl OperatorAdminPolicy {
    pub fn new(operators: impl IntoIterator<Item = String>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
        }
    }
}

impl AdminPolicy for OperatorAdminPolicy {
    fn can_mutate_whitelist(&self, caller: &str) -> bool {
        self.operators.contains(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_all_never_rejects() {
        assert!(!AllowAll.is_malicious(b""));
        assert!(!AllowAll.is_malicious(b"anything at all"));
    }

    #[test]
    fn deny_patterns_matches_substrings() {
        let policy = DenyPatterns::new([b"exploit".to_vec(), b"\x00\xff".to_vec()]);
        assert!(policy.is_malicious(b"totally an exploit payload"));
        assert!(policy.is_malicious(b"bytes \x00\xff bytes"));
        assert!(!policy.is_malicious(b"harmless weather data"));
    }

    #[test]
    fn deny_patterns_ignores_empty_pattern() {
        // An empty pattern would match everything; it matches nothing.
        let policy = DenyPatterns::new([Vec::new()]);
        assert!(!policy.is_malicious(b"data"));
    }

    #[test]
    fn operator_policy_gates_by_address() {
        let policy = OperatorAdminPolicy::new(["trove1operator".to_string()]);
        assert!(policy.can_mutate_whitelist("trove1operator"));
        assert!(!policy.can_mutate_whitelist("trove1stranger"));
    }

    #[test]
    fn open_policy_admits_anyone() {
        assert!(OpenAdminPolicy.can_mutate_whitelist("trove1whoever"));
    }
}
