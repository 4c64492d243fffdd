//! The injected override relation.

use osprey_core::Member;

/// Decides override relationships between members of one name group.
///
/// Any `Fn(&Member, &Member) -> bool` is a checker whose `overrides` is the
/// closure and whose `clashes` is the default.
pub trait OverrideChecker {
    /// Whether `candidate` overrides `base`.
    fn overrides(&self, candidate: &Member, base: &Member) -> bool;

    /// Whether two members that do not override each other still occupy the
    /// same slot, so that inheriting both is an error.
    ///
    /// Defaults to equal kind, name and parameter types.
    fn clashes(&self, a: &Member, b: &Member) -> bool {
        a.signature_hash() == b.signature_hash()
    }

    /// Whether two clashing members may share one fake override: they
    /// stand for a common declaration, or one overrides the other.
    fn compatible(&self, a: &Member, b: &Member) -> bool {
        a.shares_declaration_with(b) || self.overrides(a, b) || self.overrides(b, a)
    }
}

impl<F> OverrideChecker for F
where
    F: Fn(&Member, &Member) -> bool,
{
    fn overrides(&self, candidate: &Member, base: &Member) -> bool {
        self(candidate, base)
    }
}

/// Structural checker: same kind, name and parameter types, and an equal
/// return type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureChecker;

impl OverrideChecker for SignatureChecker {
    fn overrides(&self, candidate: &Member, base: &Member) -> bool {
        candidate.signature_hash() == base.signature_hash()
            && candidate.signature.return_type == base.signature.return_type
    }
}
