//! Supertype member aggregation.

use std::sync::Arc;

use osprey_core::{ClassDecl, Member, ResolutionError, ResolvedClass};
use osprey_registry::ClassRegistry;

/// Look up the resolved form of every direct supertype of `class`, in
/// declaration order.
///
/// A supertype that is unregistered, or registered but not (successfully)
/// resolved, fails the whole class with
/// [`ResolutionError::UnresolvedSupertype`].
pub fn collect_supertypes(
    class: &ClassDecl,
    registry: &ClassRegistry,
) -> Result<Vec<Arc<ResolvedClass>>, ResolutionError> {
    class
        .supertypes
        .iter()
        .map(|name| {
            registry
                .resolved_by_name(name)
                .cloned()
                .ok_or_else(|| ResolutionError::UnresolvedSupertype {
                    class: class.name.clone(),
                    supertype: name.clone(),
                })
        })
        .collect()
}

/// Concatenate the effective members of `supertypes`, supertype by
/// supertype, each in its own scope order.
///
/// Nothing is deduplicated: a member reachable along two paths appears
/// once per path, and the partitioner and resolver decide what it means.
pub fn aggregate_supertype_members(supertypes: &[Arc<ResolvedClass>]) -> Vec<Arc<Member>> {
    let capacity = supertypes.iter().map(|s| s.scope.len()).sum();
    let mut members = Vec::with_capacity(capacity);
    for supertype in supertypes {
        members.extend(supertype.effective_members().iter().cloned());
    }
    members
}
