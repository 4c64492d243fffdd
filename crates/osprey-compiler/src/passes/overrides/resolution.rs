//! Override resolution engine.
//!
//! For each [`NameGroup`] the engine answers one question: which inherited
//! members does the class still need a member for, and can they coexist?
//!
//! ## Algorithm
//!
//! 1. Drop every inherited member some declared member overrides
//! 2. A remaining inherited member that clashes with a declared member is a
//!    conflict: the class redeclares the slot without overriding it
//! 3. Any two remaining members that clash without being compatible (no
//!    shared declaration root, neither overrides the other) are a conflict
//! 4. Remaining members that clash and are compatible occupy one slot; the
//!    slots are the connected components of that relation, so they do not
//!    depend on the order the supertypes were listed in
//! 5. Each slot needs a member that shares a root with or overrides every
//!    other member (the most specific one); without one the slot is a conflict
//! 6. Otherwise each slot yields one fake override owned by the class, with
//!    the most specific member's signature
//!
//! ## Example
//!
//! ```text
//! interface B { fun f() }
//! interface C1 : B          -> fake C1::f  <fake override of B>
//! interface C2 : B          -> fake C2::f  <fake override of B>
//! class D : C1, C2          -> fake D::f   <fake override of C1, C2>
//! ```
//!
//! Both copies of `f` reaching `D` share the declaration root `B::f`, so
//! they fall into one slot and `D` gets exactly one fake override.

use std::sync::Arc;

use tracing::trace;

use osprey_core::{ClassDecl, Member, ResolutionError, ResolvedClass};
use osprey_registry::ClassRegistry;

use super::{
    NameGroup, OverrideChecker, aggregate_supertype_members, collect_supertypes,
    partition_by_name,
};

/// Result of resolving one name group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    /// Every inherited member is overridden by a declared member.
    Matched,
    /// Fake overrides to add to the class, one per slot.
    Synthesized(Vec<Member>),
    /// Two members cannot coexist in the class.
    Conflict {
        /// An inherited member.
        first: Arc<Member>,
        /// Another inherited member, or the declared member it clashes with.
        second: Arc<Member>,
    },
}

/// Resolves overrides for one class at a time.
pub struct OverrideResolver<'c, C: ?Sized> {
    checker: &'c C,
}

impl<'c, C> OverrideResolver<'c, C>
where
    C: OverrideChecker + ?Sized,
{
    /// Create a resolver using `checker` for every override decision.
    pub fn new(checker: &'c C) -> Self {
        Self { checker }
    }

    /// Resolve one name group of `class`.
    pub fn resolve_group(&self, class: &ClassDecl, group: &NameGroup) -> GroupOutcome {
        let unmatched: Vec<&Arc<Member>> = group
            .inherited
            .iter()
            .filter(|base| {
                !group
                    .declared
                    .iter()
                    .any(|own| self.checker.overrides(own, base))
            })
            .collect();

        if unmatched.is_empty() {
            return GroupOutcome::Matched;
        }

        for base in &unmatched {
            if let Some(own) = group.declared.iter().find(|own| self.checker.clashes(own, base)) {
                return GroupOutcome::Conflict {
                    first: Arc::clone(base),
                    second: Arc::clone(own),
                };
            }
        }

        for (i, left) in unmatched.iter().enumerate() {
            for right in &unmatched[i + 1..] {
                if self.checker.clashes(left, right) && !self.checker.compatible(left, right) {
                    return GroupOutcome::Conflict {
                        first: Arc::clone(left),
                        second: Arc::clone(right),
                    };
                }
            }
        }

        let mut fakes = Vec::new();
        for slot in self.slots(&unmatched) {
            let members: Vec<Arc<Member>> = slot.iter().map(|&i| Arc::clone(unmatched[i])).collect();

            let Some(representative) = self.most_specific(&members) else {
                let first = Arc::clone(&members[0]);
                let second = members
                    .iter()
                    .skip(1)
                    .find(|other| !self.dominates(&first, other))
                    .map_or_else(|| Arc::clone(&first), Arc::clone);
                return GroupOutcome::Conflict { first, second };
            };

            let representative = Arc::clone(representative);
            fakes.push(Member::fake_override(
                class.type_hash,
                &class.name,
                &representative,
                members,
            ));
        }

        GroupOutcome::Synthesized(fakes)
    }

    /// Partition `members` into slots: connected components of "clashes and
    /// is compatible". Each slot lists member indices in ascending order, and
    /// slots are ordered by their first member.
    fn slots(&self, members: &[&Arc<Member>]) -> Vec<Vec<usize>> {
        let mut slots: Vec<Vec<usize>> = Vec::new();

        for (index, member) in members.iter().enumerate() {
            let mut joined: Option<usize> = None;
            let mut s = 0;
            while s < slots.len() {
                let linked = slots[s]
                    .iter()
                    .any(|&other| self.same_slot(members[other], member));
                match (linked, joined) {
                    (false, _) => s += 1,
                    (true, None) => {
                        slots[s].push(index);
                        joined = Some(s);
                        s += 1;
                    }
                    (true, Some(target)) => {
                        let merged = slots.remove(s);
                        slots[target].extend(merged);
                    }
                }
            }
            if joined.is_none() {
                slots.push(vec![index]);
            }
        }

        for slot in &mut slots {
            slot.sort_unstable();
        }
        slots
    }

    fn same_slot(&self, a: &Member, b: &Member) -> bool {
        self.checker.clashes(a, b) && self.checker.compatible(a, b)
    }

    /// Whether `candidate` can stand for `other` in a fake override.
    fn dominates(&self, candidate: &Member, other: &Member) -> bool {
        candidate.shares_declaration_with(other) || self.checker.overrides(candidate, other)
    }

    /// First member of a slot that dominates every other member.
    fn most_specific<'m>(&self, members: &'m [Arc<Member>]) -> Option<&'m Arc<Member>> {
        members.iter().enumerate().find_map(|(i, candidate)| {
            members
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || self.dominates(candidate, other))
                .then_some(candidate)
        })
    }

    /// Compute the fake overrides of `class` from its resolved supertypes.
    ///
    /// Fake overrides are returned grouped by name, groups in order of first
    /// appearance among the supertype members. The first conflict found
    /// aborts resolution of the class.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compute_overrides(
        &self,
        class: &ClassDecl,
        supertypes: &[Arc<ResolvedClass>],
    ) -> Result<Vec<Arc<Member>>, ResolutionError> {
        let inherited = aggregate_supertype_members(supertypes);
        let groups = partition_by_name(inherited, &class.members);

        let mut fake_overrides = Vec::new();
        for group in &groups {
            let outcome = self.resolve_group(class, group);
            trace!(
                class = %class.name,
                name = %group.name,
                inherited = group.inherited.len(),
                declared = group.declared.len(),
                outcome = outcome.label(),
                "resolved name group"
            );

            match outcome {
                GroupOutcome::Matched => {}
                GroupOutcome::Synthesized(fakes) => {
                    fake_overrides.extend(fakes.into_iter().map(Arc::new));
                }
                GroupOutcome::Conflict { first, second } => {
                    return Err(ResolutionError::OverrideConflict {
                        class: class.name.clone(),
                        name: group.name.clone(),
                        first,
                        second,
                    });
                }
            }
        }

        Ok(fake_overrides)
    }

    /// Resolve `class` against the supertypes already resolved in `registry`.
    ///
    /// The registry is only read; storing the result is up to the caller.
    pub fn resolve(
        &self,
        class: &ClassDecl,
        registry: &ClassRegistry,
    ) -> Result<ResolvedClass, ResolutionError> {
        let supertypes = collect_supertypes(class, registry)?;
        let fake_overrides = self.compute_overrides(class, &supertypes)?;
        Ok(ResolvedClass::new(class, fake_overrides))
    }
}

impl GroupOutcome {
    fn label(&self) -> &'static str {
        match self {
            GroupOutcome::Matched => "matched",
            GroupOutcome::Synthesized(_) => "synthesized",
            GroupOutcome::Conflict { .. } => "conflict",
        }
    }
}
