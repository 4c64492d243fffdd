//! Read-only view of a class's effective member set.
//!
//! [`SynthesizedMemberScope`] is how later lowering stages see a class:
//! declared members first, in declaration order, followed by the fake
//! overrides produced by the override pass. Dispatch-table construction and
//! call-site binding go through this scope so that inherited members are
//! indistinguishable from declared ones.
//!
//! The scope is deliberately narrow. It answers name and kind filtered
//! queries over the list it holds and nothing else. Classifier lookups
//! (including a query whose kind filter asks only for classifiers) and the
//! eager per-name symbol-table queries return
//! [`ResolutionError::UnsupportedOperation`] instead of an empty result.

use std::fmt;
use std::sync::Arc;

use crate::{Member, MemberKindFilter, ResolutionError, TypeHash};

/// Declared members plus fake overrides of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedMemberScope {
    class_name: String,
    members: Vec<Arc<Member>>,
    declared_count: usize,
}

impl SynthesizedMemberScope {
    /// Create a scope over `declared` followed by `fake_overrides`.
    pub fn new(
        class_name: impl Into<String>,
        declared: Vec<Arc<Member>>,
        fake_overrides: Vec<Arc<Member>>,
    ) -> Self {
        let declared_count = declared.len();
        let mut members = declared;
        members.extend(fake_overrides);
        Self {
            class_name: class_name.into(),
            members,
            declared_count,
        }
    }

    /// Name of the owning class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Every member in scope order.
    pub fn members(&self) -> &[Arc<Member>] {
        &self.members
    }

    /// Members declared by the class itself.
    pub fn declared_members(&self) -> &[Arc<Member>] {
        &self.members[..self.declared_count]
    }

    /// Members synthesized by the override pass.
    pub fn fake_overrides(&self) -> &[Arc<Member>] {
        &self.members[self.declared_count..]
    }

    /// Total number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the scope has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members named exactly `name` that pass `kinds` and `predicate`.
    ///
    /// A filter asking only for classifiers is rejected with
    /// [`ResolutionError::UnsupportedOperation`]. When the filter mixes
    /// classifiers with callables, the classifier bit is ignored.
    pub fn lookup<P>(
        &self,
        name: &str,
        kinds: MemberKindFilter,
        predicate: P,
    ) -> Result<Vec<&Arc<Member>>, ResolutionError>
    where
        P: Fn(&Member) -> bool,
    {
        self.check_kinds(kinds)?;
        Ok(self
            .members
            .iter()
            .filter(|m| {
                let member: &Member = m;
                member.name == name && kinds.accepts(member.kind) && predicate(member)
            })
            .collect())
    }

    /// All members passing `kinds` whose name passes `name_filter`.
    ///
    /// Classifier-only filters are rejected as in [`lookup`](Self::lookup).
    pub fn contributed_members<F>(
        &self,
        kinds: MemberKindFilter,
        name_filter: F,
    ) -> Result<Vec<&Arc<Member>>, ResolutionError>
    where
        F: Fn(&str) -> bool,
    {
        self.check_kinds(kinds)?;
        Ok(self
            .members
            .iter()
            .filter(|m| kinds.accepts(m.kind) && name_filter(m.name.as_str()))
            .collect())
    }

    /// Check whether a member with this owner-qualified identity is in scope.
    pub fn contains(&self, member_hash: TypeHash) -> bool {
        self.members.iter().any(|m| m.member_hash() == member_hash)
    }

    /// Nested classifier lookup. Not available on a synthesized scope.
    pub fn contributed_classifier(&self, _name: &str) -> Result<TypeHash, ResolutionError> {
        Err(self.unsupported("classifier lookup"))
    }

    /// Eager function lookup. Not available on a synthesized scope; use
    /// [`lookup`](Self::lookup) with [`MemberKindFilter::FUNCTIONS`].
    pub fn contributed_functions(&self, _name: &str) -> Result<Vec<Arc<Member>>, ResolutionError> {
        Err(self.unsupported("function lookup"))
    }

    /// Eager property lookup. Not available on a synthesized scope; use
    /// [`lookup`](Self::lookup) with [`MemberKindFilter::PROPERTIES`].
    pub fn contributed_variables(&self, _name: &str) -> Result<Vec<Arc<Member>>, ResolutionError> {
        Err(self.unsupported("variable lookup"))
    }

    fn check_kinds(&self, kinds: MemberKindFilter) -> Result<(), ResolutionError> {
        if kinds.contains(MemberKindFilter::CLASSIFIERS) && !kinds.intersects(MemberKindFilter::CALLABLES) {
            return Err(self.unsupported("classifier lookup"));
        }
        Ok(())
    }

    fn unsupported(&self, operation: &'static str) -> ResolutionError {
        ResolutionError::UnsupportedOperation {
            operation,
            scope: self.class_name.clone(),
        }
    }
}

impl fmt::Display for SynthesizedMemberScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scope {} {{", self.class_name)?;
        for member in &self.members {
            write!(f, "    {} {} {}", member.modality, member.kind, member)?;
            if member.is_fake_override() {
                f.write_str(" <fake override of")?;
                for (i, base) in member.overridden().iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{}", base.owner_name)?;
                }
                f.write_str(">")?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, MemberKind, Modality, Signature};

    fn declared(owner: &str, kind: MemberKind, name: &str) -> Arc<Member> {
        Arc::new(Member::declared(
            owner,
            kind,
            name,
            Signature::returning(DataType::named("Int")),
            Modality::Open,
        ))
    }

    fn sample_scope() -> SynthesizedMemberScope {
        let base_g = declared("Base", MemberKind::Function, "g");
        let fake_g = Arc::new(Member::fake_override(
            TypeHash::from_name("Derived"),
            "Derived",
            &base_g,
            vec![base_g.clone()],
        ));
        SynthesizedMemberScope::new(
            "Derived",
            vec![
                declared("Derived", MemberKind::Function, "f"),
                declared("Derived", MemberKind::Property, "size"),
            ],
            vec![fake_g],
        )
    }

    #[test]
    fn declared_members_come_first() {
        let scope = sample_scope();
        assert_eq!(scope.len(), 3);
        assert_eq!(scope.declared_members().len(), 2);
        assert_eq!(scope.fake_overrides().len(), 1);
        assert_eq!(scope.fake_overrides()[0].name, "g");
        assert!(!scope.is_empty());
    }

    #[test]
    fn lookup_filters_by_name_kind_and_predicate() {
        let scope = sample_scope();

        let found = |name, kinds, predicate: fn(&Member) -> bool| {
            scope.lookup(name, kinds, predicate).unwrap().len()
        };
        assert_eq!(found("f", MemberKindFilter::CALLABLES, |_| true), 1);
        assert_eq!(found("f", MemberKindFilter::PROPERTIES, |_| true), 0);
        assert_eq!(found("g", MemberKindFilter::FUNCTIONS, |m| m.is_fake_override()), 1);
        assert_eq!(found("g", MemberKindFilter::FUNCTIONS, |m| m.is_abstract()), 0);
        assert_eq!(found("missing", MemberKindFilter::all(), |_| true), 0);
    }

    #[test]
    fn contributed_members_filters_names() {
        let scope = sample_scope();

        let functions = scope
            .contributed_members(MemberKindFilter::FUNCTIONS, |_| true)
            .unwrap();
        let names: Vec<&str> = functions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["f", "g"]);

        let sized = scope
            .contributed_members(MemberKindFilter::all(), |n| n.starts_with('s'))
            .unwrap();
        assert_eq!(sized.len(), 1);
        assert_eq!(sized[0].kind, MemberKind::Property);
    }

    #[test]
    fn classifier_only_filter_is_unsupported() {
        let scope = sample_scope();

        let by_name = scope.lookup("f", MemberKindFilter::CLASSIFIERS, |_| true);
        let by_filter = scope.contributed_members(MemberKindFilter::CLASSIFIERS, |_| true);
        for err in [by_name.unwrap_err(), by_filter.unwrap_err()] {
            assert!(matches!(
                err,
                ResolutionError::UnsupportedOperation { operation: "classifier lookup", .. }
            ));
        }

        let mixed = MemberKindFilter::CLASSIFIERS | MemberKindFilter::FUNCTIONS;
        assert_eq!(scope.lookup("f", mixed, |_| true).unwrap().len(), 1);
    }

    #[test]
    fn contains_uses_member_identity() {
        let scope = sample_scope();
        let f = &scope.declared_members()[0];
        assert!(scope.contains(f.member_hash()));

        let elsewhere = declared("Other", MemberKind::Function, "f");
        assert!(!scope.contains(elsewhere.member_hash()));
    }

    #[test]
    fn eager_lookups_are_unsupported() {
        let scope = sample_scope();

        for err in [
            scope.contributed_classifier("Nested").unwrap_err(),
            scope.contributed_functions("f").unwrap_err(),
            scope.contributed_variables("size").unwrap_err(),
        ] {
            assert!(matches!(
                err,
                ResolutionError::UnsupportedOperation { ref scope, .. } if scope == "Derived"
            ));
        }
    }

    #[test]
    fn display_marks_fake_overrides() {
        let text = sample_scope().to_string();
        assert!(text.starts_with("scope Derived {"));
        assert!(text.contains("open fun Derived::f(): Int\n"));
        assert!(text.contains("open fun Derived::g(): Int <fake override of Base>"));
        assert!(text.ends_with('}'));
    }
}
