//! Name-group partitioning.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use osprey_core::Member;

/// Inherited and declared members sharing one simple name.
#[derive(Debug, Clone, PartialEq)]
pub struct NameGroup {
    /// The shared name.
    pub name: String,
    /// Inherited members, in aggregation order. Never empty.
    pub inherited: Vec<Arc<Member>>,
    /// The class's own members with this name, in declaration order.
    pub declared: Vec<Arc<Member>>,
}

impl NameGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inherited: Vec::new(),
            declared: Vec::new(),
        }
    }
}

/// Group inherited members by simple name.
///
/// Groups appear in the order their name is first seen in `inherited`, and
/// members keep their relative order within a group. Declared members are
/// attached to the group of the same name; a declared name with no
/// inherited counterpart forms no group, since there is nothing to resolve.
pub fn partition_by_name(inherited: Vec<Arc<Member>>, declared: &[Arc<Member>]) -> Vec<NameGroup> {
    let mut groups: IndexMap<String, NameGroup, FxBuildHasher> =
        IndexMap::with_hasher(FxBuildHasher);

    for member in inherited {
        groups
            .entry(member.name.clone())
            .or_insert_with(|| NameGroup::new(&member.name))
            .inherited
            .push(member);
    }

    for member in declared {
        if let Some(group) = groups.get_mut(member.name.as_str()) {
            group.declared.push(Arc::clone(member));
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use osprey_core::{DataType, MemberKind, Modality, Signature};

    fn member(owner: &str, name: &str) -> Arc<Member> {
        Arc::new(Member::declared(
            owner,
            MemberKind::Function,
            name,
            Signature::returning(DataType::unit()),
            Modality::Open,
        ))
    }

    #[test]
    fn groups_follow_first_appearance() {
        let inherited = vec![
            member("A", "g"),
            member("A", "f"),
            member("B", "h"),
            member("B", "f"),
        ];
        let groups = partition_by_name(inherited, &[]);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["g", "f", "h"]);

        let f_owners: Vec<&str> = groups[1]
            .inherited
            .iter()
            .map(|m| m.owner_name.as_str())
            .collect();
        assert_eq!(f_owners, vec!["A", "B"]);
    }

    #[test]
    fn declared_members_join_matching_groups() {
        let groups = partition_by_name(
            vec![member("A", "f"), member("A", "g")],
            &[member("C", "g"), member("C", "own")],
        );

        assert_eq!(groups.len(), 2);
        assert!(groups[0].declared.is_empty());
        assert_eq!(groups[1].declared.len(), 1);
        assert_eq!(groups[1].declared[0].owner_name, "C");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(partition_by_name(Vec::new(), &[member("C", "f")]).is_empty());
    }
}
