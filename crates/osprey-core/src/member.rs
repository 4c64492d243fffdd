//! Class members and fake overrides.
//!
//! A [`Member`] is either declared in its owning class or synthesized by the
//! override pass as a *fake override*: a per-class copy of an inherited
//! member that the class does not redeclare. Fake overrides keep shared
//! references to every supertype member they stand for so later stages can
//! assign dispatch slots.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashSet;

use crate::{Signature, TypeHash};

/// Kind of a callable class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Function,
    Property,
}

impl MemberKind {
    /// Tag mixed into signature hashes.
    pub fn tag(self) -> u8 {
        match self {
            MemberKind::Function => 0,
            MemberKind::Property => 1,
        }
    }

    /// The single-kind filter accepting this kind.
    pub fn filter(self) -> MemberKindFilter {
        match self {
            MemberKind::Function => MemberKindFilter::FUNCTIONS,
            MemberKind::Property => MemberKindFilter::PROPERTIES,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Function => write!(f, "fun"),
            MemberKind::Property => write!(f, "val"),
        }
    }
}

bitflags! {
    /// Kind filter for scope queries.
    ///
    /// `CLASSIFIERS` exists so callers can ask for nested types; synthesized
    /// member scopes never hold any and reject classifier lookups outright.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberKindFilter: u8 {
        /// Functions.
        const FUNCTIONS = 1 << 0;
        /// Properties.
        const PROPERTIES = 1 << 1;
        /// Nested classes and interfaces.
        const CLASSIFIERS = 1 << 2;
        /// Everything that takes part in override resolution.
        const CALLABLES = Self::FUNCTIONS.bits() | Self::PROPERTIES.bits();
    }
}

impl MemberKindFilter {
    /// Check whether a member kind passes this filter.
    #[inline]
    pub fn accepts(self, kind: MemberKind) -> bool {
        self.contains(kind.filter())
    }
}

/// Member modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modality {
    Abstract,
    #[default]
    Open,
    Final,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Abstract => write!(f, "abstract"),
            Modality::Open => write!(f, "open"),
            Modality::Final => write!(f, "final"),
        }
    }
}

/// Where a member came from.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberOrigin {
    /// Explicitly declared in the owning class.
    Declared,
    /// Synthesized for inherited members the class does not redeclare.
    FakeOverride {
        /// The supertype members this fake override resolves, in
        /// aggregation order. Never empty.
        overridden: Vec<Arc<Member>>,
        /// Declaration roots of `overridden`, computed once at construction.
        roots: Vec<TypeHash>,
    },
}

/// A member of a class's effective member set.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Simple name.
    pub name: String,
    /// Function or property.
    pub kind: MemberKind,
    /// Parameter and return types.
    pub signature: Signature,
    /// Abstract, open or final.
    pub modality: Modality,
    /// Owning class identity.
    pub owner: TypeHash,
    /// Owning class name, for diagnostics.
    pub owner_name: String,
    /// Declared or synthesized.
    pub origin: MemberOrigin,
}

impl Member {
    /// Create a member declared in `owner_name`.
    pub fn declared(
        owner_name: impl Into<String>,
        kind: MemberKind,
        name: impl Into<String>,
        signature: Signature,
        modality: Modality,
    ) -> Self {
        let owner_name = owner_name.into();
        Self {
            name: name.into(),
            kind,
            signature,
            modality,
            owner: TypeHash::from_name(&owner_name),
            owner_name,
            origin: MemberOrigin::Declared,
        }
    }

    /// Create a fake override owned by `owner_name`.
    ///
    /// Name, kind and signature are copied from `representative`; the
    /// modality is abstract only when every overridden member is abstract,
    /// otherwise it follows the first concrete one.
    pub fn fake_override(
        owner: TypeHash,
        owner_name: impl Into<String>,
        representative: &Member,
        overridden: Vec<Arc<Member>>,
    ) -> Self {
        let modality = overridden
            .iter()
            .map(|m| m.modality)
            .find(|m| *m != Modality::Abstract)
            .unwrap_or(Modality::Abstract);

        let mut roots = Vec::new();
        let mut seen = FxHashSet::default();
        for member in &overridden {
            for root in member.declaration_roots() {
                if seen.insert(root) {
                    roots.push(root);
                }
            }
        }

        Self {
            name: representative.name.clone(),
            kind: representative.kind,
            signature: representative.signature.clone(),
            modality,
            owner,
            owner_name: owner_name.into(),
            origin: MemberOrigin::FakeOverride { overridden, roots },
        }
    }

    /// Check if this member was synthesized by the override pass.
    pub fn is_fake_override(&self) -> bool {
        matches!(self.origin, MemberOrigin::FakeOverride { .. })
    }

    /// Check if this member is abstract.
    pub fn is_abstract(&self) -> bool {
        self.modality == Modality::Abstract
    }

    /// Supertype members resolved by this fake override (empty when declared).
    pub fn overridden(&self) -> &[Arc<Member>] {
        match &self.origin {
            MemberOrigin::Declared => &[],
            MemberOrigin::FakeOverride { overridden, .. } => overridden,
        }
    }

    /// Owner-qualified identity: owner, kind, name and parameter types.
    pub fn member_hash(&self) -> TypeHash {
        TypeHash::from_member(
            self.owner,
            self.kind.tag(),
            &self.name,
            &self.signature.param_hashes(),
        )
    }

    /// Owner-independent identity: kind, name and parameter types.
    pub fn signature_hash(&self) -> TypeHash {
        TypeHash::from_signature(self.kind.tag(), &self.name, &self.signature.param_hashes())
    }

    /// Identities of the declared members this member ultimately stands for.
    ///
    /// A declared member is its own root. A fake override's roots are the
    /// roots of everything it overrides, deduplicated in first-seen order,
    /// so two copies of one ancestor member reached through different
    /// branches of a diamond share their roots.
    pub fn declaration_roots(&self) -> Vec<TypeHash> {
        match &self.origin {
            MemberOrigin::Declared => vec![self.member_hash()],
            MemberOrigin::FakeOverride { roots, .. } => roots.clone(),
        }
    }

    /// Check whether two members share at least one declaration root.
    pub fn shares_declaration_with(&self, other: &Member) -> bool {
        let theirs = other.declaration_roots();
        self.declaration_roots()
            .iter()
            .any(|root| theirs.contains(root))
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Function => {
                write!(f, "{}::{}{}", self.owner_name, self.name, self.signature)
            }
            MemberKind::Property => write!(
                f,
                "{}::{}: {}",
                self.owner_name, self.name, self.signature.return_type
            ),
        }
    }
}
