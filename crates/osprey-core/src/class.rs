//! Class declarations and resolved classes.
//!
//! A [`ClassDecl`] is what the front end hands over: a name, the ordered
//! direct supertypes, and the members declared in the class body. Once the
//! override pass has run, the class becomes a [`ResolvedClass`] owning its
//! [`SynthesizedMemberScope`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::{
    Member, MemberKind, Modality, RegistrationError, Signature, SynthesizedMemberScope, TypeHash,
};

/// Class or interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Class => write!(f, "class"),
            ClassKind::Interface => write!(f, "interface"),
        }
    }
}

/// A class as declared by the front end.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Qualified name.
    pub name: String,
    /// Identity, computed from the name.
    pub type_hash: TypeHash,
    /// Class or interface.
    pub kind: ClassKind,
    /// Qualified names of the direct supertypes, in declaration order.
    pub supertypes: Vec<String>,
    /// Members declared in this class, in declaration order.
    pub members: Vec<Arc<Member>>,
}

impl ClassDecl {
    /// Create an empty declaration.
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            kind,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Create an empty class declaration.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    /// Create an empty interface declaration.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    // === Builder Methods ===

    /// Add a direct supertype.
    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    /// Add an already-built member.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(Arc::new(member));
        self
    }

    /// Declare a function owned by this class.
    pub fn with_function(
        self,
        name: impl Into<String>,
        signature: Signature,
        modality: Modality,
    ) -> Self {
        let member = Member::declared(
            self.name.clone(),
            MemberKind::Function,
            name,
            signature,
            modality,
        );
        self.with_member(member)
    }

    /// Declare a property owned by this class.
    pub fn with_property(
        self,
        name: impl Into<String>,
        signature: Signature,
        modality: Modality,
    ) -> Self {
        let member = Member::declared(
            self.name.clone(),
            MemberKind::Property,
            name,
            signature,
            modality,
        );
        self.with_member(member)
    }

    // === Query Methods ===

    /// Supertype identities in declaration order.
    pub fn supertype_hashes(&self) -> Vec<TypeHash> {
        self.supertypes
            .iter()
            .map(|name| TypeHash::from_name(name))
            .collect()
    }

    /// Declared members with the given name.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Member>> {
        self.members.iter().filter(move |m| m.name == name)
    }

    /// Check the declared-member invariants.
    ///
    /// Every member must be an explicit declaration owned by this class, and
    /// no two members may share kind, name and parameter types.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut seen = FxHashSet::default();

        for member in &self.members {
            if member.is_fake_override() {
                return Err(RegistrationError::InvalidDeclaration(format!(
                    "'{member}' in class '{}' is synthetic",
                    self.name
                )));
            }

            if member.owner != self.type_hash {
                return Err(RegistrationError::ForeignMember {
                    class: self.name.clone(),
                    member: member.to_string(),
                });
            }

            if !seen.insert(member.signature_hash()) {
                return Err(RegistrationError::DuplicateMember {
                    class: self.name.clone(),
                    member: member.to_string(),
                });
            }
        }

        if self.supertypes.iter().any(|s| *s == self.name) {
            return Err(RegistrationError::InvalidDeclaration(format!(
                "class '{}' lists itself as a supertype",
                self.name
            )));
        }

        let mut listed = FxHashSet::default();
        if let Some(repeated) = self.supertypes.iter().find(|s| !listed.insert(s.as_str())) {
            return Err(RegistrationError::InvalidDeclaration(format!(
                "class '{}' lists supertype '{repeated}' more than once",
                self.name
            )));
        }

        Ok(())
    }
}

/// A class whose effective member set has been computed.
///
/// Immutable once built. Subclasses hold it through `Arc` and their fake
/// overrides point into its scope, so deep hierarchies share ancestor
/// members instead of copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedClass {
    /// Qualified name.
    pub name: String,
    /// Identity.
    pub type_hash: TypeHash,
    /// Class or interface.
    pub kind: ClassKind,
    /// Direct supertype identities, in declaration order.
    pub supertypes: Vec<TypeHash>,
    /// Declared members plus fake overrides.
    pub scope: SynthesizedMemberScope,
}

impl ResolvedClass {
    /// Build a resolved class from its declaration and synthesized overrides.
    pub fn new(decl: &ClassDecl, fake_overrides: Vec<Arc<Member>>) -> Self {
        Self {
            name: decl.name.clone(),
            type_hash: decl.type_hash,
            kind: decl.kind,
            supertypes: decl.supertype_hashes(),
            scope: SynthesizedMemberScope::new(&decl.name, decl.members.clone(), fake_overrides),
        }
    }

    /// The class's effective members, as exposed to subclasses.
    pub fn effective_members(&self) -> &[Arc<Member>] {
        self.scope.members()
    }
}
