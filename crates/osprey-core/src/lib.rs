//! Core data model for override resolution.
//!
//! - [`TypeHash`]: deterministic identity for classes, members and signatures
//! - [`DataType`], [`Signature`]: member signatures
//! - [`Member`], [`MemberKind`], [`MemberKindFilter`], [`Modality`],
//!   [`MemberOrigin`]: declared members and fake overrides
//! - [`ClassDecl`], [`ResolvedClass`], [`ClassKind`]: classes before and
//!   after override resolution
//! - [`SynthesizedMemberScope`]: the read-only effective member set
//! - [`error`]: error hierarchy

mod class;
pub mod error;
mod member;
mod scope;
mod signature;
mod type_hash;

pub use class::{ClassDecl, ClassKind, ResolvedClass};
pub use error::{CompilationError, OspreyError, RegistrationError, ResolutionError};
pub use member::{Member, MemberKind, MemberKindFilter, MemberOrigin, Modality};
pub use scope::SynthesizedMemberScope;
pub use signature::{DataType, Signature};
pub use type_hash::{TypeHash, hash_constants};
