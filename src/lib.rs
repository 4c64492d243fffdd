//! Osprey - override resolution for class hierarchies.
//!
//! Given each class's declared members and its direct supertypes, osprey
//! computes the class's effective member set: the declared members plus one
//! *fake override* for every inherited member the class does not redeclare.
//! Diamond inheritance collapses to a single fake override, and members that
//! cannot coexist are reported as conflicts.
//!
//! ## Example
//!
//! ```
//! use osprey::{ClassDecl, DataType, Modality, Signature};
//!
//! let f = Signature::returning(DataType::unit());
//! let registry = osprey::resolve_classes([
//!     ClassDecl::interface("B").with_function("f", f, Modality::Abstract),
//!     ClassDecl::interface("C1").with_supertype("B"),
//!     ClassDecl::interface("C2").with_supertype("B"),
//!     ClassDecl::class("D").with_supertype("C1").with_supertype("C2"),
//! ])?;
//!
//! let d = registry.resolved_by_name("D").unwrap();
//! assert_eq!(d.scope.fake_overrides().len(), 1);
//! # Ok::<(), osprey::OspreyError>(())
//! ```
//!
//! ## Crates
//!
//! - `osprey-core`: members, classes, scopes and errors
//! - `osprey-registry`: [`ClassRegistry`]
//! - `osprey-compiler`: the override-resolution stages and [`ClassCompletionPass`]

pub mod tracing_config;

use tracing::debug;

pub use osprey_compiler::{
    ClassCompletionPass, CompletionConfig, CompletionOutput, GroupOutcome, NameGroup,
    OverrideChecker, OverrideResolver, SignatureChecker, aggregate_supertype_members,
    collect_supertypes, partition_by_name,
};
pub use osprey_core::{
    ClassDecl, ClassKind, CompilationError, DataType, Member, MemberKind, MemberKindFilter,
    MemberOrigin, Modality, OspreyError, RegistrationError, ResolutionError, ResolvedClass,
    Signature, SynthesizedMemberScope, TypeHash,
};
pub use osprey_registry::ClassRegistry;

/// Register `decls` and resolve every class with the structural
/// [`SignatureChecker`].
///
/// Returns the first error encountered; use [`ClassCompletionPass`]
/// directly to collect all of them.
pub fn resolve_classes(
    decls: impl IntoIterator<Item = ClassDecl>,
) -> Result<ClassRegistry, OspreyError> {
    resolve_classes_with(decls, &SignatureChecker)
}

/// Register `decls` and resolve every class with `checker`.
pub fn resolve_classes_with<C>(
    decls: impl IntoIterator<Item = ClassDecl>,
    checker: &C,
) -> Result<ClassRegistry, OspreyError>
where
    C: OverrideChecker + ?Sized,
{
    let mut registry = ClassRegistry::new();
    registry.register_all(decls)?;
    debug!(classes = registry.class_count(), "registered classes");

    let output = ClassCompletionPass::new(&mut registry, checker)
        .with_config(CompletionConfig { fail_fast: true })
        .run();

    match output.errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(registry),
    }
}
