//! Compiler passes.
//!
//! - [`overrides`]: per-class override resolution (aggregate, partition, resolve)
//! - [`completion`]: run override resolution over a whole registry

pub mod completion;
pub mod overrides;

pub use completion::{ClassCompletionPass, CompletionConfig, CompletionOutput};
pub use overrides::{
    GroupOutcome, NameGroup, OverrideChecker, OverrideResolver, SignatureChecker,
    aggregate_supertype_members, collect_supertypes, partition_by_name,
};
