//! Override resolution for a single class.
//!
//! Resolution runs in three stages:
//!
//! 1. `aggregate`: flatten the effective members of the direct supertypes,
//!    in supertype order, keeping duplicates
//! 2. `partition`: group those members by simple name, in order of first
//!    appearance, attaching the class's own members of the same name
//! 3. `resolution`: per group, drop inherited members the class overrides,
//!    detect conflicts, and synthesize one fake override per slot of
//!    clashing, mutually compatible members
//!
//! Whether one member overrides another is decided by an injected
//! [`OverrideChecker`]; the stages never compare signatures themselves.

mod aggregate;
mod checker;
mod partition;
mod resolution;

pub use aggregate::{aggregate_supertype_members, collect_supertypes};
pub use checker::{OverrideChecker, SignatureChecker};
pub use partition::{NameGroup, partition_by_name};
pub use resolution::{GroupOutcome, OverrideResolver};
