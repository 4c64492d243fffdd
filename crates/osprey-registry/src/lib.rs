//! Class registry.
//!
//! Holds the class declarations handed over by the front end and the
//! resolved classes produced by the override pass.

mod registry;

pub use registry::ClassRegistry;
