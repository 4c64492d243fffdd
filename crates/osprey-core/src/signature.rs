//! Member signatures.
//!
//! A [`Signature`] is an ordered parameter list plus a return type. The
//! override pass never derives compatibility from it directly; it hands
//! signatures to an injected checker. The hashes here are what the default
//! checker compares.

use std::fmt;

use crate::TypeHash;

/// A reference to a type by name, with its precomputed hash.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    /// Qualified type name, kept for diagnostics.
    pub name: String,
    /// Type identity.
    pub type_hash: TypeHash,
}

impl DataType {
    /// Create a data type from its qualified name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self { name, type_hash }
    }

    /// The `Unit` type used for members without a meaningful result.
    pub fn unit() -> Self {
        Self::named("Unit")
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered parameter types plus a return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Parameter types in declaration order.
    pub params: Vec<DataType>,
    /// Return type (the property type for properties).
    pub return_type: DataType,
}

impl Signature {
    /// Create a signature.
    pub fn new(params: Vec<DataType>, return_type: DataType) -> Self {
        Self {
            params,
            return_type,
        }
    }

    /// A parameterless signature, as used by properties and getters.
    pub fn returning(return_type: DataType) -> Self {
        Self::new(Vec::new(), return_type)
    }

    /// Parameter type hashes in order.
    pub fn param_hashes(&self) -> Vec<TypeHash> {
        self.params.iter().map(|p| p.type_hash).collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "): {}", self.return_type)
    }
}
