//! Deterministic hash-based identity for classes and members.
//!
//! [`TypeHash`] is a 64-bit XXHash64 value computed from names and
//! signatures. The same input always produces the same hash, so class and
//! member identities are stable across compilations of the same source and
//! can be computed before the entity they name has been registered.
//!
//! Domain constants keep the different families apart: a class named `f`
//! and a member named `f` never share a hash.
//!
//! # Examples
//!
//! ```
//! use osprey_core::TypeHash;
//!
//! let int = TypeHash::from_name("Int");
//! assert_eq!(int, TypeHash::from_name("Int"));
//!
//! let owner = TypeHash::from_name("Base");
//! let f_int = TypeHash::from_member(owner, 0, "f", &[int]);
//! let f_str = TypeHash::from_member(owner, 0, "f", &[TypeHash::from_name("String")]);
//! assert_ne!(f_int, f_str);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant mixed between parameter positions.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for class and type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for owner-qualified member hashes.
    pub const MEMBER: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for owner-independent signature hashes.
    pub const SIGNATURE: u64 = 0x5ea77ffbcdf5f302;

    /// Parameter position mixing constants.
    ///
    /// Each position gets its own constant so `(Int, String)` and
    /// `(String, Int)` hash differently.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x0f1e2d3c4b5a6978,
    ];
}

/// A deterministic 64-bit hash identifying a class, type, or member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a hash from a qualified type or class name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a member hash from its owner, kind, name, and parameter types.
    ///
    /// Two members with the same name and parameters in different classes
    /// get different hashes; this is the identity used for back-references.
    /// `kind_tag` keeps a function and a property of one class apart.
    #[inline]
    pub fn from_member(
        owner: TypeHash,
        kind_tag: u8,
        name: &str,
        param_hashes: &[TypeHash],
    ) -> Self {
        let seed = hash_constants::MEMBER
            ^ owner.0
            ^ xxh64(name.as_bytes(), 0)
            ^ u64::from(kind_tag) << 56;
        TypeHash(mix_params(seed, param_hashes))
    }

    /// Create an owner-independent signature hash.
    ///
    /// Used for override matching: a subclass member and the base member it
    /// overrides share a signature hash even though their owners differ.
    /// `kind_tag` separates member kinds that share a name.
    #[inline]
    pub fn from_signature(kind_tag: u8, name: &str, param_hashes: &[TypeHash]) -> Self {
        let seed =
            hash_constants::SIGNATURE ^ xxh64(name.as_bytes(), 0) ^ u64::from(kind_tag) << 56;
        TypeHash(mix_params(seed, param_hashes))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

#[inline]
fn mix_params(mut hash: u64, param_hashes: &[TypeHash]) -> u64 {
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps parameter order significant
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
