//! ClassRegistry - declarations in, resolved classes out.
//!
//! # Storage Model
//!
//! - **Declarations**: every registered [`ClassDecl`], keyed by `TypeHash`,
//!   plus the registration order so passes iterate deterministically.
//! - **Resolved classes**: `Arc<ResolvedClass>` keyed by `TypeHash`. A
//!   subclass's fake overrides point into its supertypes' scopes, so the
//!   resolved entries are shared rather than copied.
//!
//! # Thread Safety
//!
//! The registry is populated single-threaded. Resolved classes are
//! immutable and `Send + Sync`; once a class is resolved its `Arc` may be
//! handed to other threads freely.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use osprey_core::{ClassDecl, RegistrationError, ResolvedClass, TypeHash};

/// Registry of class declarations and their resolved member sets.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Declarations by identity.
    decls: FxHashMap<TypeHash, ClassDecl>,

    /// Identities in registration order.
    order: Vec<TypeHash>,

    /// Resolved classes by identity.
    resolved: FxHashMap<TypeHash, Arc<ResolvedClass>>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class declaration.
    ///
    /// Returns an error if the declaration is invalid or a class with the
    /// same qualified name already exists.
    pub fn register_class(&mut self, decl: ClassDecl) -> Result<(), RegistrationError> {
        decl.validate()?;

        if self.decls.contains_key(&decl.type_hash) {
            return Err(RegistrationError::DuplicateType(decl.name));
        }

        self.order.push(decl.type_hash);
        self.decls.insert(decl.type_hash, decl);
        Ok(())
    }

    /// Register several declarations, stopping at the first failure.
    pub fn register_all(
        &mut self,
        decls: impl IntoIterator<Item = ClassDecl>,
    ) -> Result<(), RegistrationError> {
        for decl in decls {
            self.register_class(decl)?;
        }
        Ok(())
    }

    /// Store a resolved class.
    ///
    /// The class must have been registered, and may only be resolved once.
    pub fn insert_resolved(&mut self, class: ResolvedClass) -> Result<Arc<ResolvedClass>, RegistrationError> {
        if !self.decls.contains_key(&class.type_hash) {
            return Err(RegistrationError::TypeNotFound(class.name));
        }
        if self.resolved.contains_key(&class.type_hash) {
            return Err(RegistrationError::DuplicateType(class.name));
        }

        let class = Arc::new(class);
        self.resolved.insert(class.type_hash, Arc::clone(&class));
        Ok(class)
    }

    // ==========================================================================
    // Declaration Lookup
    // ==========================================================================

    /// Get a declaration by identity.
    pub fn get(&self, hash: TypeHash) -> Option<&ClassDecl> {
        self.decls.get(&hash)
    }

    /// Get a declaration by qualified name.
    pub fn get_by_name(&self, name: &str) -> Option<&ClassDecl> {
        self.get(TypeHash::from_name(name))
    }

    /// Check if a class is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.decls.contains_key(&hash)
    }

    /// Iterate over declarations in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.order.iter().filter_map(|hash| self.decls.get(hash))
    }

    /// Class identities in registration order.
    pub fn class_hashes(&self) -> &[TypeHash] {
        &self.order
    }

    /// Number of registered classes.
    pub fn class_count(&self) -> usize {
        self.order.len()
    }

    // ==========================================================================
    // Resolved Lookup
    // ==========================================================================

    /// Get a resolved class by identity.
    pub fn resolved(&self, hash: TypeHash) -> Option<&Arc<ResolvedClass>> {
        self.resolved.get(&hash)
    }

    /// Get a resolved class by qualified name.
    pub fn resolved_by_name(&self, name: &str) -> Option<&Arc<ResolvedClass>> {
        self.resolved(TypeHash::from_name(name))
    }

    /// Check if a class has been resolved.
    pub fn is_resolved(&self, hash: TypeHash) -> bool {
        self.resolved.contains_key(&hash)
    }

    /// Number of resolved classes.
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    // ==========================================================================
    // Inheritance Helpers
    // ==========================================================================

    /// Every registered transitive supertype of a class, nearest first.
    ///
    /// Each ancestor appears once even when reachable through several
    /// paths. Unregistered supertypes are skipped.
    pub fn all_supertypes(&self, hash: TypeHash) -> Vec<TypeHash> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        let mut frontier = vec![hash];

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for current in frontier {
                let Some(decl) = self.decls.get(&current) else {
                    continue;
                };
                for supertype in decl.supertype_hashes() {
                    if self.decls.contains_key(&supertype) && seen.insert(supertype) {
                        result.push(supertype);
                        next.push(supertype);
                    }
                }
            }
            frontier = next;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osprey_core::{DataType, Modality, Signature};

    fn f_sig() -> Signature {
        Signature::returning(DataType::unit())
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.class_count(), 0);
        assert_eq!(registry.resolved_count(), 0);
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ClassRegistry::new();
        registry
            .register_class(ClassDecl::class("Base").with_function("f", f_sig(), Modality::Open))
            .unwrap();

        let decl = registry.get_by_name("Base").unwrap();
        assert_eq!(decl.members.len(), 1);
        assert!(registry.contains(TypeHash::from_name("Base")));
        assert!(registry.get_by_name("Missing").is_none());
    }

    #[test]
    fn register_duplicate_fails() {
        let mut registry = ClassRegistry::new();
        registry.register_class(ClassDecl::class("Base")).unwrap();

        let result = registry.register_class(ClassDecl::class("Base"));
        assert_eq!(result, Err(RegistrationError::DuplicateType("Base".to_string())));
    }

    #[test]
    fn register_invalid_declaration_fails() {
        let mut registry = ClassRegistry::new();
        let decl = ClassDecl::class("Base")
            .with_function("f", f_sig(), Modality::Open)
            .with_function("f", f_sig(), Modality::Final);

        assert!(matches!(
            registry.register_class(decl),
            Err(RegistrationError::DuplicateMember { .. })
        ));
        assert_eq!(registry.class_count(), 0);
    }

    #[test]
    fn classes_iterate_in_registration_order() {
        let mut registry = ClassRegistry::new();
        registry
            .register_all(["Zeta", "Alpha", "Mid"].map(|name| ClassDecl::class(name)))
            .unwrap();

        let names: Vec<&str> = registry.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn insert_resolved_requires_registration() {
        let mut registry = ClassRegistry::new();
        let decl = ClassDecl::class("Base");
        let resolved = ResolvedClass::new(&decl, Vec::new());

        assert!(matches!(
            registry.insert_resolved(resolved.clone()),
            Err(RegistrationError::TypeNotFound(_))
        ));

        registry.register_class(decl).unwrap();
        let shared = registry.insert_resolved(resolved.clone()).unwrap();
        assert!(Arc::ptr_eq(&shared, registry.resolved_by_name("Base").unwrap()));
        assert!(matches!(
            registry.insert_resolved(resolved),
            Err(RegistrationError::DuplicateType(_))
        ));
    }

    #[test]
    fn all_supertypes_visits_diamond_once() {
        let mut registry = ClassRegistry::new();
        registry
            .register_all([
                ClassDecl::class("B"),
                ClassDecl::class("C1").with_supertype("B"),
                ClassDecl::class("C2").with_supertype("B"),
                ClassDecl::class("D").with_supertype("C1").with_supertype("C2"),
            ])
            .unwrap();

        let ancestors = registry.all_supertypes(TypeHash::from_name("D"));
        assert_eq!(
            ancestors,
            vec![
                TypeHash::from_name("C1"),
                TypeHash::from_name("C2"),
                TypeHash::from_name("B"),
            ]
        );
    }
}
