//! Class Completion Pass - Resolve the effective member set of every class.
//!
//! This pass runs after registration. For each registered class it computes
//! the fake overrides the class inherits and stores a
//! [`ResolvedClass`](osprey_core::ResolvedClass) in the registry, so later
//! lowering stages can build dispatch tables from a single flat scope per
//! class.
//!
//! ## Algorithm
//!
//! 1. Topologically sort classes by inheritance (supertypes before subtypes)
//! 2. For each class in order:
//!    - Look up the resolved supertypes
//!    - Run override resolution against them
//!    - Store the resolved class
//! 3. Because we process in topological order, every supertype is resolved
//!    (or has failed) before its subtypes are visited
//!
//! A class whose resolution fails is never stored, so each of its subtypes
//! fails in turn with `UnresolvedSupertype`.
//!
//! ## Example
//!
//! ```text
//! interface B { fun f() }
//! class C : B { }
//! class D : C { fun f() }
//!
//! After completion:
//! - B: f() (declared)
//! - C: f() (fake override of B::f)
//! - D: f() (declared, overrides C::f)
//! ```

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use osprey_core::{CompilationError, TypeHash};
use osprey_registry::ClassRegistry;

use super::overrides::{OverrideChecker, OverrideResolver};

/// Options for the class completion pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionConfig {
    /// Stop at the first failing class instead of collecting every error.
    pub fail_fast: bool,
}

/// Output of the class completion pass.
#[derive(Debug, Default)]
pub struct CompletionOutput {
    /// Number of classes resolved.
    pub classes_completed: usize,
    /// Number of fake overrides synthesized across all classes.
    pub fake_overrides_synthesized: usize,
    /// Collected errors.
    pub errors: Vec<CompilationError>,
}

impl CompletionOutput {
    /// Check if every class was resolved.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Class Completion Pass - resolves overrides for every registered class.
pub struct ClassCompletionPass<'reg, C: ?Sized> {
    registry: &'reg mut ClassRegistry,
    resolver: OverrideResolver<'reg, C>,
    config: CompletionConfig,
}

impl<'reg, C> ClassCompletionPass<'reg, C>
where
    C: OverrideChecker + ?Sized,
{
    /// Create a new class completion pass.
    pub fn new(registry: &'reg mut ClassRegistry, checker: &'reg C) -> Self {
        Self {
            registry,
            resolver: OverrideResolver::new(checker),
            config: CompletionConfig::default(),
        }
    }

    /// Replace the pass configuration.
    pub fn with_config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the class completion pass.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self) -> CompletionOutput {
        let mut output = CompletionOutput::default();

        // Classes resolved by an earlier run are left alone
        let pending: Vec<TypeHash> = self
            .registry
            .class_hashes()
            .iter()
            .copied()
            .filter(|hash| !self.registry.is_resolved(*hash))
            .collect();

        // Topologically sort classes (supertypes before subtypes)
        let ordered = match self.topological_sort(&pending) {
            Ok(ordered) => ordered,
            Err(e) => {
                warn!(error = %e, "class completion aborted");
                output.errors.push(e);
                return output;
            }
        };

        // Process each class in order
        for class_hash in ordered {
            match self.complete_class(class_hash) {
                Ok(synthesized) => {
                    output.classes_completed += 1;
                    output.fake_overrides_synthesized += synthesized;
                }
                Err(e) => {
                    warn!(error = %e, "class resolution failed");
                    output.errors.push(e);
                    if self.config.fail_fast {
                        break;
                    }
                }
            }
        }

        debug!(
            classes = output.classes_completed,
            fake_overrides = output.fake_overrides_synthesized,
            errors = output.errors.len(),
            "class completion finished"
        );

        output
    }

    /// Resolve a single class and store it. Returns the number of fake
    /// overrides synthesized.
    fn complete_class(&mut self, class_hash: TypeHash) -> Result<usize, CompilationError> {
        // Phase 1: Resolve against the registry (immutable borrow)
        let resolved = {
            let class = self
                .registry
                .get(class_hash)
                .ok_or_else(|| CompilationError::UnknownType {
                    name: class_hash.to_string(),
                })?;

            self.resolver.resolve(class, &*self.registry)?
        }; // immutable borrow ends here

        // Phase 2: Store the result (mutable borrow)
        let synthesized = resolved.scope.fake_overrides().len();
        let resolved = self.registry.insert_resolved(resolved)?;

        debug!(
            class = %resolved.name,
            declared = resolved.scope.declared_members().len(),
            fake_overrides = synthesized,
            "resolved class"
        );

        Ok(synthesized)
    }

    /// Topologically sort classes by inheritance (supertypes before subtypes).
    ///
    /// Returns error if circular inheritance is detected.
    fn topological_sort(&self, classes: &[TypeHash]) -> Result<Vec<TypeHash>, CompilationError> {
        let mut visited = FxHashSet::default();
        let mut stack = Vec::new();
        let mut in_progress = FxHashSet::default();

        for &class_hash in classes {
            if !visited.contains(&class_hash) {
                self.visit(
                    class_hash,
                    classes,
                    &mut visited,
                    &mut in_progress,
                    &mut stack,
                )?;
            }
        }

        Ok(stack)
    }

    /// DFS visit for topological sort with cycle detection.
    fn visit(
        &self,
        class_hash: TypeHash,
        all_classes: &[TypeHash],
        visited: &mut FxHashSet<TypeHash>,
        in_progress: &mut FxHashSet<TypeHash>,
        stack: &mut Vec<TypeHash>,
    ) -> Result<(), CompilationError> {
        let class = self
            .registry
            .get(class_hash)
            .ok_or_else(|| CompilationError::UnknownType {
                name: class_hash.to_string(),
            })?;

        // Cycle detection
        if in_progress.contains(&class_hash) {
            return Err(CompilationError::CircularInheritance {
                name: class.name.clone(),
            });
        }

        if visited.contains(&class_hash) {
            return Ok(());
        }

        in_progress.insert(class_hash);

        // Visit supertypes first, in declaration order. Anything outside the
        // pending set is either already resolved or missing; the latter is
        // reported when the class itself is resolved.
        for supertype in class.supertype_hashes() {
            if all_classes.contains(&supertype) {
                self.visit(supertype, all_classes, visited, in_progress, stack)?;
            }
        }

        in_progress.remove(&class_hash);
        visited.insert(class_hash);
        stack.push(class_hash);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::overrides::SignatureChecker;
    use osprey_core::{ClassDecl, DataType, Member, Modality, ResolutionError, Signature};

    fn unit() -> Signature {
        Signature::returning(DataType::unit())
    }

    fn abstract_f(owner: &str, ret: &str) -> ClassDecl {
        ClassDecl::interface(owner).with_function(
            "f",
            Signature::returning(DataType::named(ret)),
            Modality::Abstract,
        )
    }

    fn registry_with(decls: Vec<ClassDecl>) -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.register_all(decls).unwrap();
        registry
    }

    #[test]
    fn complete_simple_inheritance() {
        let mut registry = registry_with(vec![
            ClassDecl::class("Base").with_function("foo", unit(), Modality::Open),
            ClassDecl::class("Derived")
                .with_supertype("Base")
                .with_function("qux", unit(), Modality::Open),
        ]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert!(output.is_success(), "errors: {:?}", output.errors);
        assert_eq!(output.classes_completed, 2);
        assert_eq!(output.fake_overrides_synthesized, 1);

        let derived = registry.resolved_by_name("Derived").unwrap();
        let names: Vec<&str> = derived
            .effective_members()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["qux", "foo"]);
        assert!(derived.scope.fake_overrides()[0].is_fake_override());
    }

    #[test]
    fn subtypes_registered_first_are_resolved_after_supertypes() {
        let mut registry = registry_with(vec![
            ClassDecl::class("Leaf").with_supertype("Mid"),
            ClassDecl::class("Mid").with_supertype("Root"),
            ClassDecl::class("Root").with_function("f", unit(), Modality::Abstract),
        ]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert!(output.is_success(), "errors: {:?}", output.errors);
        let leaf = registry.resolved_by_name("Leaf").unwrap();
        let f = &leaf.scope.fake_overrides()[0];
        assert_eq!(f.overridden()[0].owner_name, "Mid");
        let root_f = &registry.resolved_by_name("Root").unwrap().scope.members()[0];
        assert_eq!(f.declaration_roots(), root_f.declaration_roots());
    }

    #[test]
    fn circular_inheritance_detected() {
        let mut registry = registry_with(vec![
            ClassDecl::class("A").with_supertype("B"),
            ClassDecl::class("B").with_supertype("A"),
        ]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert_eq!(output.classes_completed, 0);
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(
            output.errors[0],
            CompilationError::CircularInheritance { .. }
        ));
        assert_eq!(registry.resolved_count(), 0);
    }

    #[test]
    fn missing_supertype_is_unresolved() {
        let mut registry = registry_with(vec![ClassDecl::class("Orphan").with_supertype("Ghost")]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert_eq!(
            output.errors,
            vec![CompilationError::Resolution(ResolutionError::UnresolvedSupertype {
                class: "Orphan".to_string(),
                supertype: "Ghost".to_string(),
            })]
        );
    }

    #[test]
    fn failure_propagates_to_subtypes() {
        let mut registry = registry_with(vec![
            abstract_f("C1", "Int"),
            abstract_f("C2", "String"),
            ClassDecl::class("D").with_supertype("C1").with_supertype("C2"),
            ClassDecl::class("E").with_supertype("D"),
            ClassDecl::class("Unrelated").with_supertype("C1"),
        ]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert_eq!(output.classes_completed, 3);
        assert_eq!(output.errors.len(), 2);
        assert!(matches!(
            &output.errors[0],
            CompilationError::Resolution(e) if e.is_conflict() && e.class_name() == "D"
        ));
        assert!(matches!(
            &output.errors[1],
            CompilationError::Resolution(ResolutionError::UnresolvedSupertype { class, supertype })
                if class == "E" && supertype == "D"
        ));
        assert!(registry.resolved_by_name("Unrelated").is_some());
    }

    #[test]
    fn fail_fast_stops_at_first_error() {
        let mut registry = registry_with(vec![
            ClassDecl::class("First").with_supertype("Ghost"),
            ClassDecl::class("Second").with_supertype("Ghost"),
        ]);

        let output = ClassCompletionPass::new(&mut registry, &SignatureChecker)
            .with_config(CompletionConfig { fail_fast: true })
            .run();

        assert_eq!(output.errors.len(), 1);
        assert!(!output.is_success());
    }

    #[test]
    fn second_run_only_resolves_new_classes() {
        let mut registry =
            registry_with(vec![ClassDecl::class("Base").with_function("f", unit(), Modality::Open)]);
        let first = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();
        assert_eq!(first.classes_completed, 1);

        registry
            .register_class(ClassDecl::class("Derived").with_supertype("Base"))
            .unwrap();
        let second = ClassCompletionPass::new(&mut registry, &SignatureChecker).run();

        assert!(second.is_success(), "errors: {:?}", second.errors);
        assert_eq!(second.classes_completed, 1);
        assert_eq!(registry.resolved_count(), 2);
    }

    #[test]
    fn closure_checker_drives_the_pass() {
        let mut registry = registry_with(vec![
            abstract_f("C1", "Int"),
            abstract_f("C2", "String"),
            ClassDecl::class("D").with_supertype("C1").with_supertype("C2"),
        ]);

        let same_name = |candidate: &Member, base: &Member| candidate.name == base.name;
        let output = ClassCompletionPass::new(&mut registry, &same_name).run();

        assert!(output.is_success(), "errors: {:?}", output.errors);
        let d = registry.resolved_by_name("D").unwrap();
        assert_eq!(d.scope.fake_overrides().len(), 1);
        assert_eq!(d.scope.fake_overrides()[0].overridden().len(), 2);
    }
}
