//! Resolution of type variables through class hierarchies.
//!
//! A [`ClassResolver`] views the members of a class and of its ancestors from the class itself.
//! When a class extends a parameterized type, e.g., `class Sub extends Base<String>`, the type
//! variables declared by `Base` are bound to the type arguments written in `Sub`. Bindings compose
//! along the whole path to the ancestor, so a type variable of any ancestor can be expressed in
//! terms of the class being resolved.
//!
//! The signatures of the ancestors are fetched through a [`SignatureLookup`]. An ancestor that
//! cannot be found is assumed to directly extend `java.lang.Object`.
//!
//! ```
//! use std::collections::HashMap;
//! use cortado::analysis::generics::ClassResolver;
//! use cortado::types::signatures::{ClassSignature, FieldSignature};
//!
//! let base: ClassSignature = "<X:Ljava/lang/Object;>Ljava/lang/Object;".parse().unwrap();
//! let sub: ClassSignature = "Lpkg/Base<Ljava/lang/String;>;".parse().unwrap();
//! let lookup = HashMap::from([("pkg/Base".to_owned(), base)]);
//!
//! let resolver = ClassResolver::new("pkg/Sub", sub, lookup);
//! let field: FieldSignature = "TX;".parse().unwrap();
//! let resolved = resolver.field("pkg/Base", field).resolve_field().unwrap();
//! assert_eq!(resolved.to_string(), "Ljava/lang/String;");
//! ```

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    hash::BuildHasher,
    rc::Rc,
    sync::Arc,
};

use crate::types::signatures::{
    ClassSignature, ClassTypeSignature, FieldSignature, JavaTypeSignature, MethodSignature,
    OBJECT_BINARY_NAME, ReferenceTypeSignature, TypeArgument, TypeParameter,
    TypeVariableSignature,
};

mod field;
mod method;
mod substitution;

pub use field::FieldResolver;
pub use method::MethodResolver;
pub use substitution::Substitution;

/// A source of class signatures, indexed by binary name.
pub trait SignatureLookup {
    /// Returns the generic signature of the class named `binary_name`, or [`None`] if the
    /// class is unknown.
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature>;
}

impl<L: SignatureLookup + ?Sized> SignatureLookup for &L {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        (**self).class_signature(binary_name)
    }
}

impl<L: SignatureLookup + ?Sized> SignatureLookup for Box<L> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        (**self).class_signature(binary_name)
    }
}

impl<L: SignatureLookup + ?Sized> SignatureLookup for Rc<L> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        (**self).class_signature(binary_name)
    }
}

impl<L: SignatureLookup + ?Sized> SignatureLookup for Arc<L> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        (**self).class_signature(binary_name)
    }
}

impl<S: BuildHasher> SignatureLookup for HashMap<String, ClassSignature, S> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        self.get(binary_name).cloned()
    }
}

impl SignatureLookup for BTreeMap<String, ClassSignature> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        self.get(binary_name).cloned()
    }
}

/// An error that occurs while resolving type variables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The type variable is not declared by any class or method in scope.
    #[error("Type variable {variable} is not declared in {context}")]
    UnboundTypeVariable {
        /// The name of the type variable.
        variable: String,
        /// The class or method where the type variable is used.
        context: String,
    },
    /// A class is its own ancestor.
    #[error("Cyclic class hierarchy: {}", .0.join(" -> "))]
    CyclicHierarchy(Vec<String>),
    /// The bound of a type variable refers back to the type variable itself.
    #[error("Type variable {0} is bounded by itself")]
    CyclicTypeVariable(String),
    /// The class is not an ancestor of the class being resolved.
    #[error("{ancestor} is not an ancestor of {class}")]
    NotAnAncestor {
        /// The class being resolved.
        class: String,
        /// The expected ancestor.
        ancestor: String,
    },
    /// A parameterized type supplies a wrong number of type arguments.
    #[error("{class} expects {expected} type arguments but {found} are given")]
    TypeArgumentCount {
        /// The class being parameterized.
        class: String,
        /// The number of type parameters declared by the class.
        expected: usize,
        /// The number of type arguments supplied.
        found: usize,
    },
    /// The method does not have a parameter at the given index.
    #[error("No parameter at index {0}")]
    NoSuchParameter(usize),
    /// The method does not have a `throws` type at the given index.
    #[error("No throws type at index {0}")]
    NoSuchThrows(usize),
}

/// Resolves type variables as seen from a class.
///
/// The signatures of the ancestors are fetched at most once per resolver.
#[derive(Debug)]
pub struct ClassResolver<L> {
    binary_name: String,
    signature: Rc<ClassSignature>,
    lookup: L,
    ancestors: RefCell<HashMap<String, Option<Rc<ClassSignature>>>>,
}

impl<L: SignatureLookup> ClassResolver<L> {
    /// Creates a resolver for the class `binary_name` with the given signature.
    pub fn new(binary_name: impl Into<String>, signature: ClassSignature, lookup: L) -> Self {
        Self {
            binary_name: binary_name.into(),
            signature: Rc::new(signature),
            lookup,
            ancestors: RefCell::default(),
        }
    }

    /// The binary name of the class.
    #[must_use]
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// The signature of the class.
    #[must_use]
    pub fn signature(&self) -> &ClassSignature {
        &self.signature
    }

    /// The source of the signatures of the ancestors.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Creates a resolver for a field declared in `declaring_class`, which is either the class
    /// itself or one of its ancestors.
    pub fn field(&self, declaring_class: impl Into<String>, field: FieldSignature) -> FieldResolver<'_, L> {
        FieldResolver::new(self, declaring_class.into(), field)
    }

    /// Creates a resolver for a method declared in `declaring_class`, which is either the class
    /// itself or one of its ancestors.
    pub fn method(&self, declaring_class: impl Into<String>, method: MethodSignature) -> MethodResolver<'_, L> {
        MethodResolver::new(self, declaring_class.into(), method)
    }

    /// Returns the signature of `binary_name`, or [`None`] if it cannot be found.
    fn fetch(&self, binary_name: &str) -> Option<Rc<ClassSignature>> {
        if binary_name == self.binary_name {
            return Some(Rc::clone(&self.signature));
        }
        if let Some(cached) = self.ancestors.borrow().get(binary_name) {
            return cached.clone();
        }
        let fetched = self.lookup.class_signature(binary_name).map(Rc::new);
        if fetched.is_none() {
            tracing::debug!(
                target: "cortado::resolver",
                class = %self.binary_name,
                ancestor = binary_name,
                "ancestor signature not found, assuming it extends java/lang/Object"
            );
        }
        self.ancestors
            .borrow_mut()
            .insert(binary_name.to_owned(), fetched.clone());
        fetched
    }

    /// Returns the binary names of all the ancestors, depth first with the super class before
    /// the interfaces of each class. The list always ends with `java/lang/Object`.
    ///
    /// # Errors
    /// [`ResolutionError::CyclicHierarchy`] if a class is its own ancestor.
    pub fn ancestors(&self) -> Result<Vec<String>, ResolutionError> {
        let mut path = vec![self.binary_name.clone()];
        let mut visited = HashSet::new();
        let mut ancestors = Vec::new();
        self.visit_ancestors(&self.signature, &mut path, &mut visited, &mut ancestors)?;
        ancestors.push(OBJECT_BINARY_NAME.to_owned());
        Ok(ancestors)
    }

    fn visit_ancestors(
        &self,
        signature: &ClassSignature,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
        ancestors: &mut Vec<String>,
    ) -> Result<(), ResolutionError> {
        for super_type in signature.super_types() {
            let name = super_type.binary();
            if name == OBJECT_BINARY_NAME {
                continue;
            }
            check_acyclic(path, name)?;
            if !visited.insert(name.to_owned()) {
                continue;
            }
            ancestors.push(name.to_owned());
            if let Some(ancestor) = self.fetch(name) {
                path.push(name.to_owned());
                self.visit_ancestors(&ancestor, path, visited, ancestors)?;
                path.pop();
            }
        }
        Ok(())
    }

    /// Returns the substitution that expresses the type parameters of `ancestor` in terms of
    /// the type variables of this class.
    ///
    /// The substitution is empty for the class itself, for `java.lang.Object`, and for an
    /// ancestor whose signature cannot be found.
    ///
    /// # Errors
    /// - [`ResolutionError::NotAnAncestor`] if `ancestor` cannot be reached.
    /// - [`ResolutionError::CyclicHierarchy`] if a class on the way is its own ancestor.
    /// - [`ResolutionError::TypeArgumentCount`] if a super type on the way is parameterized
    ///   with a wrong number of type arguments.
    pub fn substitution_to(&self, ancestor: &str) -> Result<Substitution, ResolutionError> {
        if ancestor == self.binary_name || ancestor == OBJECT_BINARY_NAME {
            return Ok(Substitution::new());
        }
        let mut path = vec![self.binary_name.clone()];
        self.find_ancestor(&self.signature, &Substitution::new(), ancestor, &mut path)?
            .ok_or_else(|| ResolutionError::NotAnAncestor {
                class: self.binary_name.clone(),
                ancestor: ancestor.to_owned(),
            })
    }

    fn find_ancestor(
        &self,
        signature: &ClassSignature,
        current: &Substitution,
        target: &str,
        path: &mut Vec<String>,
    ) -> Result<Option<Substitution>, ResolutionError> {
        for super_type in signature.super_types() {
            let name = super_type.binary();
            if name == OBJECT_BINARY_NAME {
                continue;
            }
            check_acyclic(path, name)?;
            let Some(ancestor) = self.fetch(name) else {
                if name == target {
                    return Ok(Some(Substitution::new()));
                }
                continue;
            };
            let step = Substitution::for_receiver(&ancestor, super_type)?.then(current);
            tracing::trace!(
                target: "cortado::resolver",
                from = path.last().map(String::as_str),
                to = name,
                bindings = step.len(),
                "composed substitution step"
            );
            if name == target {
                return Ok(Some(step));
            }
            path.push(name.to_owned());
            let found = self.find_ancestor(&ancestor, &step, target, path)?;
            path.pop();
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    /// Returns the substitution that expresses the type parameters of `ancestor` in terms of
    /// the type arguments of `receiver`, a parameterized type of this class.
    ///
    /// # Errors
    /// See [`ClassResolver::substitution_to`] and [`Substitution::for_receiver`].
    pub fn substitution_for(
        &self,
        receiver: &ClassTypeSignature,
        ancestor: &str,
    ) -> Result<Substitution, ResolutionError> {
        let own = Substitution::for_receiver(&self.signature, receiver)?;
        if ancestor == self.binary_name {
            Ok(own)
        } else {
            Ok(self.substitution_to(ancestor)?.then(&own))
        }
    }

    /// Resolves the type variable `variable` declared by `declaring_class` as seen from this
    /// class.
    ///
    /// The result may still mention the type variables of this class, e.g., resolving `E` of
    /// `java.util.List` from `class MyList<T> implements List<T>` yields `T`.
    ///
    /// # Errors
    /// - [`ResolutionError::UnboundTypeVariable`] if `declaring_class` does not declare
    ///   `variable`.
    /// - Any error of [`ClassResolver::substitution_to`].
    pub fn resolve_variable(
        &self,
        declaring_class: &str,
        variable: &TypeVariableSignature,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        let reference = ReferenceTypeSignature::TypeVariable(variable.clone());
        self.resolve_inherited_reference(declaring_class, &reference)
    }

    /// Rewrites a type used in `declaring_class` in terms of the type variables of this class.
    ///
    /// # Errors
    /// - [`ResolutionError::UnboundTypeVariable`] if the type uses a type variable that
    ///   `declaring_class` does not declare.
    /// - Any error of [`ClassResolver::substitution_to`].
    pub fn resolve_inherited(
        &self,
        declaring_class: &str,
        java_type: &JavaTypeSignature,
    ) -> Result<JavaTypeSignature, ResolutionError> {
        match java_type {
            JavaTypeSignature::Base(it) => {
                self.substitution_to(declaring_class)?;
                Ok(JavaTypeSignature::Base(*it))
            }
            JavaTypeSignature::Reference(it) => self
                .resolve_inherited_reference(declaring_class, it)
                .map(JavaTypeSignature::Reference),
        }
    }

    /// Rewrites a reference type used in `declaring_class` in terms of the type variables of
    /// this class.
    ///
    /// # Errors
    /// See [`ClassResolver::resolve_inherited`].
    pub fn resolve_inherited_reference(
        &self,
        declaring_class: &str,
        reference: &ReferenceTypeSignature,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        let substitution = self.substitution_to(declaring_class)?;
        self.check_declared_by(declaring_class, reference)?;
        Ok(substitution.apply_reference(reference))
    }

    fn check_declared_by(
        &self,
        declaring_class: &str,
        reference: &ReferenceTypeSignature,
    ) -> Result<(), ResolutionError> {
        let declared = self.fetch(declaring_class);
        check_declared(declaring_class, declared.as_deref(), &[], reference)
    }

    /// Returns the signature of `declaring_class` if it is known.
    pub(crate) fn declaring_signature(&self, declaring_class: &str) -> Option<Rc<ClassSignature>> {
        self.fetch(declaring_class)
    }

    /// Resolves a type in the scope of this class to a type without free type variables at the
    /// top level. A type variable of this class resolves to its leftmost bound, recursively;
    /// other types are returned as is.
    ///
    /// # Errors
    /// - [`ResolutionError::UnboundTypeVariable`] if the type variable is not declared by this
    ///   class.
    /// - [`ResolutionError::CyclicTypeVariable`] if the bounds of the type variable form a
    ///   cycle.
    pub fn resolve_type(
        &self,
        reference: &ReferenceTypeSignature,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        let mut visited = HashSet::new();
        let mut current = reference.clone();
        while let ReferenceTypeSignature::TypeVariable(variable) = &current {
            if !visited.insert(variable.identifier.clone()) {
                return Err(ResolutionError::CyclicTypeVariable(variable.identifier.clone()));
            }
            let parameter = self.signature.type_parameter(&variable.identifier).ok_or_else(|| {
                ResolutionError::UnboundTypeVariable {
                    variable: variable.identifier.clone(),
                    context: self.binary_name.clone(),
                }
            })?;
            current = parameter.first_bound();
        }
        Ok(current)
    }

    /// Resolves a type argument in the scope of this class to the type it is known to be
    /// assignable to.
    /// Exact and upper bounded arguments resolve their bound with
    /// [`ClassResolver::resolve_type`]; lower bounded and unbounded wildcards resolve to
    /// `java.lang.Object`.
    ///
    /// # Errors
    /// See [`ClassResolver::resolve_type`].
    pub fn resolve_argument(
        &self,
        argument: &TypeArgument,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        match argument {
            TypeArgument::Exact(it) | TypeArgument::Extends(it) => self.resolve_type(it),
            TypeArgument::Super(_) | TypeArgument::Wild => Ok(ReferenceTypeSignature::object()),
        }
    }
}

/// Checks that all the type variables in `reference` are declared by either `extra` or the class
/// signature `declared`.
pub(crate) fn check_declared(
    context: &str,
    declared: Option<&ClassSignature>,
    extra: &[TypeParameter],
    reference: &ReferenceTypeSignature,
) -> Result<(), ResolutionError> {
    let undeclared = reference.type_variables().into_iter().find(|it| {
        extra.iter().all(|p| p.identifier != it.identifier)
            && declared
                .and_then(|c| c.type_parameter(&it.identifier))
                .is_none()
    });
    match undeclared {
        Some(variable) => Err(ResolutionError::UnboundTypeVariable {
            variable: variable.identifier.clone(),
            context: context.to_owned(),
        }),
        None => Ok(()),
    }
}

fn check_acyclic(path: &[String], next: &str) -> Result<(), ResolutionError> {
    if path.iter().any(|it| it == next) {
        let mut cycle = path.to_vec();
        cycle.push(next.to_owned());
        Err(ResolutionError::CyclicHierarchy(cycle))
    } else {
        Ok(())
    }
}
