use std::{cell::OnceCell, collections::HashSet, fmt::Display, hash::Hash};

use crate::types::signatures::{
    JavaTypeSignature, MethodSignature, ReferenceTypeSignature, ResultType, ThrowsSignature,
    TypeArgument, TypeParameter, TypeVariableSignature,
};

use super::{ClassResolver, ResolutionError, SignatureLookup, Substitution, check_declared};

/// Resolves the parameter, return, and `throws` types of a method as seen from a class.
///
/// The type parameters of the method shadow the type parameters of the declaring class with the
/// same name. They are never substituted; resolving a type variable of the method yields its
/// leftmost bound. A type parameter of the method whose name is taken by a type variable of the
/// class being resolved is renamed, e.g., `R` becomes `R1`, so the two stay distinct after
/// substitution.
#[derive(Debug)]
pub struct MethodResolver<'r, L> {
    resolver: &'r ClassResolver<L>,
    declaring_class: String,
    method: MethodSignature,
    scope: OnceCell<Result<MethodScope, ResolutionError>>,
}

/// The view of the method from the class being resolved.
#[derive(Debug)]
struct MethodScope {
    /// Maps the type parameters of the declaring class to types of the class being resolved, and
    /// the renamed type parameters of the method to their new names.
    substitution: Substitution,
    /// The type parameters of the method after renaming, with substituted bounds.
    type_parameters: Vec<TypeParameter>,
}

impl<'r, L: SignatureLookup> MethodResolver<'r, L> {
    pub(super) fn new(resolver: &'r ClassResolver<L>, declaring_class: String, method: MethodSignature) -> Self {
        Self {
            resolver,
            declaring_class,
            method,
            scope: OnceCell::new(),
        }
    }

    /// The class that declares the method.
    #[must_use]
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    /// The signature of the method as declared.
    #[must_use]
    pub fn method(&self) -> &MethodSignature {
        &self.method
    }

    fn scope(&self) -> Result<&MethodScope, ResolutionError> {
        self.scope
            .get_or_init(|| self.build_scope())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn build_scope(&self) -> Result<MethodScope, ResolutionError> {
        let method_parameters: Vec<&str> = self
            .method
            .type_parameters
            .iter()
            .map(|it| it.identifier.as_str())
            .collect();
        let mut substitution = self
            .resolver
            .substitution_to(&self.declaring_class)?
            .without(method_parameters.iter().copied());

        let captured: HashSet<String> = substitution
            .iter()
            .filter_map(|(_, argument)| argument.bound())
            .flat_map(ReferenceTypeSignature::type_variables)
            .map(|it| it.identifier.clone())
            .collect();
        let mut taken: HashSet<String> = captured.clone();
        taken.extend(method_parameters.iter().map(|it| (*it).to_owned()));
        taken.extend(
            self.resolver
                .signature()
                .type_parameters
                .iter()
                .map(|it| it.identifier.clone()),
        );
        if let Some(declared) = self.resolver.declaring_signature(&self.declaring_class) {
            taken.extend(declared.type_parameters.iter().map(|it| it.identifier.clone()));
        }
        for identifier in method_parameters {
            if !captured.contains(identifier) {
                continue;
            }
            let renamed = fresh_name(identifier, &taken);
            tracing::trace!(
                target: "cortado::resolver",
                method_type_parameter = identifier,
                renamed = %renamed,
                "renamed method type parameter captured by the class being resolved"
            );
            taken.insert(renamed.clone());
            substitution.bind(
                identifier,
                TypeArgument::Exact(ReferenceTypeSignature::TypeVariable(
                    TypeVariableSignature::new(renamed),
                )),
            );
        }

        let type_parameters = self
            .method
            .type_parameters
            .iter()
            .map(|it| {
                let identifier = substitution
                    .get(&it.identifier)
                    .and_then(TypeArgument::bound)
                    .and_then(ReferenceTypeSignature::as_type_variable)
                    .map_or_else(|| it.identifier.clone(), |v| v.identifier.clone());
                TypeParameter {
                    identifier,
                    class_bound: it.class_bound.as_ref().map(|b| substitution.apply_reference(b)),
                    interface_bounds: it
                        .interface_bounds
                        .iter()
                        .map(|b| substitution.apply_reference(b))
                        .collect(),
                }
            })
            .collect();
        Ok(MethodScope {
            substitution,
            type_parameters,
        })
    }

    fn check_declared(&self, reference: &ReferenceTypeSignature) -> Result<(), ResolutionError> {
        let declared = self.resolver.declaring_signature(&self.declaring_class);
        check_declared(
            &self.declaring_class,
            declared.as_deref(),
            &self.method.type_parameters,
            reference,
        )
    }

    fn substitute_reference(
        &self,
        reference: &ReferenceTypeSignature,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        let scope = self.scope()?;
        self.check_declared(reference)?;
        Ok(scope.substitution.apply_reference(reference))
    }

    fn substitute_java_type(
        &self,
        java_type: &JavaTypeSignature,
    ) -> Result<JavaTypeSignature, ResolutionError> {
        match java_type {
            JavaTypeSignature::Base(it) => Ok(JavaTypeSignature::Base(*it)),
            JavaTypeSignature::Reference(it) => {
                self.substitute_reference(it).map(JavaTypeSignature::Reference)
            }
        }
    }

    /// Resolves a substituted type. Type variables of the method resolve to their bounds, and
    /// the remaining ones are resolved in the scope of the class.
    fn resolve_reference(
        &self,
        reference: ReferenceTypeSignature,
    ) -> Result<ReferenceTypeSignature, ResolutionError> {
        let scope = self.scope()?;
        let mut visited = HashSet::new();
        let mut current = reference;
        loop {
            let position = current.as_type_variable().and_then(|variable| {
                scope
                    .type_parameters
                    .iter()
                    .position(|it| it.identifier == variable.identifier)
            });
            let Some(position) = position else {
                return self.resolver.resolve_type(&current);
            };
            let parameter = &scope.type_parameters[position];
            if !visited.insert(parameter.identifier.clone()) {
                return Err(ResolutionError::CyclicTypeVariable(
                    parameter.identifier.clone(),
                ));
            }
            self.check_declared(&self.method.type_parameters[position].first_bound())?;
            current = parameter.first_bound();
        }
    }

    fn resolve_java_type(
        &self,
        java_type: JavaTypeSignature,
    ) -> Result<JavaTypeSignature, ResolutionError> {
        match java_type {
            JavaTypeSignature::Base(_) => Ok(java_type),
            JavaTypeSignature::Reference(it) => {
                self.resolve_reference(it).map(JavaTypeSignature::Reference)
            }
        }
    }

    /// Returns the type of the parameter at `index` in terms of the type variables of the class
    /// being resolved and of the method.
    ///
    /// # Errors
    /// - [`ResolutionError::NoSuchParameter`] if the method has no parameter at `index`.
    /// - [`ResolutionError::UnboundTypeVariable`] if the type uses a type variable declared by
    ///   neither the method nor its declaring class.
    /// - Any error of [`ClassResolver::substitution_to`].
    pub fn substitute_parameter(&self, index: usize) -> Result<JavaTypeSignature, ResolutionError> {
        let parameter = self
            .method
            .parameter_types
            .get(index)
            .ok_or(ResolutionError::NoSuchParameter(index))?;
        self.substitute_java_type(parameter)
    }

    /// Returns the type of the parameter at `index` with a top-level type variable replaced by
    /// its bound.
    ///
    /// # Errors
    /// See [`MethodResolver::substitute_parameter`] and [`ClassResolver::resolve_type`].
    pub fn resolve_parameter(&self, index: usize) -> Result<JavaTypeSignature, ResolutionError> {
        let substituted = self.substitute_parameter(index)?;
        self.resolve_java_type(substituted)
    }

    /// Returns the return type in terms of the type variables of the class being resolved and
    /// of the method.
    ///
    /// # Errors
    /// See [`MethodResolver::substitute_parameter`].
    pub fn substitute_result(&self) -> Result<ResultType, ResolutionError> {
        match &self.method.result_type {
            ResultType::Some(it) => self.substitute_java_type(it).map(ResultType::Some),
            ResultType::Void => Ok(ResultType::Void),
        }
    }

    /// Returns the return type with a top-level type variable replaced by its bound.
    ///
    /// # Errors
    /// See [`MethodResolver::resolve_parameter`].
    pub fn resolve_result(&self) -> Result<ResultType, ResolutionError> {
        match self.substitute_result()? {
            ResultType::Some(it) => self.resolve_java_type(it).map(ResultType::Some),
            ResultType::Void => Ok(ResultType::Void),
        }
    }

    /// Returns the type in the `throws` clause at `index` in terms of the type variables of the
    /// class being resolved and of the method.
    ///
    /// # Errors
    /// - [`ResolutionError::NoSuchThrows`] if the method has no `throws` type at `index`.
    /// - See [`MethodResolver::substitute_parameter`].
    pub fn substitute_throws(&self, index: usize) -> Result<ReferenceTypeSignature, ResolutionError> {
        let throws = self
            .method
            .throw_types
            .get(index)
            .cloned()
            .map(ReferenceTypeSignature::from)
            .ok_or(ResolutionError::NoSuchThrows(index))?;
        self.substitute_reference(&throws)
    }

    /// Returns the type in the `throws` clause at `index` with a type variable replaced by its
    /// bound.
    ///
    /// # Errors
    /// See [`MethodResolver::substitute_throws`] and [`ClassResolver::resolve_type`].
    pub fn resolve_throws(&self, index: usize) -> Result<ReferenceTypeSignature, ResolutionError> {
        let substituted = self.substitute_throws(index)?;
        self.resolve_reference(substituted)
    }

    /// Returns the whole signature in terms of the type variables of the class being resolved
    /// and of the method.
    ///
    /// # Errors
    /// See [`MethodResolver::substitute_parameter`].
    pub fn substitute_method(&self) -> Result<MethodSignature, ResolutionError> {
        let parameter_types = (0..self.method.parameter_types.len())
            .map(|it| self.substitute_parameter(it))
            .collect::<Result<_, _>>()?;
        let throw_types = (0..self.method.throw_types.len())
            .map(|it| {
                let substituted = self.substitute_throws(it)?;
                Ok(ThrowsSignature::from_reference(substituted)
                    .unwrap_or_else(|| self.method.throw_types[it].clone()))
            })
            .collect::<Result<_, ResolutionError>>()?;
        Ok(MethodSignature {
            type_parameters: self.scope()?.type_parameters.clone(),
            parameter_types,
            result_type: self.substitute_result()?,
            throw_types,
        })
    }
}

/// Appends the smallest number to `identifier` that gives a name not in `taken`.
fn fresh_name(identifier: &str, taken: &HashSet<String>) -> String {
    (1usize..)
        .map(|suffix| format!("{identifier}{suffix}"))
        .find(|it| !taken.contains(it))
        .unwrap_or_else(|| identifier.to_owned())
}

impl<L> PartialEq for MethodResolver<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.resolver.signature == other.resolver.signature
            && self.declaring_class == other.declaring_class
            && self.method == other.method
    }
}

impl<L> Eq for MethodResolver<'_, L> {}

impl<L> Hash for MethodResolver<'_, L> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.resolver.signature.hash(state);
        self.declaring_class.hash(state);
        self.method.hash(state);
    }
}

impl<L> Display for MethodResolver<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.resolver.signature, self.declaring_class, self.method
        )
    }
}
