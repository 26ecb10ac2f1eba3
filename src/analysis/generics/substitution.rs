use std::collections::{HashMap, HashSet};

use crate::types::signatures::{
    ArrayTypeSignature, ClassSignature, ClassTypeSignature, JavaTypeSignature,
    ReferenceTypeSignature, ResultType, ThrowsSignature, TypeArgument, TypeParameter,
};

use super::ResolutionError;

/// A mapping from type parameters to the type arguments they stand for.
///
/// Type variables without a binding are left untouched when the substitution is applied, so a
/// substitution can map the parameters of an ancestor to types that still mention the free type
/// variables of a subclass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: HashMap<String, TypeArgument>,
}

impl Substitution {
    /// Creates an empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the type parameter `identifier` to `argument`, returning the previous binding.
    pub fn bind(&mut self, identifier: impl Into<String>, argument: TypeArgument) -> Option<TypeArgument> {
        self.bindings.insert(identifier.into(), argument)
    }

    /// Returns the binding of the type parameter `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&TypeArgument> {
        self.bindings.get(identifier)
    }

    /// Checks whether there is no binding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Iterates over the bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeArgument)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of this substitution without the bindings of `shadowed`.
    #[must_use]
    pub fn without<'a>(&self, shadowed: impl IntoIterator<Item = &'a str>) -> Self {
        let mut bindings = self.bindings.clone();
        for identifier in shadowed {
            bindings.remove(identifier);
        }
        Self { bindings }
    }

    /// Binds the type parameters of the class declared by `class_signature` to the type
    /// arguments of `receiver`, a parameterized type of the same class.
    ///
    /// A raw `receiver` binds every type parameter to the erasure of its leftmost bound.
    ///
    /// # Errors
    /// [`ResolutionError::TypeArgumentCount`] if `receiver` is parameterized with a different
    /// number of type arguments than the class declares.
    pub fn for_receiver(
        class_signature: &ClassSignature,
        receiver: &ClassTypeSignature,
    ) -> Result<Self, ResolutionError> {
        let parameters = &class_signature.type_parameters;
        let arguments = receiver.innermost_type_arguments();
        let bindings = if arguments.is_empty() {
            if !parameters.is_empty() {
                tracing::trace!(
                    target: "cortado::resolver",
                    class = receiver.binary(),
                    "raw type reference, binding type parameters to erased bounds"
                );
            }
            parameters
                .iter()
                .map(|it| {
                    let erased = erase_bound(it, parameters, &mut HashSet::new());
                    (it.identifier.clone(), TypeArgument::Exact(erased))
                })
                .collect()
        } else if arguments.len() == parameters.len() {
            parameters
                .iter()
                .zip(arguments)
                .map(|(param, arg)| (param.identifier.clone(), arg.clone()))
                .collect()
        } else {
            return Err(ResolutionError::TypeArgumentCount {
                class: receiver.binary().to_owned(),
                expected: parameters.len(),
                found: arguments.len(),
            });
        };
        Ok(Self { bindings })
    }

    /// Composes two substitutions.
    /// The result maps every parameter bound by `self` to its argument with `outer` applied.
    #[must_use]
    pub fn then(&self, outer: &Substitution) -> Self {
        let bindings = self
            .bindings
            .iter()
            .map(|(identifier, argument)| (identifier.clone(), outer.apply_argument(argument)))
            .collect();
        Self { bindings }
    }

    /// Applies the substitution to a type in a top-level position, e.g., the type of a field.
    #[must_use]
    pub fn apply_java_type(&self, java_type: &JavaTypeSignature) -> JavaTypeSignature {
        match java_type {
            JavaTypeSignature::Base(it) => JavaTypeSignature::Base(*it),
            JavaTypeSignature::Reference(it) => JavaTypeSignature::Reference(self.apply_reference(it)),
        }
    }

    /// Applies the substitution to a reference type in a top-level position.
    ///
    /// A type variable bound to an exact or `extends` argument becomes the bound of the argument.
    /// One bound to a `super` or an unbounded wildcard becomes `java.lang.Object`, the only type
    /// known to include all the values the variable may hold.
    #[must_use]
    pub fn apply_reference(&self, reference: &ReferenceTypeSignature) -> ReferenceTypeSignature {
        match reference {
            ReferenceTypeSignature::Class(it) => ReferenceTypeSignature::Class(self.apply_class_type(it)),
            ReferenceTypeSignature::Array(it) => {
                ReferenceTypeSignature::Array(ArrayTypeSignature::new(self.apply_java_type(&it.component)))
            }
            ReferenceTypeSignature::TypeVariable(it) => match self.get(&it.identifier) {
                Some(argument) => argument.upper_bound(),
                None => reference.clone(),
            },
        }
    }

    /// Applies the substitution to the type arguments of a class type.
    #[must_use]
    pub fn apply_class_type(&self, class_type: &ClassTypeSignature) -> ClassTypeSignature {
        class_type.map_type_arguments(|it| self.apply_argument(it))
    }

    /// Applies the substitution to a type argument.
    ///
    /// A type variable used as an argument takes the argument it is bound to. Wildcards combine:
    /// `? extends T` stays an upper bound if `T` is bound to an exact or upper bounded argument,
    /// `? super T` stays a lower bound if `T` is bound to an exact or lower bounded argument, and
    /// any other combination degrades to `?`.
    #[must_use]
    pub fn apply_argument(&self, argument: &TypeArgument) -> TypeArgument {
        let binding = argument
            .bound()
            .and_then(ReferenceTypeSignature::as_type_variable)
            .and_then(|it| self.get(&it.identifier));
        match (argument, binding) {
            (TypeArgument::Wild, _) => TypeArgument::Wild,
            (TypeArgument::Exact(_), Some(bound)) => bound.clone(),
            (
                TypeArgument::Extends(_),
                Some(TypeArgument::Exact(it) | TypeArgument::Extends(it)),
            ) => TypeArgument::Extends(it.clone()),
            (TypeArgument::Super(_), Some(TypeArgument::Exact(it) | TypeArgument::Super(it))) => {
                TypeArgument::Super(it.clone())
            }
            (TypeArgument::Extends(_) | TypeArgument::Super(_), Some(_)) => TypeArgument::Wild,
            (TypeArgument::Exact(it), None) => TypeArgument::Exact(self.apply_reference(it)),
            (TypeArgument::Extends(it), None) => TypeArgument::Extends(self.apply_reference(it)),
            (TypeArgument::Super(it), None) => TypeArgument::Super(self.apply_reference(it)),
        }
    }

    /// Applies the substitution to the return type of a method.
    #[must_use]
    pub fn apply_result(&self, result_type: &ResultType) -> ResultType {
        match result_type {
            ResultType::Some(it) => ResultType::Some(self.apply_java_type(it)),
            ResultType::Void => ResultType::Void,
        }
    }

    /// Applies the substitution to a type in the `throws` clause of a method.
    #[must_use]
    pub fn apply_throws(&self, throws: &ThrowsSignature) -> ReferenceTypeSignature {
        self.apply_reference(&throws.clone().into())
    }
}

/// Erases the leftmost bound of `parameter`, following bounds that are type variables of the
/// same declaration.
fn erase_bound(
    parameter: &TypeParameter,
    parameters: &[TypeParameter],
    visited: &mut HashSet<String>,
) -> ReferenceTypeSignature {
    if !visited.insert(parameter.identifier.clone()) {
        return ReferenceTypeSignature::object();
    }
    erase(&parameter.first_bound(), parameters, visited)
}

fn erase(
    reference: &ReferenceTypeSignature,
    parameters: &[TypeParameter],
    visited: &mut HashSet<String>,
) -> ReferenceTypeSignature {
    match reference {
        ReferenceTypeSignature::Class(it) => ReferenceTypeSignature::Class(it.erasure()),
        ReferenceTypeSignature::Array(it) => {
            let component = match it.component.as_ref() {
                JavaTypeSignature::Base(base) => JavaTypeSignature::Base(*base),
                JavaTypeSignature::Reference(r) => {
                    JavaTypeSignature::Reference(erase(r, parameters, visited))
                }
            };
            ReferenceTypeSignature::Array(ArrayTypeSignature::new(component))
        }
        ReferenceTypeSignature::TypeVariable(it) => parameters
            .iter()
            .find(|p| p.identifier == it.identifier)
            .map_or_else(ReferenceTypeSignature::object, |p| {
                erase_bound(p, parameters, visited)
            }),
    }
}
