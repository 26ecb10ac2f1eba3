use std::collections::HashSet;

use super::{
    ClassSignature, ClassTypeSignature, FieldSignature, JavaTypeSignature, MethodSignature,
    ReferenceTypeSignature, ResultType, Signature, ThrowsSignature, TypeArgument, TypeParameter,
};

impl Signature for JavaTypeSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        if let Self::Reference(reference) = self {
            reference.collect_erased_references(references);
        }
    }
}

impl Signature for ReferenceTypeSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        match self {
            Self::Class(class_type) => class_type.collect_erased_references(references),
            Self::Array(array_type) => array_type
                .element_type()
                .collect_erased_references(references),
            Self::TypeVariable(_) => {}
        }
    }
}

impl Signature for ClassTypeSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        references.insert(self.binary());
        self.segments()
            .flat_map(|it| &it.type_arguments)
            .for_each(|it| it.collect_erased_references(references));
    }
}

impl Signature for TypeArgument {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        if let Some(bound) = self.bound() {
            bound.collect_erased_references(references);
        }
    }
}

impl Signature for TypeParameter {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        self.bounds()
            .for_each(|it| it.collect_erased_references(references));
    }
}

impl Signature for ClassSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        self.type_parameters
            .iter()
            .for_each(|it| it.collect_erased_references(references));
        self.super_types()
            .for_each(|it| it.collect_erased_references(references));
    }
}

impl Signature for FieldSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        self.field_type.collect_erased_references(references);
    }
}

impl Signature for ResultType {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        if let Self::Some(result_type) = self {
            result_type.collect_erased_references(references);
        }
    }
}

impl Signature for ThrowsSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        if let Self::Class(class_type) = self {
            class_type.collect_erased_references(references);
        }
    }
}

impl Signature for MethodSignature {
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>) {
        self.type_parameters
            .iter()
            .for_each(|it| it.collect_erased_references(references));
        self.parameter_types
            .iter()
            .for_each(|it| it.collect_erased_references(references));
        self.result_type.collect_erased_references(references);
        self.throw_types
            .iter()
            .for_each(|it| it.collect_erased_references(references));
    }
}
