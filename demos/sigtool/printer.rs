use cortado::analysis::generics::{ClassResolver, SignatureLookup};
use cortado::jvm::{Class, Field, Method};
use cortado::types::signatures::{
    ClassSignature, ClassTypeSignature, FieldSignature, JavaTypeSignature, MethodSignature,
    ReferenceTypeSignature, ResultType, ThrowsSignature, TypeArgument, TypeParameter,
};

/// Indented tree output of a signature AST
struct TreePrinter {
    depth: usize,
}

impl TreePrinter {
    fn new() -> Self {
        Self { depth: 0 }
    }

    fn line(&self, text: impl std::fmt::Display) {
        println!("{}{text}", "  ".repeat(self.depth));
    }

    fn nested(&mut self, label: &str, body: impl FnOnce(&mut Self)) {
        self.line(label);
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn type_parameters(&mut self, type_parameters: &[TypeParameter]) {
        if type_parameters.is_empty() {
            return;
        }
        self.nested("type parameters", |p| {
            for type_parameter in type_parameters {
                p.nested(&type_parameter.identifier, |p| {
                    match &type_parameter.class_bound {
                        Some(bound) => p.nested("class bound", |p| p.reference(bound)),
                        None => p.line("class bound (none)"),
                    }
                    for bound in &type_parameter.interface_bounds {
                        p.nested("interface bound", |p| p.reference(bound));
                    }
                });
            }
        });
    }

    fn java_type(&mut self, java_type: &JavaTypeSignature) {
        match java_type {
            JavaTypeSignature::Base(base) => self.line(format_args!("base {base}")),
            JavaTypeSignature::Reference(reference) => self.reference(reference),
        }
    }

    fn reference(&mut self, reference: &ReferenceTypeSignature) {
        match reference {
            ReferenceTypeSignature::Class(class_type) => self.class_type(class_type),
            ReferenceTypeSignature::Array(array) => {
                self.nested(&format!("array[{}]", array.dimensions()), |p| {
                    p.java_type(array.element_type());
                });
            }
            ReferenceTypeSignature::TypeVariable(variable) => {
                self.line(format_args!("variable {}", variable.identifier));
            }
        }
    }

    fn class_type(&mut self, class_type: &ClassTypeSignature) {
        let label = format!("class {}", class_type.binary());
        self.nested(&label, |p| {
            for segment in class_type.segments() {
                if segment.type_arguments.is_empty() {
                    continue;
                }
                p.nested(&format!("arguments of {}", segment.identifier), |p| {
                    for argument in &segment.type_arguments {
                        p.type_argument(argument);
                    }
                });
            }
        });
    }

    fn type_argument(&mut self, argument: &TypeArgument) {
        match argument {
            TypeArgument::Exact(bound) => self.reference(bound),
            TypeArgument::Extends(bound) => self.nested("? extends", |p| p.reference(bound)),
            TypeArgument::Super(bound) => self.nested("? super", |p| p.reference(bound)),
            TypeArgument::Wild => self.line("?"),
        }
    }
}

pub fn print_class_signature(signature: &ClassSignature) {
    let mut printer = TreePrinter::new();
    printer.type_parameters(&signature.type_parameters);
    printer.nested("super class", |p| p.class_type(&signature.super_class));
    for interface in &signature.super_interfaces {
        printer.nested("super interface", |p| p.class_type(interface));
    }
}

pub fn print_method_signature(signature: &MethodSignature) {
    let mut printer = TreePrinter::new();
    printer.type_parameters(&signature.type_parameters);
    for (index, parameter) in signature.parameter_types.iter().enumerate() {
        printer.nested(&format!("parameter {index}"), |p| p.java_type(parameter));
    }
    match &signature.result_type {
        ResultType::Some(result) => printer.nested("result", |p| p.java_type(result)),
        ResultType::Void => printer.line("result void"),
    }
    for throws in &signature.throw_types {
        printer.nested("throws", |p| match throws {
            ThrowsSignature::Class(class_type) => p.class_type(class_type),
            ThrowsSignature::TypeVariable(variable) => {
                p.line(format_args!("variable {}", variable.identifier));
            }
        });
    }
}

pub fn print_field_signature(signature: &FieldSignature) {
    TreePrinter::new().reference(&signature.field_type);
}

/// Prints the fields and methods declared in `declaring` as seen from the resolver's class.
pub fn print_resolved_members<L: SignatureLookup>(resolver: &ClassResolver<L>, declaring: &Class) {
    println!("{} {{", declaring.binary_name);
    for field in &declaring.fields {
        print_field(resolver, declaring, field);
    }
    for method in &declaring.methods {
        print_method(resolver, declaring, method);
    }
    println!("}}");
}

fn print_field<L: SignatureLookup>(resolver: &ClassResolver<L>, declaring: &Class, field: &Field) {
    let generic_type = field.generic_type();
    let Some(reference) = generic_type.as_reference() else {
        println!("  {}: {generic_type}", field.name);
        return;
    };
    let resolved = resolver
        .field(declaring.binary_name.as_str(), FieldSignature::new(reference.clone()))
        .resolve_field();
    match resolved {
        Ok(resolved) => println!("  {}: {resolved}", field.name),
        Err(e) => println!("  {}: {generic_type} ({e})", field.name),
    }
}

fn print_method<L: SignatureLookup>(resolver: &ClassResolver<L>, declaring: &Class, method: &Method) {
    let generic_signature = method.generic_signature();
    let substituted = resolver
        .method(declaring.binary_name.as_str(), generic_signature.clone())
        .substitute_method();
    match substituted {
        Ok(substituted) => println!("  {}{substituted}", method.name),
        Err(e) => println!("  {}{generic_signature} ({e})", method.name),
    }
}
