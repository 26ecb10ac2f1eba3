use std::collections::HashMap;

use proptest::prelude::*;

use crate::types::signatures::{
    BaseType, ClassSignature, ClassTypeSignature, FieldSignature, JavaTypeSignature,
    MethodSignature, ReferenceTypeSignature, ResultType, SimpleClassTypeSignature,
    ThrowsSignature, TypeArgument, TypeParameter, TypeVariableSignature,
};

pub(crate) fn arb_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z_][a-zA-Z0-9_$]{0,7}").expect("The regex is invalid")
}

/// A package specifier, either empty or ending with `/`.
pub(crate) fn arb_package() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_identifier(), 0..4).prop_map(|it| {
        it.into_iter().map(|segment| format!("{segment}/")).collect()
    })
}

pub(crate) fn arb_binary_name() -> impl Strategy<Value = String> {
    (arb_package(), arb_identifier()).prop_map(|(package, class)| format!("{package}{class}"))
}

pub(crate) fn arb_type_variable() -> impl Strategy<Value = TypeVariableSignature> {
    arb_identifier().prop_map(TypeVariableSignature::new)
}

fn arb_type_argument_with(
    reference: BoxedStrategy<ReferenceTypeSignature>,
) -> BoxedStrategy<TypeArgument> {
    prop_oneof![
        3 => reference.clone().prop_map(TypeArgument::Exact),
        1 => reference.clone().prop_map(TypeArgument::Extends),
        1 => reference.prop_map(TypeArgument::Super),
        1 => Just(TypeArgument::Wild),
    ]
    .boxed()
}

fn arb_simple_class_type_with(
    argument: BoxedStrategy<TypeArgument>,
) -> impl Strategy<Value = SimpleClassTypeSignature> {
    (arb_identifier(), prop::collection::vec(argument, 0..3))
        .prop_map(|(identifier, arguments)| SimpleClassTypeSignature::new(identifier, arguments))
}

fn arb_class_type_with(
    reference: BoxedStrategy<ReferenceTypeSignature>,
) -> BoxedStrategy<ClassTypeSignature> {
    let argument = arb_type_argument_with(reference);
    (
        arb_package(),
        arb_simple_class_type_with(argument.clone()),
        prop::collection::vec(arb_simple_class_type_with(argument), 0..2),
    )
        .prop_map(|(package, class_type, inner_types)| {
            ClassTypeSignature::new(package, class_type, inner_types)
        })
        .boxed()
}

pub(crate) fn arb_reference_type() -> BoxedStrategy<ReferenceTypeSignature> {
    let leaf = prop_oneof![
        arb_type_variable().prop_map(ReferenceTypeSignature::from),
        arb_binary_name()
            .prop_map(|it| ReferenceTypeSignature::from(ClassTypeSignature::from_binary_name(&it))),
        any::<BaseType>().prop_map(|it| JavaTypeSignature::Base(it).into_array_type()),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            arb_class_type_with(inner.clone()).prop_map(ReferenceTypeSignature::from),
            inner.prop_map(|it| JavaTypeSignature::Reference(it).into_array_type()),
        ]
    })
    .boxed()
}

pub(crate) fn arb_class_type() -> BoxedStrategy<ClassTypeSignature> {
    arb_class_type_with(arb_reference_type())
}

pub(crate) fn arb_java_type() -> impl Strategy<Value = JavaTypeSignature> {
    prop_oneof![
        1 => any::<BaseType>().prop_map(JavaTypeSignature::Base),
        3 => arb_reference_type().prop_map(JavaTypeSignature::Reference),
    ]
}

pub(crate) fn arb_field_signature() -> impl Strategy<Value = FieldSignature> {
    arb_reference_type().prop_map(FieldSignature::new)
}

prop_compose! {
    pub(crate) fn arb_type_parameter()(
        identifier in arb_identifier(),
        class_bound in prop::option::of(arb_reference_type()),
        interface_bounds in prop::collection::vec(arb_reference_type(), 0..3),
    ) -> TypeParameter {
        TypeParameter { identifier, class_bound, interface_bounds }
    }
}

/// Type parameters whose printed form parses back.
///
/// A parameter without bounds followed by one named like the start of a reference type, e.g.,
/// `<A:T:>`, reads as a class bound. Every parameter but the last gets a bound.
pub(crate) fn arb_type_parameters() -> impl Strategy<Value = Vec<TypeParameter>> {
    prop::collection::vec(arb_type_parameter(), 0..3).prop_map(|mut type_parameters| {
        let last = type_parameters.len().saturating_sub(1);
        for parameter in &mut type_parameters[..last] {
            if parameter.class_bound.is_none() && parameter.interface_bounds.is_empty() {
                parameter.class_bound = Some(ReferenceTypeSignature::object());
            }
        }
        type_parameters
    })
}

prop_compose! {
    pub(crate) fn arb_class_signature()(
        type_parameters in arb_type_parameters(),
        super_class in arb_class_type(),
        super_interfaces in prop::collection::vec(arb_class_type(), 0..3),
    ) -> ClassSignature {
        ClassSignature { type_parameters, super_class, super_interfaces }
    }
}

fn arb_result_type() -> impl Strategy<Value = ResultType> {
    prop_oneof![
        1 => Just(ResultType::Void),
        3 => arb_java_type().prop_map(ResultType::Some),
    ]
}

fn arb_throws() -> impl Strategy<Value = ThrowsSignature> {
    prop_oneof![
        arb_class_type().prop_map(ThrowsSignature::Class),
        arb_type_variable().prop_map(ThrowsSignature::TypeVariable),
    ]
}

prop_compose! {
    pub(crate) fn arb_method_signature()(
        type_parameters in arb_type_parameters(),
        parameter_types in prop::collection::vec(arb_java_type(), 0..4),
        result_type in arb_result_type(),
        throw_types in prop::collection::vec(arb_throws(), 0..3),
    ) -> MethodSignature {
        MethodSignature { type_parameters, parameter_types, result_type, throw_types }
    }
}

/// Assembles the bytes of a class file with the given members and `Signature` attributes.
#[derive(Debug)]
pub(crate) struct ClassFileBuilder {
    constant_pool: Vec<u8>,
    constant_pool_slots: u16,
    strings: HashMap<String, u16>,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}

fn table(items: &[Vec<u8>]) -> Vec<u8> {
    let count = u16::try_from(items.len()).unwrap();
    [count.to_be_bytes().to_vec(), items.concat()].concat()
}

impl ClassFileBuilder {
    pub(crate) fn new(binary_name: &str, super_class: Option<&str>) -> Self {
        let mut builder = Self {
            constant_pool: Vec::new(),
            constant_pool_slots: 0,
            strings: HashMap::new(),
            access_flags: 0x0021,
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        };
        // A wide constant occupies two slots of the constant pool.
        builder.push_constant(&[5, 0, 0, 0, 0, 0, 0, 0, 42], 2);
        builder.this_class = builder.class(binary_name);
        builder.super_class = super_class.map_or(0, |it| builder.class(it));
        builder
    }

    fn push_constant(&mut self, bytes: &[u8], slots: u16) -> u16 {
        let index = self.constant_pool_slots + 1;
        self.constant_pool.extend_from_slice(bytes);
        self.constant_pool_slots += slots;
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.strings.get(value) {
            return index;
        }
        let length = u16::try_from(value.len()).unwrap().to_be_bytes();
        let bytes = [&[1u8][..], &length[..], value.as_bytes()].concat();
        let index = self.push_constant(&bytes, 1);
        self.strings.insert(value.to_owned(), index);
        index
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        let name_index = self.utf8(binary_name).to_be_bytes();
        self.push_constant(&[7, name_index[0], name_index[1]], 1)
    }

    fn attribute(&mut self, name: &str, info: &[u8]) -> Vec<u8> {
        let name_index = self.utf8(name).to_be_bytes();
        let length = u32::try_from(info.len()).unwrap().to_be_bytes();
        [&name_index[..], &length[..], info].concat()
    }

    fn signature_attribute(&mut self, signature: &str) -> Vec<u8> {
        let signature_index = self.utf8(signature).to_be_bytes();
        self.attribute("Signature", &signature_index)
    }

    fn member(
        &mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        attributes: &[Vec<u8>],
    ) -> Vec<u8> {
        let name_index = self.utf8(name).to_be_bytes();
        let descriptor_index = self.utf8(descriptor).to_be_bytes();
        [
            &access_flags.to_be_bytes()[..],
            &name_index[..],
            &descriptor_index[..],
            &table(attributes)[..],
        ]
        .concat()
    }

    pub(crate) fn access_flags(mut self, access_flags: u16) -> Self {
        self.access_flags = access_flags;
        self
    }

    pub(crate) fn interface(mut self, binary_name: &str) -> Self {
        let index = self.class(binary_name);
        self.interfaces.push(index);
        self
    }

    pub(crate) fn signature(mut self, signature: &str) -> Self {
        let attribute = self.signature_attribute(signature);
        self.attributes.push(attribute);
        self
    }

    pub(crate) fn field(
        mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
    ) -> Self {
        let attributes: Vec<_> = signature
            .map(|it| self.signature_attribute(it))
            .into_iter()
            .collect();
        let field = self.member(access_flags, name, descriptor, &attributes);
        self.fields.push(field);
        self
    }

    pub(crate) fn method(
        mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[&str],
    ) -> Self {
        let mut attributes: Vec<_> = signature
            .map(|it| self.signature_attribute(it))
            .into_iter()
            .collect();
        // An attribute the reader does not know about.
        attributes.push(self.attribute("Code", &[0xDE, 0xAD, 0xBE, 0xEF]));
        if !exceptions.is_empty() {
            let indices: Vec<_> = exceptions
                .iter()
                .map(|it| self.class(it).to_be_bytes().to_vec())
                .collect();
            let info = table(&indices);
            attributes.push(self.attribute("Exceptions", &info));
        }
        let method = self.member(access_flags, name, descriptor, &attributes);
        self.methods.push(method);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let interfaces: Vec<_> = self
            .interfaces
            .iter()
            .map(|it| it.to_be_bytes().to_vec())
            .collect();
        [
            &[0xCA, 0xFE, 0xBA, 0xBE][..],
            &[0x00, 0x00, 0x00, 0x41][..],
            &(self.constant_pool_slots + 1).to_be_bytes()[..],
            &self.constant_pool[..],
            &self.access_flags.to_be_bytes()[..],
            &self.this_class.to_be_bytes()[..],
            &self.super_class.to_be_bytes()[..],
            &table(&interfaces)[..],
            &table(&self.fields)[..],
            &table(&self.methods)[..],
            &table(&self.attributes)[..],
        ]
        .concat()
    }
}
