use std::str::FromStr;

use trait_gen::trait_gen;

use super::{
    ArrayTypeSignature, BaseType, ClassSignature, ClassTypeSignature, FieldSignature,
    InvalidSignature, JavaTypeSignature, MethodSignature, ReferenceTypeSignature, ResultType,
    SimpleClassTypeSignature, ThrowsSignature, TypeArgument, TypeParameter, TypeVariableSignature,
};

/// A position in a signature being parsed.
/// Productions take a cursor by value and return the cursor past the consumed input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'s> {
    input: &'s str,
    position: usize,
}

type Parsed<'s, T> = Result<(T, Cursor<'s>), InvalidSignature>;

impl<'s> Cursor<'s> {
    pub(crate) const fn new(input: &'s str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    const fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    const fn advance(self, bytes: usize) -> Self {
        Self {
            position: self.position + bytes,
            ..self
        }
    }

    fn error(&self, expected: &'static str) -> InvalidSignature {
        InvalidSignature {
            signature: self.input.to_owned(),
            position: self.position,
            expected,
        }
    }

    /// Checks whether a reference type signature starts here.
    fn at_reference_type(&self) -> bool {
        matches!(self.peek(), Some(b'L' | b'T' | b'['))
    }

    /// Checks whether a primitive or reference type signature starts here.
    fn at_java_type(&self) -> bool {
        self.at_reference_type()
            || self
                .peek()
                .map(char::from)
                .and_then(BaseType::from_descriptor)
                .is_some()
    }

    /// Consumes `byte`, or fails with `expected`.
    fn expect(self, byte: u8, expected: &'static str) -> Result<Self, InvalidSignature> {
        if self.peek() == Some(byte) {
            Ok(self.advance(1))
        } else {
            Err(self.error(expected))
        }
    }

    /// Consumes `byte` if it is next.
    fn eat(self, byte: u8) -> Option<Self> {
        (self.peek() == Some(byte)).then(|| self.advance(1))
    }

    /// Consumes a non-empty identifier, which extends up to the next delimiter.
    fn identifier(self) -> Parsed<'s, &'s str> {
        let rest = &self.input[self.position..];
        let len = rest
            .bytes()
            .position(|it| matches!(it, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':'))
            .unwrap_or(rest.len());
        if len == 0 {
            Err(self.error("an identifier"))
        } else {
            Ok((&rest[..len], self.advance(len)))
        }
    }
}

/// A grammar production that can be parsed from a [`Cursor`].
pub(crate) trait Production: Sized {
    /// Parses `Self` starting at `cursor`.
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self>;

    /// Parses `Self` from the entire `input`.
    fn parse_whole(input: &str) -> Result<Self, InvalidSignature> {
        let (value, rest) = Self::parse(Cursor::new(input))?;
        if rest.is_at_end() {
            Ok(value)
        } else {
            Err(rest.error("end of signature"))
        }
    }
}

#[trait_gen(T ->
    JavaTypeSignature,
    ReferenceTypeSignature,
    ClassTypeSignature,
    TypeVariableSignature,
    TypeArgument,
    TypeParameter,
    FieldSignature,
    ClassSignature,
    MethodSignature
)]
impl FromStr for T {
    type Err = InvalidSignature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <T as Production>::parse_whole(s)
    }
}

impl Production for JavaTypeSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        if let Some(base_type) = cursor.peek().map(char::from).and_then(BaseType::from_descriptor) {
            Ok((Self::Base(base_type), cursor.advance(1)))
        } else if cursor.at_reference_type() {
            ReferenceTypeSignature::parse(cursor).map(|(it, c)| (Self::Reference(it), c))
        } else {
            Err(cursor.error("a type signature"))
        }
    }
}

impl Production for ReferenceTypeSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        match cursor.peek() {
            Some(b'L') => ClassTypeSignature::parse(cursor).map(|(it, c)| (Self::Class(it), c)),
            Some(b'T') => TypeVariableSignature::parse(cursor).map(|(it, c)| (Self::TypeVariable(it), c)),
            Some(b'[') => ArrayTypeSignature::parse(cursor).map(|(it, c)| (Self::Array(it), c)),
            _ => Err(cursor.error("a reference type signature")),
        }
    }
}

impl Production for ArrayTypeSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let cursor = cursor.expect(b'[', "'['")?;
        let (component, cursor) = JavaTypeSignature::parse(cursor)?;
        Ok((Self::new(component), cursor))
    }
}

impl Production for TypeVariableSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let cursor = cursor.expect(b'T', "'T'")?;
        let (identifier, cursor) = cursor.identifier()?;
        let cursor = cursor.expect(b';', "';'")?;
        Ok((Self::new(identifier), cursor))
    }
}

impl Production for ClassTypeSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let mut cursor = cursor.expect(b'L', "'L'")?;
        let mut package_specifier = String::new();
        let class_type = loop {
            let (identifier, next) = cursor.identifier()?;
            if let Some(next) = next.eat(b'/') {
                package_specifier.push_str(identifier);
                package_specifier.push('/');
                cursor = next;
            } else {
                let (type_arguments, next) = parse_type_arguments(next)?;
                cursor = next;
                break SimpleClassTypeSignature::new(identifier, type_arguments);
            }
        };
        let mut inner_types = Vec::new();
        while let Some(next) = cursor.eat(b'.') {
            let (inner, next) = SimpleClassTypeSignature::parse(next)?;
            inner_types.push(inner);
            cursor = next;
        }
        let cursor = cursor.expect(b';', "';'")?;
        Ok((
            Self::new(package_specifier, class_type, inner_types),
            cursor,
        ))
    }
}

impl Production for SimpleClassTypeSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let (identifier, cursor) = cursor.identifier()?;
        let (type_arguments, cursor) = parse_type_arguments(cursor)?;
        Ok((Self::new(identifier, type_arguments), cursor))
    }
}

/// Parses `<TypeArgument+>` if present.
fn parse_type_arguments(cursor: Cursor<'_>) -> Parsed<'_, Vec<TypeArgument>> {
    let Some(mut cursor) = cursor.eat(b'<') else {
        return Ok((Vec::new(), cursor));
    };
    let mut arguments = Vec::new();
    loop {
        let (argument, next) = TypeArgument::parse(cursor)?;
        arguments.push(argument);
        cursor = next;
        if let Some(next) = cursor.eat(b'>') {
            break Ok((arguments, next));
        }
    }
}

fn type_argument_bound(cursor: Cursor<'_>) -> Parsed<'_, ReferenceTypeSignature> {
    if cursor.at_reference_type() {
        ReferenceTypeSignature::parse(cursor)
    } else {
        Err(cursor.error("a type argument"))
    }
}

impl Production for TypeArgument {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        match cursor.peek() {
            Some(b'*') => Ok((Self::Wild, cursor.advance(1))),
            Some(b'+') => type_argument_bound(cursor.advance(1)).map(|(it, c)| (Self::Extends(it), c)),
            Some(b'-') => type_argument_bound(cursor.advance(1)).map(|(it, c)| (Self::Super(it), c)),
            _ => type_argument_bound(cursor).map(|(it, c)| (Self::Exact(it), c)),
        }
    }
}

impl Production for TypeParameter {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let (identifier, cursor) = cursor.identifier()?;
        let mut cursor = cursor.expect(b':', "':'")?;
        let class_bound = if cursor.at_reference_type() {
            let (bound, next) = ReferenceTypeSignature::parse(cursor)?;
            cursor = next;
            Some(bound)
        } else {
            None
        };
        let mut interface_bounds = Vec::new();
        while let Some(next) = cursor.eat(b':') {
            let (bound, next) = ReferenceTypeSignature::parse(next)?;
            interface_bounds.push(bound);
            cursor = next;
        }
        Ok((
            Self {
                identifier: identifier.to_owned(),
                class_bound,
                interface_bounds,
            },
            cursor,
        ))
    }
}

/// Parses `<TypeParameter+>` if present.
fn parse_type_parameters(cursor: Cursor<'_>) -> Parsed<'_, Vec<TypeParameter>> {
    let Some(mut cursor) = cursor.eat(b'<') else {
        return Ok((Vec::new(), cursor));
    };
    let mut parameters = Vec::new();
    loop {
        let (parameter, next) = TypeParameter::parse(cursor)?;
        parameters.push(parameter);
        cursor = next;
        if let Some(next) = cursor.eat(b'>') {
            break Ok((parameters, next));
        }
    }
}

impl Production for FieldSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let (field_type, cursor) = ReferenceTypeSignature::parse(cursor)?;
        Ok((Self { field_type }, cursor))
    }
}

impl Production for ClassSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let (type_parameters, cursor) = parse_type_parameters(cursor)?;
        let (super_class, mut cursor) = ClassTypeSignature::parse(cursor)?;
        let mut super_interfaces = Vec::new();
        while !cursor.is_at_end() {
            let (interface, next) = ClassTypeSignature::parse(cursor)?;
            super_interfaces.push(interface);
            cursor = next;
        }
        Ok((
            Self {
                type_parameters,
                super_class,
                super_interfaces,
            },
            cursor,
        ))
    }
}

impl Production for MethodSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        let (type_parameters, cursor) = parse_type_parameters(cursor)?;
        let mut cursor = cursor.expect(b'(', "'('")?;
        let mut parameter_types = Vec::new();
        let cursor = loop {
            if let Some(next) = cursor.eat(b')') {
                break next;
            }
            if !cursor.at_java_type() {
                return Err(cursor.error("a parameter type or ')'"));
            }
            let (parameter, next) = JavaTypeSignature::parse(cursor)?;
            parameter_types.push(parameter);
            cursor = next;
        };
        let (result_type, mut cursor) = ResultType::parse(cursor)?;
        let mut throw_types = Vec::new();
        while let Some(next) = cursor.eat(b'^') {
            let (throws, next) = ThrowsSignature::parse(next)?;
            throw_types.push(throws);
            cursor = next;
        }
        Ok((
            Self {
                type_parameters,
                parameter_types,
                result_type,
                throw_types,
            },
            cursor,
        ))
    }
}

impl Production for ResultType {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        if let Some(next) = cursor.eat(b'V') {
            Ok((Self::Void, next))
        } else if cursor.at_java_type() {
            JavaTypeSignature::parse(cursor).map(|(it, c)| (Self::Some(it), c))
        } else {
            Err(cursor.error("a result type"))
        }
    }
}

impl Production for ThrowsSignature {
    fn parse(cursor: Cursor<'_>) -> Parsed<'_, Self> {
        match cursor.peek() {
            Some(b'L') => ClassTypeSignature::parse(cursor).map(|(it, c)| (Self::Class(it), c)),
            Some(b'T') => TypeVariableSignature::parse(cursor).map(|(it, c)| (Self::TypeVariable(it), c)),
            _ => Err(cursor.error("a class type or type variable signature")),
        }
    }
}
