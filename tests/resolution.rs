use std::collections::HashMap;

use cortado::{
    analysis::generics::{ClassResolver, ResolutionError, Substitution},
    types::signatures::{
        BaseType, ClassSignature, ClassTypeSignature, JavaTypeSignature, ReferenceTypeSignature,
        ResultType, TypeArgument, TypeVariableSignature,
    },
};
use proptest::prelude::*;

fn classes(signatures: &[(&str, &str)]) -> HashMap<String, ClassSignature> {
    signatures
        .iter()
        .map(|(name, signature)| ((*name).to_owned(), signature.parse().unwrap()))
        .collect()
}

fn resolver<'c>(
    binary_name: &str,
    signature: &str,
    lookup: &'c HashMap<String, ClassSignature>,
) -> ClassResolver<&'c HashMap<String, ClassSignature>> {
    ClassResolver::new(binary_name, signature.parse().unwrap(), lookup)
}

fn reference(signature: &str) -> ReferenceTypeSignature {
    signature.parse().unwrap()
}

#[test]
fn inherited_getter_of_parameterized_base() {
    let lookup = classes(&[("pkg/Base", "<X:Ljava/lang/Object;>Ljava/lang/Object;")]);
    let sub = resolver("pkg/Sub", "Lpkg/Base<Ljava/lang/String;>;", &lookup);
    let get = sub.method("pkg/Base", "()TX;".parse().unwrap());
    assert_eq!(
        get.resolve_result().unwrap(),
        ResultType::Some("Ljava/lang/String;".parse().unwrap())
    );
    let value = sub.field("pkg/Base", "TX;".parse().unwrap());
    assert_eq!(value.resolve_field().unwrap(), reference("Ljava/lang/String;"));
}

#[test]
fn substitutions_compose_along_the_hierarchy() {
    let lookup = classes(&[
        ("pkg/B", "<Q:Ljava/lang/Object;>Lpkg/C<Ljava/util/List<TQ;>;>;"),
        ("pkg/C", "<R:Ljava/lang/Object;>Ljava/lang/Object;"),
    ]);
    let a = resolver("pkg/A", "<P:Ljava/lang/Object;>Lpkg/B<TP;>;", &lookup);
    let r = TypeVariableSignature::new("R");
    assert_eq!(
        a.resolve_variable("pkg/C", &r).unwrap(),
        reference("Ljava/util/List<TP;>;")
    );
    assert_eq!(
        a.field("pkg/C", "TR;".parse().unwrap()).resolve_field().unwrap(),
        reference("Ljava/util/List<TP;>;")
    );

    let receiver: ClassTypeSignature = "Lpkg/A<Ljava/lang/Integer;>;".parse().unwrap();
    let instantiated = a.substitution_for(&receiver, "pkg/C").unwrap();
    assert_eq!(
        instantiated.get("R"),
        Some(&TypeArgument::Exact(reference("Ljava/util/List<Ljava/lang/Integer;>;")))
    );
    assert_eq!(
        instantiated.apply_reference(&ReferenceTypeSignature::TypeVariable(r)),
        reference("Ljava/util/List<Ljava/lang/Integer;>;")
    );
}

#[test]
fn interfaces_are_part_of_the_hierarchy() {
    let lookup = classes(&[
        ("java/util/List", "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;"),
        ("java/util/Collection", "<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Iterable<TE;>;"),
        ("java/lang/Iterable", "<T:Ljava/lang/Object;>Ljava/lang/Object;"),
    ]);
    let my_list = resolver(
        "pkg/MyList",
        "<T:Ljava/lang/Number;>Ljava/lang/Object;Ljava/util/List<TT;>;",
        &lookup,
    );
    assert_eq!(
        my_list.ancestors().unwrap(),
        vec![
            "java/util/List",
            "java/util/Collection",
            "java/lang/Iterable",
            "java/lang/Object",
        ]
    );
    let iterator = my_list.method("java/lang/Iterable", "()Ljava/util/Iterator<TT;>;".parse().unwrap());
    assert_eq!(
        iterator.resolve_result().unwrap(),
        ResultType::Some("Ljava/util/Iterator<TT;>;".parse().unwrap())
    );
    let add = my_list.method("java/util/Collection", "(TE;)Z".parse().unwrap());
    assert_eq!(add.substitute_parameter(0).unwrap().to_string(), "TT;");
    assert_eq!(add.resolve_parameter(0).unwrap().to_string(), "Ljava/lang/Number;");
    assert_eq!(
        add.resolve_result().unwrap(),
        ResultType::Some(JavaTypeSignature::Base(BaseType::Boolean))
    );
}

#[test]
fn cut_off_hierarchy_still_reaches_object() {
    let lookup = classes(&[]);
    let sub = resolver("pkg/Sub", "Lpkg/Missing<Ljava/lang/String;>;", &lookup);
    assert_eq!(sub.ancestors().unwrap(), vec!["pkg/Missing", "java/lang/Object"]);

    let get_class = sub.method("java/lang/Object", "()Ljava/lang/Class<*>;".parse().unwrap());
    assert_eq!(
        get_class.resolve_result().unwrap(),
        ResultType::Some("Ljava/lang/Class<*>;".parse().unwrap())
    );
    let hash_code = sub.method("java/lang/Object", "()I".parse().unwrap());
    assert_eq!(
        hash_code.resolve_result().unwrap(),
        ResultType::Some(JavaTypeSignature::Base(BaseType::Int))
    );
    let name = sub.field("pkg/Missing", "Ljava/lang/String;".parse().unwrap());
    assert_eq!(name.resolve_field().unwrap(), reference("Ljava/lang/String;"));

    let unknown = sub.field("pkg/Missing", "TX;".parse().unwrap());
    assert_eq!(
        unknown.resolve_field(),
        Err(ResolutionError::UnboundTypeVariable {
            variable: "X".to_owned(),
            context: "pkg/Missing".to_owned(),
        })
    );
}

#[test]
fn wildcards_combine_through_substitution() {
    let lookup = classes(&[(
        "pkg/Base",
        "<X:Ljava/lang/Object;Y:Ljava/lang/Object;>Ljava/lang/Object;",
    )]);
    let sub = resolver(
        "pkg/Sub",
        "Lpkg/Base<Ljava/lang/Integer;-Ljava/lang/Number;>;",
        &lookup,
    );
    let field = |signature: &str| {
        sub.field("pkg/Base", signature.parse().unwrap())
            .resolve_field()
            .unwrap()
            .to_string()
    };
    assert_eq!(field("Ljava/util/List<+TX;>;"), "Ljava/util/List<+Ljava/lang/Integer;>;");
    assert_eq!(field("Ljava/util/List<-TX;>;"), "Ljava/util/List<-Ljava/lang/Integer;>;");
    assert_eq!(field("Ljava/util/List<TY;>;"), "Ljava/util/List<-Ljava/lang/Number;>;");
    assert_eq!(field("Ljava/util/List<+TY;>;"), "Ljava/util/List<*>;");
    assert_eq!(field("Ljava/util/List<*>;"), "Ljava/util/List<*>;");
    assert_eq!(field("TY;"), "Ljava/lang/Object;");
}

#[test]
fn raw_super_type_binds_erased_bounds() {
    let lookup = classes(&[(
        "pkg/Base",
        "<X:Ljava/lang/Comparable<TX;>;Y:TX;>Ljava/lang/Object;",
    )]);
    let sub = resolver("pkg/Sub", "Lpkg/Base;", &lookup);
    let substitution = sub.substitution_to("pkg/Base").unwrap();
    assert_eq!(substitution.len(), 2);
    assert_eq!(
        substitution.get("X"),
        Some(&TypeArgument::Exact(reference("Ljava/lang/Comparable;")))
    );
    assert_eq!(
        substitution.get("Y"),
        Some(&TypeArgument::Exact(reference("Ljava/lang/Comparable;")))
    );
}

#[test]
fn malformed_hierarchies_fail_fast() {
    let lookup = classes(&[
        ("pkg/B", "Lpkg/C;"),
        ("pkg/C", "Lpkg/B;"),
        ("pkg/Pair", "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"),
    ]);
    let cyclic = resolver("pkg/A", "Lpkg/B;", &lookup);
    assert!(matches!(
        cyclic.field("pkg/D", "Ljava/lang/String;".parse().unwrap()).resolve_field(),
        Err(ResolutionError::CyclicHierarchy(_))
    ));

    let wrong_arity = resolver("pkg/A", "Lpkg/Pair<Ljava/lang/String;>;", &lookup);
    assert_eq!(
        wrong_arity.substitution_to("pkg/Pair"),
        Err(ResolutionError::TypeArgumentCount {
            class: "pkg/Pair".to_owned(),
            expected: 2,
            found: 1,
        })
    );

    let unrelated = resolver("pkg/A", "Ljava/lang/Object;", &lookup);
    assert_eq!(
        unrelated.substitution_to("pkg/B"),
        Err(ResolutionError::NotAnAncestor {
            class: "pkg/A".to_owned(),
            ancestor: "pkg/B".to_owned(),
        })
    );
}

#[test]
fn receiver_substitution() {
    let map: ClassSignature = "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;"
        .parse()
        .unwrap();
    let receiver: ClassTypeSignature = "Ljava/util/Map<Ljava/lang/String;+Ljava/lang/Number;>;"
        .parse()
        .unwrap();
    let substitution = Substitution::for_receiver(&map, &receiver).unwrap();
    assert_eq!(
        substitution.apply_reference(&reference("TV;")),
        reference("Ljava/lang/Number;")
    );
    assert_eq!(
        substitution
            .apply_reference(&reference("Ljava/util/Set<Ljava/util/Map$Entry<TK;TV;>;>;"))
            .to_string(),
        "Ljava/util/Set<Ljava/util/Map$Entry<Ljava/lang/String;+Ljava/lang/Number;>;>;"
    );
}

/// Builds `Start extends C0<String>` and `Ci<Ti> extends Ci+1<List<Ti>>` for `i < depth`.
fn list_chain(depth: usize) -> HashMap<String, ClassSignature> {
    (0..=depth)
        .map(|i| {
            let super_type = if i == depth {
                "Ljava/lang/Object;".to_owned()
            } else {
                format!("Lchain/C{}<Ljava/util/List<TT{i};>;>;", i + 1)
            };
            let signature = format!("<T{i}:Ljava/lang/Object;>{super_type}");
            (format!("chain/C{i}"), signature.parse().unwrap())
        })
        .collect()
}

proptest! {
    #[test]
    fn deep_chains_compose(depth in 0usize..12) {
        let lookup = list_chain(depth);
        let start = resolver("chain/Start", "Lchain/C0<Ljava/lang/String;>;", &lookup);
        let expected = format!(
            "{}Ljava/lang/String;{}",
            "Ljava/util/List<".repeat(depth),
            ">;".repeat(depth)
        );
        let resolved = start
            .resolve_variable(&format!("chain/C{depth}"), &TypeVariableSignature::new(format!("T{depth}")))
            .unwrap();
        prop_assert_eq!(resolved.to_string(), expected);
        prop_assert_eq!(start.ancestors().unwrap().len(), depth + 2);
    }
}
