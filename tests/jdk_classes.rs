#![cfg(integration_test)]

use cortado::{
    analysis::generics::{ClassResolver, SignatureLookup},
    jvm::{
        Class,
        class_loader::{ClassLoader, DirectoryClassPath},
    },
    types::signatures::ClassSignature,
};
use rayon::prelude::*;
use std::{env, fs, path::PathBuf};

#[test]
#[ignore = "CI Only"]
fn works_with_jdk_classes() {
    let extracted_modules_images = env::var("JDK_CLASSES").unwrap();
    let extracted_modules_images = PathBuf::from(extracted_modules_images);
    let class_files: Vec<_> = walkdir::WalkDir::new(&extracted_modules_images)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|it| it.path().extension().is_some_and(|it| it == "class"))
        .map(walkdir::DirEntry::into_path)
        .collect();

    // Modules are extracted as `<module>/<package>/<class>.class`.
    let class_path: Vec<_> = fs::read_dir(&extracted_modules_images)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|it| it.path().is_dir())
        .map(|it| DirectoryClassPath::new(it.path()))
        .collect();
    let class_loader = ClassLoader::new(class_path).into_cached();

    class_files.into_par_iter().for_each(|class_file| {
        let reader = fs::File::open(&class_file).unwrap();
        let class = Class::from_reader(std::io::BufReader::new(reader))
            .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", class_file.display()));
        test_a_class(&class, &class_loader);
    });
}

fn test_a_class<L: SignatureLookup>(class: &Class, class_loader: &L) {
    let signature = class.generic_signature();
    let references = class.erased_binary_references();
    for super_type in signature.super_types() {
        assert!(references.contains(super_type.binary()));
    }
    let reparsed: ClassSignature = signature.to_string().parse().unwrap();
    assert_eq!(reparsed, signature);

    let resolver = ClassResolver::new(class.binary_name.clone(), signature, class_loader);
    let ancestors = resolver.ancestors().unwrap_or_else(|e| {
        panic!("Failed to walk the ancestors of {}: {e}", class.binary_name)
    });
    assert_eq!(ancestors.last().map(String::as_str), Some("java/lang/Object"));
}
