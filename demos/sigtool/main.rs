use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use cortado::analysis::generics::{ClassResolver, ResolutionError};
use cortado::jvm::class_loader::{self, ClassLoader, ClassPath, DirectoryClassPath};
use cortado::jvm::{Class, parsing};
use cortado::types::signatures::{
    ClassSignature, FieldSignature, InvalidSignature, MethodSignature, Signature,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Printers for signatures and resolved members
mod printer;

/// Command line arguments
#[derive(Parser)]
#[command(name = "sigtool")]
#[command(about = "Inspects JVM generic signatures", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a signature and print its structure
    Parse {
        /// The kind of the signature
        #[arg(short, long, value_enum, default_value_t = SignatureKind::Class)]
        kind: SignatureKind,
        /// The signature, e.g., `<T:Ljava/lang/Object;>Ljava/lang/Object;`
        signature: String,
    },
    /// Print the classes referenced by the generic signatures in class files
    Refs {
        /// Class files to process
        #[arg(required = true)]
        class_files: Vec<PathBuf>,
    },
    /// Resolve the members of a class and its ancestors as seen from the class
    Resolve {
        /// Directories or JAR files to search for classes, in order
        #[arg(short = 'p', long = "class-path", required = true)]
        class_path: Vec<PathBuf>,
        /// The binary name of the class, e.g., `java/util/ArrayList`
        class: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SignatureKind {
    Class,
    Method,
    Field,
}

/// Errors of the sigtool commands
#[derive(Debug, Error)]
enum SigtoolError {
    /// Error when reading files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when parsing a signature
    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignature),

    /// Error when parsing class files
    #[error("Class parse error: {0}")]
    ClassParse(#[from] parsing::Error),

    /// Error when loading classes from the class path
    #[error("Class loading error: {0}")]
    ClassLoading(#[from] class_loader::Error),

    /// Error when resolving type variables
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Parse { kind, signature } => parse_signature(kind, &signature),
        Command::Refs { class_files } => print_references(&class_files),
        Command::Resolve { class_path, class } => resolve_class(&class_path, &class),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_signature(kind: SignatureKind, signature: &str) -> Result<(), SigtoolError> {
    let references = match kind {
        SignatureKind::Class => {
            let parsed: ClassSignature = signature.parse()?;
            printer::print_class_signature(&parsed);
            sorted(parsed.erased_binary_references())
        }
        SignatureKind::Method => {
            let parsed: MethodSignature = signature.parse()?;
            printer::print_method_signature(&parsed);
            sorted(parsed.erased_binary_references())
        }
        SignatureKind::Field => {
            let parsed: FieldSignature = signature.parse()?;
            printer::print_field_signature(&parsed);
            sorted(parsed.erased_binary_references())
        }
    };
    println!();
    println!("references:");
    for reference in references {
        println!("  {reference}");
    }
    Ok(())
}

fn sorted<'a>(references: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut references: Vec<_> = references.into_iter().map(str::to_owned).collect();
    references.sort();
    references
}

fn print_references(class_files: &[PathBuf]) -> Result<(), SigtoolError> {
    for class_file in class_files {
        let class = parse_class_file(class_file)?;
        println!("{}:", class.binary_name);
        let mut references: Vec<_> = class.erased_binary_references().into_iter().collect();
        references.sort();
        for reference in references {
            println!("  {reference}");
        }
    }
    Ok(())
}

/// Parse a class file into a Class structure
fn parse_class_file(path: &Path) -> Result<Class, SigtoolError> {
    let file = File::open(path)?;
    let class = Class::from_reader(BufReader::new(file))?;
    Ok(class)
}

fn open_class_path(path: &Path) -> Box<dyn ClassPath> {
    #[cfg(feature = "jar")]
    if path.extension().is_some_and(|it| it == "jar") {
        return Box::new(class_loader::JarClassPath::new(path));
    }
    Box::new(DirectoryClassPath::new(path))
}

fn resolve_class(class_path: &[PathBuf], binary_name: &str) -> Result<(), SigtoolError> {
    let class_path: Vec<_> = class_path.iter().map(|it| open_class_path(it)).collect();
    let class_loader = ClassLoader::new(class_path).into_cached();
    let class = class_loader.load_class(binary_name)?;
    let resolver = ClassResolver::new(
        class.binary_name.clone(),
        class.generic_signature(),
        &class_loader,
    );
    println!("{}: {}", class.binary_name, resolver.signature());

    let ancestors = resolver.ancestors()?;
    for declaring_class in std::iter::once(class.binary_name.clone()).chain(ancestors) {
        println!();
        match class_loader.load_class(&declaring_class) {
            Ok(declaring) => printer::print_resolved_members(&resolver, &declaring),
            Err(class_loader::Error::NotFound(_)) => println!("{declaring_class} (not found)"),
            Err(e) => return Err(e.into()),
        }
    }
    tracing::debug!(cached = class_loader.cached_count(), "resolution finished");
    Ok(())
}
