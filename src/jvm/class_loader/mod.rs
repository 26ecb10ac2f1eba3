//! Discovering and loading classes.

use std::{
    collections::{HashMap, HashSet},
    ops::Deref,
    sync::{Arc, RwLock},
};

use crate::{analysis::generics::SignatureLookup, types::signatures::ClassSignature};

use super::{class::Class, references::ClassRef};

pub mod class_paths;

pub use class_paths::DirectoryClassPath;
#[cfg(feature = "jar")]
pub use class_paths::JarClassPath;

/// An error that can occur while loading a class.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The class could not be found.
    #[error("Class not found: {0}")]
    NotFound(String),
    /// Error occurred while parsing the class bytes.
    #[error("Error parsing class bytes: {0}")]
    Malformed(#[from] super::parsing::Error),
    /// Error occurred while reading the class bytes or locating the class file.
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    /// Other error occurred.
    #[error("Cause: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A class path that can be searched for classes.
pub trait ClassPath {
    /// Find a class by its binary name.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if the class path does not contain the class.
    /// - See [`Error`] for the other errors.
    fn find_class(&self, binary_name: &str) -> Result<Class, Error>;
}

impl<T> ClassPath for T
where
    T: Deref,
    <T as Deref>::Target: ClassPath,
{
    fn find_class(&self, binary_name: &str) -> Result<Class, Error> {
        self.deref().find_class(binary_name)
    }
}

/// A class path that can list all the classes it contains.
pub trait ClassRefs {
    /// List all classes.
    ///
    /// # Errors
    /// See [`Error`].
    fn class_refs(&self) -> Result<HashSet<ClassRef>, Error>;
}

/// A class loader that can load classes from a list of class paths.
#[derive(Debug)]
pub struct ClassLoader<P> {
    class_path: Vec<P>,
}

impl<P: ClassPath> ClassLoader<P> {
    /// Loads a class from the first class path containing it.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if none of the class paths contains the class.
    /// - Any other error of the first class path that fails.
    pub fn load_class(&self, binary_name: impl AsRef<str>) -> Result<Class, Error> {
        let binary_name = binary_name.as_ref();
        for class_path in &self.class_path {
            match class_path.find_class(binary_name) {
                Ok(class) => return Ok(class),
                Err(Error::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Err(Error::NotFound(binary_name.to_owned()))
    }
}

impl<P> ClassLoader<P> {
    /// Create a new class loader with the given class paths.
    #[must_use]
    pub fn new(class_path: impl Into<Vec<P>>) -> Self {
        let class_path = class_path.into();
        Self { class_path }
    }

    /// The class paths, in search order.
    #[must_use]
    pub fn class_path(&self) -> &[P] {
        &self.class_path
    }

    /// Convert this class loader into a [`CachingClassLoader`].
    #[must_use]
    pub fn into_cached(self) -> CachingClassLoader<P> {
        CachingClassLoader {
            class_loader: self,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl<P: ClassRefs> ClassRefs for ClassLoader<P> {
    fn class_refs(&self) -> Result<HashSet<ClassRef>, Error> {
        let mut class_refs = HashSet::new();
        for class_path in &self.class_path {
            class_refs.extend(class_path.class_refs()?);
        }
        Ok(class_refs)
    }
}

/// A class loader that caches loaded classes.
///
/// The cache is keyed by binary name and is never evicted. Only successfully loaded classes are
/// cached, so a class that is not found is looked up again on the next request.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CachingClassLoader<P> {
    class_loader: ClassLoader<P>,
    cache: RwLock<HashMap<String, Arc<Class>>>,
}

impl<P: ClassPath> CachingClassLoader<P> {
    /// Loads a class from the class loader's cache, or loads it from the class loader if it is
    /// not.
    ///
    /// # Errors
    /// See [`ClassLoader::load_class`].
    pub fn load_class(&self, binary_name: impl AsRef<str>) -> Result<Arc<Class>, Error> {
        let binary_name = binary_name.as_ref();
        {
            let cache = self
                .cache
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(class) = cache.get(binary_name) {
                return Ok(Arc::clone(class));
            }
        }
        let class = Arc::new(self.class_loader.load_class(binary_name)?);
        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Another thread may have loaded the class while the lock was released.
        let cached = cache
            .entry(binary_name.to_owned())
            .or_insert(class);
        Ok(Arc::clone(cached))
    }

    /// The number of classes in the cache.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl<P> CachingClassLoader<P> {
    /// The class loader behind the cache.
    #[must_use]
    pub fn class_loader(&self) -> &ClassLoader<P> {
        &self.class_loader
    }
}

impl<P: ClassRefs> ClassRefs for CachingClassLoader<P> {
    fn class_refs(&self) -> Result<HashSet<ClassRef>, Error> {
        self.class_loader.class_refs()
    }
}

/// Reports a failed load as a missing class, which the resolver treats as a cut-off ancestor.
fn signature_or_none(binary_name: &str, loaded: Result<ClassSignature, Error>) -> Option<ClassSignature> {
    match loaded {
        Ok(signature) => Some(signature),
        Err(Error::NotFound(_)) => {
            tracing::debug!(target: "cortado::class_loader", binary_name, "class not found in the class path");
            None
        }
        Err(error) => {
            tracing::debug!(target: "cortado::class_loader", binary_name, %error, "failed to load class");
            None
        }
    }
}

impl<P: ClassPath> SignatureLookup for ClassLoader<P> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        let loaded = self
            .load_class(binary_name)
            .map(|it| it.generic_signature());
        signature_or_none(binary_name, loaded)
    }
}

impl<P: ClassPath> SignatureLookup for CachingClassLoader<P> {
    fn class_signature(&self, binary_name: &str) -> Option<ClassSignature> {
        let loaded = self
            .load_class(binary_name)
            .map(|it| it.generic_signature());
        signature_or_none(binary_name, loaded)
    }
}
