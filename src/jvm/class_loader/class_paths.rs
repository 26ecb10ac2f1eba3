//! Implementations of [`ClassPath`].

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

#[cfg(feature = "jar")]
use zip::{ZipArchive, result::ZipError};

use crate::jvm::{class::Class, references::ClassRef};

use super::{ClassPath, ClassRefs, Error};

const CLASS_FILE_EXTENSION: &str = "class";
const MODULE_INFO: &str = "module-info";

/// A class path that searches for classes in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryClassPath {
    directory: PathBuf,
}

impl DirectoryClassPath {
    /// Create a new directory class path.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The root directory of the class path.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ClassPath for DirectoryClassPath {
    fn find_class(&self, binary_name: &str) -> Result<Class, Error> {
        let class_file_path = self
            .directory
            .join(format!("{binary_name}.{CLASS_FILE_EXTENSION}"));
        if !class_file_path.is_file() {
            return Err(Error::NotFound(binary_name.to_owned()));
        }
        let class_file = File::open(class_file_path)?;
        let class = Class::from_reader(BufReader::new(class_file))?;
        Ok(class)
    }
}

impl ClassRefs for DirectoryClassPath {
    fn class_refs(&self) -> Result<HashSet<ClassRef>, Error> {
        let mut class_refs = HashSet::new();
        for entry in walkdir::WalkDir::new(&self.directory) {
            let entry = entry.map_err(|e| Error::Other(Box::new(e)))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|it| it != CLASS_FILE_EXTENSION)
            {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.directory) else {
                continue;
            };
            let binary_name = relative
                .with_extension("")
                .components()
                .map(|it| it.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            if binary_name != MODULE_INFO {
                class_refs.insert(ClassRef::new(binary_name));
            }
        }
        Ok(class_refs)
    }
}

/// A class path that searches for classes in a JAR file.
#[derive(Debug, Clone)]
#[cfg(feature = "jar")]
pub struct JarClassPath {
    jar_file: PathBuf,
}

#[cfg(feature = "jar")]
impl JarClassPath {
    /// Create a new JAR class path.
    pub fn new(jar_file: impl Into<PathBuf>) -> Self {
        Self {
            jar_file: jar_file.into(),
        }
    }

    fn open(&self) -> Result<ZipArchive<BufReader<File>>, Error> {
        let jar_file = File::open(&self.jar_file)?;
        ZipArchive::new(BufReader::new(jar_file)).map_err(zip_error)
    }
}

#[cfg(feature = "jar")]
fn zip_error(error: ZipError) -> Error {
    match error {
        ZipError::Io(io_err) => Error::IO(io_err),
        e => Error::Other(Box::new(e)),
    }
}

#[cfg(feature = "jar")]
impl ClassPath for JarClassPath {
    fn find_class(&self, binary_name: &str) -> Result<Class, Error> {
        let mut jar_archive = self.open()?;
        let class_file = jar_archive
            .by_name(&format!("{binary_name}.{CLASS_FILE_EXTENSION}"))
            .map_err(|e| match e {
                ZipError::FileNotFound => Error::NotFound(binary_name.to_owned()),
                e => zip_error(e),
            })?;
        Class::from_reader(class_file).map_err(Into::into)
    }
}

#[cfg(feature = "jar")]
impl ClassRefs for JarClassPath {
    fn class_refs(&self) -> Result<HashSet<ClassRef>, Error> {
        let jar_archive = self.open()?;
        let class_refs: HashSet<ClassRef> = jar_archive
            .file_names()
            .filter_map(|it| it.strip_suffix(".class"))
            // Multi-release and module descriptors are not classes on the class path.
            .filter(|it| !it.starts_with("META-INF/") && !it.ends_with(MODULE_INFO))
            .map(ClassRef::new)
            .collect();
        Ok(class_refs)
    }
}
