//! Loading the root file and everything it imports.
//!
//! Files are parsed depth-first in import order, each canonical path once, so
//! diamond and cyclic imports terminate. The resulting file order is the
//! declaration order used by every later phase.

use crate::error::{Error, LoadError, StructuralError};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::{Component, Path, PathBuf},
};
use tracing::debug;
use webdsl_config::ImportConfig;
use webdsl_syntax::{SourceMap, ast, parse_file};

///
/// SourceLoader
///
/// Resolves import strings to canonical file identities and reads their
/// text. Implementations decide what "canonical" means; two imports that
/// resolve to the same path are loaded once.
///

pub trait SourceLoader {
    /// Canonical identity of the root file.
    fn root(&self, path: &Path) -> Result<PathBuf, LoadError>;

    /// Canonical identity of `import` as written in `from`, trying the
    /// importing file's directory first and then each search path.
    fn resolve(&self, from: &Path, import: &str, search_paths: &[PathBuf]) -> Option<PathBuf>;

    fn read(&self, path: &Path) -> io::Result<String>;
}

// candidates
// directory of the importing file first, then the configured search paths
fn candidates(from: &Path, import: &str, search_paths: &[PathBuf]) -> Vec<PathBuf> {
    let base = from.parent().unwrap_or_else(|| Path::new(""));

    std::iter::once(base.join(import))
        .chain(search_paths.iter().map(|dir| dir.join(import)))
        .collect()
}

///
/// FsLoader
///

#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn root(&self, path: &Path) -> Result<PathBuf, LoadError> {
        fs::canonicalize(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolve(&self, from: &Path, import: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
        candidates(from, import, search_paths)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .map(|found| fs::canonicalize(&found).unwrap_or(found))
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

///
/// MemoryLoader
/// Serves files from an in-memory map; paths are normalised lexically.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), text.into());
    }
}

impl SourceLoader for MemoryLoader {
    fn root(&self, path: &Path) -> Result<PathBuf, LoadError> {
        let path = normalize(path);
        if self.files.contains_key(&path) {
            Ok(path)
        } else {
            Err(LoadError::Read {
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                path,
            })
        }
    }

    fn resolve(&self, from: &Path, import: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
        candidates(from, import, search_paths)
            .iter()
            .map(|candidate| normalize(candidate))
            .find(|candidate| self.files.contains_key(candidate))
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

// normalize
// resolves `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

///
/// Repository
/// All files reachable from one root, in load order (root first).
///

#[derive(Debug)]
pub struct Repository {
    pub sources: SourceMap,
    pub files: Vec<ast::File>,
}

/// Load and parse `root` and its transitive imports.
pub fn load_repository(
    root: &Path,
    loader: &dyn SourceLoader,
    config: &ImportConfig,
) -> Result<Repository, Error> {
    let mut loading = Loading {
        loader,
        config,
        sources: SourceMap::new(),
        files: Vec::new(),
        seen: BTreeSet::new(),
    };

    let root = loader.root(root)?;
    loading.seen.insert(root.clone());
    loading.load(root, 0)?;

    Ok(Repository {
        sources: loading.sources,
        files: loading.files,
    })
}

///
/// Loading
///

struct Loading<'a> {
    loader: &'a dyn SourceLoader,
    config: &'a ImportConfig,
    sources: SourceMap,
    files: Vec<ast::File>,
    seen: BTreeSet<PathBuf>,
}

impl Loading<'_> {
    fn load(&mut self, path: PathBuf, depth: usize) -> Result<(), Error> {
        let text = self.loader.read(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;

        let id = self.sources.add(path.clone(), text);
        let file = parse_file(&self.sources.file(id).text, id).map_err(|error| Error::Parse {
            location: self.sources.location(error.span),
            error,
        })?;
        debug!(
            path = %path.display(),
            depth,
            imports = file.imports.len(),
            decls = file.decls.len(),
            "loaded source file"
        );

        let imports = file.imports.clone();
        self.files.push(file);

        for import in imports {
            let location = self.sources.location(import.span);
            if depth + 1 > self.config.max_depth {
                return Err(StructuralError::at(
                    format!(
                        "import \"{}\" exceeds the maximum import depth of {}",
                        import.path, self.config.max_depth
                    ),
                    location,
                )
                .into());
            }

            let Some(resolved) = self
                .loader
                .resolve(&path, &import.path, &self.config.search_paths)
            else {
                return Err(LoadError::ImportNotFound {
                    import: import.path,
                    location,
                }
                .into());
            };

            if self.seen.insert(resolved.clone()) {
                self.load(resolved, depth + 1)?;
            }
        }

        Ok(())
    }
}
