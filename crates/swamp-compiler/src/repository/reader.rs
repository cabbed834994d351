//! Finding module source text.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swamp_core::settings::{
    EnvironmentSettings, MAIN_MODULE_FILE_NAME, MODULE_EXTENSION, PackageSettings, SettingsError,
    user_config_dir,
};
use swamp_core::{ArtifactName, ModulePath};
use thiserror::Error;

/// Reads documents by absolute path.
pub trait DocumentProvider {
    fn read_document(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemDocuments;

impl DocumentProvider for FileSystemDocuments {
    fn read_document(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// In-memory buffers shadowing a fallback provider (unsaved editor buffers).
#[derive(Debug, Clone, Default)]
pub struct OverlayDocuments<P> {
    overlays: HashMap<PathBuf, String>,
    fallback: P,
}

impl<P: DocumentProvider> OverlayDocuments<P> {
    pub fn new(fallback: P) -> Self {
        Self {
            overlays: HashMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.overlays.insert(path.into(), text.into());
    }

    pub fn remove(&mut self, path: &Path) -> Option<String> {
        self.overlays.remove(path)
    }
}

impl<P: DocumentProvider> DocumentProvider for OverlayDocuments<P> {
    fn read_document(&self, path: &Path) -> io::Result<String> {
        match self.overlays.get(path) {
            Some(text) => Ok(text.clone()),
            None => self.fallback.read_document(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// The package's `main.swamp`.
    Main,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    File(PathBuf),
    /// Addressed by URI only, never on disk.
    Memory(String),
}

impl DocumentLocation {
    /// Key for the repository's path map.
    pub fn path(&self) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Memory(uri) => PathBuf::from(uri),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDocument {
    pub location: DocumentLocation,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("module `{module}` not found (tried {})", display_paths(.tried))]
    NotFound { module: String, tried: Vec<PathBuf> },

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    let shown: Vec<String> = paths.iter().map(|p| format!("`{}`", p.display())).collect();
    shown.join(", ")
}

/// Yields the source of a module by its path relative to a package.
pub trait ModuleReader {
    fn read_module(
        &mut self,
        kind: ModuleKind,
        relative: &ModulePath,
        namespace: &ArtifactName,
    ) -> Result<ModuleDocument, ReadError>;
}

/// Reads modules below a package directory.
///
/// `Main` is `main.swamp`; `Game.Player` is `game/player.swamp`. A first
/// segment naming a module root (package settings first, then the user
/// environment) is looked up below that root instead.
#[derive(Debug, Clone)]
pub struct PackageModuleReader<P = FileSystemDocuments> {
    package_dir: PathBuf,
    roots: Vec<(String, PathBuf)>,
    documents: P,
}

impl PackageModuleReader<FileSystemDocuments> {
    /// Reader configured from `package.toml` and the user environment file.
    pub fn from_settings(package_dir: &Path) -> Result<Self, SettingsError> {
        let mut roots = Vec::new();
        if let Some(settings) = PackageSettings::load_from_dir(package_dir)? {
            roots.extend(settings.module_roots(package_dir)?);
        }
        if let Some(environment) = EnvironmentSettings::load_user()? {
            let base = user_config_dir().unwrap_or_else(|| package_dir.to_path_buf());
            roots.extend(environment.package_roots(&base)?);
        }
        Ok(Self::new(package_dir, roots, FileSystemDocuments))
    }
}

impl<P: DocumentProvider> PackageModuleReader<P> {
    pub fn new(package_dir: &Path, roots: Vec<(String, PathBuf)>, documents: P) -> Self {
        Self {
            package_dir: package_dir.to_path_buf(),
            roots,
            documents,
        }
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Candidate file for a module path.
    pub fn module_file(&self, kind: ModuleKind, relative: &ModulePath) -> PathBuf {
        if kind == ModuleKind::Main || relative.is_main() {
            return self.package_dir.join(MAIN_MODULE_FILE_NAME);
        }

        let segments = relative.segments();
        let root = relative
            .first()
            .and_then(|first| self.roots.iter().find(|(name, _)| name == first));
        let (base, rest) = match root {
            Some((_, dir)) => (dir.as_path(), &segments[1..]),
            None => (self.package_dir.as_path(), segments),
        };
        if rest.is_empty() {
            return base.join(MAIN_MODULE_FILE_NAME);
        }

        let mut path = base.to_path_buf();
        for segment in rest {
            path.push(segment.to_lowercase());
        }
        path.set_extension(MODULE_EXTENSION);
        path
    }
}

impl<P: DocumentProvider> ModuleReader for PackageModuleReader<P> {
    fn read_module(
        &mut self,
        kind: ModuleKind,
        relative: &ModulePath,
        namespace: &ArtifactName,
    ) -> Result<ModuleDocument, ReadError> {
        let path = self.module_file(kind, relative);
        match self.documents.read_document(&path) {
            Ok(text) => Ok(ModuleDocument {
                location: DocumentLocation::File(path),
                text,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ReadError::NotFound {
                module: namespace.join(relative).to_string(),
                tried: vec![path],
            }),
            Err(source) => Err(ReadError::Io { path, source }),
        }
    }
}

/// Serves module sources from memory, keyed by dotted path (`""` for main).
#[derive(Debug, Clone, Default)]
pub struct MemoryModuleReader {
    modules: HashMap<String, String>,
}

impl MemoryModuleReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main(text: impl Into<String>) -> Self {
        let mut reader = Self::new();
        reader.insert("", text);
        reader
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.modules.insert(path.into(), text.into());
    }
}

impl ModuleReader for MemoryModuleReader {
    fn read_module(
        &mut self,
        kind: ModuleKind,
        relative: &ModulePath,
        namespace: &ArtifactName,
    ) -> Result<ModuleDocument, ReadError> {
        let key = match kind {
            ModuleKind::Main => String::new(),
            ModuleKind::Import => relative.to_string(),
        };
        let name = if key.is_empty() { "main" } else { key.as_str() };
        let uri = format!("memory://{namespace}/{name}.{MODULE_EXTENSION}");
        match self.modules.get(&key) {
            Some(text) => Ok(ModuleDocument {
                location: DocumentLocation::Memory(uri),
                text: text.clone(),
            }),
            None => Err(ReadError::NotFound {
                module: namespace.join(relative).to_string(),
                tried: vec![PathBuf::from(uri)],
            }),
        }
    }
}
