//! Module naming.
//!
//! A [`ModulePath`] is what an `import` statement spells (`Game.Player`).
//! An [`ArtifactName`] is the package-root namespace joined with that path,
//! the key under which a module is cached.

use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    /// The main module of a package.
    pub fn main() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Split a dotted path. Empty input yields the main path.
    pub fn from_dotted(text: &str) -> Self {
        Self(
            text.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Fully qualified module name: `<package namespace>.<relative path>`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn join(&self, relative: &ModulePath) -> ArtifactName {
        if relative.is_main() {
            return self.clone();
        }
        if self.0.is_empty() {
            return ArtifactName(relative.to_string());
        }
        ArtifactName(format!("{}.{}", self.0, relative))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualify a member name: `game.Player` + `move` → `game.Player.move`.
    pub fn member(&self, name: &str) -> String {
        if self.0.is_empty() {
            return name.to_owned();
        }
        format!("{}.{}", self.0, name)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
