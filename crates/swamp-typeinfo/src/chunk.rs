//! In-memory chunk and entry model.

use std::fmt;

use crate::kind::InfoKind;

/// Position of an entry in the chunk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct InfoIndex(u32);

impl InfoIndex {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InfoIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct InfoField {
    pub name: String,
    pub ty: InfoIndex,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct InfoVariant {
    pub name: String,
    pub parameters: Vec<InfoIndex>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum InfoType {
    Int,
    Fixed,
    Bool,
    String,
    Char,
    Blob,
    ResourceName,
    TypeRef,
    Any,
    Unmanaged,
    AnyMatching,
    List(InfoIndex),
    Array(InfoIndex),
    Alias { name: String, target: InfoIndex },
    /// Fields are kept sorted by name; build through [`InfoType::record`].
    Record { fields: Vec<InfoField> },
    Tuple { elements: Vec<InfoIndex> },
    Function { parameters: Vec<InfoIndex> },
    Custom { name: String, variants: Vec<InfoVariant> },
    LocalType { name: String },
}

impl InfoType {
    pub fn record(mut fields: Vec<InfoField>) -> Self {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        InfoType::Record { fields }
    }

    pub fn kind(&self) -> InfoKind {
        match self {
            InfoType::Int => InfoKind::Int,
            InfoType::Fixed => InfoKind::Fixed,
            InfoType::Bool => InfoKind::Bool,
            InfoType::String => InfoKind::String,
            InfoType::Char => InfoKind::Char,
            InfoType::Blob => InfoKind::Blob,
            InfoType::ResourceName => InfoKind::ResourceName,
            InfoType::TypeRef => InfoKind::TypeRef,
            InfoType::Any => InfoKind::Any,
            InfoType::Unmanaged => InfoKind::Unmanaged,
            InfoType::AnyMatching => InfoKind::AnyMatching,
            InfoType::List(_) => InfoKind::List,
            InfoType::Array(_) => InfoKind::Array,
            InfoType::Alias { .. } => InfoKind::Alias,
            InfoType::Record { .. } => InfoKind::Record,
            InfoType::Tuple { .. } => InfoKind::Tuple,
            InfoType::Function { .. } => InfoKind::Function,
            InfoType::Custom { .. } => InfoKind::Custom,
            InfoType::LocalType { .. } => InfoKind::LocalType,
        }
    }

    /// Structural identity used for de-duplication.
    pub fn is_same(&self, other: &InfoType) -> bool {
        match (self, other) {
            (
                InfoType::Custom { name, variants },
                InfoType::Custom {
                    name: other_name,
                    variants: other_variants,
                },
            ) => same_custom(name, variants, other_name, other_variants),
            (InfoType::Record { fields }, InfoType::Record { fields: other }) => {
                same_record(fields, other)
            }
            (InfoType::Function { parameters }, InfoType::Function { parameters: other }) => {
                same_positional(parameters, other)
            }
            (InfoType::Tuple { elements }, InfoType::Tuple { elements: other }) => {
                same_positional(elements, other)
            }
            (InfoType::List(inner), InfoType::List(other)) => inner == other,
            (InfoType::Array(inner), InfoType::Array(other)) => inner == other,
            (
                InfoType::Alias { name, target },
                InfoType::Alias {
                    name: other_name,
                    target: other_target,
                },
            ) => name == other_name && target == other_target,
            (InfoType::LocalType { name }, InfoType::LocalType { name: other }) => name == other,
            (a, b) => a.kind() == b.kind() && a.kind().is_singleton(),
        }
    }
}

fn same_custom(
    name: &str,
    variants: &[InfoVariant],
    other_name: &str,
    other_variants: &[InfoVariant],
) -> bool {
    name == other_name
        && variants.len() == other_variants.len()
        && variants
            .iter()
            .zip(other_variants)
            .all(|(a, b)| a.name == b.name && a.parameters == b.parameters)
}

fn same_record(fields: &[InfoField], other: &[InfoField]) -> bool {
    fields.len() == other.len()
        && fields
            .iter()
            .zip(other)
            .all(|(a, b)| a.name == b.name && a.ty == b.ty)
}

fn same_positional(a: &[InfoIndex], b: &[InfoIndex]) -> bool {
    a == b
}

/// Monotonically indexed table of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeInfoChunk {
    entries: Vec<InfoType>,
}

impl TypeInfoChunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of a structurally equal entry, adding one if needed.
    pub fn add(&mut self, entry: InfoType) -> InfoIndex {
        if let Some(index) = self.find(&entry) {
            return index;
        }
        self.push(entry)
    }

    pub fn find(&self, entry: &InfoType) -> Option<InfoIndex> {
        self.entries
            .iter()
            .position(|existing| existing.is_same(entry))
            .map(InfoIndex::new)
    }

    /// Append without searching. Used to reserve a slot for a recursive
    /// custom type before its variants are known; fill it with [`Self::replace`].
    pub fn push(&mut self, entry: InfoType) -> InfoIndex {
        let index = InfoIndex::new(self.entries.len());
        self.entries.push(entry);
        index
    }

    pub fn replace(&mut self, index: InfoIndex, entry: InfoType) {
        self.entries[index.get()] = entry;
    }

    /// Drop every entry from `len` on. Only safe while nothing refers to them.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn get(&self, index: InfoIndex) -> Option<&InfoType> {
        self.entries.get(index.get())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InfoIndex, &InfoType)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (InfoIndex::new(i), entry))
    }

    pub(crate) fn entries(&self) -> &[InfoType] {
        &self.entries
    }

    pub(crate) fn from_entries(entries: Vec<InfoType>) -> Self {
        Self { entries }
    }
}
