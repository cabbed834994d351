//! Entry kind tags.

/// Leading byte of every serialized entry.
///
/// Tags 0 through 12 are the original layout; later kinds extend the range.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum InfoKind {
    Custom = 0,
    Function = 1,
    Alias = 2,
    Record = 3,
    Array = 4,
    List = 5,
    String = 6,
    Int = 7,
    Fixed = 8,
    Bool = 9,
    Blob = 10,
    ResourceName = 11,
    Char = 12,
    Tuple = 13,
    TypeRef = 14,
    Any = 15,
    Unmanaged = 16,
    AnyMatching = 17,
    /// Never serialized; present so an unresolved entry can be named in errors.
    LocalType = 18,
}

impl InfoKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Custom),
            1 => Some(Self::Function),
            2 => Some(Self::Alias),
            3 => Some(Self::Record),
            4 => Some(Self::Array),
            5 => Some(Self::List),
            6 => Some(Self::String),
            7 => Some(Self::Int),
            8 => Some(Self::Fixed),
            9 => Some(Self::Bool),
            10 => Some(Self::Blob),
            11 => Some(Self::ResourceName),
            12 => Some(Self::Char),
            13 => Some(Self::Tuple),
            14 => Some(Self::TypeRef),
            15 => Some(Self::Any),
            16 => Some(Self::Unmanaged),
            17 => Some(Self::AnyMatching),
            18 => Some(Self::LocalType),
            _ => None,
        }
    }

    /// Kinds whose entry is the tag alone.
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Int
                | Self::Fixed
                | Self::Bool
                | Self::Blob
                | Self::ResourceName
                | Self::Char
                | Self::TypeRef
                | Self::Any
                | Self::Unmanaged
                | Self::AnyMatching
        )
    }

    /// Lowercase keyword used by the dump.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Function => "function",
            Self::Alias => "alias",
            Self::Record => "record",
            Self::Array => "array",
            Self::List => "list",
            Self::String => "string",
            Self::Int => "int",
            Self::Fixed => "fixed",
            Self::Bool => "bool",
            Self::Blob => "blob",
            Self::ResourceName => "resource",
            Self::Char => "char",
            Self::Tuple => "tuple",
            Self::TypeRef => "typeref",
            Self::Any => "any",
            Self::Unmanaged => "unmanaged",
            Self::AnyMatching => "any-matching",
            Self::LocalType => "local",
        }
    }
}
