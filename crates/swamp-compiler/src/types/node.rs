//! Type graph nodes.
//!
//! The graph has two layers: atoms (concrete structural forms) and references
//! (named or positional indirections). Both live in one enum so every
//! operation can match exhaustively.

use swamp_core::ArtifactName;

use super::error::TypeError;

/// Handle into the [`TypeArena`](super::TypeArena).
///
/// Values below [`FIRST_USER_TYPE`] are the builtin primitives, registered at
/// fixed positions when the arena is created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(pub(super) u32);

pub const TYPE_INT: TypeId = TypeId(0);
pub const TYPE_BOOL: TypeId = TypeId(1);
pub const TYPE_STRING: TypeId = TypeId(2);
pub const TYPE_CHAR: TypeId = TypeId(3);
pub const TYPE_FIXED: TypeId = TypeId(4);
pub const TYPE_BLOB: TypeId = TypeId(5);
pub const TYPE_RESOURCE_NAME: TypeId = TypeId(6);
pub const TYPE_ANY: TypeId = TypeId(7);
pub const TYPE_TYPE_REF: TypeId = TypeId(8);
pub const TYPE_ANY_MATCHING: TypeId = TypeId(9);
/// Open `List a`; `a` is the node right before it.
pub const TYPE_LIST: TypeId = TypeId(11);
/// Open `Array a`.
pub const TYPE_ARRAY: TypeId = TypeId(13);
pub const FIRST_USER_TYPE: u32 = 14;

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_builtin(self) -> bool {
        self.0 < FIRST_USER_TYPE
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PrimitiveKind {
    Int,
    Bool,
    String,
    Char,
    Fixed,
    Blob,
    ResourceName,
    Any,
    TypeRef,
    List,
    Array,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 11] = [
        Self::Int,
        Self::Bool,
        Self::String,
        Self::Char,
        Self::Fixed,
        Self::Blob,
        Self::ResourceName,
        Self::Any,
        Self::TypeRef,
        Self::List,
        Self::Array,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Char => "Char",
            Self::Fixed => "Fixed",
            Self::Blob => "Blob",
            Self::ResourceName => "ResourceName",
            Self::Any => "Any",
            Self::TypeRef => "TypeRef",
            Self::List => "List",
            Self::Array => "Array",
        }
    }

    /// Number of type arguments the primitive takes.
    pub fn generic_arity(self) -> usize {
        match self {
            Self::List | Self::Array => 1,
            _ => 0,
        }
    }

    pub fn builtin_id(self) -> TypeId {
        match self {
            Self::Int => TYPE_INT,
            Self::Bool => TYPE_BOOL,
            Self::String => TYPE_STRING,
            Self::Char => TYPE_CHAR,
            Self::Fixed => TYPE_FIXED,
            Self::Blob => TYPE_BLOB,
            Self::ResourceName => TYPE_RESOURCE_NAME,
            Self::Any => TYPE_ANY,
            Self::TypeRef => TYPE_TYPE_REF,
            Self::List => TYPE_LIST,
            Self::Array => TYPE_ARRAY,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PrimitiveAtom {
    pub kind: PrimitiveKind,
    pub generics: Vec<TypeId>,
}

/// Host-provided opaque type, compared by name only.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnmanagedAtom {
    pub name: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeId,
    /// Position in name-sorted order.
    pub index: usize,
}

/// Fields are kept in declaration order; `sorted` lists positions into
/// `fields` ordered by name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RecordAtom {
    fields: Vec<RecordField>,
    sorted: Vec<usize>,
    pub generics: Vec<TypeId>,
}

impl RecordAtom {
    pub fn new(fields: Vec<(String, TypeId)>, generics: Vec<TypeId>) -> Result<Self, TypeError> {
        let mut sorted: Vec<usize> = (0..fields.len()).collect();
        sorted.sort_by(|&a, &b| fields[a].0.cmp(&fields[b].0));

        for pair in sorted.windows(2) {
            if fields[pair[0]].0 == fields[pair[1]].0 {
                return Err(TypeError::DuplicateField(fields[pair[0]].0.clone()));
            }
        }

        let mut records: Vec<RecordField> = fields
            .into_iter()
            .map(|(name, ty)| RecordField { name, ty, index: 0 })
            .collect();
        for (index, &position) in sorted.iter().enumerate() {
            records[position].index = index;
        }

        Ok(Self {
            fields: records,
            sorted,
            generics,
        })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    pub fn sorted_fields(&self) -> impl Iterator<Item = &RecordField> {
        self.sorted.iter().map(|&i| &self.fields[i])
    }

    pub fn find_field(&self, name: &str) -> Option<&RecordField> {
        self.sorted
            .binary_search_by(|&i| self.fields[i].name.as_str().cmp(name))
            .ok()
            .map(|pos| &self.fields[self.sorted[pos]])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TupleAtom {
    pub elements: Vec<TypeId>,
}

/// Parameters followed by the return type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FunctionAtom {
    pub parameters: Vec<TypeId>,
}

impl FunctionAtom {
    pub fn arguments(&self) -> &[TypeId] {
        &self.parameters[..self.parameters.len().saturating_sub(1)]
    }

    pub fn return_type(&self) -> Option<TypeId> {
        self.parameters.last().copied()
    }

    pub fn arity(&self) -> usize {
        self.arguments().len()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CustomAtom {
    pub name: String,
    pub artifact: ArtifactName,
    pub generic_names: Vec<String>,
    /// Type arguments; local type names in the declared (open) form.
    pub arguments: Vec<TypeId>,
    pub variants: Vec<TypeId>,
    /// The declaration this instance was produced from.
    pub origin: Option<TypeId>,
}

impl CustomAtom {
    pub fn is_generic(&self) -> bool {
        !self.generic_names.is_empty()
    }

    /// The generic declaration, or this node itself.
    pub fn declaration(&self, this: TypeId) -> TypeId {
        self.origin.unwrap_or(this)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VariantAtom {
    pub parent: TypeId,
    pub index: usize,
    pub name: String,
    pub parameters: Vec<TypeId>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Alias {
    pub name: String,
    pub artifact: ArtifactName,
    pub target: TypeId,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReferenceKind {
    Primitive,
    Custom,
    Variant,
    Function,
    Type,
    Scoped,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeReference {
    pub kind: ReferenceKind,
    pub name: String,
    pub target: TypeId,
}

/// Parametric variable such as `a`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LocalTypeName {
    pub name: String,
}

/// Local type names plus the body that mentions them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NameOnlyContext {
    pub names: Vec<String>,
    pub body: Option<TypeId>,
    pub sealed: bool,
}

/// Reference to a name-only context. `focus` is set when the reference names
/// a constructor of a generic custom type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ContextReference {
    pub name: String,
    pub context: TypeId,
    pub focus: Option<TypeId>,
}

/// Context reference with every local type name bound.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedContext {
    pub reference: TypeId,
    pub bindings: Vec<(String, TypeId)>,
}

impl ResolvedContext {
    pub fn binding(&self, name: &str) -> Option<TypeId> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }
}

/// Application of a generic type constructor: `Maybe Int`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Invoker {
    pub target: TypeId,
    pub arguments: Vec<TypeId>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeNode {
    Primitive(PrimitiveAtom),
    Unmanaged(UnmanagedAtom),
    Record(RecordAtom),
    Tuple(TupleAtom),
    Function(FunctionAtom),
    Custom(CustomAtom),
    Variant(VariantAtom),
    AnyMatching,

    Alias(Alias),
    Reference(TypeReference),
    LocalTypeName(LocalTypeName),
    NameOnlyContext(NameOnlyContext),
    ContextReference(ContextReference),
    ResolvedContext(ResolvedContext),
    Invoker(Invoker),
}

impl TypeNode {
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Self::Primitive(_)
                | Self::Unmanaged(_)
                | Self::Record(_)
                | Self::Tuple(_)
                | Self::Function(_)
                | Self::Custom(_)
                | Self::Variant(_)
                | Self::AnyMatching
        )
    }

    pub fn is_any(&self) -> bool {
        matches!(
            self,
            Self::Primitive(PrimitiveAtom {
                kind: PrimitiveKind::Any,
                ..
            })
        )
    }
}
