//! Parsed module tree.
//!
//! Plain owned nodes; every node keeps the span it was parsed from so the
//! decorator can report at the exact location.

use swamp_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// `List.map`, `Game.Player.move`, or a bare `map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub qualifier: Vec<Ident>,
    pub name: Ident,
}

impl QualifiedName {
    pub fn qualifier_text(&self) -> Option<String> {
        if self.qualifier.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self.qualifier.iter().map(|i| i.name.as_str()).collect();
        Some(parts.join("."))
    }

    /// Lookup key: `List.map` or `map`.
    pub fn key(&self) -> String {
        match self.qualifier_text() {
            Some(prefix) => format!("{prefix}.{}", self.name.name),
            None => self.name.name.clone(),
        }
    }

    pub fn span(&self) -> Span {
        match self.qualifier.first() {
            Some(first) => first.span.cover(self.name.span),
            None => self.name.span,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Module {
    pub imports: Vec<Import>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposing {
    Nothing,
    All,
    Names(Vec<Ident>),
}

#[derive(Debug, Clone)]
pub struct Import {
    pub path: Vec<Ident>,
    pub alias: Option<Ident>,
    pub exposing: Exposing,
    pub span: Span,
}

impl Import {
    pub fn dotted_path(&self) -> String {
        let parts: Vec<&str> = self.path.iter().map(|i| i.name.as_str()).collect();
        parts.join(".")
    }

    /// Prefix imported names are keyed by.
    pub fn prefix(&self) -> String {
        match &self.alias {
            Some(alias) => alias.name.clone(),
            None => self.dotted_path(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Item {
    TypeAlias(TypeAlias),
    CustomType(CustomType),
    Annotation(Annotation),
    Definition(Definition),
}

#[derive(Debug, Clone)]
pub struct TypeAlias {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub target: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CustomType {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub variants: Vec<VariantDecl>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariantDecl {
    pub name: Ident,
    pub params: Vec<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// `Int`, `List a`, `Game.Sprite`
    Named {
        name: QualifiedName,
        args: Vec<TypeExpr>,
    },
    /// Lower-case type variable.
    Variable(Ident),
    /// `a -> b -> c`; the last element is the return type.
    Function(Vec<TypeExpr>),
    Record(Vec<(Ident, TypeExpr)>),
    /// `()` is the empty tuple.
    Tuple(Vec<TypeExpr>),
    /// `*`
    AnyMatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Append,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Elm precedence levels.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Or => 2,
            Self::And => 3,
            Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual => 4,
            Self::Append => 5,
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide => 7,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, Self::Append | Self::And | Self::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Append => "++",
            Self::Equal => "==",
            Self::NotEqual => "/=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Resource(String),
    Variable(QualifiedName),
    Constructor(QualifiedName),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Negate(Box<Expr>),
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Let {
        bindings: Vec<LetBinding>,
        body: Box<Expr>,
    },
    Case {
        scrutinee: Box<Expr>,
        arms: Vec<CaseArm>,
    },
    Record(Vec<FieldInit>),
    RecordUpdate {
        record: Ident,
        fields: Vec<FieldInit>,
    },
    FieldAccess {
        target: Box<Expr>,
        field: Ident,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    ExternalFunction {
        id: u32,
        arity: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    /// Scaled by 1000.
    Fixed(i32),
    Str(String),
    Char(char),
    Bool(bool),
}

#[derive(Debug, Clone)]
pub struct LetBinding {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct CaseArm {
    pub pattern: Pattern,
    pub body: Expr,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Wildcard,
    Literal(Literal),
    /// `Just x`; `_` bindings are kept with name `_`.
    Variant {
        name: QualifiedName,
        bindings: Vec<Ident>,
    },
}
