//! Decorated tree: expressions annotated with their [`TypeId`].

mod display;

#[cfg(test)]
mod display_tests;

use swamp_core::Span;

use crate::types::TypeId;

pub use display::dump_definition;
pub(crate) use display::literal_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Subtract => "SUBTRACT",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ComparisonOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Less => "LESS",
            Self::LessEqual => "LESS_EQUAL",
            Self::Greater => "GREATER",
            Self::GreaterEqual => "GREATER_EQUAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    /// Scaled by 1000.
    Fixed(i32),
    String(String),
    Char(char),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub ty: TypeId,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, ty: TypeId, span: Span) -> Self {
        Self { kind, ty, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(Literal),
    /// `@sprites/player`, numbered per session.
    ResourceName { name: String, id: u32 },
    Parameter { name: String, index: usize },
    LetLocal { name: String },
    /// Top-level definition, by fully qualified name.
    Definition { name: String },
    Constructor {
        variant: TypeId,
        name: String,
        arguments: Vec<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        /// Resolved context of a generic callee.
        context: Option<TypeId>,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Append {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Negate(Box<Expression>),
    If {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    Let {
        bindings: Vec<LetBinding>,
        body: Box<Expression>,
    },
    Case {
        scrutinee: Box<Expression>,
        arms: Vec<CaseArm>,
    },
    Record(Vec<RecordFieldValue>),
    RecordUpdate {
        record: Box<Expression>,
        fields: Vec<RecordFieldValue>,
    },
    FieldAccess {
        target: Box<Expression>,
        field: String,
        /// Position in the name-sorted field list.
        index: usize,
    },
    Tuple(Vec<Expression>),
    List(Vec<Expression>),
    /// Function implemented by the host: `__externalfn id arity`.
    External { id: u32, arity: u32 },
    FunctionValue {
        parameters: Vec<String>,
        body: Box<Expression>,
    },
    /// Placeholder after a reported error.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordFieldValue {
    pub name: String,
    /// Position in the name-sorted field list.
    pub index: usize,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CasePattern {
    Wildcard,
    Literal(Literal),
    Variant {
        variant: TypeId,
        name: String,
        bindings: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub pattern: CasePattern,
    pub body: Expression,
}
