use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("expected `{expected}`, found `{actual}`")]
    Mismatch { expected: String, actual: String },

    #[error("field `{0}` is declared twice")]
    DuplicateField(String),

    #[error("variant `{0}` is declared twice")]
    DuplicateVariant(String),

    #[error("context body is already set")]
    ContextBodyAlreadySet,

    #[error("context is sealed, can not add `{0}`")]
    ContextSealed(String),

    #[error("`{name}` expects {expected} type arguments, found {found}")]
    TypeArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("`{0}` does not take type arguments")]
    NotGeneric(String),

    #[error("type resolution deeper than {0} levels")]
    ResolveDepthExceeded(u32),

    #[error("internal type graph error: {0}")]
    Internal(String),
}
