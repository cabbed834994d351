use swamp_core::Span;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// Compile-halting kinds come first: once a module fails to tokenize or parse
/// nothing else is reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Compile-halting
    TokenizeError,
    ParseError,
    MissingFile,

    // Module graph and configuration
    CircularDependencyDetected,
    MissingImportedSymbol,
    SettingsError,

    // Declarations
    DuplicateDefinition,
    DuplicateType,
    UnknownType,
    UnknownAnnotationTarget,
    MissingAnnotation,

    // Expressions
    UnknownIdentifier,
    UnknownVariant,
    ArityMismatch,
    WrongArityForVariadic,
    NotCallable,
    FunctionArgumentTypeMismatch,
    UnMatchingFunctionReturnTypesInFunctionValue,
    UnmatchingBinaryOperatorTypes,
    IfConditionNotBool,
    UnmatchingBranchTypes,
    WrongRecordFieldType,
    UnknownRecordField,
    MissingRecordField,
    UnhandledCustomTypeVariants,
    DuplicateCasePattern,

    // Type system
    ShapeMismatch,
    UnresolvableLocalTypeName,

    // Warnings
    UnusedLocalDefinition,
    UnusedType,
    UnusedImport,

    InternalError,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedLocalDefinition | Self::UnusedType | Self::UnusedImport => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Kinds that mark the containing module failed and stop generation.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::TokenizeError | Self::ParseError | Self::MissingFile
        )
    }

    /// Base message, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::TokenizeError => "unrecognized input",
            Self::ParseError => "syntax error",
            Self::MissingFile => "module file not found",

            Self::CircularDependencyDetected => "circular dependency detected",
            Self::MissingImportedSymbol => "imported module does not expose this name",
            Self::SettingsError => "invalid settings file",

            Self::DuplicateDefinition => "duplicate definition",
            Self::DuplicateType => "duplicate type declaration",
            Self::UnknownType => "unknown type",
            Self::UnknownAnnotationTarget => "annotation has no matching definition",
            Self::MissingAnnotation => "definition has no type annotation",

            Self::UnknownIdentifier => "unknown identifier",
            Self::UnknownVariant => "unknown custom type variant",
            Self::ArityMismatch => "wrong number of arguments",
            Self::WrongArityForVariadic => "variadic parameter needs at least one argument",
            Self::NotCallable => "expression is not a function",
            Self::FunctionArgumentTypeMismatch => "argument has the wrong type",
            Self::UnMatchingFunctionReturnTypesInFunctionValue => {
                "function body does not match the declared return type"
            }
            Self::UnmatchingBinaryOperatorTypes => "operand types do not match",
            Self::IfConditionNotBool => "condition must be `Bool`",
            Self::UnmatchingBranchTypes => "branches have different types",
            Self::WrongRecordFieldType => "record field has the wrong type",
            Self::UnknownRecordField => "unknown record field",
            Self::MissingRecordField => "record field is missing",
            Self::UnhandledCustomTypeVariants => "case does not handle every variant",
            Self::DuplicateCasePattern => "pattern is already handled",

            Self::ShapeMismatch => "type mismatch",
            Self::UnresolvableLocalTypeName => "type variable can not be inferred",

            Self::UnusedLocalDefinition => "unused definition",
            Self::UnusedType => "unused type",
            Self::UnusedImport => "unused import",

            Self::InternalError => "internal compiler error",
        }
    }

    /// Template for messages with caller detail; `{}` is replaced by the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownIdentifier => "`{}` is not defined".to_string(),
            Self::UnknownType => "type `{}` is not defined".to_string(),
            Self::UnknownVariant => "`{}` is not a variant of this type".to_string(),
            Self::DuplicateDefinition => "`{}` is already defined".to_string(),
            Self::DuplicateType => "type `{}` is already declared".to_string(),
            Self::UnusedLocalDefinition => "`{}` is never used".to_string(),
            Self::UnusedType => "type `{}` is never used".to_string(),
            Self::UnusedImport => "import `{}` is never used".to_string(),
            Self::UnhandledCustomTypeVariants => "missing variants: {}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
    pub related: Vec<RelatedInfo>,
    pub hints: Vec<String>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            self.span.start,
            self.span.end,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.span.start, related.span.end
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
