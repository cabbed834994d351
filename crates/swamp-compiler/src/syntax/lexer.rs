//! Lexer for Swamp source.
//!
//! Produces span-based tokens; text is sliced from the source when needed.
//! Trivia (whitespace, newlines, comments) is dropped, but each token records
//! its column and whether it starts a line so the parser can apply the
//! offside rule.
//!
//! Consecutive unrecognized characters are coalesced into one `Garbage` token.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("type")]
    KwType,
    #[token("alias")]
    KwAlias,
    #[token("import")]
    KwImport,
    #[token("exposing")]
    KwExposing,
    #[token("as")]
    KwAs,
    #[token("if")]
    KwIf,
    #[token("then")]
    KwThen,
    #[token("else")]
    KwElse,
    #[token("let")]
    KwLet,
    #[token("in")]
    KwIn,
    #[token("case")]
    KwCase,
    #[token("of")]
    KwOf,
    #[token("__externalfn")]
    KwExternalFn,
    #[token("True")]
    KwTrue,
    #[token("False")]
    KwFalse,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-z_][A-Za-z0-9_]*")]
    LowerIdent,
    #[regex(r"[A-Z][A-Za-z0-9_]*")]
    UpperIdent,

    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+")]
    Fixed,
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    Str,
    #[regex(r"'(?:[^'\\]|\\.)'")]
    Char,
    /// `@sprites/player`
    #[regex(r"@[A-Za-z0-9_/\-]+")]
    Resource,

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("|")]
    Pipe,
    #[token("->")]
    Arrow,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token("_", priority = 3)]
    Underscore,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("++")]
    PlusPlus,
    #[token("==")]
    EqualEqual,
    #[token("/=")]
    NotEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    #[regex(r"[ \t\r]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[regex(r"--[^\n]*", allow_greedy = true)]
    LineComment,

    /// Coalesced unrecognized characters
    Garbage,
    /// Past the last token
    Eof,
}

impl TokenKind {
    fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::LineComment)
    }

    /// Tokens that may begin an application argument.
    pub fn starts_atom(self) -> bool {
        matches!(
            self,
            Self::LowerIdent
                | Self::UpperIdent
                | Self::Int
                | Self::Fixed
                | Self::Str
                | Self::Char
                | Self::Resource
                | Self::KwTrue
                | Self::KwFalse
                | Self::ParenOpen
                | Self::BracketOpen
                | Self::BraceOpen
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    /// Zero-based byte column.
    pub column: u32,
    /// First significant token on its line.
    pub line_start: bool,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }
}

pub fn lex(source: &str) -> Vec<Token> {
    let mut out = TokenSink::default();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                let span = lexer.span();
                if let Some(start) = error_start.take() {
                    out.push(TokenKind::Garbage, start, span.start);
                }
                if kind == TokenKind::Newline {
                    out.line_offset = span.end;
                    out.at_line_start = true;
                    continue;
                }
                if kind.is_trivia() {
                    continue;
                }
                out.push(kind, span.start, span.end);
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    out.push(TokenKind::Garbage, start, source.len());
                }
                break;
            }
        }
    }

    out.tokens
}

struct TokenSink {
    tokens: Vec<Token>,
    line_offset: usize,
    at_line_start: bool,
}

impl Default for TokenSink {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            line_offset: 0,
            at_line_start: true,
        }
    }
}

impl TokenSink {
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            start: start as u32,
            end: end as u32,
            column: (start - self.line_offset) as u32,
            line_start: self.at_line_start,
        });
        self.at_line_start = false;
    }
}
