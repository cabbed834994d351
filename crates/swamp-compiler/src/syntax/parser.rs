//! Parser state and low-level token operations.
//!
//! The grammar rules live in `grammar.rs`. Layout is handled with a stack of
//! columns: a token that starts a line at or left of the innermost column ends
//! the construct being parsed (case arms, let bindings, top-level items).

use swamp_core::{SourceId, Span};

use super::ast::Module;
use super::lexer::{Token, TokenKind, lex};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Nesting limit for expressions and type expressions.
const MAX_DEPTH: u32 = 256;

#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub diagnostics: Diagnostics,
}

/// Parse error that has already been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Stop;

pub(super) type PResult<T> = Result<T, Stop>;

pub fn parse(source: &str, source_id: SourceId) -> ParseResult {
    let mut parser = Parser::new(source, source_id);
    let module = parser.parse_module();
    ParseResult {
        module,
        diagnostics: parser.diagnostics,
    }
}

pub(super) struct Parser<'src> {
    pub(super) source: &'src str,
    source_id: SourceId,
    tokens: Vec<Token>,
    pos: usize,
    pub(super) diagnostics: Diagnostics,
    layout: Vec<u32>,
    depth: u32,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, source_id: SourceId) -> Self {
        let mut diagnostics = Diagnostics::new();
        let mut tokens = lex(source);
        for garbage in tokens.iter().filter(|t| t.kind == TokenKind::Garbage) {
            diagnostics
                .report(
                    DiagnosticKind::TokenizeError,
                    Span::new(source_id, garbage.start as usize..garbage.end as usize),
                )
                .message(format!("`{}`", garbage.text(source)))
                .emit();
        }
        tokens.retain(|t| t.kind != TokenKind::Garbage);

        Self {
            source,
            source_id,
            tokens,
            pos: 0,
            diagnostics,
            layout: vec![0],
            depth: 0,
        }
    }

    pub(super) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    pub(super) fn nth(&self, lookahead: usize) -> TokenKind {
        self.tokens
            .get(self.pos + lookahead)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(super) fn token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn current_span(&self) -> Span {
        match self.token() {
            Some(t) => self.span(t.start, t.end),
            None => {
                let end = self.source.len() as u32;
                self.span(end, end)
            }
        }
    }

    pub(super) fn span(&self, start: u32, end: u32) -> Span {
        Span::new(self.source_id, start as usize..end as usize)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) fn span_from(&self, start: u32) -> Span {
        let end = self.prev_end().max(start);
        self.span(start, end)
    }

    pub(super) fn current_start(&self) -> u32 {
        match self.token() {
            Some(t) => t.start,
            None => self.source.len() as u32,
        }
    }

    fn prev_end(&self) -> u32 {
        match self.pos.checked_sub(1).and_then(|p| self.tokens.get(p)) {
            Some(t) => t.end,
            None => 0,
        }
    }

    pub(super) fn bump(&mut self) -> Token {
        let token = match self.tokens.get(self.pos) {
            Some(t) => *t,
            None => {
                let end = self.source.len() as u32;
                Token {
                    kind: TokenKind::Eof,
                    start: end,
                    end,
                    column: 0,
                    line_start: true,
                }
            }
        };
        if !self.eof() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current() == kind {
            self.bump();
            return true;
        }
        false
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.current() == kind {
            return Ok(self.bump());
        }
        Err(self.error_here(format!("expected {what}")))
    }

    pub(super) fn error_here(&mut self, message: impl Into<String>) -> Stop {
        let span = self.current_span();
        self.error_at(span, message)
    }

    pub(super) fn error_at(&mut self, span: Span, message: impl Into<String>) -> Stop {
        self.diagnostics
            .report(DiagnosticKind::ParseError, span)
            .message(message)
            .emit();
        Stop
    }

    pub(super) fn text(&self, token: &Token) -> &'src str {
        token.text(self.source)
    }

    /// Whether the current token may continue the construct being parsed.
    pub(super) fn continues(&self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        let column = self.layout.last().copied().unwrap_or(0);
        !(token.line_start && token.column <= column)
    }

    /// Current token starts exactly where the previous one ended.
    pub(super) fn adjacent(&self) -> bool {
        self.adjacent_at(0)
    }

    /// Token at `pos + lookahead` touches the one before it.
    pub(super) fn adjacent_at(&self, lookahead: usize) -> bool {
        let index = self.pos + lookahead;
        match (
            index.checked_sub(1).and_then(|p| self.tokens.get(p)),
            self.tokens.get(index),
        ) {
            (Some(prev), Some(current)) => prev.end == current.start,
            _ => false,
        }
    }

    pub(super) fn at_item_start(&self) -> bool {
        self.token()
            .is_some_and(|t| t.line_start && t.column == 0)
    }

    pub(super) fn current_column(&self) -> u32 {
        self.token().map_or(0, |t| t.column)
    }

    /// Current token begins a line at exactly `column`.
    pub(super) fn at_aligned(&self, column: u32) -> bool {
        self.token()
            .is_some_and(|t| t.line_start && t.column == column)
    }

    pub(super) fn with_layout<T>(
        &mut self,
        column: u32,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.layout.push(column);
        let result = f(self);
        self.layout.pop();
        result
    }

    pub(super) fn enter(&mut self) -> PResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_here("expression nests too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Skip to the next top-level item, always consuming at least one token
    /// when no progress was made since `item_start`.
    pub(super) fn recover(&mut self, item_start: usize) {
        if self.pos == item_start {
            self.bump();
        }
        while !self.eof() && !self.at_item_start() {
            self.bump();
        }
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }
}
