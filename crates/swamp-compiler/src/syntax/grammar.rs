//! Grammar rules: items, type expressions, expressions and patterns.

use super::ast::*;
use super::lexer::{Token, TokenKind};
use super::parser::{PResult, Parser};

impl Parser<'_> {
    pub(super) fn parse_module(&mut self) -> Module {
        let mut module = Module::default();

        while !self.eof() {
            let item_start = self.position();
            if !self.at_item_start() {
                let _ = self.error_here("declarations must start at the beginning of a line");
                self.recover(item_start);
                continue;
            }

            if self.parse_item(&mut module).is_err() {
                self.recover(item_start);
                continue;
            }

            if !self.eof() && !self.at_item_start() {
                let _ = self.error_here("unexpected token after declaration");
                self.recover(item_start);
            }
        }

        module
    }

    fn parse_item(&mut self, module: &mut Module) -> PResult<()> {
        match self.current() {
            TokenKind::KwImport => module.imports.push(self.parse_import()?),
            TokenKind::KwType if self.nth(1) == TokenKind::KwAlias => {
                module.items.push(Item::TypeAlias(self.parse_type_alias()?));
            }
            TokenKind::KwType => module.items.push(Item::CustomType(self.parse_custom_type()?)),
            TokenKind::LowerIdent if self.nth(1) == TokenKind::Colon => {
                module.items.push(Item::Annotation(self.parse_annotation()?));
            }
            TokenKind::LowerIdent => module.items.push(Item::Definition(self.parse_definition()?)),
            _ => return Err(self.error_here("expected `import`, `type` or a definition")),
        }
        Ok(())
    }

    fn ident(&self, token: &Token) -> Ident {
        Ident {
            name: self.text(token).to_string(),
            span: self.span(token.start, token.end),
        }
    }

    fn expect_upper(&mut self, what: &str) -> PResult<Ident> {
        let token = self.expect(TokenKind::UpperIdent, what)?;
        Ok(self.ident(&token))
    }

    fn expect_lower(&mut self, what: &str) -> PResult<Ident> {
        let token = self.expect(TokenKind::LowerIdent, what)?;
        Ok(self.ident(&token))
    }

    fn parse_import(&mut self) -> PResult<Import> {
        let start = self.current_start();
        self.bump();

        let mut path = vec![self.expect_upper("a module name")?];
        while self.current() == TokenKind::Dot
            && self.adjacent()
            && self.nth(1) == TokenKind::UpperIdent
        {
            self.bump();
            path.push(self.expect_upper("a module name")?);
        }

        let alias = if self.continues() && self.eat(TokenKind::KwAs) {
            Some(self.expect_upper("a module alias")?)
        } else {
            None
        };

        let exposing = if self.continues() && self.eat(TokenKind::KwExposing) {
            self.parse_exposing()?
        } else {
            Exposing::Nothing
        };

        Ok(Import {
            path,
            alias,
            exposing,
            span: self.span_from(start),
        })
    }

    fn parse_exposing(&mut self) -> PResult<Exposing> {
        self.expect(TokenKind::ParenOpen, "`(`")?;
        if self.eat(TokenKind::DotDot) {
            self.expect(TokenKind::ParenClose, "`)`")?;
            return Ok(Exposing::All);
        }

        let mut names = Vec::new();
        loop {
            let token = match self.current() {
                TokenKind::LowerIdent | TokenKind::UpperIdent => self.bump(),
                _ => return Err(self.error_here("expected an exposed name")),
            };
            names.push(self.ident(&token));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::ParenClose, "`)`")?;
        Ok(Exposing::Names(names))
    }

    fn parse_type_params(&mut self) -> Vec<Ident> {
        let mut params = Vec::new();
        while self.current() == TokenKind::LowerIdent {
            let token = self.bump();
            params.push(self.ident(&token));
        }
        params
    }

    fn parse_type_alias(&mut self) -> PResult<TypeAlias> {
        let start = self.current_start();
        self.bump();
        self.bump();
        let name = self.expect_upper("a type name")?;
        let params = self.parse_type_params();
        self.expect(TokenKind::Equals, "`=`")?;
        let target = self.parse_type()?;
        Ok(TypeAlias {
            name,
            params,
            target,
            span: self.span_from(start),
        })
    }

    fn parse_custom_type(&mut self) -> PResult<CustomType> {
        let start = self.current_start();
        self.bump();
        let name = self.expect_upper("a type name")?;
        let params = self.parse_type_params();
        self.expect(TokenKind::Equals, "`=`")?;

        let mut variants = vec![self.parse_variant_decl()?];
        while self.continues() && self.eat(TokenKind::Pipe) {
            variants.push(self.parse_variant_decl()?);
        }

        Ok(CustomType {
            name,
            params,
            variants,
            span: self.span_from(start),
        })
    }

    fn parse_variant_decl(&mut self) -> PResult<VariantDecl> {
        let name = self.expect_upper("a variant name")?;
        let mut params = Vec::new();
        while self.continues() && starts_type_atom(self.current()) {
            params.push(self.parse_type_atom()?);
        }
        Ok(VariantDecl { name, params })
    }

    fn parse_annotation(&mut self) -> PResult<Annotation> {
        let name = self.expect_lower("a name")?;
        self.bump();
        let ty = self.parse_type()?;
        Ok(Annotation { name, ty })
    }

    fn parse_definition(&mut self) -> PResult<Definition> {
        let start = self.current_start();
        let name = self.expect_lower("a name")?;
        let mut params = Vec::new();
        while self.current() == TokenKind::LowerIdent {
            let token = self.bump();
            params.push(self.ident(&token));
        }
        self.expect(TokenKind::Equals, "`=`")?;
        let body = self.parse_expr()?;
        Ok(Definition {
            name,
            params,
            body,
            span: self.span_from(start),
        })
    }

    // Type expressions

    pub(super) fn parse_type(&mut self) -> PResult<TypeExpr> {
        let start = self.current_start();
        let first = self.parse_type_app()?;
        if !(self.continues() && self.current() == TokenKind::Arrow) {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.continues() && self.eat(TokenKind::Arrow) {
            parts.push(self.parse_type_app()?);
        }
        Ok(TypeExpr {
            kind: TypeExprKind::Function(parts),
            span: self.span_from(start),
        })
    }

    fn parse_type_app(&mut self) -> PResult<TypeExpr> {
        if self.current() != TokenKind::UpperIdent {
            return self.parse_type_atom();
        }

        let start = self.current_start();
        let name = self.parse_qualified_upper()?;
        let mut args = Vec::new();
        while self.continues() && starts_type_atom(self.current()) {
            args.push(self.parse_type_atom()?);
        }
        Ok(TypeExpr {
            kind: TypeExprKind::Named { name, args },
            span: self.span_from(start),
        })
    }

    fn parse_type_atom(&mut self) -> PResult<TypeExpr> {
        self.enter()?;
        let result = self.parse_type_atom_inner();
        self.exit();
        result
    }

    fn parse_type_atom_inner(&mut self) -> PResult<TypeExpr> {
        let start = self.current_start();
        let kind = match self.current() {
            TokenKind::UpperIdent => TypeExprKind::Named {
                name: self.parse_qualified_upper()?,
                args: Vec::new(),
            },
            TokenKind::LowerIdent => {
                let token = self.bump();
                TypeExprKind::Variable(self.ident(&token))
            }
            TokenKind::Star => {
                self.bump();
                TypeExprKind::AnyMatching
            }
            TokenKind::ParenOpen => {
                self.bump();
                if self.eat(TokenKind::ParenClose) {
                    TypeExprKind::Tuple(Vec::new())
                } else {
                    let first = self.parse_type()?;
                    if self.current() != TokenKind::Comma {
                        self.expect(TokenKind::ParenClose, "`)`")?;
                        return Ok(first);
                    }
                    let mut elements = vec![first];
                    while self.eat(TokenKind::Comma) {
                        elements.push(self.parse_type()?);
                    }
                    self.expect(TokenKind::ParenClose, "`)`")?;
                    TypeExprKind::Tuple(elements)
                }
            }
            TokenKind::BraceOpen => {
                self.bump();
                let mut fields = Vec::new();
                if self.current() != TokenKind::BraceClose {
                    loop {
                        let name = self.expect_lower("a field name")?;
                        self.expect(TokenKind::Colon, "`:`")?;
                        fields.push((name, self.parse_type()?));
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::BraceClose, "`}`")?;
                TypeExprKind::Record(fields)
            }
            _ => return Err(self.error_here("expected a type")),
        };
        Ok(TypeExpr {
            kind,
            span: self.span_from(start),
        })
    }

    /// `Upper(.Upper)*` with no whitespace around the dots.
    fn parse_qualified_upper(&mut self) -> PResult<QualifiedName> {
        let mut parts = vec![self.expect_upper("a type name")?];
        while self.current() == TokenKind::Dot
            && self.adjacent()
            && self.nth(1) == TokenKind::UpperIdent
            && self.adjacent_at(1)
        {
            self.bump();
            parts.push(self.expect_upper("a type name")?);
        }
        let name = parts.pop().ok_or_else(|| self.error_here("expected a name"))?;
        Ok(QualifiedName {
            qualifier: parts,
            name,
        })
    }

    // Expressions

    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            if !self.continues() {
                break;
            }
            let Some(op) = binary_op(self.current()) else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.bump();
            let next_min = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next_min)?;
            let span = left.span.cover(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        self.enter()?;
        let result = self.parse_unary_inner();
        self.exit();
        result
    }

    fn parse_unary_inner(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        match self.current() {
            TokenKind::Minus => {
                self.bump();
                let operand = self.parse_unary()?;
                let span = self.span_from(start);
                let kind = match operand.kind {
                    ExprKind::Literal(Literal::Int(v)) => ExprKind::Literal(Literal::Int(-v)),
                    ExprKind::Literal(Literal::Fixed(v)) => ExprKind::Literal(Literal::Fixed(-v)),
                    other => ExprKind::Negate(Box::new(Expr {
                        kind: other,
                        span: operand.span,
                    })),
                };
                Ok(Expr { kind, span })
            }
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwLet => self.parse_let(),
            TokenKind::KwCase => self.parse_case(),
            _ => self.parse_application(),
        }
    }

    fn parse_application(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        let callee = self.parse_postfix()?;
        let mut args = Vec::new();
        while self.continues() && self.current().starts_atom() {
            args.push(self.parse_postfix()?);
        }
        if args.is_empty() {
            return Ok(callee);
        }
        Ok(Expr {
            kind: ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span: self.span_from(start),
        })
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        let mut expr = self.parse_atom()?;
        while self.current() == TokenKind::Dot
            && self.adjacent()
            && self.nth(1) == TokenKind::LowerIdent
            && self.adjacent_at(1)
        {
            self.bump();
            let field = self.expect_lower("a field name")?;
            expr = Expr {
                kind: ExprKind::FieldAccess {
                    target: Box::new(expr),
                    field,
                },
                span: self.span_from(start),
            };
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> PResult<Expr> {
        if !self.continues() {
            return Err(self.error_here("expected an expression"));
        }
        let start = self.current_start();
        let kind = match self.current() {
            TokenKind::Int
            | TokenKind::Fixed
            | TokenKind::Str
            | TokenKind::Char
            | TokenKind::KwTrue
            | TokenKind::KwFalse => ExprKind::Literal(self.parse_literal()?),
            TokenKind::Resource => {
                let token = self.bump();
                ExprKind::Resource(self.text(&token)[1..].to_string())
            }
            TokenKind::LowerIdent => {
                let token = self.bump();
                ExprKind::Variable(QualifiedName {
                    qualifier: Vec::new(),
                    name: self.ident(&token),
                })
            }
            TokenKind::UpperIdent => self.parse_qualified_value()?,
            TokenKind::ParenOpen => {
                self.bump();
                if self.eat(TokenKind::ParenClose) {
                    ExprKind::Tuple(Vec::new())
                } else {
                    let first = self.parse_expr()?;
                    if self.current() != TokenKind::Comma {
                        self.expect(TokenKind::ParenClose, "`)`")?;
                        return Ok(Expr {
                            kind: first.kind,
                            span: self.span_from(start),
                        });
                    }
                    let mut elements = vec![first];
                    while self.eat(TokenKind::Comma) {
                        elements.push(self.parse_expr()?);
                    }
                    self.expect(TokenKind::ParenClose, "`)`")?;
                    ExprKind::Tuple(elements)
                }
            }
            TokenKind::BracketOpen => {
                self.bump();
                let mut items = Vec::new();
                if self.current() != TokenKind::BracketClose {
                    loop {
                        items.push(self.parse_expr()?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::BracketClose, "`]`")?;
                ExprKind::List(items)
            }
            TokenKind::BraceOpen => self.parse_record()?,
            TokenKind::KwExternalFn => {
                self.bump();
                let id = self.parse_small_int("an external function id")?;
                let arity = self.parse_small_int("an arity")?;
                ExprKind::ExternalFunction { id, arity }
            }
            _ => return Err(self.error_here("expected an expression")),
        };
        Ok(Expr {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_small_int(&mut self, what: &str) -> PResult<u32> {
        let token = self.expect(TokenKind::Int, what)?;
        let span = self.span(token.start, token.end);
        match self.text(&token).parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(self.error_at(span, "number out of range")),
        }
    }

    /// `Game.Player.move` is a variable, `Maybe.Just` and `Just` are constructors.
    fn parse_qualified_value(&mut self) -> PResult<ExprKind> {
        let mut parts = vec![self.expect_upper("a name")?];
        loop {
            let qualifies = self.current() == TokenKind::Dot
                && self.adjacent()
                && self.adjacent_at(1);
            if !qualifies {
                break;
            }
            match self.nth(1) {
                TokenKind::UpperIdent => {
                    self.bump();
                    parts.push(self.expect_upper("a name")?);
                }
                TokenKind::LowerIdent => {
                    self.bump();
                    let name = self.expect_lower("a name")?;
                    return Ok(ExprKind::Variable(QualifiedName {
                        qualifier: parts,
                        name,
                    }));
                }
                _ => break,
            }
        }
        let name = parts.pop().ok_or_else(|| self.error_here("expected a name"))?;
        Ok(ExprKind::Constructor(QualifiedName {
            qualifier: parts,
            name,
        }))
    }

    fn parse_record(&mut self) -> PResult<ExprKind> {
        self.bump();
        if self.eat(TokenKind::BraceClose) {
            return Ok(ExprKind::Record(Vec::new()));
        }

        if self.current() == TokenKind::LowerIdent && self.nth(1) == TokenKind::Pipe {
            let record = self.expect_lower("a record name")?;
            self.bump();
            let fields = self.parse_field_inits()?;
            self.expect(TokenKind::BraceClose, "`}`")?;
            return Ok(ExprKind::RecordUpdate { record, fields });
        }

        let fields = self.parse_field_inits()?;
        self.expect(TokenKind::BraceClose, "`}`")?;
        Ok(ExprKind::Record(fields))
    }

    fn parse_field_inits(&mut self) -> PResult<Vec<FieldInit>> {
        let mut fields = Vec::new();
        loop {
            let name = self.expect_lower("a field name")?;
            self.expect(TokenKind::Equals, "`=`")?;
            let value = self.parse_expr()?;
            fields.push(FieldInit { name, value });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(fields)
    }

    fn parse_if(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        self.bump();
        let condition = self.parse_expr()?;
        self.expect(TokenKind::KwThen, "`then`")?;
        let then_branch = self.parse_expr()?;
        self.expect(TokenKind::KwElse, "`else`")?;
        let else_branch = self.parse_expr()?;
        Ok(Expr {
            kind: ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span: self.span_from(start),
        })
    }

    fn parse_let(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        self.bump();
        let column = self.current_column();

        let mut bindings = Vec::new();
        loop {
            let name = self.expect_lower("a binding name")?;
            self.expect(TokenKind::Equals, "`=`")?;
            let value = self.with_layout(column, |p| p.parse_expr())?;
            bindings.push(LetBinding { name, value });
            if !(self.current() == TokenKind::LowerIdent && self.at_aligned(column)) {
                break;
            }
        }

        self.expect(TokenKind::KwIn, "`in`")?;
        let body = self.parse_expr()?;
        Ok(Expr {
            kind: ExprKind::Let {
                bindings,
                body: Box::new(body),
            },
            span: self.span_from(start),
        })
    }

    fn parse_case(&mut self) -> PResult<Expr> {
        let start = self.current_start();
        self.bump();
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::KwOf, "`of`")?;
        let column = self.current_column();

        let mut arms = Vec::new();
        loop {
            let pattern = self.parse_pattern()?;
            self.expect(TokenKind::Arrow, "`->`")?;
            let body = self.with_layout(column, |p| p.parse_expr())?;
            arms.push(CaseArm { pattern, body });
            if !self.at_aligned(column) {
                break;
            }
        }

        Ok(Expr {
            kind: ExprKind::Case {
                scrutinee: Box::new(scrutinee),
                arms,
            },
            span: self.span_from(start),
        })
    }

    // Patterns

    fn parse_pattern(&mut self) -> PResult<Pattern> {
        let start = self.current_start();
        let kind = match self.current() {
            TokenKind::Underscore => {
                self.bump();
                PatternKind::Wildcard
            }
            TokenKind::Minus => {
                self.bump();
                match self.parse_literal()? {
                    Literal::Int(v) => PatternKind::Literal(Literal::Int(-v)),
                    Literal::Fixed(v) => PatternKind::Literal(Literal::Fixed(-v)),
                    _ => return Err(self.error_here("expected a number after `-`")),
                }
            }
            TokenKind::Int
            | TokenKind::Fixed
            | TokenKind::Str
            | TokenKind::Char
            | TokenKind::KwTrue
            | TokenKind::KwFalse => PatternKind::Literal(self.parse_literal()?),
            TokenKind::UpperIdent => {
                let name = self.parse_qualified_upper()?;
                let mut bindings = Vec::new();
                while self.continues()
                    && matches!(
                        self.current(),
                        TokenKind::LowerIdent | TokenKind::Underscore
                    )
                {
                    let token = self.bump();
                    bindings.push(self.ident(&token));
                }
                PatternKind::Variant { name, bindings }
            }
            TokenKind::ParenOpen => {
                self.bump();
                let inner = self.parse_pattern()?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                inner.kind
            }
            _ => return Err(self.error_here("expected a pattern")),
        };
        Ok(Pattern {
            kind,
            span: self.span_from(start),
        })
    }

    fn parse_literal(&mut self) -> PResult<Literal> {
        let token = self.bump();
        let text = self.text(&token);
        let span = self.span(token.start, token.end);
        let literal = match token.kind {
            TokenKind::Int => match text.parse::<i32>() {
                Ok(v) => Literal::Int(v),
                Err(_) => return Err(self.error_at(span, "integer literal out of range")),
            },
            TokenKind::Fixed => match parse_fixed(text) {
                Some(v) => Literal::Fixed(v),
                None => return Err(self.error_at(span, "fixed literal out of range")),
            },
            TokenKind::Str => Literal::Str(unescape(&text[1..text.len() - 1])),
            TokenKind::Char => match unescape(&text[1..text.len() - 1]).chars().next() {
                Some(c) => Literal::Char(c),
                None => return Err(self.error_at(span, "empty character literal")),
            },
            TokenKind::KwTrue => Literal::Bool(true),
            TokenKind::KwFalse => Literal::Bool(false),
            _ => return Err(self.error_at(span, "expected a literal")),
        };
        Ok(literal)
    }
}

fn starts_type_atom(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::UpperIdent
            | TokenKind::LowerIdent
            | TokenKind::Star
            | TokenKind::ParenOpen
            | TokenKind::BraceOpen
    )
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::PlusPlus => BinaryOp::Append,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::NotEqual => BinaryOp::NotEqual,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::OrOr => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}

/// `1.5` is `1500`; digits past the third decimal are dropped.
fn parse_fixed(text: &str) -> Option<i32> {
    let (whole, fraction) = text.split_once('.')?;
    let whole: i32 = whole.parse().ok()?;
    let mut scaled = 0i32;
    for i in 0..3 {
        let digit = fraction
            .as_bytes()
            .get(i)
            .map_or(0, |b| i32::from(b - b'0'));
        scaled = scaled * 10 + digit;
    }
    whole.checked_mul(1000)?.checked_add(scaled)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
