use swamp_core::Span;

use crate::types::TypeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LocalKind {
    Parameter(usize),
    Let,
    /// Bound by a case pattern.
    Pattern,
}

#[derive(Debug, Clone)]
pub(super) struct Local {
    pub name: String,
    pub ty: TypeId,
    pub kind: LocalKind,
    pub span: Span,
    pub used: bool,
}

/// Value names bound inside a definition body. Inner frames shadow outer.
#[derive(Debug, Default)]
pub(super) struct Scope {
    locals: Vec<Local>,
    frames: Vec<usize>,
}

impl Scope {
    pub fn push_frame(&mut self) {
        self.frames.push(self.locals.len());
    }

    /// Drop the innermost frame, returning its bindings.
    pub fn pop_frame(&mut self) -> Vec<Local> {
        let start = self.frames.pop().unwrap_or(0);
        self.locals.split_off(start)
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: TypeId, kind: LocalKind, span: Span) {
        self.locals.push(Local {
            name: name.into(),
            ty,
            kind,
            span,
            used: false,
        });
    }

    /// Innermost binding of `name`, marked used.
    pub fn use_local(&mut self, name: &str) -> Option<&Local> {
        let local = self.locals.iter_mut().rev().find(|l| l.name == name)?;
        local.used = true;
        Some(local)
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}
