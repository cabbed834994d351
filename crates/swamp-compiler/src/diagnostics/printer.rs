//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use swamp_core::{SourceMap, Span};

use super::Diagnostics;
use super::message::Severity;

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    sources: &'s SourceMap,
    colored: bool,
    snippets: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, sources: &'s SourceMap) -> Self {
        Self {
            diagnostics,
            sources,
            colored: false,
            snippets: true,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Without snippets every diagnostic is one `uri:line:column: severity: message` line.
    pub fn snippets(mut self, value: bool) -> Self {
        self.snippets = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if !self.snippets {
            return self.format_plain(w);
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let source = self.sources.content(diag.span.source);
            let path = self.sources.kind(diag.span.source).display_name();
            let range = adjust_range(diag.span, source.len());

            let mut snippet = Snippet::source(source)
                .line_start(1)
                .path(path.as_str())
                .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

            for related in &diag.related {
                if related.span.source != diag.span.source {
                    continue;
                }
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span, source.len()))
                        .label(&related.message),
                );
            }

            let level = severity_to_level(diag.severity());
            let report: Vec<Group> = vec![level.primary_title(&diag.message).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
            for hint in &diag.hints {
                write!(w, "\n  = hint: {hint}")?;
            }
        }
        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for diag in self.diagnostics.iter() {
            let at = self.sources.source_ref(diag.span);
            writeln!(w, "{at}: {}: {}", diag.severity(), diag.message)?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = (span.start as usize).min(limit);
    let end = (span.end as usize).min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}

impl Diagnostics {
    pub fn printer<'s>(&self, sources: &'s SourceMap) -> DiagnosticsPrinter<'_, 's> {
        DiagnosticsPrinter::new(self, sources)
    }
}
