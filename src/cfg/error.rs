use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::sexpr::{SExpr, Spanned};

pub type MResult<T> = miette::Result<T>;
pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Error in configuration file")]
#[diagnostic()]
pub struct ParseError {
    #[label("Error here")]
    pub err_span: Option<SourceSpan>,
    #[help]
    pub help_msg: String,
    pub file_name: Option<String>,
    pub file_content: Option<String>,
}

impl ParseError {
    pub fn new_without_span(err_msg: impl AsRef<str>) -> Self {
        Self {
            err_span: None,
            help_msg: help(err_msg),
            file_name: None,
            file_content: None,
        }
    }

    pub fn from_expr(expr: &SExpr, err_msg: impl AsRef<str>) -> Self {
        let span = expr.span();
        Self {
            err_span: Some(span_start_len(span.start, span.len())),
            help_msg: help(err_msg),
            file_name: Some(span.file_name()),
            file_content: Some(span.file_content()),
        }
    }

    pub fn from_spanned<T>(spanned: &Spanned<T>, err_msg: impl AsRef<str>) -> Self {
        let span = &spanned.span;
        Self {
            err_span: Some(span_start_len(span.start, span.len())),
            help_msg: help(err_msg),
            file_name: Some(span.file_name()),
            file_content: Some(span.file_content()),
        }
    }
}

pub(super) fn help(err_msg: impl AsRef<str>) -> String {
    format!(
        r"{}

For a working example, see the sample configuration:
    cfg_samples/holdtap.kbd",
        err_msg.as_ref(),
    )
}

pub(super) fn span_start_len(start: usize, len: usize) -> SourceSpan {
    SourceSpan::new(start.into(), len.into())
}

/// Attach the configuration text so the report can show the offending snippet.
pub fn error_with_source(e: ParseError) -> miette::Error {
    let filename = e.file_name.clone();
    let source = e.file_content.clone();
    let report: miette::Error = e.into();
    match (filename, source) {
        (Some(f), Some(s)) => report.with_source_code(NamedSource::new(f, s)),
        _ => report,
    }
}
