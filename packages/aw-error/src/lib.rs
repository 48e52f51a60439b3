//! Structured errors for the adb wire client
//!
//! Every failure is an [`Error`] carrying an [`ErrorKind`], a formatted message,
//! an optional typed [`Detail`] and an optional cause. Each layer that adds
//! context wraps the error it received, so the whole causal chain survives up
//! to the caller, which can render it with [`Error::chain`] or [`render_chain`].
use std::fmt::Write as _;

use thiserror::Error;

mod detail;
mod failure;
mod kind;

pub use detail::{Detail, ErrorResponseDetails, IncompleteMessageDetails};
pub use failure::{AsStructured, Failure, MULTI_ERROR_SEPARATOR, MultiError};
pub use kind::ErrorKind;

/// Marker line placed between two links of a rendered chain.
pub const CAUSED_BY: &str = "caused by";

/// Rendering of an absent error.
pub const NIL_SENTINEL: &str = "<err=nil>";

/// Result type alias
pub type AdbResult<T> = Result<T, Error>;

/// A kind-tagged error, optionally caused by another [`Failure`].
///
/// Immutable once built. Wrapping always creates a new node pointing at an
/// already finished one, so the chain is finite and acyclic.
#[derive(Debug, Error)]
#[error("{kind}: {message}{}", render_detail(.detail))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    detail: Option<Detail>,
    #[source]
    cause: Option<Box<Failure>>,
}

fn render_detail(detail: &Option<Detail>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

impl Error {
    /// A leaf error, without cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            cause: None,
        }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Assertion, message)
    }

    /// A new error of `kind` caused by `cause`.
    ///
    /// The kind is independent of the cause's kind, use [`Error::context`] to
    /// keep it.
    pub fn wrap(cause: impl Into<Failure>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            cause: Some(Box::new(cause.into())),
        }
    }

    /// Wraps `self` in a new error of the same kind.
    pub fn context(self, message: impl Into<String>) -> Self {
        let kind = self.kind;
        Self::wrap(self, kind, message)
    }

    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// Renders this error and all of its causes, one link per line, separated
    /// by [`CAUSED_BY`] lines.
    pub fn chain(&self) -> String {
        let mut out = String::new();
        let mut current = self;
        while let Some(cause) = current.cause() {
            let _ = writeln!(out, "{current}");
            let _ = writeln!(out, "{CAUSED_BY}");
            match cause.as_structured() {
                Some(next) => current = next,
                None => {
                    out.push_str(&cause.to_string());
                    return out;
                }
            }
        }
        out.push_str(&current.to_string());
        out
    }
}

/// Renders `err` with its whole causal chain, or [`NIL_SENTINEL`] if absent.
pub fn render_chain(err: Option<&Failure>) -> String {
    match err {
        Some(err) => match err.as_structured() {
            Some(structured) => structured.chain(),
            None => err.to_string(),
        },
        None => NIL_SENTINEL.to_string(),
    }
}

/// True only for a structured error of the given kind.
pub fn has_kind<E: AsStructured + ?Sized>(err: Option<&E>, kind: ErrorKind) -> bool {
    err.and_then(AsStructured::as_structured)
        .is_some_and(|err| err.kind() == kind)
}

/// [`Error::wrap`] over an optional cause: no cause, no error.
pub fn wrap<E: Into<Failure>>(
    cause: Option<E>,
    kind: ErrorKind,
    message: impl Into<String>,
) -> Option<Error> {
    cause.map(|cause| Error::wrap(cause, kind, message))
}

/// [`Error::context`] over an optional cause: no cause, no error.
pub fn wrap_preserving_kind(cause: Option<Error>, message: impl Into<String>) -> Option<Error> {
    cause.map(|cause| cause.context(message))
}

/// Folds the present errors of `errs` into one.
///
/// No error gives `None`, a single error is returned unchanged, and two or more
/// become an error of `kind` caused by a [`MultiError`] holding all of them.
pub fn combine_errors<I, E>(message: impl Into<String>, kind: ErrorKind, errs: I) -> Option<Failure>
where
    I: IntoIterator<Item = Option<E>>,
    E: Into<Failure>,
{
    let mut errors: Vec<Failure> = errs.into_iter().flatten().map(Into::into).collect();
    match errors.len() {
        0 => None,
        1 => errors.pop(),
        _ => Some(Error::wrap(MultiError::new(errors), kind, message).into()),
    }
}

/// Reclassifying wrap for any `Result` whose error can join a chain.
pub trait WrapErr<T> {
    fn wrap_err_with<M, F>(self, kind: ErrorKind, message: F) -> AdbResult<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E: Into<Failure>> WrapErr<T> for Result<T, E> {
    fn wrap_err_with<M, F>(self, kind: ErrorKind, message: F) -> AdbResult<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|err| Error::wrap(err, kind, message()))
    }
}

/// Kind-preserving wrap for results that already carry an [`Error`].
pub trait Context<T> {
    fn context_with<M, F>(self, message: F) -> AdbResult<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T> Context<T> for AdbResult<T> {
    fn context_with<M, F>(self, message: F) -> AdbResult<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        self.map_err(|err| err.context(message()))
    }
}
