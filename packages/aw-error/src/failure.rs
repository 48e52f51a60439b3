use std::{error::Error as StdError, fmt, io, sync::Arc};


use crate::{Error, ErrorKind};

/// Separator placed between the constituents of a [`MultiError`].
pub const MULTI_ERROR_SEPARATOR: &str = " U ";

/// Any error that can appear in a causal chain.
///
/// A chain is a sequence of [`Failure::Structured`] or [`Failure::Shared`]
/// nodes, terminated either by a structured error without a cause or by one of
/// the other variants.
#[derive(Debug)]
pub enum Failure {
    Structured(Error),
    /// A structured error also held elsewhere, such as a recorded close outcome
    Shared(Arc<Error>),
    Multiple(MultiError),
    /// An error produced outside this crate, always the last link of a chain
    Foreign(Box<dyn StdError + Send + Sync + 'static>),
}

impl Failure {
    pub fn foreign<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure::Foreign(Box::new(err))
    }

    /// The kind of the structured error, `None` for every other variant.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_structured().map(Error::kind)
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn as_structured(&self) -> Option<&Error> {
        match self {
            Failure::Structured(err) => Some(err),
            Failure::Shared(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Takes the structured error out, when this is its only owner.
    pub fn into_structured(self) -> Result<Error, Failure> {
        match self {
            Failure::Structured(err) => Ok(err),
            Failure::Shared(err) => Arc::try_unwrap(err).map_err(Failure::Shared),
            other => Err(other),
        }
    }
}

/// Read access to the structured error behind a value, if there is one.
pub trait AsStructured {
    fn as_structured(&self) -> Option<&Error>;
}

impl AsStructured for Error {
    fn as_structured(&self) -> Option<&Error> {
        Some(self)
    }
}

impl AsStructured for Failure {
    fn as_structured(&self) -> Option<&Error> {
        Failure::as_structured(self)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Structured(err) => fmt::Display::fmt(err, f),
            Failure::Shared(err) => fmt::Display::fmt(err, f),
            Failure::Multiple(errs) => fmt::Display::fmt(errs, f),
            Failure::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Failure::Structured(err) => err.source(),
            Failure::Shared(err) => err.source(),
            Failure::Multiple(_) => None,
            Failure::Foreign(err) => err.source(),
        }
    }
}

impl From<Error> for Failure {
    fn from(value: Error) -> Self {
        Failure::Structured(value)
    }
}

impl From<Arc<Error>> for Failure {
    fn from(value: Arc<Error>) -> Self {
        Failure::Shared(value)
    }
}

impl From<MultiError> for Failure {
    fn from(value: MultiError) -> Self {
        Failure::Multiple(value)
    }
}

impl From<io::Error> for Failure {
    fn from(value: io::Error) -> Self {
        Failure::foreign(value)
    }
}

impl From<&str> for Failure {
    fn from(value: &str) -> Self {
        Failure::Foreign(value.into())
    }
}

/// Two or more failures collected from independent operations.
///
/// Only built by [`combine_errors`](crate::combine_errors), which never
/// exposes an aggregate with fewer than two members.
#[derive(Debug, thiserror::Error)]
#[error("{} errors:[{}]", .0.len(), render_constituents(.0))]
pub struct MultiError(Vec<Failure>);

impl MultiError {
    pub(crate) fn new(errors: Vec<Failure>) -> Self {
        debug_assert!(errors.len() >= 2);
        Self(errors)
    }

    pub fn errors(&self) -> &[Failure] {
        &self.0
    }
}

fn render_constituents(errors: &[Failure]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(MULTI_ERROR_SEPARATOR)
}
