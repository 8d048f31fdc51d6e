use thiserror::Error;

use crate::parse::ParseError;
use crate::{AuthoringError, DocumentError};

/// Unified error type covering document I/O, param parsing and authoring.
///
/// Evaluation never fails and does not appear here.
#[derive(Debug, Error)]
pub enum ConditionsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Authoring(#[from] AuthoringError),
}
