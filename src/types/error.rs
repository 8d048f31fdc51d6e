use thiserror::Error;

/// Problems with a rule document as a whole.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("duplicate condition id '{id}'")]
    DuplicateId { id: String },

    #[error("malformed rule document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected authoring operations. The session is left unchanged.
#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("no condition with id '{id}'")]
    UnknownCondition { id: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}
