use agenda_db::RepoError;

/// Outcome of a failed service call.
///
/// `Domain` carries the closed set of expected failures of the operation;
/// everything else is an infrastructure fault that aborted the transaction.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Domain(E),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),
}

impl<E: std::error::Error + 'static> ServiceError<E> {
    /// The domain failure, if this is one.
    pub fn domain(&self) -> Option<&E> {
        match self {
            ServiceError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Shorthand for returning a domain failure.
pub(crate) fn failure<T, E: std::error::Error + 'static>(error: E) -> Result<T, ServiceError<E>> {
    Err(ServiceError::Domain(error))
}
