use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this error aborted a parallel bucket batch.
    pub fn is_task_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::ConcurrentTaskFailure { .. })
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn task_failure(operation: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::ConcurrentTaskFailure {
                operation: operation.into(),
                message: message.into(),
                source: None,
            }
            .into(),
        )
    }

    /// Wraps the error returned by a bucket task into a failure of the whole operation.
    pub fn task_failure_from<E>(operation: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = source.to_string();
        Error(
            ErrorKind::ConcurrentTaskFailure {
                operation: operation.into(),
                message,
                source: Some(Box::new(source)),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("unable to do {operation} operation: {message}")]
    ConcurrentTaskFailure {
        operation: String,
        message: String,
        #[source]
        source: Option<StdErrorBoxed>,
    },

    #[error("failed to build the worker pool: {source}")]
    ThreadPoolBuild {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        ErrorKind::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_failure_message() {
        let err = Error::task_failure("AND", "bucket 7 panicked");
        assert!(err.is_task_failure());
        assert_eq!(
            err.to_string(),
            "unable to do AND operation: bucket 7 panicked"
        );
    }

    #[test]
    fn test_task_failure_keeps_source() {
        let inner = Error::invalid_operation("merge");
        let err = Error::task_failure_from("OR", inner);
        match err.kind() {
            ErrorKind::ConcurrentTaskFailure {
                operation,
                message,
                source,
            } => {
                assert_eq!(operation, "OR");
                assert_eq!(message, "invalid operation merge");
                assert!(source.is_some());
            }
            other => panic!("unexpected error kind {other:?}"),
        }
    }

    #[test]
    fn test_into_kind() {
        let err = Error::invalid_arg("num_threads", "must be positive");
        assert!(!err.is_task_failure());
        assert!(matches!(
            err.into_kind(),
            ErrorKind::InvalidArgument { name, .. } if name == "num_threads"
        ));
    }
}
