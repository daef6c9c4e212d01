use thiserror::Error;

/// Typed registry errors; always surfaced to the immediate caller.
///
/// The kind names returned by [`RegistryError::kind_name`] are the wire
/// identity of these errors: the dispatch layer serializes them as
/// `{kind, message}` and the remote caller matches on the kind string the
/// same way a local caller matches on the variant.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid project name: {0:?}")]
    InvalidName(String),

    #[error("project {0:?} already exists")]
    AlreadyExists(String),

    #[error("project {0:?} does not exist")]
    DoesNotExist(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RegistryError::InvalidName(_) => "InvalidName",
            RegistryError::AlreadyExists(_) => "AlreadyExists",
            RegistryError::DoesNotExist(_) => "DoesNotExist",
            RegistryError::Io(_) => "Io",
        }
    }
}
