pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed snapshot: {message}")]
    MalformedSnapshot { message: String },

    #[error("malformed rolling index definitions: {message}")]
    MalformedDefinitions { message: String },

    #[error("unknown filter type: {value} (expected none, rolling or index)")]
    UnknownFilterType { value: String },

    #[error("unknown layout: {value} (expected tree or force)")]
    UnknownLayout { value: String },

    #[error("invalid view config: {message}")]
    InvalidConfig { message: String },

    #[error("unknown hierarchy node: {id}")]
    UnknownNode { id: usize },
}
