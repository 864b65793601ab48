#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {source_id} -> {target_id}")]
    MissingEndpoint {
        source_id: String,
        target_id: String,
    },
    #[error("graph contains a self-loop on node {id}")]
    SelfLoop { id: String },
    #[error("graph contains duplicate node id: {id}")]
    DuplicateNode { id: String },
    #[error("node {id} has a non-finite {field}")]
    NonFiniteNode { id: String, field: &'static str },
    #[error("invalid layout option {name}: {value}")]
    InvalidOption { name: &'static str, value: f64 },
    #[error("malformed tree: {message}")]
    MalformedTree { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
