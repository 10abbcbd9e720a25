use thiserror::Error;

/// Errors produced while tokenizing markdown or rendering the HTML tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid markdown syntax: unmatched delimiter '{0}'")]
    UnbalancedDelimiter(&'static str),

    #[error("unknown inline kind '{0}'")]
    UnknownInlineKind(String),

    #[error("parent node has no tag")]
    MissingTag,

    #[error("parent node has no children")]
    MissingChildren,

    #[error("tagged leaf node has no value")]
    MissingValue,
}

pub type Result<T> = std::result::Result<T, Error>;
