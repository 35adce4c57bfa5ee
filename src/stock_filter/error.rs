use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Template error: {0}")]
    Template(#[from] blockmarkup::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Markup error: {0}")]
    Markup(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
