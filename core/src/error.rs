use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing or invalid configuration value: {name}")]
    Config { name: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No commission rate configured for policy type '{policy_type}'")]
    MissingCommissionRate { policy_type: String },

    #[error("Translation request failed: {0}")]
    Translation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
