use thiserror::Error;

/// Errors raised while computing positions, transits and chart relations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstrologError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Option '{option}' has no meaning for {body}")]
    UnsupportedOption { body: String, option: String },
    #[error("Unknown body name: {0}")]
    UnknownBodyName(String),
    #[error("Unknown body id: {0}")]
    UnknownBody(i32),
    #[error("Unknown fixed star: {0}")]
    UnknownStar(String),
    #[error("{0} is not part of this chart")]
    NotInChart(String),
    #[error("Failed to calculate {target}: {message}")]
    CalculationFailed { target: String, message: String },
}

pub type Result<T> = std::result::Result<T, AstrologError>;
