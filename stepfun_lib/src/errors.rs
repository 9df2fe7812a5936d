#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("a timeline needs at least one entry")]
    EmptyTimeline,

    #[error("malformed timeline: {0}")]
    MalformedTimeline(String),

    #[error("division by zero at {0}")]
    DivisionByZero(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
