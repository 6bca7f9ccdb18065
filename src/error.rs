#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid comparator name: {0}")]
    InvalidName(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
