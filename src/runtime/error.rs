use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SystemCreationError {
    #[error("system name must not be empty")]
    EmptyName,
    #[error("system name {0:?} contains characters outside [A-Za-z0-9_.@-]")]
    InvalidName(String),
    #[error("cookie for system {0:?} must not be empty")]
    EmptyCookie(String),
    #[error("handshake for system {name:?} was rejected: {reason}")]
    Rejected { name: String, reason: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UnitCreationError {
    #[error("system {system:?} is at capacity ({limit} units)")]
    CapacityExhausted { system: String, limit: usize },
    #[error("unit {index} was rejected: {reason}")]
    Rejected { index: usize, reason: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("unit mailbox is closed")]
    MailboxClosed,
    #[error("unit dropped the request without replying")]
    NoReply,
    #[error("request was rejected: {0}")]
    Rejected(String),
}
