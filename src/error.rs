// src/error.rs
use crate::network::UserId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error("user {0} does not exist in the network")]
    UnknownUser(UserId),
}
