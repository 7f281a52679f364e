use lattice_state::ids::{Account, BlockHash};
use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("block {0} already present")]
    DuplicateBlock(BlockHash),

    #[error("no pending entry for account {0} source {1}")]
    MissingPending(Account, BlockHash),

    #[error("{0}")]
    Other(String),
}
