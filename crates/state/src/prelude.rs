pub use crate::account::AccountInfo;
pub use crate::block::{Block, BlockType};
pub use crate::ids::{Account, BlockHash, QualifiedRoot};
pub use crate::pending::{PendingInfo, PendingKey};
pub use crate::sideband::{BlockDetails, SavedBlock, Sideband};
