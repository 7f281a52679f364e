/// Closed set of outcomes from checking one block against the ledger. These
/// are classifications, not errors: every one of them is normal flow.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProcessResult {
    /// Valid; the caller may commit the block with its sideband.
    Progress,
    /// Already in the store, or pruned.
    Old,
    /// The named previous block is not in the store yet.
    GapPrevious,
    /// The referenced source block is not in the store yet.
    GapSource,
    /// Epoch open for an account with no receivable entry to justify it.
    GapEpochOpenPending,
    BadSignature,
    /// A send that would increase the balance.
    NegativeSpend,
    /// Previous exists but is not the account head.
    Fork,
    /// No matching receivable entry, or one the block type may not claim.
    Unreceivable,
    /// Chain position rules violated (legacy after state, or a non-sequential
    /// epoch bump).
    BlockPosition,
    InsufficientWork,
    /// Attempt to open the reserved burn account.
    OpenedBurnAccount,
    BalanceMismatch,
    RepresentativeMismatch,
}

impl ProcessResult {
    pub fn is_progress(&self) -> bool {
        matches!(self, ProcessResult::Progress)
    }
}
