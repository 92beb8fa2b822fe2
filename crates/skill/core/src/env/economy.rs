/// Gold ledger owned by the host.
///
/// Methods take `&self`; implementations keep their own interior mutability so
/// the engine never holds a mutable reference into host storage.
pub trait EconomyOracle: Send + Sync {
    fn has_gold(&self, amount: u64) -> bool;

    /// Debits `amount`; returns false and leaves the balance untouched when
    /// the balance is insufficient.
    fn remove_gold(&self, amount: u64) -> bool;

    fn add_gold(&self, amount: u64);
}
