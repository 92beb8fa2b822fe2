/// Read-only inventory view owned by the host.
pub trait InventoryOracle: Send + Sync {
    fn has_item(&self, item: &str, amount: u64) -> bool;
}
