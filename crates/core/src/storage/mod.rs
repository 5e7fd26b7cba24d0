pub mod memory;

use crate::domain::receipt::{Receipt, ReceiptId};

pub use memory::MemoryReceiptStore;

/// Receipts keyed by identifier. There is no update or delete: a stored receipt never changes.
#[async_trait::async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Assigns a fresh identifier, stores the receipt under it and returns the identifier.
    async fn insert(&self, receipt: Receipt) -> ReceiptId;

    async fn lookup(&self, id: &str) -> Option<Receipt>;

    async fn len(&self) -> usize;
}
