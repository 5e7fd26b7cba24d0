use crate::domain::receipt::{Receipt, ReceiptId};
use crate::storage::ReceiptStore;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-lifetime store. A single lock serializes inserts against lookups.
#[derive(Debug, Default)]
pub struct MemoryReceiptStore {
    receipts: RwLock<HashMap<ReceiptId, Receipt>>,
}

impl MemoryReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ReceiptStore for MemoryReceiptStore {
    async fn insert(&self, mut receipt: Receipt) -> ReceiptId {
        let mut receipts = self.receipts.write().await;
        let mut id = Uuid::new_v4();
        while receipts.contains_key(&id) {
            id = Uuid::new_v4();
        }

        receipt.id = Some(id);
        receipts.insert(id, receipt);
        tracing::debug!(%id, stored = receipts.len(), "receipt stored");
        id
    }

    async fn lookup(&self, id: &str) -> Option<Receipt> {
        // Anything that is not a UUID can never have been issued by `insert`.
        let id = Uuid::parse_str(id).ok()?;
        self.receipts.read().await.get(&id).cloned()
    }

    async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }
}
