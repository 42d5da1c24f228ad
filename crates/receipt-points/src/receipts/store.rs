use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use super::domain::{Points, Receipt, ReceiptId, ScoredReceipt};
use super::scoring::ScoringEngine;

/// Upper bound on identifier draws for a single `record` call.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Source of candidate receipt identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ReceiptId;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> ReceiptId {
        ReceiptId(Uuid::new_v4().to_string())
    }
}

/// In-memory mapping from issued identifiers to the points each receipt earned.
///
/// The store is created once at startup and shared by handle; it lives as long as the
/// process and is never cleared.
pub struct ReceiptStore<G = UuidGenerator> {
    engine: ScoringEngine,
    ids: G,
    receipts: Mutex<HashMap<ReceiptId, ScoredReceipt>>,
}

impl Default for ReceiptStore<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptStore<UuidGenerator> {
    pub fn new() -> Self {
        Self::with_generator(UuidGenerator)
    }
}

impl<G> ReceiptStore<G>
where
    G: IdGenerator,
{
    pub fn with_generator(ids: G) -> Self {
        Self {
            engine: ScoringEngine::new(),
            ids,
            receipts: Mutex::new(HashMap::new()),
        }
    }

    /// Score the receipt and store it under a freshly issued identifier.
    pub fn record(&self, receipt: &Receipt) -> Result<ScoredReceipt, StoreError> {
        let points = self.engine.score(receipt);
        let mut guard = self.lock();

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if guard.contains_key(&id) {
                warn!(%id, attempt, "receipt identifier collision, drawing again");
                continue;
            }

            let scored = ScoredReceipt { id, points };
            guard.insert(scored.id.clone(), scored.clone());
            debug!(id = %scored.id, points, stored = guard.len(), "receipt recorded");
            return Ok(scored);
        }

        Err(StoreError::IdentifierExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Points for a previously issued identifier.
    pub fn lookup(&self, id: &ReceiptId) -> Result<Points, StoreError> {
        self.lock()
            .get(id)
            .map(|scored| scored.points)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every mutation is a single insert, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<ReceiptId, ScoredReceipt>> {
        self.receipts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Error enumeration for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no receipt found for id {0}")]
    NotFound(ReceiptId),
    #[error("could not issue a unique receipt id after {attempts} attempts")]
    IdentifierExhausted { attempts: usize },
}
