//! Receipt intake, scoring, and point lookup.

pub mod domain;
pub mod router;
pub mod scoring;
pub mod store;
pub mod validation;

pub use domain::{Amount, AmountParseError, Points, Receipt, ReceiptId, ReceiptItem, ScoredReceipt};
pub use router::receipt_router;
pub use scoring::{ScoreBreakdown, ScoreComponent, ScoringEngine, ScoringRule};
pub use store::{IdGenerator, ReceiptStore, StoreError, UuidGenerator, MAX_ID_ATTEMPTS};
pub use validation::{ItemSubmission, PriceInput, ReceiptSubmission, ReceiptValidationError};
