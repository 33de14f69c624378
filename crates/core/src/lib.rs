pub mod money;
pub mod transaction;

pub use money::Money;
pub use transaction::{DraftRecord, Icon, RecordError, Recurrence, TransactionRecord, TransactionType};
