//! Per-field value normalizers. Only `parse_amount` can fail; the rest always
//! produce a value.

pub mod amount;
pub mod date;
pub mod icon;
pub mod kind;
pub mod recurrence;

pub use amount::{parse_amount, AmountError};
pub use date::{DateConfidence, DateOrder, DateParser, ParsedDate};
pub use icon::resolve_icon;
pub use kind::{infer_type, parse_type};
pub use recurrence::parse_recurrence;
