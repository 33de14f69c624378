use fathom_core::{Money, TransactionType};

const INCOME: &[&str] = &["income", "deposit", "credit", "salary", "payroll", "refund", "revenue"];
const INVESTMENT: &[&str] = &["invest", "stock", "brokerage", "crypto"];
const SAVINGS: &[&str] = &["saving"];

/// Read a type cell. Unrecognized text is an expense.
pub fn parse_type(raw: &str) -> TransactionType {
    let text = raw.trim().to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if has(INCOME) {
        TransactionType::Income
    } else if has(INVESTMENT) {
        TransactionType::Investment
    } else if has(SAVINGS) {
        TransactionType::Savings
    } else {
        TransactionType::Expense
    }
}

/// Used when the file has no type column at all.
pub fn infer_type(amount: Money) -> TransactionType {
    if amount.is_positive() {
        TransactionType::Income
    } else {
        TransactionType::Expense
    }
}
