use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Investment,
    Savings,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Investment => write!(f, "investment"),
            TransactionType::Savings => write!(f, "savings"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            "savings" => Ok(TransactionType::Savings),
            other => Err(format!("Unknown transaction type: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Recurrence {
    #[default]
    OneTime,
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    Annually,
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::OneTime => write!(f, "one-time"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::BiWeekly => write!(f, "bi-weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
            Recurrence::Quarterly => write!(f, "quarterly"),
            Recurrence::Annually => write!(f, "annually"),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-time" => Ok(Recurrence::OneTime),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "bi-weekly" => Ok(Recurrence::BiWeekly),
            "monthly" => Ok(Recurrence::Monthly),
            "quarterly" => Ok(Recurrence::Quarterly),
            "annually" => Ok(Recurrence::Annually),
            other => Err(format!("Unknown recurrence: '{other}'")),
        }
    }
}

/// A symbolic glyph shown next to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(String);

impl Icon {
    /// The universal fallback glyph.
    pub const CASH: &'static str = "💵";

    pub fn new(glyph: impl Into<String>) -> Self {
        Icon(glyph.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Icon {
    fn default() -> Self {
        Icon(Self::CASH.to_string())
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Category is empty")]
    EmptyCategory,
}

/// Normalized field values for one row, before the record invariants are checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub amount: Money,
    pub category: String,
    pub transaction_type: TransactionType,
    pub recurrence: Recurrence,
    pub notes: Option<String>,
    pub icon: Icon,
    pub date: NaiveDate,
}

/// The normalized output unit of an import. Carries no persistent identity;
/// the storage layer assigns one when it takes ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    amount: Money,
    category: String,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    recurrence: Recurrence,
    notes: Option<String>,
    icon: Icon,
    date: NaiveDate,
}

impl TransactionRecord {
    pub fn validate(draft: DraftRecord) -> Result<TransactionRecord, RecordError> {
        let category = draft.category.trim();
        if category.is_empty() {
            return Err(RecordError::EmptyCategory);
        }

        let notes = draft
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(TransactionRecord {
            amount: draft.amount,
            category: category.to_string(),
            transaction_type: draft.transaction_type,
            recurrence: draft.recurrence,
            notes,
            icon: draft.icon,
            date: draft.date,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}
