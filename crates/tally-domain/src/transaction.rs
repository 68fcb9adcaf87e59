//! Domain models for individual ledger records.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity in the ledger's base currency unit. Always stored positive.
pub type Amount = Decimal;

/// Stable identifier handed back to callers after an append.
pub type RecordId = Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Direction of a cash movement. The sign of an amount lives here, never in the amount.
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Placeholder label used when a record arrives without a description.
    pub fn default_description(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub description: String,
}

impl TransactionRecord {
    /// Builds a record, substituting the kind's placeholder for a blank description.
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        amount: Amount,
        description: Option<&str>,
    ) -> Self {
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| kind.default_description())
            .to_string();
        Self {
            id: Uuid::new_v4(),
            date,
            kind,
            amount,
            description,
        }
    }
}
