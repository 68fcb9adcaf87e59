use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionRecord;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Date-bucketed collection of every record. Buckets keep insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub buckets: BTreeMap<NaiveDate, Vec<TransactionRecord>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            buckets: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Appends the record to its date bucket, creating the bucket when absent.
    pub fn push(&mut self, record: TransactionRecord) {
        self.buckets.entry(record.date).or_default().push(record);
        self.touch();
    }

    pub fn bucket(&self, date: NaiveDate) -> &[TransactionRecord] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<TransactionRecord>)> {
        self.buckets.iter()
    }

    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionKind;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn push_keeps_insertion_order_within_bucket() {
        let mut ledger = Ledger::new();
        let day = ymd(2024, 3, 1);
        ledger.push(TransactionRecord::new(
            day,
            TransactionKind::Income,
            dec!(150000),
            Some("salary"),
        ));
        ledger.push(TransactionRecord::new(
            day,
            TransactionKind::Expense,
            dec!(30000),
            Some("food"),
        ));

        let bucket = ledger.bucket(day);
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket[0].description, "salary");
        assert_eq!(bucket[1].description, "food");
        assert_eq!(ledger.record_count(), 2);
    }

    #[test]
    fn missing_bucket_reads_as_empty() {
        let ledger = Ledger::new();
        assert!(ledger.bucket(ymd(2024, 1, 1)).is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn buckets_serialize_keyed_by_iso_date() {
        let mut ledger = Ledger::new();
        ledger.push(TransactionRecord::new(
            ymd(2024, 3, 2),
            TransactionKind::Expense,
            dec!(20000),
            Some("transport"),
        ));

        let json = serde_json::to_value(&ledger).unwrap();
        let bucket = &json["buckets"]["2024-03-02"];
        assert_eq!(bucket[0]["kind"], "expense");
        assert_eq!(bucket[0]["description"], "transport");

        let restored: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(restored, ledger);
    }
}
