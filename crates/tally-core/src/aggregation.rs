//! Range aggregation over a ledger snapshot.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_domain::{Amount, DateRange, Ledger, TransactionKind};

/// Summed expense for one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLine {
    pub description: String,
    pub total: Amount,
}

/// Totals for one aggregation range. Computed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub range: DateRange,
    pub total_income: Amount,
    pub total_expense: Amount,
    /// Expense totals per description, in first-seen order.
    pub expense_by_description: Vec<ExpenseLine>,
}

impl Aggregation {
    pub fn balance(&self) -> Amount {
        self.total_income.saturating_sub(self.total_expense)
    }

    /// True when the range holds neither income nor expense.
    pub fn is_empty(&self) -> bool {
        self.total_income.is_zero() && self.total_expense.is_zero()
    }

    pub fn expense_for(&self, description: &str) -> Option<Amount> {
        self.expense_by_description
            .iter()
            .find(|line| line.description == description)
            .map(|line| line.total)
    }

    /// The `n` largest expense descriptions, descending; ties keep first-seen order.
    pub fn top_expenses(&self, n: usize) -> Vec<&ExpenseLine> {
        let mut lines: Vec<&ExpenseLine> = self.expense_by_description.iter().collect();
        lines.sort_by(|a, b| b.total.cmp(&a.total));
        lines.truncate(n);
        lines
    }
}

pub struct AggregationService;

impl AggregationService {
    /// Sums every record whose bucket date falls inside `range`.
    ///
    /// Totals saturate at `Decimal::MAX`; a hand-edited ledger file is not range checked.
    pub fn aggregate(ledger: &Ledger, range: DateRange) -> Aggregation {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut lines: Vec<ExpenseLine> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (date, records) in ledger.buckets() {
            if !range.contains(*date) {
                continue;
            }
            for record in records {
                match record.kind {
                    TransactionKind::Income => {
                        total_income = total_income.saturating_add(record.amount)
                    }
                    TransactionKind::Expense => {
                        total_expense = total_expense.saturating_add(record.amount);
                        match positions.get(&record.description) {
                            Some(&idx) => {
                                lines[idx].total = lines[idx].total.saturating_add(record.amount)
                            }
                            None => {
                                positions.insert(record.description.clone(), lines.len());
                                lines.push(ExpenseLine {
                                    description: record.description.clone(),
                                    total: record.amount,
                                });
                            }
                        }
                    }
                }
            }
        }

        Aggregation {
            range,
            total_income,
            total_expense,
            expense_by_description: lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_domain::TransactionRecord;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn push(ledger: &mut Ledger, date: NaiveDate, kind: TransactionKind, amount: Amount, desc: &str) {
        ledger.push(TransactionRecord::new(date, kind, amount, Some(desc)));
    }

    fn march_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        push(&mut ledger, ymd(2024, 3, 1), TransactionKind::Income, dec!(150000), "salary");
        push(&mut ledger, ymd(2024, 3, 1), TransactionKind::Expense, dec!(30000), "food");
        push(&mut ledger, ymd(2024, 3, 2), TransactionKind::Expense, dec!(20000), "transport");
        ledger
    }

    #[test]
    fn aggregates_march_scenario() {
        let ledger = march_ledger();
        let result =
            AggregationService::aggregate(&ledger, DateRange::between(ymd(2024, 3, 1), ymd(2024, 3, 2)));

        assert_eq!(result.total_income, dec!(150000));
        assert_eq!(result.total_expense, dec!(50000));
        assert_eq!(result.balance(), dec!(100000));
        assert_eq!(result.expense_by_description.len(), 2);
        assert_eq!(result.expense_for("food"), Some(dec!(30000)));
        assert_eq!(result.expense_for("transport"), Some(dec!(20000)));
        assert_eq!(result.expense_for("salary"), None);
    }

    #[test]
    fn buckets_outside_range_are_skipped() {
        let ledger = march_ledger();
        let result = AggregationService::aggregate(&ledger, DateRange::day(ymd(2024, 3, 2)));

        assert_eq!(result.total_income, Decimal::ZERO);
        assert_eq!(result.total_expense, dec!(20000));
        assert_eq!(result.balance(), dec!(-20000));
    }

    #[test]
    fn empty_ledger_yields_zero_totals() {
        let result = AggregationService::aggregate(&Ledger::new(), DateRange::all());

        assert!(result.is_empty());
        assert_eq!(result.balance(), Decimal::ZERO);
        assert!(result.expense_by_description.is_empty());
    }

    #[test]
    fn repeated_descriptions_are_summed() {
        let mut ledger = Ledger::new();
        push(&mut ledger, ymd(2024, 5, 1), TransactionKind::Expense, dec!(10.5), "coffee");
        push(&mut ledger, ymd(2024, 5, 2), TransactionKind::Expense, dec!(0.25), "coffee");

        let result = AggregationService::aggregate(&ledger, DateRange::all());
        assert_eq!(result.expense_for("coffee"), Some(dec!(10.75)));
        assert_eq!(result.expense_by_description.len(), 1);
    }

    #[test]
    fn top_expenses_break_ties_by_first_seen_order() {
        let mut ledger = Ledger::new();
        let day = ymd(2024, 6, 1);
        push(&mut ledger, day, TransactionKind::Expense, dec!(500), "A");
        push(&mut ledger, day, TransactionKind::Expense, dec!(500), "B");
        push(&mut ledger, day, TransactionKind::Expense, dec!(100), "C");

        let result = AggregationService::aggregate(&ledger, DateRange::day(day));
        let names: Vec<_> = result
            .top_expenses(5)
            .iter()
            .map(|line| line.description.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn oversized_amounts_saturate_instead_of_overflowing() {
        let mut ledger = Ledger::new();
        let day = ymd(2024, 6, 1);
        push(&mut ledger, day, TransactionKind::Expense, Decimal::MAX, "a");
        push(&mut ledger, day, TransactionKind::Expense, Decimal::MAX, "a");

        let result = AggregationService::aggregate(&ledger, DateRange::day(day));
        assert_eq!(result.total_expense, Decimal::MAX);
        assert_eq!(result.expense_for("a"), Some(Decimal::MAX));
        assert_eq!(result.balance(), Decimal::MIN);
    }

    #[test]
    fn top_expenses_truncates_to_n() {
        let mut ledger = Ledger::new();
        let day = ymd(2024, 6, 1);
        for (idx, name) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            push(&mut ledger, day, TransactionKind::Expense, Decimal::from(idx as u32 + 1), name);
        }

        let result = AggregationService::aggregate(&ledger, DateRange::all());
        let top = result.top_expenses(5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].description, "g");
        assert_eq!(top[4].description, "c");
    }
}
