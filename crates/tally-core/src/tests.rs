use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_domain::{DateRange, TransactionKind};

use crate::{
    AggregationService, CoreError, MemoryStorage, RecordStore, ReportFormatter, ReportPeriod,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_store() -> RecordStore {
    let store = RecordStore::open(Box::new(MemoryStorage::new())).expect("open store");
    let entries = [
        (ymd(2023, 12, 31), TransactionKind::Expense, dec!(700), "party"),
        (ymd(2024, 1, 5), TransactionKind::Income, dec!(5000), "salary"),
        (ymd(2024, 1, 5), TransactionKind::Expense, dec!(120), "food"),
        (ymd(2024, 2, 29), TransactionKind::Expense, dec!(80.5), "food"),
        (ymd(2024, 3, 1), TransactionKind::Income, dec!(150000), "salary"),
        (ymd(2024, 3, 1), TransactionKind::Expense, dec!(30000), "food"),
        (ymd(2024, 3, 2), TransactionKind::Expense, dec!(20000), "transport"),
        (ymd(2024, 12, 31), TransactionKind::Expense, dec!(999), "gifts"),
    ];
    for (date, kind, amount, desc) in entries {
        store.append(date, kind, amount, Some(desc)).expect("append");
    }
    store
}

#[test]
fn read_after_write_reflects_exactly_that_record() {
    let store = RecordStore::open(Box::new(MemoryStorage::new())).expect("open store");
    let day = ymd(2024, 7, 4);
    store
        .append(day, TransactionKind::Expense, dec!(42.42), None)
        .expect("append");

    let snapshot = store.snapshot().expect("snapshot");
    let result = AggregationService::aggregate(&snapshot, DateRange::day(day));
    assert_eq!(result.total_income, Decimal::ZERO);
    assert_eq!(result.total_expense, dec!(42.42));
    assert_eq!(result.expense_for("expense"), Some(dec!(42.42)));
}

#[test]
fn march_scenario_through_the_store() {
    let store = RecordStore::open(Box::new(MemoryStorage::new())).expect("open store");
    store
        .append(ymd(2024, 3, 1), TransactionKind::Income, dec!(150000), Some("salary"))
        .expect("append");
    store
        .append(ymd(2024, 3, 1), TransactionKind::Expense, dec!(30000), Some("food"))
        .expect("append");
    store
        .append(ymd(2024, 3, 2), TransactionKind::Expense, dec!(20000), Some("transport"))
        .expect("append");

    let snapshot = store.snapshot().expect("snapshot");
    let result = AggregationService::aggregate(
        &snapshot,
        DateRange::between(ymd(2024, 3, 1), ymd(2024, 3, 2)),
    );
    assert_eq!(result.total_income, dec!(150000));
    assert_eq!(result.total_expense, dec!(50000));
    assert_eq!(result.balance(), dec!(100000));
    let lines: Vec<_> = result
        .expense_by_description
        .iter()
        .map(|line| (line.description.as_str(), line.total))
        .collect();
    assert_eq!(lines, vec![("food", dec!(30000)), ("transport", dec!(20000))]);
}

#[test]
fn aggregation_is_additive_over_disjoint_partitions() {
    let ledger = seeded_store().snapshot().expect("snapshot");
    let whole = AggregationService::aggregate(&ledger, DateRange::all());

    let partitions = [
        DateRange::new(None, Some(ymd(2023, 12, 31))),
        DateRange::between(ymd(2024, 1, 1), ymd(2024, 2, 29)),
        DateRange::between(ymd(2024, 3, 1), ymd(2024, 3, 1)),
        DateRange::new(Some(ymd(2024, 3, 2)), None),
    ];
    let (income, expense) = partitions
        .iter()
        .map(|range| AggregationService::aggregate(&ledger, *range))
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), part| {
            (inc + part.total_income, exp + part.total_expense)
        });

    assert_eq!(income, whole.total_income);
    assert_eq!(expense, whole.total_expense);
}

#[test]
fn balance_identity_holds_for_every_range() {
    let ledger = seeded_store().snapshot().expect("snapshot");
    let ranges = [
        DateRange::all(),
        DateRange::day(ymd(2023, 12, 31)),
        DateRange::day(ymd(2030, 1, 1)),
        DateRange::month(2024, 3).unwrap(),
        DateRange::year(2024).unwrap(),
    ];
    for range in ranges {
        let result = AggregationService::aggregate(&ledger, range);
        assert_eq!(result.balance(), result.total_income - result.total_expense);
    }
    let negative = AggregationService::aggregate(&ledger, DateRange::day(ymd(2023, 12, 31)));
    assert_eq!(negative.balance(), dec!(-700));
}

#[test]
fn yearly_totals_equal_sum_of_included_months() {
    let ledger = seeded_store().snapshot().expect("snapshot");
    let summary = ReportFormatter::yearly_summary(&ledger, 2024);

    let months: Vec<u32> = summary.months.iter().map(|m| m.month).collect();
    assert_eq!(months, vec![1, 2, 3, 12]);

    let income: Decimal = summary.months.iter().map(|m| m.aggregation.total_income).sum();
    let expense: Decimal = summary.months.iter().map(|m| m.aggregation.total_expense).sum();
    assert_eq!(summary.total_income, income);
    assert_eq!(summary.total_expense, expense);

    let year = AggregationService::aggregate(&ledger, DateRange::year(2024).unwrap());
    assert_eq!(summary.total_income, year.total_income);
    assert_eq!(summary.total_expense, year.total_expense);
}

#[test]
fn on_demand_and_scheduled_paths_render_identically() {
    let ledger = seeded_store().snapshot().expect("snapshot");
    let formatter = ReportFormatter::default();
    let today = ymd(2024, 3, 2);

    let direct = formatter.format_period(
        &AggregationService::aggregate(&ledger, crate::Trigger::StartOfMonth.range(today)),
        &ReportPeriod::ThisMonth.label(today),
    );
    assert_eq!(direct, formatter.render(&ledger, ReportPeriod::ThisMonth, today));
}

#[test]
fn invalid_amount_is_reported_not_stored() {
    let store = seeded_store();
    let before = store.record_count().expect("count");
    let err = store
        .append(ymd(2024, 3, 3), TransactionKind::Expense, dec!(0), Some("nothing"))
        .expect_err("zero amount rejected");
    assert!(matches!(err, CoreError::InvalidAmount(_)));
    assert!(!err.is_storage());
    assert_eq!(store.record_count().expect("count"), before);
}
