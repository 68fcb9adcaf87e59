//! Text rendering of aggregation results for daily, monthly and yearly reports.

use std::fmt::{self, Write};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tally_domain::{month_name, Amount, DateRange, Ledger};

use crate::{
    aggregation::{Aggregation, AggregationService},
    format::{AmountFormatter, GroupedAmountFormatter},
};

pub const DEFAULT_TOP_EXPENSES: usize = 5;
const MONTH_SEPARATOR: &str = "--------------------";

/// Period selector shared by on-demand requests and scheduled triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Today,
    ThisMonth,
    ThisYear,
}

impl ReportPeriod {
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            ReportPeriod::Today => DateRange::day(today),
            ReportPeriod::ThisMonth => DateRange::month_to_date(today),
            ReportPeriod::ThisYear => DateRange::new(
                NaiveDate::from_ymd_opt(today.year(), 1, 1),
                Some(today),
            ),
        }
    }

    pub fn label(self, today: NaiveDate) -> String {
        match self {
            ReportPeriod::Today => format!("Daily report ({today})"),
            ReportPeriod::ThisMonth => format!(
                "Monthly report ({} {})",
                month_name(today.month()),
                today.year()
            ),
            ReportPeriod::ThisYear => format!("Yearly report {}", today.year()),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportPeriod::Today => "today",
            ReportPeriod::ThisMonth => "month",
            ReportPeriod::ThisYear => "year",
        };
        f.write_str(label)
    }
}

/// One calendar month that contributed to a yearly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: u32,
    pub aggregation: Aggregation,
}

/// Per-month results of a year with the running totals of the included months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlySummary {
    pub year: i32,
    pub months: Vec<MonthSummary>,
    pub total_income: Amount,
    pub total_expense: Amount,
}

impl YearlySummary {
    pub fn balance(&self) -> Amount {
        self.total_income.saturating_sub(self.total_expense)
    }
}

/// Renders reports. Pure: no I/O, no shared state.
pub struct ReportFormatter {
    amounts: Box<dyn AmountFormatter>,
    top_n: usize,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(Box::new(GroupedAmountFormatter::new()), DEFAULT_TOP_EXPENSES)
    }
}

impl ReportFormatter {
    pub fn new(amounts: Box<dyn AmountFormatter>, top_n: usize) -> Self {
        Self { amounts, top_n }
    }

    /// Single entry point for both on-demand and scheduled reports.
    pub fn render(&self, ledger: &Ledger, period: ReportPeriod, today: NaiveDate) -> String {
        match period {
            ReportPeriod::ThisYear => self.format_yearly(ledger, today.year()),
            _ => {
                let result = AggregationService::aggregate(ledger, period.range(today));
                self.format_period(&result, &period.label(today))
            }
        }
    }

    pub fn format_period(&self, result: &Aggregation, label: &str) -> String {
        let mut text = format!("{label}\n\n");
        self.write_totals(&mut text, result.total_income, result.total_expense, "Balance");

        let top = result.top_expenses(self.top_n);
        if !top.is_empty() {
            text.push_str("\nTop expenses:\n");
            for line in top {
                let _ = writeln!(
                    text,
                    "- {}: {}",
                    line.description,
                    self.amounts.format_amount(line.total)
                );
            }
        }
        text
    }

    /// Aggregates every calendar month of `year`, keeping months with activity.
    pub fn yearly_summary(ledger: &Ledger, year: i32) -> YearlySummary {
        let mut months = Vec::new();
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;

        for month in 1..=12 {
            let Some(range) = DateRange::month(year, month) else {
                continue;
            };
            let aggregation = AggregationService::aggregate(ledger, range);
            if aggregation.is_empty() {
                continue;
            }
            total_income = total_income.saturating_add(aggregation.total_income);
            total_expense = total_expense.saturating_add(aggregation.total_expense);
            months.push(MonthSummary { month, aggregation });
        }

        YearlySummary {
            year,
            months,
            total_income,
            total_expense,
        }
    }

    pub fn format_yearly(&self, ledger: &Ledger, year: i32) -> String {
        let summary = Self::yearly_summary(ledger, year);
        let mut text = format!("Yearly report {year}\n\n");

        for month in &summary.months {
            let _ = writeln!(text, "{}", month_name(month.month));
            self.write_totals(
                &mut text,
                month.aggregation.total_income,
                month.aggregation.total_expense,
                "Balance",
            );
            let _ = writeln!(text, "{MONTH_SEPARATOR}");
        }

        let _ = writeln!(text, "\nTotal for {year}:");
        self.write_totals(
            &mut text,
            summary.total_income,
            summary.total_expense,
            "Net balance",
        );
        text
    }

    fn write_totals(&self, text: &mut String, income: Amount, expense: Amount, balance_label: &str) {
        let _ = writeln!(text, "Income: {}", self.amounts.format_amount(income));
        let _ = writeln!(text, "Expense: {}", self.amounts.format_amount(expense));
        let _ = writeln!(
            text,
            "{balance_label}: {}",
            self.amounts.format_amount(income.saturating_sub(expense))
        );
    }
}
