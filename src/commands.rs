//! Parsing of inbound text into ledger commands.
//!
//! Accepted shapes:
//! - `+<amount> [description]` records income
//! - `-<amount> [description]` records an expense
//! - `/report [today|month|year]` requests a report (today when omitted)
//! - `/help`

use rust_decimal::Decimal;
use tally_core::ReportPeriod;
use tally_domain::{Amount, TransactionKind};
use thiserror::Error;

pub const USAGE_HINT: &str = "Example: +4500000 salary or -25000 groceries";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record {
        kind: TransactionKind,
        amount: Amount,
        description: Option<String>,
    },
    Report(ReportPeriod),
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Nothing to do. {}", USAGE_HINT)]
    Empty,
    #[error("Start with + for income or - for an expense. {}", USAGE_HINT)]
    MissingSign,
    #[error("`{0}` is not a whole number. Format: {1}amount description")]
    InvalidAmount(String, char),
    #[error("Amount must be greater than zero. Format: {0}amount description")]
    NonPositiveAmount(char),
    #[error("Unknown report period `{0}`. Use /report today, /report month or /report year")]
    UnknownPeriod(String),
    #[error("Unknown command `{0}`. Type /help for the list of commands")]
    UnknownCommand(String),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(CommandError::Empty);
    }
    if let Some(rest) = text.strip_prefix('/') {
        return parse_slash_command(rest);
    }
    if text.eq_ignore_ascii_case("help") {
        return Ok(Command::Help);
    }

    let (kind, sign, rest) = if let Some(rest) = text.strip_prefix('+') {
        (TransactionKind::Income, '+', rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (TransactionKind::Expense, '-', rest)
    } else {
        return Err(CommandError::MissingSign);
    };

    let rest = rest.trim_start();
    let (raw_amount, description) = match rest.split_once(char::is_whitespace) {
        Some((amount, description)) => (amount, Some(description.trim())),
        None => (rest, None),
    };
    let amount = parse_amount(raw_amount, sign)?;
    let description = description
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Ok(Command::Record {
        kind,
        amount,
        description,
    })
}

fn parse_amount(raw: &str, sign: char) -> Result<Amount, CommandError> {
    let digits = raw.replace('_', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CommandError::InvalidAmount(raw.to_string(), sign));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| CommandError::InvalidAmount(raw.to_string(), sign))?;
    if value == 0 {
        return Err(CommandError::NonPositiveAmount(sign));
    }
    Ok(Decimal::from(value))
}

fn parse_slash_command(rest: &str) -> Result<Command, CommandError> {
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_ascii_lowercase();
    match name.as_str() {
        "help" | "start" => Ok(Command::Help),
        "report" => {
            let period = match words.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("today") | Some("day") | Some("daily") => ReportPeriod::Today,
                Some("month") | Some("monthly") => ReportPeriod::ThisMonth,
                Some("year") | Some("yearly") => ReportPeriod::ThisYear,
                Some(other) => return Err(CommandError::UnknownPeriod(other.to_string())),
            };
            Ok(Command::Report(period))
        }
        _ => Err(CommandError::UnknownCommand(format!("/{name}"))),
    }
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  +<amount> [description]   record income (e.g. +4500000 salary)",
        "  -<amount> [description]   record an expense (e.g. -25000 groceries)",
        "  /report [today|month|year]",
        "  /help",
        "  exit",
    ]
    .join("\n")
}
