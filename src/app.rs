//! Wires the record store, report formatter, schedule and delivery channel.

use std::sync::Arc;

use chrono::NaiveDate;
use tally_config::Config;
use tally_core::{
    AmountFormatter, Clock, GroupedAmountFormatter, LedgerStorage, RecordStore, ReportFormatter,
    ReportPeriod, Schedule, Trigger,
};

use crate::{
    commands::{help_text, parse_command, Command},
    delivery::DeliveryChannel,
    errors::AppError,
};

const STORAGE_RETRY_MESSAGE: &str = "Could not save the transaction, please retry.";

/// Response to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub is_error: bool,
}

impl Reply {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    store: RecordStore,
    formatter: ReportFormatter,
    amounts: GroupedAmountFormatter,
    schedule: Schedule,
    clock: Arc<dyn Clock>,
    delivery: Box<dyn DeliveryChannel>,
    destination: String,
}

impl App {
    pub fn new(
        store: RecordStore,
        schedule: Schedule,
        clock: Arc<dyn Clock>,
        delivery: Box<dyn DeliveryChannel>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            store,
            formatter: ReportFormatter::default(),
            amounts: GroupedAmountFormatter::new(),
            schedule,
            clock,
            delivery,
            destination: destination.into(),
        }
    }

    /// Builds the application from validated configuration.
    pub fn from_config(
        config: &Config,
        storage: Box<dyn LedgerStorage>,
        delivery: Box<dyn DeliveryChannel>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let schedule = Schedule::new(
            config.parsed_timezone()?,
            config.parsed_end_of_day()?,
            config.parsed_start_of_month()?,
        );
        let amounts = match &config.currency_suffix {
            Some(suffix) => GroupedAmountFormatter::with_suffix(suffix.as_str()),
            None => GroupedAmountFormatter::new(),
        };
        let store = RecordStore::open(storage)?;
        let mut app = Self::new(store, schedule, clock, delivery, config.destination.as_str());
        app.formatter = ReportFormatter::new(Box::new(amounts.clone()), config.top_expenses);
        app.amounts = amounts;
        Ok(app)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Calendar date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        self.schedule.local_date(self.clock.now())
    }

    /// Parses and executes one inbound message, always producing a reply.
    pub fn handle_text(&self, text: &str) -> Reply {
        let command = match parse_command(text) {
            Ok(command) => command,
            Err(err) => {
                tracing::debug!(input = text, error = %err, "rejected inbound message");
                return Reply::error(err.to_string());
            }
        };
        match self.execute(command) {
            Ok(text) => Reply::ok(text),
            Err(AppError::Core(err)) if err.is_storage() => Reply::error(STORAGE_RETRY_MESSAGE),
            Err(err) => Reply::error(err.to_string()),
        }
    }

    pub fn execute(&self, command: Command) -> Result<String, AppError> {
        match command {
            Command::Record {
                kind,
                amount,
                description,
            } => {
                let date = self.today();
                self.store
                    .append(date, kind, amount, description.as_deref())?;
                let label = description.unwrap_or_else(|| kind.default_description().to_string());
                Ok(format!(
                    "Recorded {} of {} ({label})",
                    kind.to_string().to_lowercase(),
                    self.amounts.format_amount(amount)
                ))
            }
            Command::Report(period) => self.report(period),
            Command::Help => Ok(help_text()),
        }
    }

    pub fn report(&self, period: ReportPeriod) -> Result<String, AppError> {
        let ledger = self.store.snapshot()?;
        Ok(self.formatter.render(&ledger, period, self.today()))
    }

    /// Renders the trigger's report and hands it to the delivery channel.
    pub fn run_trigger(&self, trigger: Trigger) -> Result<(), AppError> {
        let text = self.report(trigger.period())?;
        self.delivery.deliver(&self.destination, &text)?;
        tracing::info!(%trigger, destination = %self.destination, "scheduled report delivered");
        Ok(())
    }
}
