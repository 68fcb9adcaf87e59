use tally_domain::Amount;

/// Formats ledger amounts for presentation.
pub trait AmountFormatter: Send + Sync {
    fn format_amount(&self, amount: Amount) -> String;
}

/// Groups thousands with commas (`1,234,567.5`) and appends an optional suffix.
#[derive(Debug, Clone, Default)]
pub struct GroupedAmountFormatter {
    suffix: Option<String>,
}

impl GroupedAmountFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let suffix = suffix.trim();
        Self {
            suffix: (!suffix.is_empty()).then(|| suffix.to_string()),
        }
    }
}

impl AmountFormatter for GroupedAmountFormatter {
    fn format_amount(&self, amount: Amount) -> String {
        let mut text = group_thousands(amount);
        if let Some(suffix) = &self.suffix {
            text.push(' ');
            text.push_str(suffix);
        }
        text
    }
}

fn group_thousands(amount: Amount) -> String {
    let raw = amount.normalize().to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = format!("{sign}{grouped}");
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
