use chrono::{DateTime, Datelike, NaiveDate};
use thiserror::Error;

use crate::models::BillStatus;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

#[derive(Debug, Error, PartialEq)]
#[error("Invalid date: {0:?}")]
pub struct FormatError(pub String);

pub fn parse_bill_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| FormatError(raw.to_string()))
}

/// `"2004-04-04"` becomes `"4 Avr. 04"`.
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_bill_date(raw)?;
    let month = MONTHS_FR[date.month0() as usize];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}
