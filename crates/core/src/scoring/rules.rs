use crate::domain::receipt::Receipt;
use crate::scoring::error::ScoringError;
use crate::scoring::money::{is_alphanumeric, parse_amount};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

// Inclusive on both ends: 16:00 itself still earns the bonus.
const AFTERNOON_START: (u32, u32) = (14, 0);
const AFTERNOON_END: (u32, u32) = (16, 0);

const QUARTER: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// One point per Unicode letter or digit in the retailer name.
pub fn retailer_points(receipt: &Receipt) -> u64 {
    receipt
        .retailer
        .chars()
        .filter(|c| is_alphanumeric(*c))
        .count() as u64
}

/// 50 for a whole-dollar total, 25 for a multiple of 0.25, both stack to 75.
pub fn total_points(receipt: &Receipt) -> Result<u64, ScoringError> {
    let total = parse_amount(&receipt.total)
        .ok_or_else(|| ScoringError::invalid_amount("total", &receipt.total))?;

    let whole = (total % Decimal::ONE).is_zero();
    let quarter = (total % QUARTER).is_zero();

    Ok(match (whole, quarter) {
        (true, true) => 75,
        (true, false) => 50,
        (false, true) => 25,
        (false, false) => 0,
    })
}

/// 5 points for every two items.
pub fn item_count_points(receipt: &Receipt) -> u64 {
    (receipt.items.len() / 2 * 5) as u64
}

/// Items whose trimmed description length is a multiple of 3 earn `ceil(round(price * 0.25))`.
///
/// Every price is parsed, including those of items that earn nothing, so a malformed price
/// anywhere fails the rule. An empty description has length 0 and therefore qualifies.
/// A price whose points do not fit in a `u64` is rejected as an invalid amount.
pub fn description_points(receipt: &Receipt) -> Result<u64, ScoringError> {
    let mut points: u64 = 0;
    for (idx, item) in receipt.items.iter().enumerate() {
        let invalid = || ScoringError::invalid_amount(format!("items[{idx}].price"), &item.price);
        let price = parse_amount(&item.price).ok_or_else(invalid)?;

        let len = item.short_description.trim_matches(' ').chars().count();
        if len % 3 == 0 {
            let earned = price
                .checked_mul(QUARTER)
                .map(|p| p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
                .map(|p| p.ceil())
                .and_then(|p| p.to_u64())
                .ok_or_else(invalid)?;
            points = points.checked_add(earned).ok_or_else(invalid)?;
        }
    }
    Ok(points)
}

/// 6 points when the purchase happened on an odd day of the month.
pub fn purchase_day_points(receipt: &Receipt) -> Result<u64, ScoringError> {
    let date = NaiveDate::parse_from_str(&receipt.purchase_date, DATE_FORMAT).map_err(|_| {
        ScoringError::InvalidDate {
            value: receipt.purchase_date.clone(),
        }
    })?;

    Ok(if date.day() % 2 == 1 { 6 } else { 0 })
}

/// 10 points for a purchase between 14:00 and 16:00.
pub fn purchase_time_points(receipt: &Receipt) -> Result<u64, ScoringError> {
    let time = NaiveTime::parse_from_str(&receipt.purchase_time, TIME_FORMAT).map_err(|_| {
        ScoringError::InvalidTime {
            value: receipt.purchase_time.clone(),
        }
    })?;

    let at = (time.hour(), time.minute());
    Ok(if (AFTERNOON_START..=AFTERNOON_END).contains(&at) {
        10
    } else {
        0
    })
}
