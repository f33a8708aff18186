//! Input validation for user-supplied values
//!
//! The engine assumes pre-validated, non-negative inputs. These parsers are
//! the caller-side gate: they reject malformed or out-of-range values before
//! anything touches the plan.

use crate::error::{ReserveError, ReserveResult};

use super::money::Money;

/// Largest monetary value accepted from user input
pub const MAX_CURRENCY_INPUT: Money = Money::from_dollars_cents(999_999_999, 0);

/// Default maximum length for names
pub const MAX_NAME_LEN: usize = 100;

/// Parse a non-negative currency amount ("$1,250.00", "1250", "0.5")
pub fn parse_currency(value: &str, field: &str) -> ReserveResult<Money> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Err(ReserveError::Validation(format!("{} cannot be empty", field)));
    }

    let amount = Money::parse(&cleaned)
        .map_err(|_| ReserveError::Validation(format!("{} must be a valid number", field)))?;

    if amount.is_negative() {
        return Err(ReserveError::Validation(format!("{} cannot be negative", field)));
    }
    if amount > MAX_CURRENCY_INPUT {
        return Err(ReserveError::Validation(format!(
            "{} is too large (max: {})",
            field,
            MAX_CURRENCY_INPUT.format_with_symbol("$")
        )));
    }

    Ok(amount)
}

/// Parse a percentage between 0 and 100 ("4.25", "4.25%")
pub fn parse_percentage(value: &str, field: &str) -> ReserveResult<f64> {
    let cleaned = value.trim().trim_end_matches('%').trim();

    if cleaned.is_empty() {
        return Err(ReserveError::Validation(format!("{} cannot be empty", field)));
    }

    let pct: f64 = cleaned
        .parse()
        .map_err(|_| ReserveError::Validation(format!("{} must be a valid number", field)))?;

    if !pct.is_finite() {
        return Err(ReserveError::Validation(format!("{} must be a valid number", field)));
    }
    if pct < 0.0 {
        return Err(ReserveError::Validation(format!("{} cannot be negative", field)));
    }
    if pct > 100.0 {
        return Err(ReserveError::Validation(format!("{} cannot exceed 100%", field)));
    }

    Ok(pct)
}

/// Parse an allocation weight (finite, non-negative)
pub fn parse_weight(value: &str) -> ReserveResult<f64> {
    let weight: f64 = value
        .trim()
        .parse()
        .map_err(|_| ReserveError::Validation(format!("Invalid weight: '{}'", value)))?;

    check_weight(weight)?;
    Ok(weight)
}

/// Check an already-parsed weight
pub fn check_weight(weight: f64) -> ReserveResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ReserveError::Validation(format!(
            "Weight must be a non-negative number, got {}",
            weight
        )));
    }
    Ok(())
}

/// Check an already-parsed yield percentage
pub fn check_yield(apy_pct: f64) -> ReserveResult<()> {
    if !apy_pct.is_finite() || apy_pct < 0.0 {
        return Err(ReserveError::Validation(format!(
            "Yield must be a non-negative percentage, got {}",
            apy_pct
        )));
    }
    Ok(())
}

/// Check that a stored amount is not negative
pub fn check_amount(amount: Money, field: &str) -> ReserveResult<()> {
    if amount.is_negative() {
        return Err(ReserveError::Validation(format!(
            "{} cannot be negative ({})",
            field, amount
        )));
    }
    Ok(())
}

/// Trim a name and reject empty, over-long, or control-character input
pub fn clean_name(value: &str, field: &str, max_len: usize) -> ReserveResult<String> {
    let cleaned = value.trim();

    if cleaned.is_empty() {
        return Err(ReserveError::Validation(format!("{} cannot be empty", field)));
    }
    if cleaned.chars().count() > max_len {
        return Err(ReserveError::Validation(format!(
            "{} cannot exceed {} characters",
            field, max_len
        )));
    }
    if cleaned.chars().any(|c| c.is_control() && c != '\t') {
        return Err(ReserveError::Validation(format!(
            "{} contains invalid characters",
            field
        )));
    }

    Ok(cleaned.to_string())
}
