//! Structural and semantic validation of an extracted identity pair.

use thiserror::Error;

use super::Gender;
use super::extract::RawIdentityPair;

/// Oldest age accepted as plausible.
pub const MAX_AGE: i32 = 120;

/// Why an identity pair was rejected. The first failing rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("front segment is not exactly six digits")]
    BadFront6Format,
    #[error("month {0} is outside 1-12")]
    MonthOutOfRange(u32),
    #[error("day {0} is outside 1-31")]
    DayOutOfRange(u32),
    #[error("century/gender code is not one of 1, 2, 3, 4")]
    BadBack1Format,
    #[error("age {0} is outside 0-120")]
    AgeOutOfRange(i32),
}

/// A validated identity: century/gender code resolved into gender, birth
/// year, and age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedIdentity {
    pub gender_code: u8,
    pub gender: Gender,
    pub birth_year: i32,
    pub age: u32,
}

impl ParsedIdentity {
    /// Age rounded down to the nearest multiple of ten.
    pub fn age_bucket(&self) -> u32 {
        self.age / 10 * 10
    }
}

/// Validate `pair` against the calendar year `current_year`.
///
/// Days are only range-checked (1-31); month lengths and leap years are not
/// considered.
pub fn validate_identity(
    pair: &RawIdentityPair,
    current_year: i32,
) -> Result<ParsedIdentity, ValidationError> {
    let front = pair.front6.as_bytes();
    if front.len() != 6 || !front.iter().all(u8::is_ascii_digit) {
        return Err(ValidationError::BadFront6Format);
    }

    let yy = two_digits(&front[0..2]);
    let mm = two_digits(&front[2..4]);
    let dd = two_digits(&front[4..6]);

    if !(1..=12).contains(&mm) {
        return Err(ValidationError::MonthOutOfRange(mm));
    }
    if !(1..=31).contains(&dd) {
        return Err(ValidationError::DayOutOfRange(dd));
    }

    let gender_code = match pair.back1.as_bytes() {
        [code @ b'1'..=b'4'] => code - b'0',
        _ => return Err(ValidationError::BadBack1Format),
    };

    let century = if gender_code <= 2 { 1900 } else { 2000 };
    let birth_year = century + yy as i32;
    // Saturates for absurd reference years; the range check rejects it.
    let age = current_year.saturating_sub(birth_year);
    if !(0..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    let gender = if gender_code % 2 == 1 {
        Gender::Male
    } else {
        Gender::Female
    };

    Ok(ParsedIdentity {
        gender_code,
        gender,
        birth_year,
        age: age as u32,
    })
}

fn two_digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
