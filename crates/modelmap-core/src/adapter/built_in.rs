//! Built-in adapters for common leaf conversions
//!
//! Attach them to destination fields with
//! [`Directive::transform`](crate::Directive::transform).

use super::{AdapterError, TypeAdapter};
use chrono::NaiveDate;
use uuid::Uuid;

/// `i32` to its decimal `String`
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerToStringAdapter;

impl TypeAdapter for IntegerToStringAdapter {
    type Input = i32;
    type Output = String;

    fn convert(&self, input: &i32) -> Result<String, AdapterError> {
        Ok(input.to_string())
    }
}

/// `i64` to its decimal `String`
#[derive(Debug, Default, Clone, Copy)]
pub struct LongToStringAdapter;

impl TypeAdapter for LongToStringAdapter {
    type Input = i64;
    type Output = String;

    fn convert(&self, input: &i64) -> Result<String, AdapterError> {
        Ok(input.to_string())
    }
}

/// Decimal `String` to `i64`
#[derive(Debug, Default, Clone, Copy)]
pub struct StringToLongAdapter;

impl TypeAdapter for StringToLongAdapter {
    type Input = String;
    type Output = i64;

    fn convert(&self, input: &String) -> Result<i64, AdapterError> {
        input
            .trim()
            .parse::<i64>()
            .map_err(|err| AdapterError::conversion(input, "i64", err))
    }
}

/// Hyphenated `String` to `Uuid`
#[derive(Debug, Default, Clone, Copy)]
pub struct StringToUuidAdapter;

impl TypeAdapter for StringToUuidAdapter {
    type Input = String;
    type Output = Uuid;

    fn convert(&self, input: &String) -> Result<Uuid, AdapterError> {
        Uuid::parse_str(input).map_err(|err| AdapterError::conversion(input, "Uuid", err))
    }
}

/// `Uuid` to its hyphenated lowercase `String`
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidToStringAdapter;

impl TypeAdapter for UuidToStringAdapter {
    type Input = Uuid;
    type Output = String;

    fn convert(&self, input: &Uuid) -> Result<String, AdapterError> {
        Ok(input.hyphenated().to_string())
    }
}

/// ISO-8601 calendar date (`YYYY-MM-DD`) to `NaiveDate`
#[derive(Debug, Default, Clone, Copy)]
pub struct StringToDateAdapter;

impl TypeAdapter for StringToDateAdapter {
    type Input = String;
    type Output = NaiveDate;

    fn convert(&self, input: &String) -> Result<NaiveDate, AdapterError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|err| AdapterError::conversion(input, "NaiveDate", err))
    }
}
