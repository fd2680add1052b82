//! Result rows, and their conversion from PostgreSQL rows into JSON.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::{PgRow, PgValueFormat};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{BigDecimal, Uuid};
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo, ValueRef};

use crate::error::ExecutionError;

/// One result row. Columns keep the order the database returned them in.
pub type Record = IndexMap<String, Value>;

/// The rows produced by one statement, cut down to the row cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub rows: Vec<Record>,
    /// Whether the statement produced more rows than were kept.
    pub truncated: bool,
}

impl ResultSet {
    /// Keep at most `max_rows` of `rows`, noting whether any were dropped.
    pub fn capped(mut rows: Vec<Record>, max_rows: usize) -> Self {
        let truncated = rows.len() > max_rows;
        rows.truncate(max_rows);
        ResultSet { rows, truncated }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Convert a row into a [`Record`], decoding each column by its PostgreSQL type.
pub fn decode_row(row: &PgRow) -> Result<Record, ExecutionError> {
    let mut record = Record::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, ExecutionError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::Bool(get::<bool>(row, index)?),
        "INT2" => Value::from(get::<i16>(row, index)?),
        "INT4" => Value::from(get::<i32>(row, index)?),
        "INT8" => Value::from(get::<i64>(row, index)?),
        "OID" => Value::from(get::<sqlx::postgres::types::Oid>(row, index)?.0),
        "FLOAT4" => float(f64::from(get::<f32>(row, index)?)),
        "FLOAT8" => float(get::<f64>(row, index)?),
        // Exact decimals would lose precision as JSON numbers.
        "NUMERIC" => numeric(row, index)?,
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" | "CITEXT" => {
            Value::String(get::<String>(row, index)?)
        }
        "JSON" | "JSONB" => get::<Value>(row, index)?,
        "UUID" => Value::String(get::<Uuid>(row, index)?.to_string()),
        "TIMESTAMPTZ" => Value::String(get::<DateTime<Utc>>(row, index)?.to_rfc3339()),
        "TIMESTAMP" => Value::String(
            get::<NaiveDateTime>(row, index)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "DATE" => Value::String(get::<NaiveDate>(row, index)?.to_string()),
        "TIME" => Value::String(get::<NaiveTime>(row, index)?.to_string()),
        "INTERVAL" => Value::String(iso_interval(&get::<PgInterval>(row, index)?)),
        "BYTEA" => Value::String(hex(&get::<Vec<u8>>(row, index)?)),
        "BOOL[]" => Value::from(get::<Vec<bool>>(row, index)?),
        "INT2[]" => Value::from(get::<Vec<i16>>(row, index)?),
        "INT4[]" => Value::from(get::<Vec<i32>>(row, index)?),
        "INT8[]" => Value::from(get::<Vec<i64>>(row, index)?),
        "FLOAT4[]" => Value::Array(
            get::<Vec<f32>>(row, index)?
                .into_iter()
                .map(|value| float(f64::from(value)))
                .collect(),
        ),
        "FLOAT8[]" => Value::Array(get::<Vec<f64>>(row, index)?.into_iter().map(float).collect()),
        "NUMERIC[]" => numeric_array(row, index),
        "TEXT[]" | "VARCHAR[]" => Value::from(get::<Vec<String>>(row, index)?),
        "UUID[]" => Value::Array(
            get::<Vec<Uuid>>(row, index)?
                .iter()
                .map(|uuid| Value::String(uuid.to_string()))
                .collect(),
        ),
        "TIMESTAMPTZ[]" => Value::Array(
            get::<Vec<DateTime<Utc>>>(row, index)?
                .iter()
                .map(|timestamp| Value::String(timestamp.to_rfc3339()))
                .collect(),
        ),
        other => fallback(row, index, other)?,
    };
    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, index: usize) -> Result<T, ExecutionError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    Ok(row.try_get::<T, _>(index)?)
}

/// Types without a dedicated mapping come back as their text form when the
/// server sent the value as text, and as null otherwise. Binary values are
/// never reinterpreted as text.
fn fallback(row: &PgRow, index: usize, type_name: &str) -> Result<Value, ExecutionError> {
    let raw = row.try_get_raw(index)?;
    let text = match raw.format() {
        PgValueFormat::Text => raw.as_str().ok(),
        PgValueFormat::Binary => None,
    };
    Ok(text.map_or_else(
        || {
            tracing::debug!(type_name, "unsupported column type, returning null");
            Value::Null
        },
        |text| Value::String(text.to_string()),
    ))
}

/// `NUMERIC` as an exact decimal string. The special values `BigDecimal`
/// cannot hold are spelled the way PostgreSQL spells them.
fn numeric(row: &PgRow, index: usize) -> Result<Value, ExecutionError> {
    match row.try_get::<BigDecimal, _>(index) {
        Ok(decimal) => Ok(Value::String(decimal.to_string())),
        Err(error) => {
            let raw = row.try_get_raw(index)?;
            let special = match raw.format() {
                PgValueFormat::Binary => raw.as_bytes().ok().and_then(special_numeric),
                PgValueFormat::Text => None,
            };
            Ok(special.map_or_else(
                || {
                    tracing::debug!(%error, "undecodable numeric, returning null");
                    Value::Null
                },
                |special| Value::String(special.to_string()),
            ))
        }
    }
}

fn numeric_array(row: &PgRow, index: usize) -> Value {
    match row.try_get::<Vec<BigDecimal>, _>(index) {
        Ok(decimals) => Value::Array(
            decimals
                .iter()
                .map(|decimal| Value::String(decimal.to_string()))
                .collect(),
        ),
        Err(error) => {
            tracing::debug!(%error, "undecodable numeric array, returning null");
            Value::Null
        }
    }
}

/// Recognize the sign word of a binary `NUMERIC` that holds no digits.
fn special_numeric(bytes: &[u8]) -> Option<&'static str> {
    match bytes.get(4..6)? {
        [0xC0, 0x00] => Some("NaN"),
        [0xD0, 0x00] => Some("Infinity"),
        [0xF0, 0x00] => Some("-Infinity"),
        _ => None,
    }
}

/// Render an interval as an ISO-8601 duration, as PostgreSQL does with
/// `IntervalStyle = iso_8601`.
fn iso_interval(interval: &PgInterval) -> String {
    use std::fmt::Write;

    const MICROS_PER_MINUTE: i64 = 60_000_000;
    const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;

    let mut out = String::from("P");
    for (amount, unit) in [
        (interval.months / 12, 'Y'),
        (interval.months % 12, 'M'),
        (interval.days, 'D'),
    ] {
        if amount != 0 {
            let _ = write!(out, "{amount}{unit}");
        }
    }

    let micros = interval.microseconds;
    let hours = micros / MICROS_PER_HOUR;
    let minutes = micros % MICROS_PER_HOUR / MICROS_PER_MINUTE;
    let seconds = micros % MICROS_PER_MINUTE;
    if micros != 0 {
        out.push('T');
        if hours != 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes != 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds != 0 {
            let _ = write!(out, "{}S", fractional_seconds(seconds));
        }
    }

    if out == "P" {
        out.push_str("T0S");
    }
    out
}

fn fractional_seconds(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let magnitude = micros.unsigned_abs();
    let (whole, fraction) = (magnitude / 1_000_000, magnitude % 1_000_000);
    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        let digits = format!("{fraction:06}");
        format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
    }
}

fn float(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or_else(|| Value::String(value.to_string()), Value::Number)
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
