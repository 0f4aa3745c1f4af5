//! Schema-agnostic result rows.
//!
//! The procedure's output columns are not known ahead of time, so each
//! column is decoded according to the PostgreSQL type reported for it.
//! Types without a mapping render as `<TYPE>` instead of failing the row.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::postgres::types::{PgInterval, PgTimeTz};
use sqlx::postgres::{PgRow, Postgres};
use sqlx::types::BigDecimal;
use sqlx::{Decode, Row, Type, TypeInfo, ValueRef};
use uuid::Uuid;

/// One decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz(NaiveTime, FixedOffset),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Interval(PgInterval),
    /// One-dimensional array; NULL elements are [`CellValue::Null`].
    Array(Vec<CellValue>),
    /// Column of a type with no mapping; holds the type name.
    Unsupported(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "\\x{}", hex::encode(v)),
            Self::Json(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::TimeTz(time, offset) => write!(f, "{time}{offset}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::TimestampTz(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Interval(v) => f.write_str(&format_interval(v)),
            Self::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Unsupported(type_name) => write!(f, "<{type_name}>"),
        }
    }
}

/// One row of procedure output, columns in select order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow(pub Vec<CellValue>);

impl ResultRow {
    pub fn from_pg_row(row: &PgRow) -> Self {
        Self((0..row.len()).map(|idx| decode_cell(row, idx)).collect())
    }

    pub fn values(&self) -> &[CellValue] {
        &self.0
    }
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

/// Receives rows one at a time as the procedure produces them.
pub trait RowSink: Send {
    fn write_row(&mut self, row: &ResultRow);
}

impl RowSink for Vec<ResultRow> {
    fn write_row(&mut self, row: &ResultRow) {
        self.push(row.clone());
    }
}

fn decode_cell(row: &PgRow, idx: usize) -> CellValue {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return CellValue::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(err) => {
            tracing::warn!(column = idx, error = %err, "Unreadable column");
            return CellValue::Unsupported("unknown".to_string());
        }
    };

    match type_name.as_str() {
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => {
            decode_as::<String>(row, idx, &type_name, CellValue::Text)
        }
        "BOOL" => decode_as::<bool>(row, idx, &type_name, CellValue::Bool),
        "INT2" => decode_as::<i16>(row, idx, &type_name, |v| CellValue::Int(v.into())),
        "INT4" => decode_as::<i32>(row, idx, &type_name, |v| CellValue::Int(v.into())),
        "INT8" => decode_as::<i64>(row, idx, &type_name, CellValue::Int),
        "FLOAT4" => decode_as::<f32>(row, idx, &type_name, |v| CellValue::Float(v.into())),
        "FLOAT8" => decode_as::<f64>(row, idx, &type_name, CellValue::Float),
        "JSON" | "JSONB" => decode_as::<serde_json::Value>(row, idx, &type_name, CellValue::Json),
        "UUID" => decode_as::<Uuid>(row, idx, &type_name, CellValue::Uuid),
        "DATE" => decode_as::<NaiveDate>(row, idx, &type_name, CellValue::Date),
        "TIMESTAMP" => decode_as::<NaiveDateTime>(row, idx, &type_name, CellValue::Timestamp),
        "TIMESTAMPTZ" => {
            decode_as::<DateTime<Utc>>(row, idx, &type_name, CellValue::TimestampTz)
        }
        "NUMERIC" => decode_as::<BigDecimal>(row, idx, &type_name, CellValue::Numeric),
        "TIME" => decode_as::<NaiveTime>(row, idx, &type_name, CellValue::Time),
        "TIMETZ" => decode_as::<PgTimeTz<NaiveTime, FixedOffset>>(row, idx, &type_name, |v| {
            CellValue::TimeTz(v.time, v.offset)
        }),
        "INTERVAL" => decode_as::<PgInterval>(row, idx, &type_name, CellValue::Interval),
        "BYTEA" => decode_as::<Vec<u8>>(row, idx, &type_name, CellValue::Bytes),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => {
            decode_array::<String>(row, idx, &type_name, CellValue::Text)
        }
        "BOOL[]" => decode_array::<bool>(row, idx, &type_name, CellValue::Bool),
        "INT2[]" => decode_array::<i16>(row, idx, &type_name, |v| CellValue::Int(v.into())),
        "INT4[]" => decode_array::<i32>(row, idx, &type_name, |v| CellValue::Int(v.into())),
        "INT8[]" => decode_array::<i64>(row, idx, &type_name, CellValue::Int),
        "FLOAT4[]" => decode_array::<f32>(row, idx, &type_name, |v| CellValue::Float(v.into())),
        "FLOAT8[]" => decode_array::<f64>(row, idx, &type_name, CellValue::Float),
        "NUMERIC[]" => decode_array::<BigDecimal>(row, idx, &type_name, CellValue::Numeric),
        "UUID[]" => decode_array::<Uuid>(row, idx, &type_name, CellValue::Uuid),
        _ => CellValue::Unsupported(type_name),
    }
}

/// Decode a one-dimensional array column; multi-dimensional arrays fail to
/// decode and render as unsupported.
fn decode_array<'r, T>(
    row: &'r PgRow,
    idx: usize,
    type_name: &str,
    wrap: fn(T) -> CellValue,
) -> CellValue
where
    Vec<Option<T>>: Decode<'r, Postgres> + Type<Postgres>,
{
    decode_as::<Vec<Option<T>>>(row, idx, type_name, |items| {
        CellValue::Array(
            items
                .into_iter()
                .map(|item| item.map_or(CellValue::Null, wrap))
                .collect(),
        )
    })
}

/// Render an interval the way PostgreSQL's default `IntervalStyle` does,
/// e.g. `1 year 2 mons 3 days 04:05:06.5`.
fn format_interval(interval: &PgInterval) -> String {
    let mut parts = Vec::new();
    push_unit(&mut parts, i64::from(interval.months / 12), "year");
    push_unit(&mut parts, i64::from(interval.months % 12), "mon");
    push_unit(&mut parts, i64::from(interval.days), "day");

    if interval.microseconds != 0 || parts.is_empty() {
        let sign = if interval.microseconds < 0 { "-" } else { "" };
        let micros = interval.microseconds.unsigned_abs();
        let secs = micros / 1_000_000;
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        let frac = micros % 1_000_000;
        if frac != 0 {
            let digits = format!("{frac:06}");
            time.push('.');
            time.push_str(digits.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

fn push_unit(parts: &mut Vec<String>, count: i64, unit: &str) {
    match count {
        0 => {}
        1 => parts.push(format!("{count} {unit}")),
        _ => parts.push(format!("{count} {unit}s")),
    }
}

fn decode_as<'r, T>(
    row: &'r PgRow,
    idx: usize,
    type_name: &str,
    wrap: impl FnOnce(T) -> CellValue,
) -> CellValue
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    match row.try_get::<T, _>(idx) {
        Ok(value) => wrap(value),
        Err(err) => {
            tracing::warn!(column = idx, type_name, error = %err, "Column decode failed");
            CellValue::Unsupported(type_name.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_text_column_renders_as_tuple() {
        let row = ResultRow(vec![CellValue::Text("HELLO WORLD".to_string())]);
        assert_eq!(row.to_string(), r#"("HELLO WORLD")"#);
    }

    #[test]
    fn mixed_columns_are_comma_separated() {
        let row = ResultRow(vec![
            CellValue::Int(7),
            CellValue::Null,
            CellValue::Bool(true),
            CellValue::Float(1.5),
            CellValue::Unsupported("TSVECTOR".to_string()),
        ]);
        assert_eq!(row.to_string(), "(7, NULL, true, 1.5, <TSVECTOR>)");
    }

    #[test]
    fn text_is_escaped() {
        let value = CellValue::Text("say \"hi\"".to_string());
        assert_eq!(value.to_string(), r#""say \"hi\"""#);
    }

    #[test]
    fn json_renders_compact() {
        let value = CellValue::Json(serde_json::json!({ "a": 1 }));
        assert_eq!(value.to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn numeric_renders_its_digits() {
        let value = CellValue::Numeric("12.50".parse().unwrap());
        assert_eq!(value.to_string(), "12.50");
    }

    #[test]
    fn bytes_render_as_postgres_hex() {
        let value = CellValue::Bytes(vec![0x01, 0xab]);
        assert_eq!(value.to_string(), r"\x01ab");
    }

    #[test]
    fn time_values_render() {
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(CellValue::Time(time).to_string(), "10:00:00");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(CellValue::TimeTz(time, offset).to_string(), "10:00:00+02:00");
    }

    #[test]
    fn arrays_render_with_nulls() {
        let value = CellValue::Array(vec![
            CellValue::Text("a".to_string()),
            CellValue::Null,
            CellValue::Text("b".to_string()),
        ]);
        assert_eq!(value.to_string(), r#"["a", NULL, "b"]"#);
    }

    #[test]
    fn interval_formats() {
        let cases = [
            ((0, 1, 0), "1 day"),
            ((0, 0, 0), "00:00:00"),
            ((14, 3, 0), "1 year 2 mons 3 days"),
            ((0, 0, 3_723_500_000), "01:02:03.5"),
            ((1, 0, -90_000_000), "1 mon -00:01:30"),
        ];
        for ((months, days, microseconds), expected) in cases {
            let value = CellValue::Interval(PgInterval {
                months,
                days,
                microseconds,
            });
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn empty_row_renders_empty_parens() {
        assert_eq!(ResultRow::default().to_string(), "()");
    }

    #[test]
    fn vec_sink_collects_rows() {
        let mut sink: Vec<ResultRow> = Vec::new();
        sink.write_row(&ResultRow(vec![CellValue::Int(1)]));
        sink.write_row(&ResultRow(vec![CellValue::Int(2)]));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].values(), [CellValue::Int(2)]);
    }
}
