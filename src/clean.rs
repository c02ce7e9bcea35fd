use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::table::{CleanedTable, ColumnType, RawTable, Value};

/// Name of the calendar-month column the cleaner derives.
pub const YEAR_MONTH: &str = "YearMonth";

/// Normalize a raw table:
/// 1. drop rows where every field is missing,
/// 2. fill remaining missing values (0 for numeric, "Unknown" for
///    categorical; the date column is exempt),
/// 3. parse the date column and drop rows whose date does not parse,
/// 4. derive the `YearMonth` column, zero-padded `"YYYY-MM"`.
///
/// Re-running over an already-cleaned table is a no-op: nothing left to
/// fill or drop, dates re-parse from their normalized form, and an existing
/// `YearMonth` column is overwritten rather than appended.
pub fn clean(mut raw: RawTable, date_col: usize, formats: &[String]) -> Result<CleanedTable> {
    if date_col >= raw.num_columns() {
        return Err(PipelineError::MissingColumn(format!(
            "date column index {date_col}"
        )));
    }

    let before = raw.num_rows();
    raw.rows.retain(|row| row.iter().any(|v| !v.is_null()));
    let blank_dropped = before - raw.num_rows();

    let types = &raw.types;
    for row in &mut raw.rows {
        for (i, cell) in row.iter_mut().enumerate() {
            if i == date_col || !cell.is_null() {
                continue;
            }
            *cell = match types[i] {
                ColumnType::Numeric => Value::Number(0.0),
                ColumnType::Categorical => Value::Text("Unknown".into()),
            };
        }
    }

    // Date coercion happens strictly after the fill step so an unparseable
    // date always drops the row instead of being papered over.
    let mut kept: Vec<Vec<Value>> = Vec::with_capacity(raw.rows.len());
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(raw.rows.len());
    let mut date_dropped = 0usize;
    for mut row in raw.rows.drain(..) {
        match parse_date(&row[date_col], formats) {
            Some(date) => {
                row[date_col] = Value::Text(date.format("%Y-%m-%d").to_string());
                kept.push(row);
                dates.push(date);
            }
            None => {
                debug!(cell = %row[date_col], "dropping row: unparseable order date");
                date_dropped += 1;
            }
        }
    }

    let existing_ym = raw.headers.iter().position(|h| h == YEAR_MONTH);
    let ym_col = match existing_ym {
        Some(i) => i,
        None => {
            raw.headers.push(YEAR_MONTH.to_string());
            raw.types.push(ColumnType::Categorical);
            raw.headers.len() - 1
        }
    };
    for (row, date) in kept.iter_mut().zip(&dates) {
        let bucket = Value::Text(format!("{:04}-{:02}", date.year(), date.month()));
        if existing_ym.is_some() {
            row[ym_col] = bucket;
        } else {
            row.push(bucket);
        }
    }
    raw.rows = kept;

    info!(
        rows = raw.num_rows(),
        blank_dropped, date_dropped, "cleaned dataset"
    );
    Ok(CleanedTable::new(raw, date_col, ym_col))
}

fn parse_date(cell: &Value, formats: &[String]) -> Option<NaiveDate> {
    let text = cell.as_str()?.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn formats() -> Vec<String> {
        Config::default().date_formats
    }

    fn sales_table() -> RawTable {
        RawTable {
            headers: vec!["Order Date".into(), "PaymentMode".into(), "Amount".into()],
            types: vec![
                ColumnType::Categorical,
                ColumnType::Categorical,
                ColumnType::Numeric,
            ],
            rows: vec![
                vec![
                    Value::Text("2024-01-05".into()),
                    Value::Text("Cash".into()),
                    Value::Number(10.0),
                ],
                vec![
                    Value::Text("2024-01-20".into()),
                    Value::Text("Cash".into()),
                    Value::Number(5.0),
                ],
                vec![
                    Value::Text("bad".into()),
                    Value::Text("Card".into()),
                    Value::Number(7.0),
                ],
            ],
        }
    }

    #[test]
    fn unparseable_dates_drop_their_rows() {
        let cleaned = clean(sales_table(), 0, &formats()).unwrap();
        assert_eq!(cleaned.num_rows(), 2);
        let ym = cleaned.year_month_index();
        for row in cleaned.rows() {
            assert_eq!(row[ym], Value::Text("2024-01".into()));
        }
    }

    #[test]
    fn fills_numeric_with_zero_and_categorical_with_unknown() {
        let mut table = sales_table();
        table.rows[0][1] = Value::Null;
        table.rows[1][2] = Value::Null;
        let cleaned = clean(table, 0, &formats()).unwrap();
        assert_eq!(cleaned.rows()[0][1], Value::Text("Unknown".into()));
        assert_eq!(cleaned.rows()[1][2], Value::Number(0.0));
    }

    #[test]
    fn no_nulls_and_all_dates_parse_after_clean() {
        let mut table = sales_table();
        table.rows[1][1] = Value::Null;
        let cleaned = clean(table, 0, &formats()).unwrap();
        for row in cleaned.rows() {
            assert!(row.iter().all(|v| !v.is_null()));
            let date = row[cleaned.date_index()].as_str().unwrap();
            assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
        }
    }

    #[test]
    fn all_null_rows_are_dropped_before_fill() {
        let mut table = sales_table();
        table.rows.push(vec![Value::Null, Value::Null, Value::Null]);
        let cleaned = clean(table, 0, &formats()).unwrap();
        // the all-null row never survives as a filled-in "Unknown" row
        assert_eq!(cleaned.num_rows(), 2);
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean(sales_table(), 0, &formats()).unwrap();
        let twice = clean(once.clone().into_raw(), 0, &formats()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn date_column_out_of_range_is_missing_column() {
        let err = clean(sales_table(), 9, &formats()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(_)));
    }

    #[test]
    fn alternate_date_formats_are_tried_in_order() {
        let mut table = sales_table();
        table.rows[0][0] = Value::Text("01/05/2024".into());
        let cleaned = clean(table, 0, &formats()).unwrap();
        // %m/%d/%Y: January 5th
        assert_eq!(cleaned.rows()[0][0], Value::Text("2024-01-05".into()));
    }
}
