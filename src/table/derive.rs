use tracing::debug;

use super::ColumnType;

/// For each column, look at every row:
///  - Ignore empty cells
///  - If all non-empty cells parse as a number, the column is numeric
///  - Otherwise (or if the column has no samples at all) it is categorical
pub fn derive_column_types(header_names: &[String], rows: &[Vec<String>]) -> Vec<ColumnType> {
    let mut types = Vec::with_capacity(header_names.len());

    for (idx, name) in header_names.iter().enumerate() {
        let mut samples = 0usize;
        let mut numeric = true;

        for row in rows {
            let cell = row.get(idx).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            samples += 1;
            if cell.parse::<f64>().is_err() {
                numeric = false;
                break;
            }
        }

        let ty = if samples > 0 && numeric {
            ColumnType::Numeric
        } else {
            if samples == 0 {
                debug!("no samples for `{}`, defaulting to categorical", name);
            }
            ColumnType::Categorical
        };
        types.push(ty);
    }

    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numeric_when_all_samples_parse() {
        let rows = vec![
            vec!["10".to_string(), "Cash".to_string()],
            vec!["5.5".to_string(), "Card".to_string()],
        ];
        let types = derive_column_types(&headers(&["Amount", "PaymentMode"]), &rows);
        assert_eq!(types, vec![ColumnType::Numeric, ColumnType::Categorical]);
    }

    #[test]
    fn mixed_samples_fall_back_to_categorical() {
        let rows = vec![vec!["10".to_string()], vec!["ten".to_string()]];
        let types = derive_column_types(&headers(&["Amount"]), &rows);
        assert_eq!(types, vec![ColumnType::Categorical]);
    }

    #[test]
    fn empty_cells_are_ignored_when_sampling() {
        let rows = vec![
            vec!["".to_string()],
            vec!["7".to_string()],
            vec!["  ".to_string()],
        ];
        let types = derive_column_types(&headers(&["Quantity"]), &rows);
        assert_eq!(types, vec![ColumnType::Numeric]);
    }

    #[test]
    fn all_empty_column_is_categorical() {
        let rows = vec![vec!["".to_string()], vec!["".to_string()]];
        let types = derive_column_types(&headers(&["Notes"]), &rows);
        assert_eq!(types, vec![ColumnType::Categorical]);
    }
}
