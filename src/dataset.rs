//! Dataset loading and normalization.
//!
//! The source file is read with every column as String, then each required
//! column is parsed row by row so that a bad field is reported with its
//! column, row and raw value.

use std::path::Path;

use log::{debug, info};
use polars::prelude::*;

use crate::categories::{AgeBracket, CityCategory, Gender, MaritalStatus};
use crate::error::LoadError;
use crate::schema::transaction::*;

/// Options for reading the source file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter (default: `,`)
    pub separator: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

/// Load and normalize the transaction file with default options.
pub fn load(path: impl AsRef<Path>) -> Result<DataFrame, LoadError> {
    load_with(path, &LoadOptions::default())
}

/// Load and normalize the transaction file.
///
/// The returned frame has exactly the columns of [`ALL`] in that order.
/// Extra columns in the file are dropped.
pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let raw = read_csv_as_strings(path, options)?;
    debug!(
        "Read {} rows x {} columns from {}",
        raw.height(),
        raw.width(),
        path.display()
    );
    require_columns(&raw, &ALL)?;

    let trimmed = raw
        .lazy()
        .select(
            ALL.iter()
                .map(|&c| col(c).str().strip_chars(lit(" \t\r\n")))
                .collect::<Vec<_>>(),
        )
        .collect()
        .map_err(LoadError::Frame)?;

    let df = normalize(&trimmed)?;
    info!("Loaded {} transactions from {}", df.height(), path.display());
    Ok(df)
}

/// Read a delimited file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    let separator = options.separator;
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .map_parse_options(|parse| parse.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), LoadError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(LoadError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Build the typed transaction table from trimmed string columns.
fn normalize(df: &DataFrame) -> Result<DataFrame, LoadError> {
    let user_ids = parse_required(df, USER_ID, |s| Some(s.to_string()))?;
    let product_ids = parse_required(df, PRODUCT_ID, |s| Some(s.to_string()))?;
    let genders = parse_required(df, GENDER, |s| Gender::from_code(s).map(Gender::label))?;
    let ages = parse_required(df, AGE, |s| AgeBracket::from_code(s).map(AgeBracket::label))?;
    let occupations = parse_required(df, OCCUPATION, parse_code)?;
    let cities = parse_required(df, CITY_CATEGORY, |s| {
        CityCategory::from_code(s).map(CityCategory::label)
    })?;
    let marital = parse_required(df, MARITAL_STATUS, |s| {
        MaritalStatus::from_code(s).map(MaritalStatus::label)
    })?;
    let category_1 = parse_required(df, PRODUCT_CATEGORY_1, parse_code)?;
    let category_2 = parse_optional(df, PRODUCT_CATEGORY_2, 0, parse_code)?;
    let category_3 = parse_optional(df, PRODUCT_CATEGORY_3, 0, parse_code)?;
    let purchases = parse_required(df, PURCHASE, parse_amount)?;

    let columns: Vec<Column> = vec![
        Series::new(USER_ID.into(), user_ids).into(),
        Series::new(PRODUCT_ID.into(), product_ids).into(),
        Series::new(GENDER.into(), genders).into(),
        Series::new(AGE.into(), ages).into(),
        Series::new(OCCUPATION.into(), occupations).into(),
        Series::new(CITY_CATEGORY.into(), cities).into(),
        Series::new(MARITAL_STATUS.into(), marital).into(),
        Series::new(PRODUCT_CATEGORY_1.into(), category_1).into(),
        Series::new(PRODUCT_CATEGORY_2.into(), category_2).into(),
        Series::new(PRODUCT_CATEGORY_3.into(), category_3).into(),
        Series::new(PURCHASE.into(), purchases).into(),
    ];

    DataFrame::new(columns).map_err(LoadError::Frame)
}

// ── Field parsers ───────────────────────────────────────────────────────────

fn string_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a StringChunked, LoadError> {
    df.column(column)
        .and_then(|c| c.str())
        .map_err(LoadError::Frame)
}

/// Parse a column where every row must hold a value. Rows are 1-based,
/// counting data rows only.
fn parse_required<T>(
    df: &DataFrame,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, LoadError> {
    string_column(df, column)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            None | Some("") => Err(LoadError::MissingValue {
                column: column.to_string(),
                row: i + 1,
            }),
            Some(s) => parse(s).ok_or_else(|| LoadError::InvalidValue {
                column: column.to_string(),
                row: i + 1,
                value: s.to_string(),
            }),
        })
        .collect()
}

/// Parse a column where blanks are replaced with `default`.
fn parse_optional<T: Copy>(
    df: &DataFrame,
    column: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, LoadError> {
    string_column(df, column)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            None | Some("") => Ok(default),
            Some(s) => parse(s).ok_or_else(|| LoadError::InvalidValue {
                column: column.to_string(),
                row: i + 1,
                value: s.to_string(),
            }),
        })
        .collect()
}

/// Integer code. Integral float spellings (`6.0`) are accepted since
/// exports with blanks often write the whole column as float.
fn parse_code(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| {
                f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
            })
            .map(|f| f as i64)
    })
}

fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_csv, HEADER};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn strings(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn ints(df: &DataFrame, column: &str) -> Vec<i64> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_load_normalizes_categoricals() {
        let file = write_csv(&[
            "1000001,P00069042,F,0-17,10,A,2,0,3,,,8370",
            "1000002,P00248942,M,55+,16,C,4+,1,1,6,14,15200",
        ]);
        let df = load(file.path()).unwrap();

        assert_eq!(df.get_column_names_str(), ALL.to_vec());
        assert_eq!(strings(&df, GENDER), vec!["Female", "Male"]);
        assert_eq!(strings(&df, MARITAL_STATUS), vec!["Single", "Married"]);
        assert_eq!(strings(&df, AGE), vec!["0-17", "55+"]);
        assert_eq!(strings(&df, CITY_CATEGORY), vec!["A", "C"]);
        assert_eq!(strings(&df, USER_ID), vec!["1000001", "1000002"]);
        assert_eq!(ints(&df, OCCUPATION), vec![10, 16]);
    }

    #[test]
    fn test_blank_optional_categories_become_zero() {
        let file = write_csv(&[
            "1,P1,M,26-35,7,B,1,0,3,,,100",
            "2,P2,F,26-35,7,B,1,0,5,8.0,,200",
        ]);
        let df = load(file.path()).unwrap();

        assert_eq!(df.column(PRODUCT_CATEGORY_2).unwrap().dtype(), &DataType::Int64);
        assert_eq!(ints(&df, PRODUCT_CATEGORY_2), vec![0, 8]);
        assert_eq!(ints(&df, PRODUCT_CATEGORY_3), vec![0, 0]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let file = write_csv(&[" 42 , P1 , M ,18-25, 3 ,A,1, 1 ,1,,, 99.5 "]);
        let df = load(file.path()).unwrap();

        assert_eq!(strings(&df, USER_ID), vec!["42"]);
        assert_eq!(strings(&df, GENDER), vec!["Male"]);
        assert_eq!(strings(&df, MARITAL_STATUS), vec!["Married"]);
        let purchase: Vec<f64> = df
            .column(PURCHASE)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(purchase, vec![99.5]);
    }

    #[test]
    fn test_header_only_file_loads_empty() {
        let file = write_csv(&[]);
        let df = load(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), ALL.len());
    }

    #[test]
    fn test_missing_file() {
        let result = load("/definitely/not/here/BlackFriday.csv");
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "User_ID,Product_ID,Gender,Age,Occupation,City_Category,Marital_Status,Product_Category_1,Product_Category_2,Product_Category_3").unwrap();
        writeln!(file, "1,P1,M,26-35,7,B,0,3,,").unwrap();

        match load(file.path()) {
            Err(LoadError::MissingColumn(name)) => assert_eq!(name, PURCHASE),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_purchase() {
        let file = write_csv(&["1,P1,M,26-35,7,B,1,0,3,,,100", "2,P2,F,26-35,7,B,1,0,3,,,abc"]);

        match load(file.path()) {
            Err(LoadError::InvalidValue { column, row, value }) => {
                assert_eq!(column, PURCHASE);
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_purchase_rejected() {
        let file = write_csv(&["1,P1,M,26-35,7,B,1,0,3,,,-5"]);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let file = write_csv(&["1,P1,X,26-35,7,B,1,0,3,,,100"]);

        match load(file.path()) {
            Err(LoadError::InvalidValue { column, value, .. }) => {
                assert_eq!(column, GENDER);
                assert_eq!(value, "X");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_required_field() {
        let file = write_csv(&["1,P1,M,26-35,7,B,1,0,,,,100"]);

        match load(file.path()) {
            Err(LoadError::MissingValue { column, row }) => {
                assert_eq!(column, PRODUCT_CATEGORY_1);
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingValue, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_separator() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER.replace(',', ";")).unwrap();
        writeln!(file, "1;P1;M;26-35;7;B;1;0;3;;;100").unwrap();

        let df = load_with(file.path(), &LoadOptions { separator: b';' }).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(strings(&df, GENDER), vec!["Male"]);
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("7"), Some(7));
        assert_eq!(parse_code("6.0"), Some(6));
        assert_eq!(parse_code("6.5"), None);
        assert_eq!(parse_code("six"), None);
        assert_eq!(parse_code("-3.0"), Some(-3));
        assert_eq!(parse_code("1e30"), None);
        assert_eq!(parse_code("-1e30"), None);
        assert_eq!(parse_code("inf"), None);
    }

    #[test]
    fn test_out_of_range_code_rejected() {
        let file = write_csv(&["1,P1,M,26-35,1e30,A,1,0,1,,,100"]);

        match load(file.path()) {
            Err(LoadError::InvalidValue { column, row, value }) => {
                assert_eq!(column, OCCUPATION);
                assert_eq!(row, 1);
                assert_eq!(value, "1e30");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_field_rejected() {
        let file = write_csv(&["1,P1,M,26-35,7,B,1,0,3,,,100,surplus"]);
        assert!(matches!(load(file.path()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_short_row_rejected() {
        let file = write_csv(&["1,P1,M,26-35,7,B,1,0,3,,"]);

        match load(file.path()) {
            Err(LoadError::MissingValue { column, row }) => {
                assert_eq!(column, PURCHASE);
                assert_eq!(row, 1);
            }
            other => panic!("expected MissingValue, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_column_is_table_error() {
        let df = load(write_csv(&["1,P1,M,26-35,7,B,1,0,3,,,100"]).path()).unwrap();

        let err = string_column(&df, OCCUPATION).unwrap_err();
        assert!(matches!(err, LoadError::Frame(_)));
        assert!(err.to_string().starts_with("Table error"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(load(file.path()), Err(LoadError::Csv(_))));
    }
}
