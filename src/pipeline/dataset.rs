//! Column access over a loaded DataFrame
//!
//! The analysis core never touches polars types beyond this module: numeric
//! columns are pulled out as `Vec<Option<f64>>` where both null and NaN count
//! as missing.

use polars::prelude::*;

use super::error::EdaError;

/// Extract a numeric column as `Float64` values, mapping null and NaN to `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, EdaError> {
    let col = df
        .column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))?;

    if !col.dtype().is_primitive_numeric() {
        return Err(EdaError::NonNumericColumn(name.to_string()));
    }

    let float_col = col.cast(&DataType::Float64)?;
    let values = float_col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();

    Ok(values)
}

/// Names of all primitive numeric columns, in dataset order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Resolve the feature columns to analyze against `target`.
///
/// With an explicit list every name must exist and be numeric; the target is
/// silently removed from it. Without one, all numeric columns except the
/// target are used.
pub fn candidate_features(
    df: &DataFrame,
    target: &str,
    explicit: Option<&[String]>,
) -> Result<Vec<String>, EdaError> {
    match explicit {
        Some(names) => {
            let mut out = Vec::with_capacity(names.len());
            for name in names {
                if name == target || out.contains(name) {
                    continue;
                }
                let col = df
                    .column(name)
                    .map_err(|_| EdaError::ColumnNotFound(name.clone()))?;
                if !col.dtype().is_primitive_numeric() {
                    return Err(EdaError::NonNumericColumn(name.clone()));
                }
                out.push(name.clone());
            }
            Ok(out)
        }
        None => Ok(numeric_column_names(df)
            .into_iter()
            .filter(|name| name != target)
            .collect()),
    }
}

/// Keep only the entries whose mask position is `true`.
pub(crate) fn select_rows<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter_map(|(v, &k)| if k { Some(*v) } else { None })
        .collect()
}
