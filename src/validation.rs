//! Schema validation
//!
//! Checks a candidate dataframe against the model's required input
//! features before any training happens. No coercion and no imputation
//! at this layer; imputation is the model's own concern at prediction
//! time.
use crate::data::DataFrame;
use crate::errors::DriftError;

/// Validate a candidate dataframe against the model's required features.
///
/// * `df` - The new dataframe to check.
/// * `required_features` - Input features the model was trained on.
pub fn check_dataframe(df: &DataFrame, required_features: &[String]) -> Result<(), DriftError> {
    if df.n_cols() == 0 || df.n_rows() == 0 {
        return Err(DriftError::EmptyDataset);
    }
    for feature in required_features {
        if df.column_index(feature).is_none() {
            return Err(DriftError::MissingFeature(feature.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_empty_frame_rejected() {
        let df = DataFrame::new();
        assert!(matches!(
            check_dataframe(&df, &required()),
            Err(DriftError::EmptyDataset)
        ));

        // Columns but zero rows is still empty.
        let df = DataFrame::from_columns(vec![
            ("a".to_string(), vec![]),
            ("b".to_string(), vec![]),
        ]);
        assert!(matches!(
            check_dataframe(&df, &required()),
            Err(DriftError::EmptyDataset)
        ));
    }

    #[test]
    fn test_missing_feature_named() {
        let df = DataFrame::from_columns(vec![("a".to_string(), vec![1.0])]);
        match check_dataframe(&df, &required()) {
            Err(DriftError::MissingFeature(name)) => assert_eq!(name, "b"),
            other => panic!("expected MissingFeature, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_valid_frame_passes() {
        let df = DataFrame::from_columns(vec![
            ("a".to_string(), vec![1.0]),
            ("b".to_string(), vec![2.0]),
            ("extra".to_string(), vec![3.0]),
        ]);
        assert!(check_dataframe(&df, &required()).is_ok());
    }
}
