use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::core::OError;

/// Read a run configuration (for example the algorithm or the evaluator options) from a JSON file.
///
/// # Arguments
///
/// * `file`: The path to the JSON file.
///
/// returns: `Result<T, OError>`
pub fn read_json_config<T: DeserializeOwned>(file: &Path) -> Result<T, OError> {
    let file_str = file.display().to_string();
    if !file.exists() {
        return Err(OError::Config(file_str, "the file does not exist".to_string()));
    }
    let data =
        fs::read_to_string(file).map_err(|e| OError::Config(file_str.clone(), e.to_string()))?;
    serde_json::from_str(&data).map_err(|e| OError::Config(file_str, e.to_string()))
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::core::{read_json_config, GeneSpace, OError};

    #[test]
    /// Read a gene space from a JSON file.
    fn test_read_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("space.json");
        fs::write(&file, r#"{"lower": [0.0, 1.0], "upper": [2.0, 3.0]}"#).unwrap();

        let space: GeneSpace = read_json_config(&file).unwrap();
        assert_eq!(space.upper(), &[2.0, 3.0]);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_json_config::<GeneSpace>(&missing),
            Err(OError::Config(_, _))
        ));

        fs::write(&file, "{").unwrap();
        assert!(read_json_config::<GeneSpace>(&file).is_err());
    }
}
