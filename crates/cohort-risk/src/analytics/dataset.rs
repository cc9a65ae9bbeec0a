use super::features::FeatureRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read survey dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid survey CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads survey rows from a CSV export whose header uses the [`FeatureRow`] field names.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FeatureRow>, DatasetError> {
    let file = File::open(path.as_ref())?;
    from_reader(file)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Vec<FeatureRow>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<FeatureRow>() {
        rows.push(record?);
    }

    tracing::debug!(rows = rows.len(), "loaded survey dataset");
    Ok(rows)
}
