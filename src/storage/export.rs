//! CSV spreadsheet export

use crate::storage::RecordStore;
use crate::KhabarError;
use std::path::Path;

/// Writes every stored record to a CSV file with the fixed column headers
///
/// # Arguments
///
/// * `store` - The store to read from
/// * `path` - Destination file, overwritten if present
///
/// # Returns
///
/// * `Ok(usize)` - Number of records written
/// * `Err(KhabarError)` - Failed to read the store or write the file
pub fn export_csv<S: RecordStore>(store: &S, path: &Path) -> Result<usize, KhabarError> {
    let records = store.load_records()?;
    let mut writer = csv::Writer::from_path(path)?;

    if records.is_empty() {
        writer.write_record(crate::storage::COLUMNS)?;
    }
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(records.len())
}
