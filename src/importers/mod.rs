// Import module - Questrade account activity CSV parser

pub mod activity_csv;

use std::path::Path;

use tracing::info;

use crate::error::InputError;
pub use activity_csv::ActivityRecord;

/// Load activity records from a Questrade account activity export.
///
/// The file must carry a `.csv` extension (validated by name pattern, not by
/// content sniffing); anything else is rejected before the file is touched.
pub fn load_activity<P: AsRef<Path>>(path: P) -> Result<Vec<ActivityRecord>, InputError> {
    let path = path.as_ref();
    let name = path.to_string_lossy();

    if !name.trim().to_lowercase().ends_with(".csv") {
        return Err(InputError::UnsupportedExtension(name.into_owned()));
    }

    info!("Importing activity file: {:?}", path);
    activity_csv::parse_activity_csv(path)
}
