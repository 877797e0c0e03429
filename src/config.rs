//! # config.rs
//!
//! Loads the two tabular configuration files that drive a run:
//! - `paths.csv` maps plate IDs to the directories holding their raw data.
//! - `experiment.csv` maps sample names to the wells they occupy.
//!
//! Both loaders return an explicit `Result` so callers (and tests) can tell
//! "empty by design" apart from "failed to load". The orchestrator in `lib.rs`
//! is the one that degrades a failed load to an empty mapping.

use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

/// One row of `paths.csv`.
#[derive(Debug, Deserialize)]
struct PathRecord {
    #[serde(rename = "PlateID")]
    plate_id: String,
    #[serde(rename = "Path")]
    path: String,
}

/// One row of `experiment.csv`. The `Wells` cell holds a comma-separated
/// well list, e.g. `"A1,A2,A3"`.
#[derive(Debug, Deserialize)]
struct ExperimentRecord {
    #[serde(rename = "Sample")]
    sample: String,
    #[serde(rename = "Wells")]
    wells: String,
}

/// Reads a `PlateID,Path` CSV into a plate-id → directory mapping.
/// A plate ID appearing on more than one row keeps the last row's path.
pub fn load_paths<P: AsRef<Path>>(file_path: P) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(file_path)?;
    let mut paths = HashMap::new();
    for result in rdr.deserialize() {
        let record: PathRecord = result?;
        paths.insert(record.plate_id, record.path);
    }
    Ok(paths)
}

/// Reads a `Sample,Wells` CSV into a sample → well-list mapping. Wells are
/// split on commas as-is, no trimming, so the list order follows the cell.
pub fn load_experiment<P: AsRef<Path>>(
    file_path: P,
) -> Result<HashMap<String, Vec<String>>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(file_path)?;
    let mut experiment = HashMap::new();
    for result in rdr.deserialize() {
        let record: ExperimentRecord = result?;
        let wells = record.wells.split(',').map(str::to_string).collect();
        experiment.insert(record.sample, wells);
    }
    Ok(experiment)
}
