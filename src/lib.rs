use colored::Colorize;
use std::collections::HashMap;
use std::error::Error;

pub mod config;
pub mod plate;
pub mod report;
pub mod source;

use crate::source::{DirSource, load_plates};

/// Fixed input file names, resolved relative to the working directory.
pub const PATHS_FILE: &str = "paths.csv";
pub const EXPERIMENT_FILE: &str = "experiment.csv";

/// Runs the whole pipeline: read the two config CSVs, load and transform each
/// configured plate, print the summary. A failed config load degrades to an
/// empty mapping; a failed plate is reported and skipped. Neither aborts the
/// run.
pub fn run() -> Result<(), Box<dyn Error>> {
    println!("Loading paths...");
    let paths = config::load_paths(PATHS_FILE).unwrap_or_else(|e| {
        eprintln!("Error loading paths: {}", e.to_string().red());
        HashMap::new()
    });
    println!("Paths loaded: {:?}", paths);

    println!("Loading experiment configuration...");
    let experiment = config::load_experiment(EXPERIMENT_FILE).unwrap_or_else(|e| {
        eprintln!("Error loading experiment data: {}", e.to_string().red());
        HashMap::new()
    });
    println!("Experiment loaded: {:?}", experiment);

    let source = DirSource::new();
    let loaded = load_plates(&paths, &source);
    for failure in &loaded.failures {
        eprintln!(
            "Error loading plate {}: {}",
            failure.plate_id,
            failure.error.to_string().red()
        );
    }

    report::print_summary(&loaded.plates);

    println!("\nScript completed.");
    Ok(())
}
