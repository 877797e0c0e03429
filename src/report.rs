//! Console summary of the loaded plates.

use itertools::Itertools;
use std::collections::HashMap;

use crate::plate::Plate;

/// One summary line per plate, sorted by plate ID so identical inputs always
/// print identically.
pub fn summary_lines(plates: &HashMap<String, Plate>) -> Vec<String> {
    plates
        .keys()
        .sorted()
        .map(|plate_id| format!("- {}: {} samples loaded.", plate_id, plates[plate_id].len()))
        .collect()
}

pub fn print_summary(plates: &HashMap<String, Plate>) {
    println!("\nSummary of Loaded Plates:");
    for line in summary_lines(plates) {
        println!("{}", line);
    }
}
