//! # plate.rs
//!
//! In-memory representation of a loaded flow-cytometry plate: a set of wells,
//! each holding a table of per-event channel measurements, plus the hlog
//! rescaling applied to fluorescence channels after loading.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The two fluorescence channels every plate gets rescaled on after loading.
pub const FLUORESCENCE_CHANNELS: [&str; 2] = ["FITC - Area", "Alexa Fluor 647 - Area"];

/// Width of the linear region of the hlog rescaling.
pub const HLOG_B: f64 = 500.0;

/// A loaded plate: wells keyed by well code (`A1`, `B12`, ...). `BTreeMap`
/// keeps iteration order deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub id: String,
    pub wells: BTreeMap<String, Well>,
}

/// Measurement table for one well. `channels` is the header; each event is a
/// row of values, one per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub channels: Vec<String>,
    pub events: Vec<Vec<f64>>,
}

impl Plate {
    pub fn new(id: &str) -> Self {
        Plate {
            id: id.to_string(),
            wells: BTreeMap::new(),
        }
    }

    /// Number of samples loaded, one per well. This is the count the summary
    /// report prints.
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

impl Well {
    /// Column index of a named channel within this well's table.
    pub fn channel_index(&self, channel: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == channel)
    }
}

/// What can go wrong while loading or transforming a single plate. One
/// failure skips that plate; the remaining plates still load.
#[derive(Debug, Error)]
pub enum PlateError {
    #[error("cannot read plate directory {}: {source}", .path.display())]
    Dir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no well files found in {}", .0.display())]
    NoWells(PathBuf),
    #[error("cannot parse well file {}: {source}", .path.display())]
    WellFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("non-numeric value '{value}' in well file {}", .path.display())]
    BadValue { path: PathBuf, value: String },
    #[error("channel '{channel}' not present in well {well} of plate {plate_id}")]
    MissingChannel {
        plate_id: String,
        well: String,
        channel: String,
    },
}

/// Hyperbolic-log rescaling of a fluorescence value. Behaves linearly near
/// zero, like log10 for large magnitudes, and is odd symmetric so negative
/// compensated values stay meaningful. `b` sets the width of the linear
/// region.
pub fn hlog(x: f64, b: f64) -> f64 {
    (x / b).asinh() / std::f64::consts::LN_10
}
