//! # source.rs
//!
//! Turns a plate directory on disk into a [`Plate`]. The capability is behind
//! the [`PlateSource`] trait so the orchestration in `lib.rs` can be exercised
//! against a double that fails on demand, without a filesystem.
//!
//! The real implementation, [`DirSource`], uses a naming-based parser: every
//! `*.csv` file in the plate directory whose file stem ends in `_<well>`
//! (e.g. `Specimen_001_A1.csv`) is read as that well's measurement table.

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::plate::{FLUORESCENCE_CHANNELS, HLOG_B, Plate, PlateError, Well, hlog};

/// The fixed transforms a source knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Hlog,
}

/// Loads plate data and applies transforms. Implemented by [`DirSource`] for
/// real directories and by test doubles for failure injection.
pub trait PlateSource {
    /// Load every well file in `dir` into a plate identified by `plate_id`.
    fn load_dir(&self, plate_id: &str, dir: &Path) -> Result<Plate, PlateError>;

    /// Apply `transform` to the named channels of every well. Errors if a
    /// named channel is missing from any well.
    fn transform(
        &self,
        plate: Plate,
        transform: Transform,
        channels: &[&str],
    ) -> Result<Plate, PlateError>;
}

/// Filesystem-backed plate source.
pub struct DirSource {
    well_pattern: Regex,
}

impl DirSource {
    pub fn new() -> Self {
        // well code at the end of the file stem: row letter + column number
        DirSource {
            well_pattern: Regex::new(r"(?:^|_)([A-P]\d{1,2})$").unwrap(),
        }
    }

    /// Extracts the well code from a file name, or `None` if the file does
    /// not look like a well file.
    fn well_from_file_name(&self, path: &Path) -> Option<String> {
        if path.extension().is_none_or(|ext| ext != "csv") {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        self.well_pattern
            .captures(stem)
            .map(|caps| caps[1].to_string())
    }

    fn read_well(&self, path: &Path) -> Result<Well, PlateError> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| PlateError::WellFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let channels: Vec<String> = rdr
            .headers()
            .map_err(|e| PlateError::WellFile {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(str::to_string)
            .collect();
        let mut events = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| PlateError::WellFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            let row = record
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| PlateError::BadValue {
                        path: path.to_path_buf(),
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, PlateError>>()?;
            events.push(row);
        }
        Ok(Well { channels, events })
    }
}

impl Default for DirSource {
    fn default() -> Self {
        DirSource::new()
    }
}

impl PlateSource for DirSource {
    fn load_dir(&self, plate_id: &str, dir: &Path) -> Result<Plate, PlateError> {
        let entries = std::fs::read_dir(dir).map_err(|e| PlateError::Dir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let mut plate = Plate::new(plate_id);
        for entry in entries {
            let entry = entry.map_err(|e| PlateError::Dir {
                path: dir.to_path_buf(),
                source: e,
            })?;
            let path = entry.path();
            if let Some(well) = self.well_from_file_name(&path) {
                plate.wells.insert(well, self.read_well(&path)?);
            }
        }
        if plate.is_empty() {
            return Err(PlateError::NoWells(dir.to_path_buf()));
        }
        Ok(plate)
    }

    fn transform(
        &self,
        mut plate: Plate,
        transform: Transform,
        channels: &[&str],
    ) -> Result<Plate, PlateError> {
        let plate_id = plate.id.clone();
        for (well_id, well) in plate.wells.iter_mut() {
            for channel in channels {
                let index =
                    well.channel_index(channel)
                        .ok_or_else(|| PlateError::MissingChannel {
                            plate_id: plate_id.clone(),
                            well: well_id.clone(),
                            channel: channel.to_string(),
                        })?;
                for event in well.events.iter_mut() {
                    event[index] = match transform {
                        Transform::Hlog => hlog(event[index], HLOG_B),
                    };
                }
            }
        }
        Ok(plate)
    }
}

/// Result of loading every configured plate: the successfully loaded plates
/// plus one entry per plate that failed.
#[derive(Debug)]
pub struct LoadedPlates {
    pub plates: HashMap<String, Plate>,
    pub failures: Vec<PlateFailure>,
}

#[derive(Debug)]
pub struct PlateFailure {
    pub plate_id: String,
    pub error: PlateError,
}

/// Loads and hlog-transforms each plate in `paths`. A plate that fails to
/// load or transform is recorded as a failure and stores nothing; the
/// remaining plates still load.
pub fn load_plates<S: PlateSource>(paths: &HashMap<String, String>, source: &S) -> LoadedPlates {
    let mut loaded = LoadedPlates {
        plates: HashMap::new(),
        failures: Vec::new(),
    };
    for (plate_id, path) in paths {
        println!("Loading plate: {} from {}...", plate_id, path);
        let result = source
            .load_dir(plate_id, Path::new(path))
            .and_then(|plate| source.transform(plate, Transform::Hlog, &FLUORESCENCE_CHANNELS));
        match result {
            Ok(plate) => {
                println!("Plate {} loaded and transformed successfully.", plate_id);
                loaded.plates.insert(plate_id.clone(), plate);
            }
            Err(error) => {
                loaded.failures.push(PlateFailure {
                    plate_id: plate_id.clone(),
                    error,
                });
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Double that hands out a fixed plate or fails, depending on the id.
    struct FailingSource {
        fail_load: Vec<String>,
        fail_transform: Vec<String>,
    }

    impl PlateSource for FailingSource {
        fn load_dir(&self, plate_id: &str, dir: &Path) -> Result<Plate, PlateError> {
            if self.fail_load.contains(&plate_id.to_string()) {
                return Err(PlateError::NoWells(dir.to_path_buf()));
            }
            let mut plate = Plate::new(plate_id);
            plate.wells.insert(
                "A1".to_string(),
                Well {
                    channels: FLUORESCENCE_CHANNELS.iter().map(|c| c.to_string()).collect(),
                    events: vec![vec![100.0, 200.0]],
                },
            );
            Ok(plate)
        }

        fn transform(
            &self,
            plate: Plate,
            _transform: Transform,
            channels: &[&str],
        ) -> Result<Plate, PlateError> {
            if self.fail_transform.contains(&plate.id) {
                return Err(PlateError::MissingChannel {
                    plate_id: plate.id.clone(),
                    well: "A1".to_string(),
                    channel: channels[0].to_string(),
                });
            }
            Ok(plate)
        }
    }

    #[test]
    fn test_well_from_file_name() {
        let source = DirSource::new();
        let cases = [
            ("Specimen_001_A1.csv", Some("A1")),
            ("Specimen_001_B12.csv", Some("B12")),
            ("H7.csv", Some("H7")),
            ("Specimen_001_A1.fcs", None),
            ("readme.csv", None),
            ("Specimen_001.csv", None),
        ];
        for (name, expected) in cases {
            assert_eq!(
                source.well_from_file_name(&PathBuf::from(name)),
                expected.map(str::to_string),
                "file name: {}",
                name
            );
        }
    }

    #[test]
    fn test_load_dir_from_fixture() {
        let source = DirSource::new();
        let plate = source
            .load_dir("P1", Path::new("tests/fixtures/plates/P1"))
            .unwrap();
        assert_eq!(plate.id, "P1");
        assert_eq!(plate.len(), 2);
        let a1 = plate.wells.get("A1").unwrap();
        assert_eq!(a1.channel_index("FITC - Area"), Some(0));
        assert_eq!(a1.events.len(), 3);
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let source = DirSource::new();
        let result = source.load_dir("P2", Path::new("tests/fixtures/plates/missing"));
        assert!(matches!(result, Err(PlateError::Dir { .. })));
    }

    #[test]
    fn test_load_dir_without_well_files() {
        let source = DirSource::new();
        let result = source.load_dir("PX", Path::new("tests/fixtures/plates/empty"));
        assert!(matches!(result, Err(PlateError::NoWells(_))));
    }

    #[test]
    fn test_load_dir_non_numeric_value() {
        let source = DirSource::new();
        let result = source.load_dir("PB", Path::new("tests/fixtures/plates/bad_values"));
        match result {
            Err(PlateError::BadValue { value, .. }) => assert_eq!(value, "saturated"),
            other => panic!("expected BadValue, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_applies_hlog_to_named_channels_only() {
        let source = DirSource::new();
        let plate = source
            .load_dir("P1", Path::new("tests/fixtures/plates/P1"))
            .unwrap();
        let raw = plate.wells.get("A1").unwrap().events[0].clone();
        let transformed = source
            .transform(plate, Transform::Hlog, &FLUORESCENCE_CHANNELS)
            .unwrap();
        let a1 = transformed.wells.get("A1").unwrap();
        assert_eq!(a1.events[0][0], hlog(raw[0], HLOG_B));
        assert_eq!(a1.events[0][1], hlog(raw[1], HLOG_B));
        // the scatter channel is left untouched
        assert_eq!(a1.events[0][2], raw[2]);
    }

    #[test]
    fn test_transform_missing_channel() {
        let source = DirSource::new();
        let mut plate = Plate::new("P1");
        plate.wells.insert(
            "A1".to_string(),
            Well {
                channels: vec!["FSC - Area".to_string()],
                events: vec![vec![1.0]],
            },
        );
        let result = source.transform(plate, Transform::Hlog, &FLUORESCENCE_CHANNELS);
        assert!(matches!(result, Err(PlateError::MissingChannel { .. })));
    }

    #[test]
    fn test_load_plates_skips_failed_plate_and_continues() {
        let source = FailingSource {
            fail_load: vec!["P2".to_string()],
            fail_transform: vec!["P3".to_string()],
        };
        let mut paths = HashMap::new();
        paths.insert("P1".to_string(), "p1".to_string());
        paths.insert("P2".to_string(), "p2".to_string());
        paths.insert("P3".to_string(), "p3".to_string());

        let loaded = load_plates(&paths, &source);
        assert_eq!(loaded.plates.len(), 1);
        assert!(loaded.plates.contains_key("P1"));
        assert_eq!(loaded.failures.len(), 2);
        assert!(
            loaded
                .failures
                .iter()
                .any(|f| f.plate_id == "P2" && matches!(f.error, PlateError::NoWells(_)))
        );
        assert!(
            loaded
                .failures
                .iter()
                .any(|f| f.plate_id == "P3"
                    && matches!(f.error, PlateError::MissingChannel { .. }))
        );
    }

    #[test]
    fn test_load_plates_empty_paths() {
        let source = DirSource::new();
        let loaded = load_plates(&HashMap::new(), &source);
        assert!(loaded.plates.is_empty());
        assert!(loaded.failures.is_empty());
    }
}
