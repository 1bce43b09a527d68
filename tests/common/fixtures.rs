//! Fixture collection and on-disk helpers

use super::constants::*;
use anyhow::Result;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use vinyl_catalog::sources::parse_records_json;
use vinyl_catalog::Record;

/// Seed collection, shaped like the bundled catalog export.
pub fn seed_json() -> Value {
    json!([
        {
            "id": 1, "catalog_no": "BLP-1577", "artist": "John Coltrane",
            "title": BLUE_TRAIN, "label": "Blue Note", "original_release_year": 1957,
            "estimated_value_low": 40, "estimated_value_high": 60, "format": "LP"
        },
        {
            "id": 2, "catalog_no": "CL-1355", "artist": "Miles Davis",
            "title": KIND_OF_BLUE, "label": "Columbia", "original_release_year": 1959,
            "estimated_value_low": 80, "estimated_value_high": 140, "format": "LP"
        },
        {
            "id": 3, "catalog_no": "", "artist": "Talking Heads",
            "title": REMAIN_IN_LIGHT, "label": "Sire", "original_release_year": 1980,
            "estimated_value_low": 20, "estimated_value_high": 30, "format": "LP"
        },
        {
            "id": 4, "catalog_no": "MPS-15", "artist": "Kraftwerk",
            "title": AUTOBAHN, "label": "Philips", "original_release_year": 1974,
            "estimated_value_low": 10, "estimated_value_high": 20, "format": "7\""
        },
        {
            "id": 5, "catalog_no": "V2168", "artist": "Massive Attack",
            "title": BLUE_LINES, "label": "Wild Bunch", "original_release_year": "1991",
            "estimated_value_low": "30", "estimated_value_high": 50, "format": "LP"
        }
    ])
}

/// Live snapshot, shaped like the per-user documents (camelCase keys, string ids).
pub fn live_json() -> Value {
    json!([
        {
            "id": "doc-1", "catalogNumber": "CL-1355", "artist": "Miles Davis",
            "title": KIND_OF_BLUE_MONO, "label": "Columbia", "originalReleaseYear": 1959,
            "estimatedValueLow": 150, "estimatedValueHigh": 250, "format": "LP",
            "notes": "first pressing"
        },
        {
            "id": "3", "artist": "Talking Heads", "title": REMAIN_IN_LIGHT_REMASTER,
            "originalReleaseYear": 1980, "format": "LP"
        },
        {
            "id": "doc-9", "catalogNumber": "4AD-001", "artist": "Cocteau Twins",
            "title": HEAVEN_OR_LAS_VEGAS, "label": "4AD", "originalReleaseYear": 1990,
            "estimatedValueLow": 25, "estimatedValueHigh": 45, "format": "LP"
        }
    ])
}

pub fn seed_records() -> Vec<Record> {
    parse_records_json(&seed_json().to_string()).unwrap()
}

pub fn live_records() -> Vec<Record> {
    parse_records_json(&live_json().to_string()).unwrap()
}

/// Seed and live files in a temporary directory.
pub struct TestFiles {
    _dir: TempDir,
    pub seed_path: PathBuf,
    pub live_path: PathBuf,
}

impl TestFiles {
    pub fn create() -> Result<Self> {
        let dir = TempDir::new()?;
        let seed_path = dir.path().join("seed.json");
        let live_path = dir.path().join("live.json");
        std::fs::write(&seed_path, seed_json().to_string())?;
        std::fs::write(&live_path, live_json().to_string())?;
        Ok(Self {
            _dir: dir,
            seed_path,
            live_path,
        })
    }

    pub fn write_live(&self, value: &Value) -> Result<()> {
        std::fs::write(&self.live_path, value.to_string())?;
        Ok(())
    }
}

/// Clonable in-memory writer, so a test can read what a renderer wrote.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.contents()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
