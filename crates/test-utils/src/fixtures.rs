//! On-disk fixtures: record files and overlay text files in a temporary
//! directory that is removed when the fixture is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use field_common::SampledField;
use record_codec::RecordLayout;
use tempfile::TempDir;

/// A station file in the usual `name network x z elevation burial` layout.
pub const STATIONS_TEXT: &str = "\
# receivers along the surface
S0001    AA    500.0    -10.0    0.0    0.0
S0002    AA   1500.0    -10.0    0.0    0.0
S0003    AA   2500.0    -10.0    0.0    0.0
S0004    AA   3500.0    -10.0    0.0    0.0
";

/// A two-column source file (`x z`).
pub const SOURCES_TEXT: &str = "\
2000.0  -1000.0
1000.0   -500.0
";

/// A temporary directory holding `x`, `y` and value record files.
pub struct RecordFixture {
    dir: TempDir,
    pub x: PathBuf,
    pub y: PathBuf,
    pub values: PathBuf,
}

impl RecordFixture {
    /// Write a field as three single-record files.
    pub fn write(field: &SampledField, layout: &RecordLayout) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let fixture = Self {
            x: dir.path().join("proc000000_x.bin"),
            y: dir.path().join("proc000000_z.bin"),
            values: dir.path().join("proc000000_vp.bin"),
            dir,
        };
        fixture.write_slice(field, layout, "proc000000");
        fixture
    }

    /// Write another slice (e.g. a second processor's output) alongside the
    /// first and return its three paths.
    pub fn write_slice(
        &self,
        field: &SampledField,
        layout: &RecordLayout,
        prefix: &str,
    ) -> (PathBuf, PathBuf, PathBuf) {
        let paths = (
            self.dir.path().join(format!("{}_x.bin", prefix)),
            self.dir.path().join(format!("{}_z.bin", prefix)),
            self.dir.path().join(format!("{}_vp.bin", prefix)),
        );
        record_codec::encode(&paths.0, field.x(), layout).expect("write x records");
        record_codec::encode(&paths.1, field.y(), layout).expect("write y records");
        record_codec::encode(&paths.2, field.values(), layout).expect("write value records");
        paths
    }

    /// Write an arbitrary file into the fixture directory.
    pub fn write_file(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path for an output file inside the fixture directory.
    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
