//! On-disk isoline format.
//!
//! ```json
//! { "background-image": "earth.png",
//!   "isolines": [ { "height": 100, "group": "coast", "name": "a",
//!                   "points": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] } ] }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::Vec3;
use scene::{Isoline, IsolineSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IsolineFile {
    #[serde(rename = "background-image", default)]
    pub background_image: String,
    #[serde(default)]
    pub isolines: Vec<IsolineRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsolineRecord {
    pub height: i64,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub name: String,
    pub points: Vec<[f64; 3]>,
}

#[derive(Debug)]
pub enum IsolineFileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for IsolineFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsolineFileError::Io { path, source } => {
                write!(f, "failed to access isoline file {}: {source}", path.display())
            }
            IsolineFileError::Parse { path, source } => {
                write!(f, "failed to parse isoline file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IsolineFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IsolineFileError::Io { source, .. } => Some(source),
            IsolineFileError::Parse { source, .. } => Some(source),
        }
    }
}

impl IsolineFile {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_set(set: &IsolineSet) -> Self {
        Self {
            background_image: set.background.clone(),
            isolines: set
                .isolines
                .iter()
                .map(|iso| IsolineRecord {
                    height: iso.height,
                    group: iso.group.clone(),
                    name: iso.name.clone(),
                    points: iso.points.iter().map(|p| p.as_array()).collect(),
                })
                .collect(),
        }
    }

    pub fn into_set(self) -> IsolineSet {
        IsolineSet::new(
            self.background_image,
            self.isolines
                .into_iter()
                .map(|rec| {
                    Isoline::new(
                        rec.height,
                        rec.group,
                        rec.name,
                        rec.points.into_iter().map(Vec3::from).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Strict read: any I/O or schema problem is reported.
pub fn read_isoline_file(path: impl AsRef<Path>) -> Result<IsolineSet, IsolineFileError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| IsolineFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file = IsolineFile::from_json_str(&payload).map_err(|e| IsolineFileError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(file.into_set())
}

/// Tolerant read: a missing or malformed file yields an empty set.
pub fn load_isoline_set(path: impl AsRef<Path>) -> IsolineSet {
    match read_isoline_file(path) {
        Ok(set) => {
            debug!(
                isolines = set.isolines.len(),
                nodes = set.node_count(),
                "loaded isoline set"
            );
            set
        }
        Err(err) => {
            trace!("{err}; using an empty isoline set");
            IsolineSet::default()
        }
    }
}

pub fn write_isoline_file(
    path: impl AsRef<Path>,
    set: &IsolineSet,
) -> Result<(), IsolineFileError> {
    let path = path.as_ref();
    let payload = IsolineFile::from_set(set)
        .to_json_string_pretty()
        .map_err(|e| IsolineFileError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    fs::write(path, payload).map_err(|e| IsolineFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        IsolineFile, IsolineFileError, load_isoline_set, read_isoline_file, write_isoline_file,
    };
    use foundation::math::Vec3;
    use pretty_assertions::assert_eq;
    use scene::{Isoline, IsolineSet};
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = format!("isoview_isoline_file_{label}_{}", std::process::id());
        dir.push(id);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    const SAMPLE: &str = r#"{
        "background-image": "earth.png",
        "isolines": [
            { "height": 200, "group": "coast", "name": "north",
              "points": [[1, 0, 0], [0, 1, 0], [0, 0, 1]] }
        ]
    }"#;

    #[test]
    fn parses_schema() {
        let set = IsolineFile::from_json_str(SAMPLE).expect("parse").into_set();
        assert_eq!(set.background, "earth.png");
        assert_eq!(
            set.isolines,
            vec![Isoline::new(200, "coast", "north", vec![Vec3::X, Vec3::Y, Vec3::Z])]
        );
    }

    #[test]
    fn group_and_name_are_optional() {
        let set = IsolineFile::from_json_str(r#"{"isolines":[{"height":1,"points":[]}]}"#)
            .expect("parse")
            .into_set();
        assert_eq!(set.background, "");
        assert_eq!(set.isolines[0].name, "");
    }

    #[test]
    fn writes_background_with_hyphenated_key() {
        let set = IsolineSet::new("bg.jpg", Vec::new());
        let json = IsolineFile::from_set(&set).to_json_string_pretty().expect("json");
        assert!(json.contains("\"background-image\": \"bg.jpg\""));
    }

    #[test]
    fn write_then_read_file() {
        let dir = temp_dir("write");
        let path = dir.join("isolines.json");
        let set = IsolineFile::from_json_str(SAMPLE).expect("parse").into_set();
        write_isoline_file(&path, &set).expect("write");
        assert_eq!(read_isoline_file(&path).expect("read"), set);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn strict_read_reports_errors() {
        let dir = temp_dir("strict");
        let missing = dir.join("missing.json");
        assert!(matches!(
            read_isoline_file(&missing),
            Err(IsolineFileError::Io { .. })
        ));

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ \"isolines\": 3 }").expect("write");
        let err = read_isoline_file(&bad).expect_err("malformed");
        assert!(matches!(err, IsolineFileError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn tolerant_load_degrades_to_empty() {
        let dir = temp_dir("tolerant");
        assert_eq!(load_isoline_set(dir.join("missing.json")), IsolineSet::default());

        let bad = dir.join("bad.json");
        fs::write(&bad, "not json").expect("write");
        assert_eq!(load_isoline_set(&bad), IsolineSet::default());

        let good = dir.join("good.json");
        fs::write(&good, SAMPLE).expect("write");
        assert_eq!(load_isoline_set(&good).isolines.len(), 1);
        let _ = fs::remove_dir_all(&dir);
    }
}
