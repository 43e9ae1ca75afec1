//! Guesstimate space document, limited to the fields this crate fills in.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub space: GuessModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessModel {
    pub name: String,
    pub description: String,
    /// Guesstimate expects the string form, not a JSON boolean.
    pub is_private: String,
    pub graph: GuessGraph,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuessGraph {
    pub metrics: Vec<GuessMetric>,
    pub guesstimates: Vec<Guesstimate>,
}

/// A positioned node on the model canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessMetric {
    pub id: String,
    pub readable_id: String,
    pub name: String,
    pub location: GuessMetricLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessMetricLocation {
    pub row: usize,
    pub col: usize,
}

/// The data series behind a metric node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guesstimate {
    pub metric: String,
    pub input: String,
    pub guesstimate_type: String,
    pub data: Vec<i64>,
}

/// Write `doc` as pretty JSON to `<prefix>.json` and return that path.
pub fn save(doc: &Guess, prefix: &Path) -> Result<PathBuf> {
    let mut path = OsString::from(prefix.as_os_str());
    path.push(".json");
    let path = PathBuf::from(path);

    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, doc)?;
    w.flush().map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Guess {
        Guess {
            space: GuessModel {
                name: "arch".into(),
                description: "test".into(),
                is_private: "true".into(),
                graph: GuessGraph {
                    metrics: vec![GuessMetric {
                        id: "AA".into(),
                        readable_id: "AA".into(),
                        name: "arch.svc".into(),
                        location: GuessMetricLocation { row: 1, col: 1 },
                    }],
                    guesstimates: vec![Guesstimate {
                        metric: "AA".into(),
                        input: String::new(),
                        guesstimate_type: "DATA".into(),
                        data: vec![5, 2_000_000, 10],
                    }],
                },
            },
        }
    }

    #[test]
    fn test_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let space = &json["space"];
        assert_eq!(space["isPrivate"], "true");
        assert_eq!(space["graph"]["metrics"][0]["readableId"], "AA");
        assert_eq!(space["graph"]["metrics"][0]["location"]["row"], 1);
        assert_eq!(space["graph"]["metrics"][0]["location"]["col"], 1);
        assert_eq!(space["graph"]["guesstimates"][0]["guesstimateType"], "DATA");
        assert_eq!(space["graph"]["guesstimates"][0]["input"], "");
        assert_eq!(
            space["graph"]["guesstimates"][0]["data"],
            serde_json::json!([5, 2_000_000, 10])
        );
    }

    #[test]
    fn test_save_appends_json_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = save(&sample(), &dir.path().join("arch")).unwrap();
        assert_eq!(path, dir.path().join("arch.json"));

        let back: Guess = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_save_missing_dir_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = save(&sample(), &dir.path().join("nope").join("arch")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
