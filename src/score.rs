use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "snakefall";
const SCORE_FILE_NAME: &str = "scores.json";

/// Failure reading or writing the score file.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("score file is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
    /// Highest level ever reached; purely informational.
    #[serde(default)]
    best_level: u32,
}

/// Best results carried across sessions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct HighScore {
    pub score: u32,
    pub level: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// Loads the high score from disk.
///
/// A missing file is a first run and reads as all zeroes. A present but
/// unreadable or malformed file is an error, so the caller can warn before
/// entering raw terminal mode.
pub fn load_high_score() -> Result<HighScore, ScoreError> {
    load_from_path(&scores_path())
}

/// Saves the high score to disk, creating parent directories when needed.
pub fn save_high_score(high: HighScore) -> Result<(), ScoreError> {
    save_to_path(&scores_path(), high)
}

fn load_from_path(path: &Path) -> Result<HighScore, ScoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HighScore::default()),
        Err(e) => return Err(e.into()),
    };

    let file: ScoreFile = serde_json::from_str(&raw)?;
    Ok(HighScore {
        score: file.high_score,
        level: file.best_level,
    })
}

fn save_to_path(path: &Path, high: HighScore) -> Result<(), ScoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = ScoreFile {
        high_score: high.score,
        best_level: high.level,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{load_from_path, save_to_path, HighScore};

    #[test]
    fn score_serialization_round_trip() {
        let path = unique_test_path("round_trip");
        let high = HighScore {
            score: 420,
            level: 3,
        };

        save_to_path(&path, high).expect("score save should succeed");
        let loaded = load_from_path(&path).expect("load should succeed");

        assert_eq!(loaded, high);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_score_file_reads_as_zero() {
        let path = unique_test_path("missing");
        // Deliberately do not create the file.
        let loaded = load_from_path(&path).expect("missing file should read as default");
        assert_eq!(loaded, HighScore::default());
    }

    #[test]
    fn malformed_score_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        assert!(
            load_from_path(&path).is_err(),
            "malformed file should return Err"
        );

        cleanup_test_path(&path);
    }

    #[test]
    fn file_without_best_level_still_loads() {
        let path = unique_test_path("legacy");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{"high_score": 7}"#).expect("test file write should succeed");

        let loaded = load_from_path(&path).expect("load should succeed");
        assert_eq!(loaded.score, 7);
        assert_eq!(loaded.level, 0);

        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("snakefall-score-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &Path) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
