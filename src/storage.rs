//! Session-state persistence: load defaults, override from the stored file
//! where well-formed, write back on every mutation. Storage failures are
//! logged and the app carries on with what it has in memory.

use crate::models::{Entry, Goal, TrackerData};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/session.json"))
}

/// Reads the session file. Each top-level key (`entries`, `weight`, `goal`)
/// is restored independently; a malformed value falls back to its default
/// rather than discarding the rest of the file.
pub async fn load_data(path: &Path) -> TrackerData {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return TrackerData::default(),
        Err(err) => {
            error!("failed to read session file: {err}");
            return TrackerData::default();
        }
    };

    let value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to parse session file: {err}");
            return TrackerData::default();
        }
    };

    let mut data = TrackerData::default();

    if let Some(raw) = value.get("entries") {
        match serde_json::from_value::<Vec<Entry>>(raw.clone()) {
            Ok(mut entries) => {
                entries.sort_by_key(|entry| entry.timestamp);
                data.entries = entries;
            }
            Err(err) => warn!("ignoring stored entries: {err}"),
        }
    }

    if let Some(raw) = value.get("weight") {
        match serde_json::from_value::<f64>(raw.clone()) {
            Ok(weight) if weight.is_finite() && weight > 0.0 => data.weight = weight,
            Ok(weight) => warn!("ignoring stored weight {weight}"),
            Err(err) => warn!("ignoring stored weight: {err}"),
        }
    }

    if let Some(raw) = value.get("goal") {
        match serde_json::from_value::<Goal>(raw.clone()) {
            Ok(goal) => data.goal = goal,
            Err(err) => warn!("ignoring stored goal: {err}"),
        }
    }

    data
}

/// Writes the session file. Failures are logged and swallowed so a broken
/// disk never turns a successful mutation into an error response.
pub async fn persist_data(path: &Path, data: &TrackerData) {
    let payload = match serde_json::to_vec_pretty(data) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to encode session file: {err}");
            return;
        }
    };
    if let Err(err) = fs::write(path, payload).await {
        error!("failed to write session file: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("calorie_log_{}_{name}.json", std::process::id()));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let data = load_data(Path::new("/nonexistent/calorie_log_session.json")).await;
        assert!(data.entries.is_empty());
        assert_eq!(data.weight, 150.0);
        assert_eq!(data.goal, Goal::Maintenance);
    }

    #[tokio::test]
    async fn malformed_keys_fall_back_independently() {
        let path = temp_file(
            "partial",
            r#"{ "entries": "not-a-list", "weight": 182.5, "goal": "one_lb" }"#,
        );
        let data = load_data(&path).await;
        std::fs::remove_file(&path).ok();

        assert!(data.entries.is_empty());
        assert_eq!(data.weight, 182.5);
        assert_eq!(data.goal, Goal::OneLb);
    }

    #[tokio::test]
    async fn nonsense_weight_is_ignored() {
        let path = temp_file("weight", r#"{ "weight": -20 }"#);
        let data = load_data(&path).await;
        std::fs::remove_file(&path).ok();

        assert_eq!(data.weight, 150.0);
    }

    #[tokio::test]
    async fn round_trip_through_disk() {
        let mut data = TrackerData::default();
        data.insert(Entry::new("toast", 120, 1_700_000_000_000));
        data.weight = 172.0;
        data.goal = Goal::TwoLb;

        let mut path = std::env::temp_dir();
        path.push(format!("calorie_log_{}_roundtrip.json", std::process::id()));
        persist_data(&path, &data).await;
        let loaded = load_data(&path).await;
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[0].name, "toast");
        assert_eq!(loaded.weight, 172.0);
        assert_eq!(loaded.goal, Goal::TwoLb);
    }
}
