//! Periodic JSON frame reports

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::FrameSummary;

#[derive(Debug, Serialize)]
struct FrameReport<'a> {
    scenario: &'a str,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    summary: &'a FrameSummary,
}

/// Writes a frame summary every `interval` frames. An interval of zero
/// turns reporting off.
pub struct ReportWriter {
    dir: PathBuf,
    interval: u64,
}

impl ReportWriter {
    pub fn new(dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval > 0
    }

    pub fn maybe_write(&self, scenario: &str, summary: &FrameSummary) -> Result<Option<PathBuf>> {
        if !self.is_enabled() || summary.frame % self.interval != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;
        let path = dir.join(format!("frame_{:06}.json", summary.frame));
        let report = FrameReport {
            scenario,
            generated_at: Utc::now(),
            summary,
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{LoopPhase, PhaseReport, SystemRunReport};

    fn summary(frame: u64) -> FrameSummary {
        FrameSummary {
            frame,
            elapsed_seconds: frame as f64 * 0.5,
            live_entities: 3,
            update: PhaseReport {
                phase: LoopPhase::Update,
                systems: vec![SystemRunReport {
                    name: "movement".into(),
                    matched: 2,
                    duration_ms: 0.01,
                }],
            },
            render: PhaseReport {
                phase: LoopPhase::Render,
                systems: Vec::new(),
            },
        }
    }

    #[test]
    fn test_writes_only_on_interval() {
        let temp = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(temp.path(), 2);

        assert_eq!(writer.maybe_write("demo", &summary(1)).unwrap(), None);
        let path = writer.maybe_write("demo", &summary(2)).unwrap().unwrap();
        assert_eq!(path, temp.path().join("demo").join("frame_000002.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["scenario"], "demo");
        assert_eq!(json["frame"], 2);
        assert_eq!(json["live_entities"], 3);
        assert_eq!(json["update"]["phase"], "Update");
        assert_eq!(json["update"]["systems"][0]["name"], "movement");
    }

    #[test]
    fn test_zero_interval_disables() {
        let temp = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(temp.path(), 0);
        assert!(!writer.is_enabled());
        assert_eq!(writer.maybe_write("demo", &summary(10)).unwrap(), None);
    }
}
