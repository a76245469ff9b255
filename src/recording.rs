use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::pose::Frame;

/// 記録済みキャプチャ（ポーズ推定器の出力列）
///
/// Webカメラとポーズ推定は外部コンポーネントの責務。本体は
/// 推定器が出力したフレーム列の JSON 記録だけを扱う。
/// 未検出の瞬間は `null` (None) で表し、ゼロ埋めフレームとは
/// 区別する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<Option<Frame>>,
}

impl Recording {
    pub fn new(frames: Vec<Option<Frame>>) -> Self {
        Self { frames }
    }

    /// 記録された瞬間の総数（未検出込み）
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// ポーズが検出された瞬間だけを取り出す
    pub fn detected_frames(&self) -> Vec<Frame> {
        self.frames.iter().flatten().cloned().collect()
    }
}

// --- Save / Load ---

pub fn save_recording(path: &str, recording: &Recording) -> Result<()> {
    let json = serde_json::to_string_pretty(recording)?;
    fs::write(path, json).context("Failed to write recording file")?;
    Ok(())
}

pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let content = fs::read_to_string(path).context("Failed to read recording file")?;
    let recording: Recording = serde_json::from_str(&content)?;
    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkIndex};

    fn full_frame() -> Frame {
        Frame::new(vec![Landmark::new(0.5, 0.5, 0.0, 1.0); LandmarkIndex::COUNT])
    }

    #[test]
    fn test_detected_frames_skips_none() {
        let recording = Recording::new(vec![Some(full_frame()), None, Some(full_frame())]);
        assert_eq!(recording.len(), 3);
        assert_eq!(recording.detected_frames().len(), 2);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        let recording = Recording::new(vec![Some(full_frame()), None]);
        save_recording(path.to_str().unwrap(), &recording).unwrap();
        let loaded = load_recording(&path).unwrap();
        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_recording("no_such_recording.json").is_err());
    }
}
