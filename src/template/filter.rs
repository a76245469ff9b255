use crate::config::QualityConfig;
use crate::pose::{Frame, LandmarkIndex};

/// フレーム品質フィルタ
///
/// 可視ランドマーク比率が閾値未満のフレームを除外する。
/// 順序は保持し、結果が空でもエラーにしない（下流が
/// InsufficientData として扱う）。
pub struct QualityFilter {
    min_visibility: f32,
    min_visible_ratio: f32,
}

impl QualityFilter {
    pub fn new(min_visibility: f32, min_visible_ratio: f32) -> Self {
        Self {
            min_visibility,
            min_visible_ratio,
        }
    }

    pub fn from_config(config: &QualityConfig) -> Self {
        Self::new(config.min_visibility, config.min_visible_ratio)
    }

    /// フレームの可視ランドマーク比率 (0.0〜1.0)
    pub fn visible_ratio(&self, frame: &Frame) -> f32 {
        let visible = frame
            .landmarks
            .iter()
            .filter(|lm| lm.is_visible(self.min_visibility))
            .count();
        visible as f32 / LandmarkIndex::COUNT as f32
    }

    /// 品質条件を満たすフレームだけを残す
    ///
    /// 不完全なフレーム（長さ33以外）はここで落とす。
    pub fn filter(&self, frames: &[Frame]) -> Vec<Frame> {
        frames
            .iter()
            .filter(|frame| frame.is_complete() && self.visible_ratio(frame) >= self.min_visible_ratio)
            .cloned()
            .collect()
    }
}
