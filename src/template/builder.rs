use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::QualityConfig;
use crate::error::TemplateError;
use crate::pose::{Frame, Landmark, LandmarkIndex};
use crate::template::filter::QualityFilter;
use crate::template::stability::stability_score;

/// テンプレート生成時の品質メタデータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// キャプチャされた総フレーム数（フィルタ前）
    pub frames_captured: usize,
    /// 実際に平均化に使ったフレーム数（フィルタ後）
    pub quality_frames_used: usize,
    /// 平均化後ランドマークの平均可視度
    pub average_visibility: f32,
    /// 姿勢安定度 (0.0〜1.0)
    pub stability_score: f32,
}

/// 基準ポーズテンプレート
///
/// 1回のキャプチャセッションから生成され、以後不変。
/// 識別子はストアが生成する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub landmarks: Frame,
    pub metadata: TemplateMetadata,
}

/// キャプチャ列からテンプレートを構築する
pub struct TemplateBuilder {
    filter: QualityFilter,
    min_frames: usize,
    max_frames: usize,
}

impl TemplateBuilder {
    pub fn new(filter: QualityFilter, min_frames: usize, max_frames: usize) -> Self {
        Self {
            filter,
            min_frames,
            max_frames,
        }
    }

    pub fn from_config(config: &QualityConfig) -> Self {
        Self::new(
            QualityFilter::from_config(config),
            config.min_frames,
            config.max_frames,
        )
    }

    /// キャプチャ列を品質フィルタ → 安定度算出 → 可視度加重平均の順で
    /// 1枚の基準フレームにまとめる
    ///
    /// 品質フレームが min_frames 未満なら InsufficientData。
    /// max_frames を超えた分は先頭 max_frames 枚に切り詰める
    /// （キャプチャ側のフレーム上限と同じ扱い）。
    pub fn build(
        &self,
        name: &str,
        description: &str,
        captured: &[Frame],
    ) -> Result<Template, TemplateError> {
        let frames_captured = captured.len();
        let mut quality = self.filter.filter(captured);

        if quality.len() < self.min_frames {
            return Err(TemplateError::InsufficientData {
                got: quality.len(),
                need: self.min_frames,
            });
        }
        if quality.len() > self.max_frames {
            warn!(
                quality_frames = quality.len(),
                max_frames = self.max_frames,
                "truncating capture to max_frames"
            );
            quality.truncate(self.max_frames);
        }

        let stability = stability_score(&quality);
        let landmarks = weighted_average(&quality);
        let average_visibility = landmarks.average_visibility();

        Ok(Template {
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            landmarks,
            metadata: TemplateMetadata {
                frames_captured,
                quality_frames_used: quality.len(),
                average_visibility,
                stability_score: stability,
            },
        })
    }
}

/// ランドマーク単位の可視度加重平均
///
/// 重みはそのフレームでの可視度を正規化したもの。可視度合計が 0 の
/// ランドマークは一様重みにフォールバック。静止ポーズの揺れは小さい
/// 前提で軸ごとの線形平均（クォータニオン等は使わない）。
fn weighted_average(frames: &[Frame]) -> Frame {
    let mut averaged = Vec::with_capacity(LandmarkIndex::COUNT);
    let n = frames.len() as f32;

    for landmark_idx in 0..LandmarkIndex::COUNT {
        let total_visibility: f32 = frames
            .iter()
            .map(|frame| frame.landmarks[landmark_idx].visibility)
            .sum();

        let mut x = 0.0;
        let mut y = 0.0;
        let mut z = 0.0;
        let mut visibility = 0.0;
        for frame in frames {
            let lm = &frame.landmarks[landmark_idx];
            let weight = if total_visibility > 0.0 {
                lm.visibility / total_visibility
            } else {
                1.0 / n
            };
            x += lm.x * weight;
            y += lm.y * weight;
            z += lm.z * weight;
            visibility += lm.visibility * weight;
        }
        averaged.push(Landmark::new(x, y, z, visibility));
    }

    Frame::new(averaged)
}
