use tracing::warn;

use crate::config::SimilarityConfig;
use crate::pose::{BodyRegion, Frame};

/// 身体部位ごとの重み
///
/// 運動フォームでは下半身ほど重要なので重みを大きくする。
#[derive(Debug, Clone, Copy)]
pub struct RegionWeights {
    pub face: f32,
    pub upper_body: f32,
    pub lower_body: f32,
}

impl RegionWeights {
    pub fn weight(&self, region: BodyRegion) -> f32 {
        match region {
            BodyRegion::Face => self.face,
            BodyRegion::UpperBody => self.upper_body,
            BodyRegion::LowerBody => self.lower_body,
        }
    }
}

impl Default for RegionWeights {
    fn default() -> Self {
        Self {
            face: 0.3,
            upper_body: 1.5,
            lower_body: 2.0,
        }
    }
}

/// 候補フレームとテンプレートの重み付き類似度スコアラ
pub struct SimilarityScorer {
    visibility_gate: f32,
    weights: RegionWeights,
}

impl SimilarityScorer {
    pub fn new(visibility_gate: f32, weights: RegionWeights) -> Self {
        Self {
            visibility_gate,
            weights,
        }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(
            config.visibility_gate,
            RegionWeights {
                face: config.face_weight,
                upper_body: config.upper_body_weight,
                lower_body: config.lower_body_weight,
            },
        )
    }

    /// 類似度スコア (0.0〜100.0)
    ///
    /// ランドマークごとに 3D 距離 d から s = max(0, 1-d) を求め、
    /// 部位重みで加重平均して 100 倍する。可視度ゲートは候補・
    /// テンプレートの両側に適用する（一貫ポリシー）。
    ///
    /// 長さ不一致および 33 以外の長さは上流の契約違反として 0.0
    /// （警告ログのみ、エラーにはしない）。ゲートを通過した
    /// ランドマークが1つもない場合も定義済みの縮退結果として 0.0。
    pub fn score(&self, candidate: &Frame, template: &Frame) -> f32 {
        if candidate.len() != template.len() || !candidate.is_complete() {
            warn!(
                candidate_len = candidate.len(),
                template_len = template.len(),
                "frame length mismatch, similarity is 0"
            );
            return 0.0;
        }

        let mut total_similarity = 0.0;
        let mut total_weight = 0.0;

        for (i, (cand, tmpl)) in candidate
            .landmarks
            .iter()
            .zip(template.landmarks.iter())
            .enumerate()
        {
            if !cand.is_visible(self.visibility_gate) || !tmpl.is_visible(self.visibility_gate) {
                continue;
            }

            let weight = self.weights.weight(BodyRegion::of(i));
            let similarity = (1.0 - cand.distance_to(tmpl)).max(0.0);
            total_similarity += similarity * weight;
            total_weight += weight;
        }

        if total_weight > 0.0 {
            total_similarity / total_weight * 100.0
        } else {
            0.0
        }
    }
}

/// 表示用の類似度ランク（判定には使わない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityTier {
    Excellent,
    Good,
    NeedsWork,
    Poor,
}

impl SimilarityTier {
    pub fn of(similarity: f32) -> Self {
        if similarity >= 85.0 {
            Self::Excellent
        } else if similarity >= 70.0 {
            Self::Good
        } else if similarity >= 50.0 {
            Self::NeedsWork
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsWork => "needs work",
            Self::Poor => "poor",
        }
    }
}
