pub mod feedback;
pub mod joints;
pub mod session;
pub mod similarity;

pub use joints::{analyze_joint_angles, joint_angle, JointErrors, JointType};
pub use session::{AnalysisResult, SessionAggregator, SimilarityWindow};
pub use similarity::{RegionWeights, SimilarityScorer, SimilarityTier};

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::pose::Frame;
use crate::template::Template;

/// 1フレーム分の採点結果
#[derive(Debug, Clone)]
pub struct FrameScore {
    pub similarity: f32,
    pub joint_errors: JointErrors,
}

/// 候補フレームをテンプレートに対して採点する
pub struct Analyzer {
    scorer: SimilarityScorer,
}

impl Analyzer {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self { scorer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(SimilarityScorer::from_config(&config.similarity))
    }

    /// 類似度と関節角度偏差をまとめて計算する
    pub fn score_frame(&self, candidate: &Frame, template: &Frame) -> FrameScore {
        FrameScore {
            similarity: self.scorer.score(candidate, template),
            joint_errors: joints::analyze_joint_angles(candidate, template),
        }
    }
}

/// 1回の解析セッション
///
/// フレームは時系列順に1枚ずつ処理する（ウィンドウと統計が順序
/// 依存のため）。セッション間に共有可変状態はなく、テンプレートと
/// 設定テーブルは読み取り専用。フレーム境界でいつ打ち切っても
/// 部分結果は壊れない。
pub struct AnalysisSession {
    template: Template,
    analyzer: Analyzer,
    aggregator: SessionAggregator,
    joint_errors: JointErrors,
    started_at: DateTime<Utc>,
    total_frames: usize,
}

impl AnalysisSession {
    pub fn new(template: Template, config: &Config) -> Self {
        Self {
            template,
            analyzer: Analyzer::from_config(config),
            aggregator: SessionAggregator::new(config.session.buffer_capacity),
            joint_errors: JointErrors::default(),
            started_at: Utc::now(),
            total_frames: 0,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// 1観測分を処理する
    ///
    /// `None` はポーズ未検出の瞬間（採点せずフレーム数だけ数える）。
    /// 破損フレーム（非有限値）は警告ログを出してスキップし、
    /// セッション全体は継続する。
    pub fn process(&mut self, observed: Option<&Frame>) -> Option<FrameScore> {
        self.total_frames += 1;
        let frame = observed?;
        if !frame.is_finite() {
            warn!(frame = self.total_frames, "skipping corrupt frame");
            return None;
        }

        let score = self.analyzer.score_frame(frame, &self.template.landmarks);
        self.aggregator.push(score.similarity);
        self.joint_errors.extend(&score.joint_errors);
        Some(score)
    }

    /// ライブ表示用の直近平均
    pub fn recent_average(&self) -> f32 {
        self.aggregator.recent_average()
    }

    pub fn stats(&self) -> session::SessionStats {
        self.aggregator.summary()
    }

    /// セッションを確定して最終結果を作る
    ///
    /// 0フレームのセッションも定義済みのゼロ値サマリになる。
    pub fn finish(self) -> AnalysisResult {
        let stats = self.aggregator.summary();
        let recommendations = feedback::recommendations(stats.mean, &self.joint_errors);
        let duration = (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0;

        AnalysisResult {
            session_id: Uuid::new_v4().to_string(),
            overall_similarity: stats.mean,
            frame_similarities: self.aggregator.into_scores(),
            joint_errors: self.joint_errors,
            recommendations,
            duration,
            total_frames: self.total_frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LandmarkIndex};
    use crate::template::TemplateBuilder;

    fn full_frame(x: f32) -> Frame {
        Frame::new(vec![Landmark::new(x, 0.5, 0.0, 1.0); LandmarkIndex::COUNT])
    }

    fn template_from_identical_frames() -> Template {
        let frames = vec![full_frame(0.5); 40];
        TemplateBuilder::from_config(&Config::default().quality)
            .build("squat", "", &frames)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_perfect_session() {
        let config = Config::default();
        let template = template_from_identical_frames();
        let mut session = AnalysisSession::new(template, &config);

        for _ in 0..20 {
            let score = session.process(Some(&full_frame(0.5))).unwrap();
            assert!((score.similarity - 100.0).abs() < 1e-4);
        }
        assert!((session.recent_average() - 100.0).abs() < 1e-4);

        let result = session.finish();
        assert_eq!(result.total_frames, 20);
        assert_eq!(result.frame_similarities.len(), 20);
        assert!((result.overall_similarity - 100.0).abs() < 1e-4);
        assert!(result.joint_errors.is_empty());
        assert!(result.recommendations[0].contains("Excellent form"));
    }

    #[test]
    fn test_undetected_instants_count_frames_but_not_scores() {
        let config = Config::default();
        let mut session = AnalysisSession::new(template_from_identical_frames(), &config);
        session.process(None);
        session.process(Some(&full_frame(0.5)));
        session.process(None);

        let result = session.finish();
        assert_eq!(result.total_frames, 3);
        assert_eq!(result.frame_similarities.len(), 1);
    }

    #[test]
    fn test_corrupt_frame_is_skipped_not_fatal() {
        let config = Config::default();
        let mut session = AnalysisSession::new(template_from_identical_frames(), &config);
        let mut corrupt = full_frame(0.5);
        corrupt.landmarks[3].y = f32::NAN;

        assert!(session.process(Some(&corrupt)).is_none());
        assert!(session.process(Some(&full_frame(0.5))).is_some());

        let result = session.finish();
        assert_eq!(result.total_frames, 2);
        assert_eq!(result.frame_similarities.len(), 1);
    }

    #[test]
    fn test_empty_session_has_defined_zero_result() {
        let config = Config::default();
        let session = AnalysisSession::new(template_from_identical_frames(), &config);
        let result = session.finish();
        assert_eq!(result.total_frames, 0);
        assert_eq!(result.overall_similarity, 0.0);
        assert!(result.frame_similarities.is_empty());
        // 0点でも推奨文は決定的に生成される
        assert!(result.recommendations[0].contains("significant improvement"));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let config = Config::default();
        let template = template_from_identical_frames();
        let a = AnalysisSession::new(template.clone(), &config).finish();
        let b = AnalysisSession::new(template, &config).finish();
        assert_ne!(a.session_id, b.session_id);
    }
}
