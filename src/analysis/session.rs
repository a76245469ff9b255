use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::analysis::joints::JointErrors;

/// 直近スコアのスライディングウィンドウ（ライブ表示専用）
///
/// 容量を超えたら先頭から捨てる。セッション終了時に破棄され、
/// 永続化されるのは全フレームのスコア列のほう。
#[derive(Debug)]
pub struct SimilarityWindow {
    buffer: VecDeque<f32>,
    capacity: usize,
}

impl SimilarityWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, score: f32) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(score);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// ウィンドウ内の平均（空なら 0.0）
    pub fn average(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.buffer.iter().sum::<f32>() / self.buffer.len() as f32
    }
}

/// セッション中のフレームスコアを集計する
///
/// 全スコア列（永続化対象）とライブ表示用ウィンドウを別々に持つ。
/// フレームは時系列順に push される前提。
#[derive(Debug)]
pub struct SessionAggregator {
    scores: Vec<f32>,
    window: SimilarityWindow,
}

impl SessionAggregator {
    pub fn new(window_capacity: usize) -> Self {
        Self {
            scores: Vec::new(),
            window: SimilarityWindow::new(window_capacity),
        }
    }

    pub fn push(&mut self, score: f32) {
        self.scores.push(score);
        self.window.push(score);
    }

    pub fn scored_frames(&self) -> usize {
        self.scores.len()
    }

    /// ライブ表示用の直近平均
    pub fn recent_average(&self) -> f32 {
        self.window.average()
    }

    /// 全スコア列の統計。0フレームなら全て 0.0（エラーではない）
    pub fn summary(&self) -> SessionStats {
        if self.scores.is_empty() {
            return SessionStats::default();
        }
        let mean = self.scores.iter().sum::<f32>() / self.scores.len() as f32;
        let max = self.scores.iter().cloned().fold(f32::MIN, f32::max);
        let min = self.scores.iter().cloned().fold(f32::MAX, f32::min);
        SessionStats { mean, max, min }
    }

    pub fn into_scores(self) -> Vec<f32> {
        self.scores
    }
}

/// セッション全体の統計値
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub mean: f32,
    pub max: f32,
    pub min: f32,
}

/// 1解析セッションの最終結果（生成後は不変、IDで参照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub session_id: String,
    pub overall_similarity: f32,
    pub frame_similarities: Vec<f32>,
    pub joint_errors: JointErrors,
    pub recommendations: Vec<String>,
    /// 解析時間（秒）
    pub duration: f64,
    pub total_frames: usize,
}
