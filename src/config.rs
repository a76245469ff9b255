use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// テンプレート品質の閾値
#[derive(Debug, Deserialize, Clone)]
pub struct QualityConfig {
    /// ランドマーク単位の可視度閾値
    #[serde(default = "default_min_visibility")]
    pub min_visibility: f32,
    /// フレーム採用に必要な可視ランドマーク比率
    #[serde(default = "default_min_visible_ratio")]
    pub min_visible_ratio: f32,
    /// テンプレート生成に必要な最小フレーム数
    #[serde(default = "default_min_frames")]
    pub min_frames: usize,
    /// テンプレート生成に使う最大フレーム数（超過分は切り捨て）
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    /// 安定度の許容ばらつき（助言表示のみに使用）
    #[serde(default = "default_stability_threshold")]
    pub stability_threshold: f32,
}

/// 類似度スコアの設定
#[derive(Debug, Deserialize, Clone)]
pub struct SimilarityConfig {
    /// ランドマークを採用する可視度ゲート（候補・テンプレート両側）
    #[serde(default = "default_visibility_gate")]
    pub visibility_gate: f32,
    /// 顔 (0〜10) の重み
    #[serde(default = "default_face_weight")]
    pub face_weight: f32,
    /// 上半身 (11〜22) の重み
    #[serde(default = "default_upper_body_weight")]
    pub upper_body_weight: f32,
    /// 下半身 (23〜32) の重み
    #[serde(default = "default_lower_body_weight")]
    pub lower_body_weight: f32,
}

/// 解析セッションの設定
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// 直近平均用スライディングウィンドウの容量（30fpsで約5秒）
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

/// 保存先ディレクトリ
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: String,
}

fn default_min_visibility() -> f32 { 0.7 }
fn default_min_visible_ratio() -> f32 { 0.8 }
fn default_min_frames() -> usize { 30 }
fn default_max_frames() -> usize { 300 }
fn default_stability_threshold() -> f32 { 0.05 }
fn default_visibility_gate() -> f32 { 0.5 }
fn default_face_weight() -> f32 { 0.3 }
fn default_upper_body_weight() -> f32 { 1.5 }
fn default_lower_body_weight() -> f32 { 2.0 }
fn default_buffer_capacity() -> usize { 150 }
fn default_templates_dir() -> String { "templates".to_string() }
fn default_sessions_dir() -> String { "sessions".to_string() }

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_visibility: default_min_visibility(),
            min_visible_ratio: default_min_visible_ratio(),
            min_frames: default_min_frames(),
            max_frames: default_max_frames(),
            stability_threshold: default_stability_threshold(),
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            visibility_gate: default_visibility_gate(),
            face_weight: default_face_weight(),
            upper_body_weight: default_upper_body_weight(),
            lower_body_weight: default_lower_body_weight(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            sessions_dir: default_sessions_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読み込み失敗時はデフォルト設定で続行
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.quality.min_visibility, 0.7);
        assert_eq!(config.quality.min_visible_ratio, 0.8);
        assert_eq!(config.quality.min_frames, 30);
        assert_eq!(config.quality.max_frames, 300);
        assert_eq!(config.similarity.visibility_gate, 0.5);
        assert_eq!(config.session.buffer_capacity, 150);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [quality]
            min_frames = 10

            [similarity]
            lower_body_weight = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(config.quality.min_frames, 10);
        assert_eq!(config.quality.min_visibility, 0.7);
        assert_eq!(config.similarity.lower_body_weight, 3.0);
        assert_eq!(config.similarity.face_weight, 0.3);
        assert_eq!(config.storage.templates_dir, "templates");
    }
}
