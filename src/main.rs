use anyhow::Result;
use std::io::{self, Write};

use kata_coach::analysis::{AnalysisResult, AnalysisSession, SimilarityTier};
use kata_coach::config::Config;
use kata_coach::recording::load_recording;
use kata_coach::store::{JsonDirStore, Store};
use kata_coach::template::{stability::is_stable, Template, TemplateBuilder};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Kata Coach - フォーム解析 ===");
    println!();
    println!("コマンド:");
    println!("  t <記録.json> <名前>   - 記録からテンプレート作成");
    println!("  l                      - テンプレート一覧");
    println!("  a <記録.json> <ID>     - テンプレートに対して解析");
    println!("  r <セッションID>       - 解析結果を表示");
    println!("  s                      - セッション一覧");
    println!("  d <セッションID>       - セッション削除");
    println!("  q                      - 終了");
    println!();

    let mut templates: JsonDirStore<Template> = JsonDirStore::new(&config.storage.templates_dir)?;
    let mut sessions: JsonDirStore<AnalysisResult> = JsonDirStore::new(&config.storage.sessions_dir)?;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let parts: Vec<&str> = input.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "t" if parts.len() >= 3 => {
                let name = parts[2..].join(" ");
                match create_template(&config, &mut templates, parts[1], &name) {
                    Ok(id) => println!("テンプレートID: {}", id),
                    Err(e) => println!("テンプレート作成失敗: {}", e),
                }
            }
            "l" => {
                let ids = templates.list_ids()?;
                if ids.is_empty() {
                    println!("テンプレートなし");
                }
                for id in ids {
                    let template = templates.get(&id)?;
                    println!(
                        "  {} - {} (安定度 {:.3}, 使用フレーム {})",
                        id,
                        template.name,
                        template.metadata.stability_score,
                        template.metadata.quality_frames_used
                    );
                }
            }
            "a" if parts.len() == 3 => {
                match analyze(&config, &templates, parts[1], parts[2]) {
                    Ok(result) => {
                        print_result(&result);
                        let id = result.session_id.clone();
                        sessions.insert(&id, result)?;
                        println!("保存しました: {}", id);
                    }
                    Err(e) => println!("解析失敗: {}", e),
                }
            }
            "r" if parts.len() == 2 => match sessions.get(parts[1]) {
                Ok(result) => print_result(&result),
                Err(e) => println!("{}", e),
            },
            "s" => {
                let ids = sessions.list_ids()?;
                if ids.is_empty() {
                    println!("セッションなし");
                }
                for id in ids {
                    println!("  {}", id);
                }
            }
            "d" if parts.len() == 2 => match sessions.delete(parts[1]) {
                Ok(()) => println!("削除しました"),
                Err(e) => println!("{}", e),
            },
            "q" => {
                println!("終了します");
                break;
            }
            _ => {
                println!("不明なコマンド: {}", parts[0]);
            }
        }
    }

    Ok(())
}

fn create_template(
    config: &Config,
    templates: &mut JsonDirStore<Template>,
    recording_path: &str,
    name: &str,
) -> Result<String> {
    let recording = load_recording(recording_path)?;
    let frames = recording.detected_frames();
    println!("記録: {}フレーム (検出 {})", recording.len(), frames.len());

    let template = TemplateBuilder::from_config(&config.quality).build(name, "", &frames)?;
    println!("安定度: {:.3}", template.metadata.stability_score);
    if !is_stable(
        template.metadata.stability_score,
        config.quality.stability_threshold,
    ) {
        println!("注意: ポーズが不安定です（記録し直しを推奨）");
    }

    Ok(templates.create(template)?)
}

fn analyze(
    config: &Config,
    templates: &JsonDirStore<Template>,
    recording_path: &str,
    template_id: &str,
) -> Result<AnalysisResult> {
    let template = templates.get(template_id)?;
    let recording = load_recording(recording_path)?;

    let mut session = AnalysisSession::new(template, config);
    for (i, observed) in recording.frames.iter().enumerate() {
        session.process(observed.as_ref());
        // ライブ表示の代わりに30フレームごとに直近平均を出す
        if (i + 1) % 30 == 0 {
            println!("  [{}] 直近平均: {:.1}%", i + 1, session.recent_average());
        }
    }

    Ok(session.finish())
}

fn print_result(result: &AnalysisResult) {
    println!();
    println!("=== 解析結果 ({}) ===", result.session_id);
    println!(
        "総合類似度: {:.1}% ({})",
        result.overall_similarity,
        SimilarityTier::of(result.overall_similarity).label()
    );
    println!(
        "フレーム: 全{} / 採点{}",
        result.total_frames,
        result.frame_similarities.len()
    );
    println!("解析時間: {:.1}秒", result.duration);
    for (label, list) in [
        ("critical", &result.joint_errors.critical),
        ("moderate", &result.joint_errors.moderate),
        ("minor", &result.joint_errors.minor),
    ] {
        if !list.is_empty() {
            println!("{} ({}件):", label, list.len());
            for msg in list.iter().take(5) {
                println!("  {}", msg);
            }
        }
    }
    println!("アドバイス:");
    for rec in &result.recommendations {
        println!("  - {}", rec);
    }
    println!();
}
