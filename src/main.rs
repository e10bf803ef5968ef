use clap::Parser;
use json_extractor::core::report;
use json_extractor::utils::{logger, validation::Validate};
use json_extractor::{CliConfig, ExtractPipeline, ExtractorEngine, LocalStorage};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting json-extractor");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 沒有輸入檔時顯示說明
    if config.input.is_none() {
        println!("👆 Please provide a JSON file with --input to get started.");
        println!();
        println!("{}", report::EXPECTED_STRUCTURE);
        return Ok(());
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let preview_rows = config.preview_rows;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ExtractPipeline::new(storage, config);
    let engine = ExtractorEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run() {
        Ok(outcome) => {
            print!("{}", report::render_view(&outcome.view, preview_rows));
            if !outcome.written.is_empty() {
                println!();
                println!("📥 Exported files:");
                for path in &outcome.written {
                    println!("  {}", path);
                }
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
