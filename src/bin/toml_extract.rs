use clap::Parser;
use json_extractor::core::{report, ConfigProvider};
use json_extractor::utils::{logger, validation::Validate};
use json_extractor::{ExtractPipeline, ExtractorEngine, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-extract")]
#[command(about = "JSON extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "extract-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the input file from config
    #[arg(short, long)]
    input: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, config.log_json());

    tracing::info!("🚀 Starting TOML-based extraction");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.input.path = Some(input);
    }

    if config.input_path().is_none() {
        eprintln!("❌ No input file configured. Set [input] path or pass --input.");
        println!("{}", report::EXPECTED_STRUCTURE);
        std::process::exit(1);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        config.export.enabled = false;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let preview_rows = config.preview_rows();

    let storage = LocalStorage::new(config.output_path().to_string());
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path().unwrap_or("-"));

    if config.select_all_fields() && config.selected_fields().is_empty() {
        println!("  Fields: all");
    } else {
        println!("  Fields: {}", config.selected_fields().join(", "));
    }

    if config.duplicate_keys().is_empty() {
        println!("  Duplicate Check: off");
    } else {
        println!("  Duplicate Check: {}", config.duplicate_keys().join(" - "));
    }

    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.export_formats().join(", "));
    println!("  Contexts: {}", config.export_contexts().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
