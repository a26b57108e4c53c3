use clap::Parser;
use swapi_etl::config::toml_config::TomlConfig;
use swapi_etl::core::ConfigProvider;
use swapi_etl::utils::{logger, validation::Validate};
use swapi_etl::{EtlEngine, LocalStorage, SwapiPipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "swapi-etl driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "swapi-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override how many characters are ranked
    #[arg(long)]
    top_n: Option<usize>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    logger::init_logger(args.verbose, config.log_level(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(top_n) = args.top_n {
        config.rank.top_n = top_n;
        tracing::info!("🔧 top_n overridden to: {}", top_n);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SwapiPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", summary.artifact_path);
            if let Some(response) = summary.publish {
                println!("📤 Upload status: {}", response.status);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("🎬 Films: {}", config.films_endpoint());
    tracing::info!(
        "🔢 Top {} characters, {} concurrent lookups, {}s timeout",
        config.top_n(),
        config.concurrent_requests(),
        config.timeout_seconds()
    );
    tracing::info!(
        "💾 Output: {}/{}",
        config.output_path(),
        config.artifact_name()
    );
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry run for pipeline '{}'", config.pipeline.name);
    println!("  1. GET {} (following pagination)", config.films_endpoint());
    println!(
        "  2. Look up the top {} characters and their species",
        config.top_n()
    );
    match config.species_fallback() {
        Some(fallback) => println!("     characters without species become '{}'", fallback),
        None => println!("     characters without species abort the run"),
    }
    println!(
        "  3. Write {}/{}",
        config.output_path(),
        config.artifact_name()
    );
    if let Some(snapshot) = config.snapshot_name() {
        println!("     plus records snapshot {}", snapshot);
    }
    if config.publish_enabled() {
        println!(
            "  4. POST multipart field '{}' to {}",
            config.upload_field(),
            config.upload_endpoint()
        );
    } else {
        println!("  4. Publishing disabled");
    }
}
