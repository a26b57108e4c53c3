use clap::Parser;
use swapi_etl::utils::error::EtlError;
use swapi_etl::utils::{logger, validation::Validate};
use swapi_etl::{CliConfig, EtlEngine, LocalStorage, RunSummary, SwapiPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(config.verbose, None, config.json_logs);

    tracing::info!("Starting swapi-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
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

    match run(config, monitor_enabled).await {
        Ok(summary) => report_success(&summary),
        Err(e) => exit_with(e),
    }
}

async fn run(config: CliConfig, monitor_enabled: bool) -> swapi_etl::Result<RunSummary> {
    let records_input = config.records_input.clone();
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SwapiPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match records_input {
        Some(path) => {
            tracing::info!("📁 Loading records from: {}", path);
            let content = tokio::fs::read(&path).await?;
            let values: Vec<serde_json::Value> = serde_json::from_slice(&content)?;
            engine.replay(values).await
        }
        None => engine.run().await,
    }
}

fn report_success(summary: &RunSummary) {
    tracing::info!("✅ ETL process completed successfully!");
    tracing::info!("📁 Output saved to: {}", summary.artifact_path);
    println!("✅ ETL process completed successfully!");
    println!("📁 Output saved to: {}", summary.artifact_path);

    for record in &summary.records {
        println!(
            "   {:<20} {:<16} {:>4}cm  {} films",
            record.name, record.species, record.height, record.appearances
        );
    }

    if let Some(response) = &summary.publish {
        println!("📤 Upload status: {}", response.status);
        println!("{}", response.body);
    }
}

fn exit_with(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
