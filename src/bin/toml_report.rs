use clap::Parser;
use whois_report::config::toml_config::TomlConfig;
use whois_report::core::ConfigProvider;
use whois_report::domain::services::load_domains;
use whois_report::utils::{logger, validation::Validate};
use whois_report::{build_lookup, LocalStorage, ReportEngine, ReportError, WhoisPipeline};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "WHOIS report tool with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "whois-report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the drop delay from config
    #[arg(long, allow_negative_numbers = true)]
    drop_delay_days: Option<i64>,

    /// Dry run - list the domains that would be looked up without querying
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based WHOIS report tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(days) = args.drop_delay_days {
        config.report.drop_delay_days = Some(days);
        tracing::info!("🔧 Drop delay overridden to: {} days", days);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No lookups will be performed");
        if let Err(e) = perform_dry_run(&config).await {
            fail(&e);
        }
        return Ok(());
    }

    let lookup = match build_lookup(&config) {
        Ok(lookup) => lookup,
        Err(e) => fail(&e),
    };

    let pipeline = WhoisPipeline::new(LocalStorage::default(), config, lookup);
    let engine = ReportEngine::new(pipeline);

    let summary = match engine.run().await {
        Ok(summary) => summary,
        Err(e) => fail(&e),
    };

    match summary.output {
        Ok(path) => {
            println!("✅ Results saved to {}", path);
            println!(
                "📊 {} available, {} taken",
                summary.batch.available_count(),
                summary.batch.taken_count()
            );
        }
        Err(e) => {
            eprintln!(
                "⚠️ {} domains were processed but the report was not written",
                summary.batch.reports.len()
            );
            fail(&e);
        }
    }

    Ok(())
}

fn fail(e: &ReportError) -> ! {
    tracing::error!(
        "❌ WHOIS report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!(
        "  Output: {} ({:?})",
        config.output_path(),
        config.report_format()
    );
    println!("  Drop delay: {} days", config.drop_delay_days());
    println!("  Backend: {:?}", config.lookup_backend());
    println!("  Timeout: {}s", config.lookup_timeout().as_secs());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), ReportError> {
    let path = config.input_path();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReportError::InputError {
            path: path.to_string(),
            source,
        })?;

    let domains = load_domains(&content);

    println!("🔍 Dry Run Analysis:");
    println!("  {} domains would be looked up:", domains.len());
    for domain in &domains {
        println!("    {}", domain);
    }

    println!();
    println!("✅ Dry run complete. No WHOIS queries were sent.");
    Ok(())
}
