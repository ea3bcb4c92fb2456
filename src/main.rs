use clap::Parser;
use whois_report::core::engine::RunSummary;
use whois_report::utils::{logger, validation::Validate};
use whois_report::{build_lookup, CliConfig, LocalStorage, ReportEngine, ReportError, WhoisPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting whois-report CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e, "Configuration validation failed");
    }

    let lookup = match build_lookup(&config) {
        Ok(lookup) => lookup,
        Err(e) => fail(&e, "Lookup backend setup failed"),
    };

    // 創建存儲和管道
    let pipeline = WhoisPipeline::new(LocalStorage::default(), config, lookup);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => report_outcome(summary),
        Err(e) => fail(&e, "WHOIS report run failed"),
    }

    Ok(())
}

fn report_outcome(summary: RunSummary) {
    match summary.output {
        Ok(path) => {
            println!("✅ Results saved to {}", path);
            println!(
                "📊 {} domains: {} available, {} taken",
                summary.batch.reports.len(),
                summary.batch.available_count(),
                summary.batch.taken_count()
            );
        }
        Err(e) => {
            // 結果已計算完成，只有寫入失敗
            eprintln!(
                "⚠️ {} domains were processed but the report was not written",
                summary.batch.reports.len()
            );
            fail(&e, "Saving results failed");
        }
    }
}

fn fail(e: &ReportError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.exit_code());
}
