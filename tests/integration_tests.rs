use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use whois_report::adapters::whois::WhoisClient;
use whois_report::{CliConfig, LocalStorage, ReportEngine, ReportError, WhoisPipeline};

const REGISTERED_ANSWER: &str = "Domain Name: OLD-SITE.COM\r\n\
Creation Date: 2019-01-01T00:00:00Z\r\n\
Registry Expiry Date: 2030-01-01T00:00:00Z\r\n";

const LAPSED_ANSWER: &str = "Domain Name: LAPSED.NET\r\n\
Creation Date: 2015-06-15T12:00:00Z\r\n\
Registry Expiry Date: 2023-12-01T00:00:00Z\r\n";

const FREE_ANSWER: &str = "No match for \"FREE-NAME.ORG\".\r\n";

/// Answers each WHOIS query from `answers`, keyed by the queried name.
async fn spawn_whois_server(answers: HashMap<&'static str, &'static str>) -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let mut reader = BufReader::new(socket);
            let mut line = String::new();
            if reader.read_line(&mut line).await.is_err() {
                continue;
            }
            let answer = answers
                .get(line.trim().to_lowercase().as_str())
                .copied()
                .unwrap_or(FREE_ANSWER);
            let mut socket = reader.into_inner();
            let _ = socket.write_all(answer.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(port)
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn cli_config(input: &str, output: &str) -> CliConfig {
    CliConfig::parse_from(["whois-report", "--input", input, "--output", output])
}

async fn write_domain_list(dir: &TempDir) -> Result<String> {
    let path = dir.path().join("domains.txt");
    tokio::fs::write(&path, "old-site.com\n\n  lapsed.net  \nfree-name.org\n   \n").await?;
    Ok(path.to_string_lossy().into_owned())
}

fn answers() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("old-site.com", REGISTERED_ANSWER),
        ("lapsed.net", LAPSED_ANSWER),
        ("free-name.org", FREE_ANSWER),
    ])
}

#[tokio::test]
async fn test_end_to_end_csv_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_domain_list(&temp_dir).await?;
    let output = temp_dir.path().join("reports/whois.csv");
    let port = spawn_whois_server(answers()).await?;

    let lookup = WhoisClient::new(Duration::from_secs(5))
        .with_server("127.0.0.1")
        .with_port(port);
    let config = cli_config(&input, &output.to_string_lossy());
    let pipeline = WhoisPipeline::new(LocalStorage::default(), config, lookup);
    let engine = ReportEngine::new(pipeline);

    let summary = engine.run_at(fixed_now()).await?;

    assert!(summary.is_success());
    assert_eq!(summary.batch.reports.len(), 3);
    assert_eq!(summary.batch.available_count(), 2);
    assert_eq!(summary.batch.taken_count(), 1);

    let mut reader = csv::Reader::from_path(&output)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(
        headers,
        vec![
            "Domain",
            "Registration Date",
            "Expiration Date",
            "Expires In",
            "Domain Age (days)",
            "Drop Release Estimate",
            "Status",
        ]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<_, _>>()?;

    assert_eq!(
        rows[0],
        vec![
            "old-site.com",
            "2019-01-01",
            "2030-01-01",
            "in 2192 days",
            "1826",
            "in 2222 days",
            "taken",
        ]
    );
    assert_eq!(
        rows[1],
        vec![
            "lapsed.net",
            "2015-06-15",
            "2023-12-01",
            "31 days ago",
            "3121",
            "already free",
            "available",
        ]
    );
    assert_eq!(
        rows[2],
        vec![
            "free-name.org",
            "unknown",
            "unknown",
            "unknown",
            "unknown",
            "unknown",
            "available",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_xlsx_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_domain_list(&temp_dir).await?;
    let output = temp_dir.path().join("whois_results.xlsx");
    let port = spawn_whois_server(answers()).await?;

    let lookup = WhoisClient::new(Duration::from_secs(5))
        .with_server("127.0.0.1")
        .with_port(port);
    let config = cli_config(&input, &output.to_string_lossy());
    let engine = ReportEngine::new(WhoisPipeline::new(LocalStorage::default(), config, lookup));

    let summary = engine.run_at(fixed_now()).await?;
    assert!(summary.is_success());

    let data = std::fs::read(&output)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;

    let mut workbook = String::new();
    archive
        .by_name("xl/workbook.xml")?
        .read_to_string(&mut workbook)?;
    assert!(workbook.contains("name=\"WHOIS\""));

    let mut strings = String::new();
    archive
        .by_name("xl/sharedStrings.xml")?
        .read_to_string(&mut strings)?;
    assert!(strings.contains("Domain Age (days)"));
    assert!(strings.contains("old-site.com"));
    assert!(strings.contains("already free"));
    assert!(strings.contains("unknown"));

    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")?
        .read_to_string(&mut sheet)?;
    assert!(sheet.contains("<v>1826</v>"));

    Ok(())
}

#[tokio::test]
async fn test_missing_input_aborts_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("missing.txt");
    let output = temp_dir.path().join("whois_results.xlsx");

    let config = cli_config(&input.to_string_lossy(), &output.to_string_lossy());
    let lookup = WhoisClient::new(Duration::from_secs(1)).with_server("127.0.0.1");
    let engine = ReportEngine::new(WhoisPipeline::new(LocalStorage::default(), config, lookup));

    let err = engine.run_at(fixed_now()).await.unwrap_err();

    assert!(matches!(err, ReportError::InputError { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!output.exists());

    Ok(())
}

#[tokio::test]
async fn test_write_failure_keeps_computed_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_domain_list(&temp_dir).await?;
    // A directory where the report file should go
    let output = temp_dir.path().join("blocked.xlsx");
    std::fs::create_dir(&output)?;
    let port = spawn_whois_server(answers()).await?;

    let lookup = WhoisClient::new(Duration::from_secs(5))
        .with_server("127.0.0.1")
        .with_port(port);
    let config = cli_config(&input, &output.to_string_lossy());
    let engine = ReportEngine::new(WhoisPipeline::new(LocalStorage::default(), config, lookup));

    let summary = engine.run_at(fixed_now()).await?;

    assert!(!summary.is_success());
    let err = summary.output.as_ref().unwrap_err();
    assert!(matches!(err, ReportError::WriteError { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(summary.batch.reports.len(), 3);
    assert_eq!(summary.batch.reports[0].age_in_days, Some(1826));

    Ok(())
}

#[tokio::test]
async fn test_unresponsive_server_yields_unknown_row() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("domains.txt");
    tokio::fs::write(&input, "slow-registry.com\n").await?;
    let output = temp_dir.path().join("out.csv");

    let lookup = WhoisClient::new(Duration::from_millis(200))
        .with_server("127.0.0.1")
        .with_port(port);
    let config = cli_config(&input.to_string_lossy(), &output.to_string_lossy());
    let engine = ReportEngine::new(WhoisPipeline::new(LocalStorage::default(), config, lookup));

    let summary = engine.run_at(fixed_now()).await?;

    assert!(summary.is_success());
    let row = summary.batch.reports[0].text_row();
    assert_eq!(row[0], "slow-registry.com");
    assert!(row[1..6].iter().all(|cell| cell == "unknown"));
    assert_eq!(row[6], "available");

    Ok(())
}

#[tokio::test]
async fn test_empty_input_writes_header_only() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("domains.txt");
    tokio::fs::write(&input, "\n  \n").await?;
    let output = temp_dir.path().join("out.csv");

    let lookup = WhoisClient::new(Duration::from_secs(1)).with_server("127.0.0.1");
    let config = cli_config(&input.to_string_lossy(), &output.to_string_lossy());
    let engine = ReportEngine::new(WhoisPipeline::new(LocalStorage::default(), config, lookup));

    let summary = engine.run_at(fixed_now()).await?;

    assert!(summary.is_success());
    assert!(summary.batch.reports.is_empty());
    let content = std::fs::read_to_string(&output)?;
    assert_eq!(content.lines().count(), 1);

    Ok(())
}
