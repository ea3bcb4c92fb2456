use crate::core::{Pipeline, ReportBatch};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Utc};

/// Outcome of a run whose input was readable. The computed rows are kept
/// even when persisting them failed, so the write can be retried.
#[derive(Debug)]
pub struct RunSummary {
    pub batch: ReportBatch,
    pub output: std::result::Result<String, ReportError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.output.is_ok()
    }
}

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs with the current time, read once for the whole batch.
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(Utc::now()).await
    }

    /// Only an unreadable input fails the run.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        tracing::info!("Starting WHOIS report run");

        // Extract
        let domains = self.pipeline.extract().await?;

        // Transform
        let batch = self.pipeline.transform(domains, now).await?;
        tracing::info!(
            "Processed {} domains ({} available, {} taken)",
            batch.reports.len(),
            batch.available_count(),
            batch.taken_count()
        );

        // Load
        let output = self.write(&batch).await;

        Ok(RunSummary { batch, output })
    }

    pub async fn write(&self, batch: &ReportBatch) -> Result<String> {
        match self.pipeline.load(batch).await {
            Ok(path) => {
                tracing::info!("Results saved to {}", path);
                Ok(path)
            }
            Err(e) => {
                tracing::error!(
                    "Saving results failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                Err(e)
            }
        }
    }
}
