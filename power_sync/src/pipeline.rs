//! The fixed fetch, validate, transform, sync flow for one run.
//!
//! A run walks `Pending → Parameterized → Fetched → Validated → Transformed →
//! Synced`. The first failing stage stops the run: the state becomes `Failed`
//! and the cause comes back as a [`PipelineError`]. Nothing is degraded to an
//! empty result.

use std::{path::PathBuf, sync::Arc};

use generation_ingestor::{
    models::window::TimeWindow,
    providers::{GenerationProvider, ProviderInitError, elexon_rest::ElexonProvider},
};
use secrecy::SecretString;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::SyncConfig,
    destination::{StoreFactory, store_factory},
    errors::{FetchError, PersistenceError, PipelineError, ValidationError},
    quality::{DataValidator, QualityGate, write_report},
    transform::{DEFAULT_SOURCE_TAG, decode_records, transform},
    window::{RunTrigger, resolve},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Pending,
    Parameterized,
    Fetched,
    Validated,
    Transformed,
    Synced,
    Failed,
}

impl PipelineState {
    /// The state a successful stage moves to. `None` once terminal.
    pub fn next(self) -> Option<Self> {
        use PipelineState::*;
        match self {
            Pending => Some(Parameterized),
            Parameterized => Some(Fetched),
            Fetched => Some(Validated),
            Validated => Some(Transformed),
            Transformed => Some(Synced),
            Synced | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Synced | PipelineState::Failed)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub window: TimeWindow,
    pub records_fetched: usize,
    pub rows_synced: usize,
    /// Path of the JSON quality report, if one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_report: Option<PathBuf>,
    /// Every state the run passed through, `Pending` first.
    pub states: Vec<PipelineState>,
}

/// Stage outputs collected while a run is in flight.
#[derive(Default)]
struct RunProgress {
    states: Vec<PipelineState>,
    window: Option<TimeWindow>,
    records_fetched: usize,
    rows_synced: usize,
    quality_report: Option<PathBuf>,
}

impl RunProgress {
    fn new() -> Self {
        Self {
            states: vec![PipelineState::Pending],
            ..Self::default()
        }
    }

    fn current(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Pending)
    }

    fn advance(&mut self) {
        if let Some(next) = self.current().next() {
            tracing::debug!(state = ?next, "stage complete");
            self.states.push(next);
        }
    }

    fn fail(&mut self) {
        if !self.current().is_terminal() {
            self.states.push(PipelineState::Failed);
        }
    }
}

pub struct Pipeline {
    provider: Arc<dyn GenerationProvider + Send + Sync>,
    validator: Arc<dyn DataValidator + Send + Sync>,
    store_factory: StoreFactory,
    source_tag: String,
    report_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn GenerationProvider + Send + Sync>,
        validator: Arc<dyn DataValidator + Send + Sync>,
        store_factory: StoreFactory,
    ) -> Self {
        Self {
            provider,
            validator,
            store_factory,
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
            report_dir: None,
        }
    }

    pub fn with_source_tag(mut self, source_tag: impl Into<String>) -> Self {
        self.source_tag = source_tag.into();
        self
    }

    /// Write each run's quality report as JSON under `dir`.
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Production wiring: Elexon source, default quality gate, database from `database_url`.
    pub fn from_config(cfg: &SyncConfig, database_url: SecretString) -> Result<Self, ProviderInitError> {
        let provider = ElexonProvider::with_config(cfg.source.base_url.clone(), cfg.source.timeout())?;
        let validator = QualityGate::new(cfg.quality.rules());

        let mut pipeline = Self::new(Arc::new(provider), Arc::new(validator), store_factory(database_url))
            .with_source_tag(cfg.source.source_tag.clone());
        if let Some(dir) = &cfg.quality.report_dir {
            pipeline = pipeline.with_report_dir(dir.clone());
        }
        Ok(pipeline)
    }

    /// Executes one run end to end.
    pub async fn run(&self, trigger: &RunTrigger) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let mut progress = RunProgress::new();

        let outcome = self
            .execute(run_id, trigger, &mut progress)
            .instrument(tracing::info_span!("psr_sync_run", %run_id))
            .await;

        match outcome {
            Ok(window) => {
                tracing::info!(
                    %run_id,
                    %window,
                    records = progress.records_fetched,
                    rows = progress.rows_synced,
                    "run synced"
                );
                Ok(RunReport {
                    run_id,
                    window,
                    records_fetched: progress.records_fetched,
                    rows_synced: progress.rows_synced,
                    quality_report: progress.quality_report,
                    states: progress.states,
                })
            }
            Err(e) => {
                progress.fail();
                tracing::error!(
                    %run_id,
                    stage = e.stage(),
                    window = ?progress.window,
                    states = ?progress.states,
                    error = %e,
                    "run failed"
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        run_id: Uuid,
        trigger: &RunTrigger,
        progress: &mut RunProgress,
    ) -> Result<TimeWindow, PipelineError> {
        let window = resolve(trigger)?;
        progress.window = Some(window);
        tracing::info!(%window, "parameters resolved");
        progress.advance();

        let records = self
            .provider
            .fetch_generation(&window)
            .await
            .map_err(FetchError::from)?;
        if records.is_empty() {
            return Err(FetchError::Empty { window }.into());
        }
        progress.records_fetched = records.len();
        progress.advance();

        let report = self.validator.validate(&records);
        if let Some(dir) = &self.report_dir {
            match write_report(dir, &window, run_id, &report).await {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "quality report written");
                    progress.quality_report = Some(path);
                }
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "could not write quality report"),
            }
        }
        if !report.passed {
            return Err(ValidationError::Failed(Box::new(report)).into());
        }
        progress.advance();

        let typed = decode_records(&records)?;
        let rows = transform(&self.source_tag, &typed);
        progress.advance();

        let factory = Arc::clone(&self.store_factory);
        let synced = tokio::task::spawn_blocking(move || -> Result<usize, PersistenceError> {
            let mut store = factory()?;
            store.ensure_schema()?;
            store.upsert(&rows)
        })
        .await
        .map_err(|e| PersistenceError::Task(e.to_string()))??;
        progress.rows_synced = synced;
        progress.advance();

        Ok(window)
    }
}
