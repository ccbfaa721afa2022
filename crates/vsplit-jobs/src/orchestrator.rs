//! Job orchestrator.
//!
//! Owns job records and drives the planner → executor pipeline. Submission
//! fails fast: configuration, probe, planning and naming problems surface
//! before a job record exists. The processing loop runs as an independent
//! tokio task; callers learn progress only by polling `status`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use tokio::sync::watch;
use tracing::info;

use vsplit_media::MediaEngine;
use vsplit_models::{
    build_segment_specs, format_bytes, format_duration, plan_segments, Job, JobId, SegmentSpec,
    SplitConfig,
};

use crate::error::JobResult;
use crate::executor::SegmentExecutor;
use crate::logging::JobLogger;
use crate::settings::JobSettings;
use crate::store::JobStore;

type CancelMap = Arc<Mutex<HashMap<JobId, watch::Sender<bool>>>>;

/// Drives split jobs and answers status queries.
pub struct Orchestrator {
    engine: Arc<dyn MediaEngine>,
    store: Arc<JobStore>,
    cancels: CancelMap,
}

impl Orchestrator {
    /// Create an orchestrator backed by the given engine.
    pub fn new(engine: Arc<dyn MediaEngine>, settings: JobSettings) -> Self {
        Self {
            engine,
            store: Arc::new(JobStore::new(settings.max_retained_jobs)),
            cancels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validate, probe and plan a job, then start processing in the
    /// background. Returns the job id immediately.
    ///
    /// Any error here means the job was never created: structural problems
    /// are raised before partial work can exist.
    pub async fn submit(&self, config: SplitConfig) -> JobResult<JobId> {
        config.validate()?;

        let metadata = self.engine.probe(&config.source_path).await?;
        let ranges = plan_segments(metadata.duration, config.max_segment_secs)?;
        let date = Utc::now().format("%Y%m%d").to_string();
        let specs = build_segment_specs(&config, &ranges, &date)?;

        tokio::fs::create_dir_all(&config.output_dir).await?;

        info!(
            "Submitting split of {} ({}, {} segments of max {}s)",
            config.source_path.display(),
            format_duration(metadata.duration),
            specs.len(),
            config.max_segment_secs
        );
        // Output can run 1.5-2x the input when re-encoding; the estimate is
        // advisory only because bitrate reporting is unreliable for some
        // containers.
        if metadata.bitrate > 0 {
            let estimated = (metadata.duration * metadata.bitrate as f64 / 8.0 * 1.5) as u64;
            info!("Estimated output footprint: ~{}", format_bytes(estimated));
        }

        let job = Job::new(
            config.source_path.clone(),
            config.output_dir.clone(),
            specs.len() as u32,
        );
        let job_id = job.id.clone();
        self.store.insert(job);
        counter!("vsplit_jobs_submitted_total").increment(1);

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.cancels
            .lock()
            .expect("cancel map lock poisoned")
            .insert(job_id.clone(), cancel_tx);

        let engine = Arc::clone(&self.engine);
        let store = Arc::clone(&self.store);
        let cancels = Arc::clone(&self.cancels);
        let id = job_id.clone();
        tokio::spawn(async move {
            run_job(engine, store, config, specs, id, cancel_rx, cancels).await;
        });

        Ok(job_id)
    }

    /// Snapshot of a single job.
    pub fn status(&self, id: &JobId) -> Option<Job> {
        self.store.get(id)
    }

    /// Snapshots of all retained jobs, newest last.
    pub fn list(&self) -> Vec<Job> {
        self.store.list()
    }

    /// Request cooperative cancellation of a running job.
    ///
    /// The flag is checked between segments; an in-flight engine invocation
    /// is never interrupted. Returns false when the job is unknown or
    /// already terminal.
    pub fn cancel(&self, id: &JobId) -> bool {
        let cancels = self.cancels.lock().expect("cancel map lock poisoned");
        match cancels.get(id) {
            Some(tx) => tx.send(true).is_ok(),
            None => false,
        }
    }
}

/// Background processing loop for one job.
async fn run_job(
    engine: Arc<dyn MediaEngine>,
    store: Arc<JobStore>,
    config: SplitConfig,
    specs: Vec<SegmentSpec>,
    job_id: JobId,
    cancel_rx: watch::Receiver<bool>,
    cancels: CancelMap,
) {
    let logger = JobLogger::new(&job_id, "split");
    logger.log_start(&format!(
        "{} -> {} segments",
        config.source_path.display(),
        specs.len()
    ));

    let outcome = process_segments(&engine, &store, &config, &specs, &job_id, cancel_rx, &logger).await;

    match outcome {
        Ok(()) => {
            if let Some(job) = store.get(&job_id) {
                if let Err(e) = write_report(&config, &job).await {
                    logger.log_warning(&format!("Failed to write processing report: {}", e));
                }
            }
            store.update(&job_id, |job| job.complete());
            counter!("vsplit_jobs_completed_total").increment(1);
            logger.log_completion(&format!("{} segments produced", specs.len()));
        }
        Err(detail) => {
            store.update(&job_id, |job| job.fail(detail.clone()));
            counter!("vsplit_jobs_failed_total").increment(1);
            logger.log_error(&detail);
        }
    }

    cancels
        .lock()
        .expect("cancel map lock poisoned")
        .remove(&job_id);
}

/// Run every segment in order; the error carries the failure detail.
async fn process_segments(
    engine: &Arc<dyn MediaEngine>,
    store: &Arc<JobStore>,
    config: &SplitConfig,
    specs: &[SegmentSpec],
    job_id: &JobId,
    cancel_rx: watch::Receiver<bool>,
    logger: &JobLogger,
) -> Result<(), String> {
    let executor = SegmentExecutor::new(Arc::clone(engine), config.clone())
        .await
        .map_err(|e| format!("Failed to prepare executor: {}", e))?;

    store.update(job_id, |job| job.start());

    for spec in specs {
        // Cooperative cancellation, checked between segments only: killing
        // an engine invocation mid-write leaves a corrupt partial file.
        if *cancel_rx.borrow() {
            return Err(format!("Cancelled before segment {}", spec.index));
        }

        let started = Instant::now();
        match executor.execute(spec).await {
            Ok(path) => {
                histogram!("vsplit_segment_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                counter!("vsplit_segments_produced_total").increment(1);
                store.update(job_id, |job| job.record_segment(spec.file_name.clone()));
                logger.log_progress(&format!(
                    "Segment {}/{} -> {}",
                    spec.index,
                    specs.len(),
                    path.display()
                ));
            }
            Err(e) => {
                // Partial outputs already produced stay on disk and stay
                // listed; they are useful to the caller.
                let detail = match e.stderr() {
                    Some(stderr) if !stderr.trim().is_empty() => {
                        format!("Segment {} failed: {}: {}", spec.index, e, stderr.trim())
                    }
                    _ => format!("Segment {} failed: {}", spec.index, e),
                };
                return Err(detail);
            }
        }
    }

    Ok(())
}

/// Write a processing report next to the outputs.
async fn write_report(config: &SplitConfig, job: &Job) -> std::io::Result<()> {
    let mut report = String::new();
    report.push_str("VSplit - Processing Report\n");
    report.push_str(&"=".repeat(50));
    report.push_str("\n\n");
    report.push_str(&format!("Input file: {}\n", config.source_path.display()));
    report.push_str(&format!(
        "Processing date: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str(&format!("Number of segments: {}\n", job.output_files.len()));
    report.push_str(&format!(
        "Max segment length: {}s\n\n",
        config.max_segment_secs
    ));

    if let Some(intro) = &config.intro_path {
        report.push_str(&format!("Intro: {}\n", intro.display()));
    }
    if let Some(outro) = &config.outro_path {
        report.push_str(&format!("Outro: {}\n", outro.display()));
    }

    report.push_str("\nGenerated files:\n");
    for (i, name) in job.output_files.iter().enumerate() {
        report.push_str(&format!("{}. {}\n", i + 1, name));
    }

    let report_path = report_path(&config.output_dir);
    tokio::fs::write(&report_path, report).await?;
    info!("Report written: {}", report_path.display());
    Ok(())
}

/// Location of the per-job processing report.
pub fn report_path(output_dir: &Path) -> std::path::PathBuf {
    output_dir.join("processing_report.txt")
}
