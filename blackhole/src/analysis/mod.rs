//! Single-file analysis on the background event loop.
//!
//! The UI thread submits one file at a time. The analysis function runs on
//! the backend thread and replies exactly once; the plot function then runs
//! on the UI thread when [`FileAnalyzer::try_update`] picks up the reply.

pub mod builtin;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread::JoinHandle;

use blackhole_runtime::backend::{BackendEventLoop, BackendLink, BackendState, RequestSender};
use blackhole_runtime::frontend::{BackgroundTask, TaskStatus};

use crate::control::ParamValue;
use crate::figure::Figure;

/// Named results of an analysis.
pub type ResultMap = serde_json::Map<String, ParamValue>;

/// Status message and results, or the reason the analysis failed.
pub type AnalysisOutcome = Result<(String, ResultMap), String>;

pub type AnalysisFn = Arc<dyn Fn(&Path) -> AnalysisOutcome + Send + Sync>;
pub type PlotFn = Box<dyn Fn(&ResultMap, &Path) -> Result<Vec<Figure>, String>>;

pub type AnalysisSender = RequestSender<AnalysisBackend>;

#[derive(Debug, Default)]
pub struct AnalysisBackend {
    jobs_run: usize,
}

impl BackendState for AnalysisBackend {}

impl AnalysisBackend {
    pub fn jobs_run(&self) -> usize {
        self.jobs_run
    }
}

/// Start the backend thread analyses run on.
pub fn spawn_analysis_backend() -> (AnalysisSender, JoinHandle<()>) {
    let (request_tx, request_rx) = channel();
    let handle = BackendEventLoop::new(request_rx, AnalysisBackend::default()).run();
    (request_tx, handle)
}

/// What the last analysis reported.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisReport {
    None,
    Success(String),
    Failure(String),
}

pub struct FileAnalyzer {
    analysis_fn: Option<AnalysisFn>,
    plot_fn: PlotFn,
    task: BackgroundTask<AnalysisOutcome>,
    request_tx: AnalysisSender,
    file: Option<PathBuf>,
    figures: Vec<Figure>,
    report: AnalysisReport,
}

impl FileAnalyzer {
    /// Without an analysis function, the plot function receives an empty
    /// result map.
    pub fn new(
        analysis_fn: Option<AnalysisFn>,
        plot_fn: PlotFn,
        request_tx: AnalysisSender,
    ) -> Self {
        Self {
            analysis_fn,
            plot_fn,
            task: BackgroundTask::new(),
            request_tx,
            file: None,
            figures: Vec::new(),
            report: AnalysisReport::None,
        }
    }

    /// Analyze `path`. Rejected while the previous analysis is running.
    pub fn submit(&mut self, path: &Path) -> Result<(), String> {
        let Some(analysis_fn) = self.analysis_fn.clone() else {
            log::debug!("no analysis function, plotting {:?} directly", path);
            self.file = Some(path.to_owned());
            self.finish(Ok((String::new(), ResultMap::new())));
            return Ok(());
        };

        let file = path.to_owned();
        BackendLink::submit_task(
            &mut self.task,
            &format!("analyze {:?}", path),
            move |b: &mut BackendEventLoop<AnalysisBackend>| {
                b.state.jobs_run += 1;
                log::debug!("analysis job #{} on {:?}", b.state.jobs_run, file);
                run_guarded(&analysis_fn, &file)
            },
            &self.request_tx,
        )
        .inspect_err(|err| log::error!("{err}"))?;
        self.file = Some(path.to_owned());
        Ok(())
    }

    /// Poll for the analysis reply. Returns true if figures or report
    /// changed.
    pub fn try_update(&mut self) -> bool {
        if !self.task.try_update() {
            return false;
        }
        match self.task.take_completed() {
            Some(outcome) => self.finish(outcome),
            None => {
                self.report = AnalysisReport::Failure("analysis backend hung up".into());
                self.figures.clear();
            }
        }
        true
    }

    fn finish(&mut self, outcome: AnalysisOutcome) {
        let Some(file) = self.file.as_deref() else {
            log::warn!("received analysis result without a file");
            return;
        };
        let plotted = outcome.and_then(|(message, results)| {
            let figures = (self.plot_fn)(&results, file)
                .map_err(|err| format!("plotting failed: {err}"))?;
            Ok((message, figures))
        });
        match plotted {
            Ok((message, figures)) => {
                log::info!("analysis of {:?} finished: {message}", file);
                self.figures = figures;
                self.report = AnalysisReport::Success(message);
            }
            Err(reason) => {
                log::error!("analysis of {:?} failed: {reason}", file);
                self.figures.clear();
                self.report = AnalysisReport::Failure(reason);
            }
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.task.status()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub fn has_analysis_fn(&self) -> bool {
        self.analysis_fn.is_some()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }
}

/// Run the analysis function, turning a panic into a failure message.
fn run_guarded(analysis_fn: &AnalysisFn, file: &Path) -> AnalysisOutcome {
    match catch_unwind(AssertUnwindSafe(|| analysis_fn(file))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|msg| msg.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("analysis function panicked: {reason}"))
        }
    }
}
