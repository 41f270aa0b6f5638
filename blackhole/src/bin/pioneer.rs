#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use blackhole::analysis::builtin::{
    analysis_by_name, plot_by_name, ANALYSIS_FUNCTIONS, PLOT_FUNCTIONS,
};
use blackhole::analysis::{spawn_analysis_backend, AnalysisSender, FileAnalyzer};
use blackhole::logging::{init_logging, LogLevel};
use blackhole::widgets::{basic_menu_bar, FileAnalyzerWidget};
use blackhole::{DataSource, DatasetCore, DatasetManager, MainWindow};
use blackhole_runtime::backend::request_stop;
use clap::Parser;

const WINDOW_NAME: &str = "Black Hole: Pioneer";
const WINDOW_SIZE: f32 = 500.0;

/// Analyze a single data file and plot the results.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data file to analyze on startup.
    filename: Option<PathBuf>,

    /// Set the logging display level.
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Debug)]
    loglevel: LogLevel,

    /// Show log details.
    #[arg(short, long)]
    detail: bool,

    /// Name of the analysis function.
    #[arg(short, long, default_value = "analyze")]
    afunc: String,

    /// Name of the plotting function.
    #[arg(short, long, default_value = "main")]
    pfunc: String,
}

struct PioneerApp {
    // the dataset manager of a pioneer window stays empty
    window: MainWindow<DatasetCore>,
    analyzer: FileAnalyzerWidget,
    request_tx: AnalysisSender,
    backend_thread_handle: Option<JoinHandle<()>>,
}

impl eframe::App for PioneerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.analyzer.try_update() {
            ctx.request_repaint();
        }
        if self.analyzer.analyzer().is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            basic_menu_bar(ui, ctx);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.window.title());
            self.analyzer.show(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.backend_thread_handle.take() {
            request_stop(&self.request_tx, handle);
        }
    }
}

fn main() -> eframe::Result {
    let args = Args::parse();
    init_logging(args.loglevel, args.detail);

    let Some(plot_fn) = plot_by_name(&args.pfunc) else {
        log::error!(
            "no plot function '{}', available are {:?}",
            args.pfunc,
            PLOT_FUNCTIONS
        );
        std::process::exit(1);
    };
    let analysis_fn = analysis_by_name(&args.afunc);
    if analysis_fn.is_none() {
        log::warn!(
            "no analysis function '{}' (available are {:?}), skipping analysis",
            args.afunc,
            ANALYSIS_FUNCTIONS
        );
    }

    let (request_tx, eventloop_handle) = spawn_analysis_backend();
    let mut analyzer =
        FileAnalyzerWidget::new(FileAnalyzer::new(analysis_fn, plot_fn, request_tx.clone()));
    if let Some(path) = args.filename.as_deref() {
        if let Err(err) = analyzer.open(path) {
            log::error!("{err}");
        }
    }

    let data_manager = DatasetManager::new(|source: &DataSource| {
        Err(format!("pioneer does not load datasets ({})", source.file_name()))
    });
    let app = PioneerApp {
        window: MainWindow::new(WINDOW_NAME, data_manager),
        analyzer,
        request_tx,
        backend_thread_handle: Some(eventloop_handle),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_SIZE, WINDOW_SIZE])
            .with_min_inner_size([WINDOW_SIZE, WINDOW_SIZE]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
