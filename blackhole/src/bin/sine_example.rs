#![warn(clippy::all, rust_2018_idioms)]

use std::cell::RefCell;
use std::f64::consts::PI;
use std::path::PathBuf;
use std::rc::Rc;

use blackhole::analysis::builtin::parse_columns;
use blackhole::broadcast::SharedControlListener;
use blackhole::logging::{init_logging, LogLevel};
use blackhole::widgets::{
    basic_menu_bar, show_figures, DatasetSelectWidget, PlotWidget, SliderWidget,
};
use blackhole::{
    ControlState, DataSource, Dataset, DatasetCore, DatasetListener, DatasetManager, Figure,
    MainWindow, Slot, PRIMARY_SLOT,
};
use blackhole_runtime::string_error::ErrorStringExt;
use clap::Parser;

const WINDOW_NAME: &str = "Chirp Analyzer";
const WINDOW_WIDTH: f32 = 800.0;
const WINDOW_HEIGHT: f32 = 500.0;

const AMPLITUDE_CTRL: &str = "amplitude";

/// Scope captures carry a few lines of instrument metadata before the
/// column names.
const CAPTURE_HEADER_LINES: usize = 4;

/// Chirp and sine demo on top of the blackhole widgets.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dataset configuration.
    #[arg(long, default_value = "conf_sine_example.json")]
    config: PathBuf,

    /// Set the logging display level.
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Debug)]
    loglevel: LogLevel,

    /// Show log details.
    #[arg(short, long)]
    detail: bool,
}

struct ChirpDataset {
    core: DatasetCore,
    time_ns: Vec<f64>,
    volt_mv: Vec<f64>,
}

impl ChirpDataset {
    fn load(source: &DataSource) -> Result<Self, String> {
        let text = std::fs::read_to_string(source.file_path())
            .err_to_string(&format!("could not read {:?}", source.file_path()))?;
        Self::from_text(source, &text)
    }

    fn from_text(source: &DataSource, text: &str) -> Result<Self, String> {
        let columns = parse_columns(text, CAPTURE_HEADER_LINES)?;
        let column = |name: &str| {
            columns
                .iter()
                .find(|(col, _)| col == name)
                .map(|(_, values)| values)
                .ok_or_else(|| format!("{} has no column '{name}'", source.file_name()))
        };
        let time_ns = column("Time")?.iter().map(|t| t * 1e9).collect();
        let volt_mv = column("Ampl")?.iter().map(|v| v * 1e3).collect();
        Ok(Self {
            core: DatasetCore::new(source),
            time_ns,
            volt_mv,
        })
    }
}

impl Dataset for ChirpDataset {
    fn source_info(&self) -> &DataSource {
        self.core.source_info()
    }

    fn control_performed(&self) -> &ControlState {
        self.core.control_performed()
    }
}

fn render_sine(control: &ControlState) -> Result<Vec<Figure>, String> {
    let amplitude = control
        .get_f64(AMPLITUDE_CTRL)
        .map_err(|err| err.to_string())?;
    let omega = 2.0 * PI * 0.5;
    let points = (0..=100)
        .map(|i| {
            let t = i as f64 * 0.1;
            [t, (t * omega).sin() * amplitude]
        })
        .collect();
    let figure = Figure::new("Sine")
        .with_labels("Time (ns)", "Amplitude (mV)")
        .with_ylim(-15.0, 15.0)
        .with_trace(blackhole::Trace::new("sine".into(), points));
    Ok(vec![figure])
}

/// Trace of the dataset active in the primary slot.
#[derive(Default)]
struct ChirpTraceView {
    figure: Option<Figure>,
}

impl DatasetListener<ChirpDataset> for ChirpTraceView {
    fn dataset_changed(&mut self, slot: Slot, dataset: &ChirpDataset) -> Result<(), String> {
        if slot != PRIMARY_SLOT {
            return Ok(());
        }
        if dataset.time_ns.len() != dataset.volt_mv.len() {
            return Err(format!("dataset {} has ragged columns", dataset.unique_id()));
        }
        let points = dataset
            .time_ns
            .iter()
            .zip(dataset.volt_mv.iter())
            .map(|(t, v)| [*t, *v])
            .collect();
        let source = dataset.source_info();
        let title = match source.parameter("chirp").and_then(|val| val.as_str()) {
            Some(direction) => format!("{} ({direction} chirp)", source.file_name()),
            None => source.file_name().to_owned(),
        };
        self.figure = Some(
            Figure::new(&title)
                .with_labels("Time (ns)", "Amplitude (mV)")
                .with_trace(blackhole::Trace::new("capture".into(), points)),
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Sine,
    Chirp,
}

struct ChirpAnalyzerApp {
    window: MainWindow<ChirpDataset>,
    plot: Rc<RefCell<PlotWidget>>,
    plot_listener: SharedControlListener,
    trace_view: Rc<RefCell<ChirpTraceView>>,
    slider: SliderWidget,
    select: DatasetSelectWidget,
    tab: Tab,
}

impl ChirpAnalyzerApp {
    fn new(data_manager: DatasetManager<ChirpDataset>) -> Self {
        let mut window = MainWindow::new(WINDOW_NAME, data_manager);

        let plot = Rc::new(RefCell::new(PlotWidget::new(
            "sine",
            Box::new(render_sine),
        )));
        let plot_listener: SharedControlListener = plot.clone();
        window.add_control_subscriber(plot_listener.clone());

        let trace_view = Rc::new(RefCell::new(ChirpTraceView::default()));
        window.add_dataset_subscriber(trace_view.clone());

        let slider = SliderWidget::new(AMPLITUDE_CTRL, 2.0, 1.0, 10.0, 1.0, "V");
        window.apply_controller(&slider);

        Self {
            window,
            plot,
            plot_listener,
            trace_view,
            slider,
            select: DatasetSelectWidget::new(PRIMARY_SLOT),
            tab: Tab::Sine,
        }
    }

    fn tabs(&mut self, ui: &mut egui::Ui) {
        let previous = self.tab;
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, Tab::Sine, "Sine");
            ui.selectable_value(&mut self.tab, Tab::Chirp, "Chirp");
        });
        if previous != self.tab {
            // hidden plots skip rendering until shown again
            self.window
                .set_listener_active(&self.plot_listener, self.tab == Tab::Sine);
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Controls");
        if self.slider.show(ui) {
            self.window.apply_controller(&self.slider);
        }
        ui.separator();
        ui.heading("Datasets");
        let clicked = egui::ScrollArea::vertical()
            .show(ui, |ui| self.select.show(ui, self.window.data_manager()))
            .inner;
        if let Some(id) = clicked {
            if let Err(err) = self.window.set_active_dataset(id, PRIMARY_SLOT) {
                log::error!("{err}");
            }
        }
    }
}

impl eframe::App for ChirpAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            basic_menu_bar(ui, ctx);
        });
        egui::SidePanel::right("controls")
            .min_width(220.0)
            .show(ctx, |ui| self.side_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            self.tabs(ui);
            ui.separator();
            match self.tab {
                Tab::Sine => self.plot.borrow().show(ui),
                Tab::Chirp => match &self.trace_view.borrow().figure {
                    Some(figure) => show_figures(ui, "chirp", std::slice::from_ref(figure)),
                    None => {
                        ui.label("select a dataset to show its trace");
                    }
                },
            }
        });
    }
}

fn main() -> eframe::Result {
    let args = Args::parse();
    init_logging(args.loglevel, args.detail);

    let mut data_manager = DatasetManager::new(ChirpDataset::load);
    if let Err(err) = data_manager.load_configuration(&args.config) {
        log::error!("{err}");
        std::process::exit(1);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_HEIGHT, WINDOW_HEIGHT]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|_cc| Ok(Box::new(ChirpAnalyzerApp::new(data_manager)))),
    )
}
