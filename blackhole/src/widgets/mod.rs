//! egui building blocks for blackhole applications.

mod dataset_select;
mod file_analyzer;
mod menu;
mod plot;
mod slider;

pub use dataset_select::DatasetSelectWidget;
pub use file_analyzer::FileAnalyzerWidget;
pub use menu::basic_menu_bar;
pub use plot::{show_figures, PlotWidget, RenderFn};
pub use slider::SliderWidget;
