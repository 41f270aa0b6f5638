use egui_plot::{Legend, Line, Plot};

use crate::control::ControlState;
use crate::figure::Figure;
use crate::listener::{ControlListener, ListenerState};

pub type RenderFn = Box<dyn Fn(&ControlState) -> Result<Vec<Figure>, String>>;

/// Figures recomputed from the requested control state.
pub struct PlotWidget {
    name: String,
    state: ListenerState,
    render_fn: RenderFn,
    figures: Vec<Figure>,
    error: Option<String>,
    render_count: usize,
}

impl PlotWidget {
    pub fn new(name: &str, render_fn: RenderFn) -> Self {
        Self {
            name: name.to_owned(),
            state: ListenerState::default(),
            render_fn,
            figures: Vec::new(),
            error: None,
            render_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if let Some(err) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, err.as_str());
        }
        show_figures(ui, &self.name, &self.figures);
    }
}

impl ControlListener for PlotWidget {
    fn listener_state(&self) -> &ListenerState {
        &self.state
    }

    fn listener_state_mut(&mut self) -> &mut ListenerState {
        &mut self.state
    }

    fn render(&mut self, control: &ControlState) -> Result<(), String> {
        self.render_count += 1;
        log::trace!("rendering plot '{}' (#{})", self.name, self.render_count);
        match (self.render_fn)(control) {
            Ok(figures) => {
                self.figures = figures;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// Draw `figures` stacked, sharing the available height.
pub fn show_figures(ui: &mut egui::Ui, id_salt: &str, figures: &[Figure]) {
    if figures.is_empty() {
        return;
    }
    let height = (ui.available_height() / figures.len() as f32 - 24.0).max(80.0);
    for (idx, figure) in figures.iter().enumerate() {
        if !figure.title.is_empty() {
            ui.label(egui::RichText::new(&figure.title).strong());
        }
        let mut plot = Plot::new((id_salt, idx))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(figure.x_label.clone())
            .y_axis_label(figure.y_label.clone());
        if let Some([ymin, ymax]) = figure.y_limits {
            plot = plot
                .include_y(ymin)
                .include_y(ymax)
                .auto_bounds(egui::Vec2b { x: true, y: false });
        }
        plot.show(ui, |plot_ui| {
            for trace in figure.traces.iter() {
                plot_ui.line(Line::new(trace.points.clone()).name(&trace.name));
            }
        });
    }
}
