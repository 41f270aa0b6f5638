//! Toolkit-independent description of what a plot shows.

use derive_new::new;

#[derive(Clone, Debug, PartialEq, new)]
pub struct Trace {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub traces: Vec<Trace>,
    pub y_limits: Option<[f64; 2]>,
}

impl Figure {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_owned();
        self.y_label = y_label.to_owned();
        self
    }

    pub fn with_ylim(mut self, ymin: f64, ymax: f64) -> Self {
        self.y_limits = Some([ymin.min(ymax), ymax.max(ymin)]);
        self
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Trace plotting `ys` against their index.
    pub fn with_series(self, name: &str, ys: &[f64]) -> Self {
        let points = ys
            .iter()
            .enumerate()
            .map(|(i, y)| [i as f64, *y])
            .collect();
        self.with_trace(Trace::new(name.to_owned(), points))
    }
}
