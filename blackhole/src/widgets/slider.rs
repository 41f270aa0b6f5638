use crate::control::ControlState;
use crate::listener::Controller;

/// Numeric control writing one parameter of the requested control state.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderWidget {
    param: String,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    unit: String,
}

impl SliderWidget {
    pub fn new(param: &str, value: f64, min: f64, max: f64, step: f64, unit: &str) -> Self {
        let (min, max) = (min.min(max), max.max(min));
        Self {
            param: param.to_owned(),
            value: value.clamp(min, max),
            min,
            max,
            step,
            unit: unit.to_owned(),
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Current value with its unit, e.g. `2 (V)`.
    pub fn label_text(&self) -> String {
        if self.unit.is_empty() {
            format!("{}", self.value)
        } else {
            format!("{} ({})", self.value, self.unit)
        }
    }

    /// Returns whether the user moved the slider.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let suffix = if self.unit.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.unit)
        };
        let slider = egui::Slider::new(&mut self.value, self.min..=self.max)
            .step_by(self.step)
            .suffix(suffix)
            .text(self.param.as_str());
        let changed = ui.add(slider).changed();
        if changed {
            log::debug!("slider '{}' moved to {}", self.param, self.value);
        }
        changed
    }
}

impl Controller for SliderWidget {
    fn write_controls(&self, control: &mut ControlState) {
        control.update_param(&self.param, self.value, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_clamped() {
        let mut slider = SliderWidget::new("amplitude", 20.0, 1.0, 10.0, 1.0, "V");
        assert_eq!(slider.value(), 10.0);
        slider.set_value(-3.0);
        assert_eq!(slider.value(), 1.0);

        let swapped = SliderWidget::new("x", 5.0, 10.0, 0.0, 1.0, "");
        assert_eq!(swapped.value(), 5.0);
    }

    #[test]
    fn test_label_text() {
        let slider = SliderWidget::new("amplitude", 2.0, 1.0, 10.0, 1.0, "V");
        assert_eq!(slider.label_text(), "2 (V)");
        let unitless = SliderWidget::new("n", 2.5, 1.0, 10.0, 0.5, "");
        assert_eq!(unitless.label_text(), "2.5");
    }

    #[test]
    fn test_writes_controls() {
        let slider = SliderWidget::new("amplitude", 4.0, 1.0, 10.0, 1.0, "V");
        let mut control = ControlState::new("requested");
        slider.write_controls(&mut control);
        assert_eq!(control.get_f64("amplitude"), Ok(4.0));
    }
}
