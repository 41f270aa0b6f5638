use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use blackhole_runtime::frontend::TaskStatus;

use super::plot::show_figures;
use crate::analysis::{AnalysisReport, FileAnalyzer};

/// File picker, status line and result figures of a [`FileAnalyzer`].
pub struct FileAnalyzerWidget {
    analyzer: FileAnalyzer,
    path_buffer: String,
    awaiting_file_selection: Option<JoinHandle<Option<PathBuf>>>,
}

impl FileAnalyzerWidget {
    pub fn new(analyzer: FileAnalyzer) -> Self {
        Self {
            analyzer,
            path_buffer: String::new(),
            awaiting_file_selection: None,
        }
    }

    pub fn analyzer(&self) -> &FileAnalyzer {
        &self.analyzer
    }

    pub fn path_buffer(&self) -> &str {
        &self.path_buffer
    }

    /// Put `path` into the path field and analyze it.
    pub fn open(&mut self, path: &Path) -> Result<(), String> {
        self.path_buffer = path.display().to_string();
        self.analyze_path_buffer()
    }

    pub fn analyze_path_buffer(&mut self) -> Result<(), String> {
        let path = self.path_buffer.trim();
        if path.is_empty() {
            return Err("no file selected".into());
        }
        let path = PathBuf::from(path);
        self.analyzer.submit(&path)
    }

    /// Pick up a file chosen in the dialog and the analysis reply. Returns
    /// true if a redraw is needed.
    pub fn try_update(&mut self) -> bool {
        let mut changed = false;
        if let Some(handle) = self
            .awaiting_file_selection
            .take_if(|handle| handle.is_finished())
        {
            log::debug!("receiving selected file");
            match handle.join() {
                Ok(Some(path)) => {
                    if let Err(err) = self.open(&path) {
                        log::error!("{err}");
                    }
                    changed = true;
                }
                Ok(None) => (),
                Err(err) => log::error!("file dialog failed: {:?}", err),
            }
        }
        self.analyzer.try_update() || changed
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let input = ui.text_edit_singleline(&mut self.path_buffer);
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Analyze").clicked() || entered {
                if let Err(err) = self.analyze_path_buffer() {
                    log::warn!("{err}");
                }
            }
            if ui
                .add_enabled(
                    self.awaiting_file_selection.is_none(),
                    egui::Button::new("..."),
                )
                .on_hover_text("choose file")
                .clicked()
            {
                log::debug!("open dialog to select file for analysis");
                self.awaiting_file_selection =
                    Some(std::thread::spawn(|| rfd::FileDialog::new().pick_file()));
            }
        });

        match (self.analyzer.status(), self.analyzer.report()) {
            (TaskStatus::Running, _) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("analyzing ...");
                });
            }
            (_, AnalysisReport::Success(msg)) => {
                ui.label(msg.as_str());
            }
            (_, AnalysisReport::Failure(reason)) => {
                ui.colored_label(ui.visuals().error_fg_color, reason.as_str());
            }
            (_, AnalysisReport::None) => {
                if !self.analyzer.has_analysis_fn() {
                    ui.label("no analysis function, results are plotted directly");
                }
            }
        }
        ui.separator();
        show_figures(ui, "file_analyzer", self.analyzer.figures());
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use blackhole_runtime::backend::request_stop;

    use super::*;
    use crate::analysis::{spawn_analysis_backend, AnalysisFn, AnalysisOutcome, ResultMap};
    use crate::figure::Figure;

    #[test]
    fn test_empty_path_rejected() {
        let (request_tx, handle) = spawn_analysis_backend();
        let analyzer = FileAnalyzer::new(
            None,
            Box::new(|_: &ResultMap, _: &Path| -> Result<Vec<Figure>, String> { Ok(vec![]) }),
            request_tx.clone(),
        );
        let mut widget = FileAnalyzerWidget::new(analyzer);
        assert_eq!(
            widget.analyze_path_buffer(),
            Err("no file selected".to_string())
        );
        request_stop(&request_tx, handle);
    }

    #[test]
    fn test_open_runs_analysis() {
        let (request_tx, handle) = spawn_analysis_backend();
        let analysis: AnalysisFn = std::sync::Arc::new(|path: &Path| -> AnalysisOutcome {
            Ok((format!("saw {}", path.display()), ResultMap::new()))
        });
        let analyzer = FileAnalyzer::new(
            Some(analysis),
            Box::new(|_: &ResultMap, _: &Path| -> Result<Vec<Figure>, String> {
                Ok(vec![Figure::new("empty")])
            }),
            request_tx.clone(),
        );
        let mut widget = FileAnalyzerWidget::new(analyzer);
        widget.open(Path::new("  run_7.csv")).unwrap();
        assert_eq!(widget.path_buffer(), "  run_7.csv");

        let deadline = Instant::now() + Duration::from_secs(5);
        while !widget.try_update() {
            assert!(Instant::now() < deadline, "analysis did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(
            widget.analyzer().report(),
            &AnalysisReport::Success("saw run_7.csv".into())
        );
        assert_eq!(widget.analyzer().figures().len(), 1);
        request_stop(&request_tx, handle);
    }
}
