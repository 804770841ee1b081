use eframe::egui::{self, CentralPanel, Context, TextEdit, TopBottomPanel};
use eframe::App;
use install_mover::worker::REPORT_INTERVAL;
use install_mover::{spawn_move, Config, CopyProgress, MoveHandle, MoveRequest, RunOptions, SharedStatus};
use std::path::PathBuf;
use std::sync::Arc;

pub struct InstallMoverApp {
    config: Config,
    name_input: String,
    source_input: String,
    destination_input: String,
    manifest_input: String,
    progress: Arc<CopyProgress>,
    status: SharedStatus,
    running: Option<MoveHandle>,
}

fn path_text(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl InstallMoverApp {
    pub fn new(config: Config) -> Self {
        let manifest_input = config.effective_manifest_dir().to_string_lossy().to_string();
        Self {
            name_input: String::new(),
            source_input: path_text(&config.source_root),
            destination_input: path_text(&config.destination_root),
            manifest_input,
            config,
            progress: Arc::new(CopyProgress::new()),
            status: SharedStatus::new(),
            running: None,
        }
    }

    fn start(&mut self) {
        let request = MoveRequest::new(
            self.name_input.clone(),
            &self.source_input,
            &self.destination_input,
            &self.manifest_input,
        );
        let options = RunOptions {
            check_free_space: self.config.check_free_space,
        };
        self.running = Some(spawn_move(request, options, self.progress.clone(), self.status.clone()));
    }

    fn save_config(&mut self) {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| PathBuf::from(s));
        self.config.source_root = non_empty(&self.source_input);
        self.config.destination_root = non_empty(&self.destination_input);
        self.config.manifest_dir = non_empty(&self.manifest_input);
        if let Err(e) = self.config.save() {
            tracing::warn!("Could not save settings: {}", e);
        }
    }
}

impl App for InstallMoverApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.running.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = self.running.take() {
                match handle.join() {
                    Ok(report) => tracing::debug!("Move finished: {} files copied", report.files_copied),
                    Err(e) => tracing::debug!("Move finished with error: {}", e),
                }
            }
        }
        let busy = self.running.is_some();

        TopBottomPanel::top("form").show(ctx, |ui| {
            let rows = [
                ("Name:", &mut self.name_input),
                ("Source:", &mut self.source_input),
                ("Destination:", &mut self.destination_input),
                ("Manifests:", &mut self.manifest_input),
            ];
            for (label, value) in rows {
                ui.horizontal(|ui| {
                    ui.label(label);
                    ui.add(TextEdit::singleline(value).desired_width(360.0));
                });
            }
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.config.check_free_space, "Check free space");
                if ui.add_enabled(!busy, egui::Button::new("Move")).clicked() {
                    self.start();
                }
                if ui.button("Save").clicked() {
                    self.save_config();
                }
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            ui.label(self.status.get().to_string());
            let snapshot = self.progress.snapshot();
            if snapshot.total_bytes > 0 {
                ui.add(egui::ProgressBar::new(snapshot.total_progress()).show_percentage());
            }
        });

        if busy {
            ctx.request_repaint_after(REPORT_INTERVAL);
        }
    }
}
