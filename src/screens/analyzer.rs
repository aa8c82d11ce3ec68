use std::path::Path;
use std::sync::mpsc::TryRecvError;
use std::sync::{Mutex, OnceLock};

use codearena::models::{AnalyzeRequest, ComplexityReport, Sample};
use codearena::services::analysis_client::{AnalysisError, ComplexityAnalyzer};
use codearena::services::analysis_worker::{AnalysisEvent, AnalysisWorker, spawn_analysis_worker};
use codearena::services::api_client::ApiClient;
use codearena::services::chart_renderer::{self, CANVAS_HEIGHT, CANVAS_WIDTH};
use codearena::services::config_loader::ArenaConfig;
use codearena::services::request_throttle::RequestThrottle;
use eframe::egui;
use rfd::FileDialog;
use tracing::{info, warn};
use tracing_unwrap::ResultExt;

use crate::screens::chart_canvas::EguiSurface;

#[derive(Default)]
struct AnalyzerUiState {
    initialized: bool,
    problem: String,
    language: String,
    code: String,
    worker: Option<AnalysisWorker>,
    is_analyzing: bool,
    report: Option<ComplexityReport>,
    samples: Vec<Sample>,
    error: Option<String>,
}

static ANALYZER_UI_STATE: OnceLock<Mutex<AnalyzerUiState>> = OnceLock::new();

fn analyzer_ui_state() -> &'static Mutex<AnalyzerUiState> {
    ANALYZER_UI_STATE.get_or_init(|| Mutex::new(AnalyzerUiState::default()))
}

fn language_for_path(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "py" => Some("python"),
        "js" | "mjs" | "ts" => Some("javascript"),
        "java" => Some("java"),
        "cpp" | "cc" | "cxx" | "hpp" | "h" => Some("cpp"),
        _ => None,
    }
}

fn ensure_worker(state: &mut AnalyzerUiState, config: &ArenaConfig) -> Result<(), String> {
    if state.worker.is_some() {
        return Ok(());
    }
    let client = ApiClient::new(&config.api_base_url).map_err(|err| format!("{err:#}"))?;
    let analyzer = ComplexityAnalyzer::new(
        client,
        RequestThrottle::new(config.min_request_interval()),
    );
    info!("Starting analysis worker for {}", config.api_base_url);
    state.worker = Some(spawn_analysis_worker(analyzer));
    Ok(())
}

fn pump_events(state: &mut AnalyzerUiState) {
    loop {
        let event = {
            let Some(worker) = &state.worker else {
                return;
            };
            worker.events().try_recv()
        };

        match event {
            Ok(AnalysisEvent::Started) => {
                state.is_analyzing = true;
            }
            Ok(AnalysisEvent::Finished { report, samples }) => {
                state.is_analyzing = false;
                state.error = None;
                state.report = Some(report);
                state.samples = samples;
            }
            Ok(AnalysisEvent::Failed { message }) => {
                state.is_analyzing = false;
                state.error = Some(message);
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("Analysis worker disconnected");
                state.is_analyzing = false;
                state.worker = None;
                state.error = Some("Analysis worker stopped unexpectedly".to_string());
                return;
            }
        }
    }
}

fn start_analysis(state: &mut AnalyzerUiState, config: &ArenaConfig) {
    if state.code.trim().is_empty() {
        state.error = Some(AnalysisError::EmptyCode.user_message());
        return;
    }
    if let Err(message) = ensure_worker(state, config) {
        state.error = Some(message);
        return;
    }

    state.report = None;
    state.samples.clear();
    state.error = None;

    let request = AnalyzeRequest {
        code: state.code.clone(),
        language: state.language.clone(),
        problem: state.problem.trim().to_string(),
    };
    let submitted = state
        .worker
        .as_ref()
        .is_some_and(|worker| worker.submit(request));
    if submitted {
        state.is_analyzing = true;
    } else {
        state.worker = None;
        state.error = Some("Analysis worker is not running".to_string());
    }
}

fn render_report(ui: &mut egui::Ui, report: &ComplexityReport) {
    egui::Grid::new("complexity_summary")
        .num_columns(2)
        .spacing([24.0, 6.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Time").strong());
            ui.colored_label(
                egui::Color32::from_rgb(129, 140, 248),
                &report.time_complexity,
            );
            ui.end_row();
            ui.label(egui::RichText::new("Space").strong());
            ui.colored_label(
                egui::Color32::from_rgb(244, 114, 182),
                &report.space_complexity,
            );
            ui.end_row();
        });

    if !report.explanation.trim().is_empty() {
        ui.add_space(6.0);
        ui.label(&report.explanation);
    }

    if !report.breakdown.is_empty() {
        ui.add_space(6.0);
        egui::Grid::new("complexity_breakdown")
            .striped(true)
            .num_columns(3)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Operation").strong());
                ui.label(egui::RichText::new("Description").strong());
                ui.label(egui::RichText::new("Complexity").strong());
                ui.end_row();
                for step in &report.breakdown {
                    ui.label(&step.operation);
                    ui.label(&step.description);
                    ui.monospace(&step.complexity);
                    ui.end_row();
                }
            });
    }
}

pub fn ui(ui: &mut egui::Ui, config: &ArenaConfig) {
    let mut state = analyzer_ui_state()
        .lock()
        .expect_or_log("analyzer ui state lock poisoned");

    if !state.initialized {
        state.language = config.analyzer.default_language.clone();
        state.initialized = true;
    }

    pump_events(&mut state);

    ui.heading("Complexity Analyzer");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Problem");
        ui.add_sized(
            [420.0, 28.0],
            egui::TextEdit::singleline(&mut state.problem).hint_text("e.g. Two Sum"),
        );
        ui.add_space(12.0);
        ui.label("Language");
        egui::ComboBox::from_id_salt("analyzer_language")
            .selected_text(state.language.clone())
            .show_ui(ui, |ui| {
                for language in &config.analyzer.languages {
                    ui.selectable_value(&mut state.language, language.clone(), language);
                }
            });
        if ui.button("Load file").clicked()
            && let Some(path) = FileDialog::new().set_directory(".").pick_file()
        {
            match std::fs::read_to_string(&path) {
                Ok(code) => {
                    info!("Loaded {} for analysis", path.display());
                    if let Some(language) = language_for_path(&path) {
                        state.language = language.to_string();
                    }
                    state.code = code;
                }
                Err(err) => {
                    state.error = Some(format!("Failed to read {}: {}", path.display(), err));
                }
            }
        }
    });
    ui.add_space(6.0);

    egui::ScrollArea::vertical()
        .id_salt("analyzer_code_scroll")
        .max_height(260.0)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut state.code)
                    .code_editor()
                    .desired_rows(12)
                    .desired_width(f32::INFINITY)
                    .hint_text("Paste your solution here..."),
            );
        });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.is_analyzing, egui::Button::new("Analyze Complexity"))
            .clicked()
        {
            start_analysis(&mut state, config);
        }
        if state.is_analyzing {
            ui.add(egui::Spinner::new());
            ui.label("Analyzing...");
        }
    });

    if let Some(message) = &state.error {
        ui.add_space(6.0);
        ui.colored_label(egui::Color32::LIGHT_RED, message);
    }

    if let Some(report) = &state.report {
        ui.add_space(10.0);
        render_report(ui, report);

        ui.add_space(10.0);
        let scale = config.chart.display_scale;
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(CANVAS_WIDTH * scale, CANVAS_HEIGHT * scale),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface::new(&painter, rect);
        chart_renderer::render(Some(&mut surface), &state.samples);
    }

    if state.is_analyzing {
        ui.ctx().request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_extensions_pick_language() {
        assert_eq!(language_for_path(Path::new("a/solution.py")), Some("python"));
        assert_eq!(language_for_path(Path::new("main.cpp")), Some("cpp"));
        assert_eq!(language_for_path(Path::new("Main.java")), Some("java"));
        assert_eq!(language_for_path(Path::new("notes.txt")), None);
        assert_eq!(language_for_path(Path::new("Makefile")), None);
    }

    #[test]
    fn blank_code_is_rejected_before_worker_starts() {
        let mut state = AnalyzerUiState {
            code: "   ".to_string(),
            ..AnalyzerUiState::default()
        };
        start_analysis(&mut state, &ArenaConfig::default());
        assert!(state.worker.is_none());
        assert!(!state.is_analyzing);
        assert_eq!(
            state.error.as_deref(),
            Some("Please enter some code to analyze.")
        );
    }
}
