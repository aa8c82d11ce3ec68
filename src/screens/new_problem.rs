use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Mutex, OnceLock};

use codearena::models::{Difficulty, ProblemDraft, TestCase};
use codearena::services::api_client::ApiClient;
use codearena::services::config_loader::ArenaConfig;
use codearena::services::problem_validator::parse_tags;
use codearena::services::submission::spawn_submission;
use eframe::egui;
use tracing::info;
use tracing_unwrap::ResultExt;

#[derive(Default)]
struct NewProblemUiState {
    draft: ProblemDraft,
    tags_csv: String,
    errors: Vec<String>,
    message: Option<String>,
    submit_rx: Option<Receiver<Result<(), String>>>,
}

static NEW_PROBLEM_UI_STATE: OnceLock<Mutex<NewProblemUiState>> = OnceLock::new();

fn new_problem_ui_state() -> &'static Mutex<NewProblemUiState> {
    NEW_PROBLEM_UI_STATE.get_or_init(|| Mutex::new(NewProblemUiState::default()))
}

fn pump_submission(state: &mut NewProblemUiState) {
    let result = match &state.submit_rx {
        Some(rx) => rx.try_recv(),
        None => return,
    };
    match result {
        Ok(Ok(())) => {
            state.submit_rx = None;
            state.message = Some(format!("Problem \"{}\" created", state.draft.title.trim()));
            state.draft = ProblemDraft::default();
            state.tags_csv.clear();
        }
        Ok(Err(message)) => {
            state.submit_rx = None;
            state.errors = vec![message];
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            state.submit_rx = None;
            state.errors = vec!["Submission thread stopped unexpectedly".to_string()];
        }
    }
}

fn submit(state: &mut NewProblemUiState, config: &ArenaConfig) {
    state.message = None;
    state.draft.tags = parse_tags(&state.tags_csv);

    if let Err(violations) = state.draft.validate() {
        state.errors = violations.iter().map(ToString::to_string).collect();
        return;
    }
    state.errors.clear();

    let client = match ApiClient::new(&config.api_base_url) {
        Ok(client) => client,
        Err(err) => {
            state.errors = vec![format!("{err:#}")];
            return;
        }
    };
    let draft = state.draft.normalized();
    info!("Submitting problem {:?}", draft.title);
    state.submit_rx = Some(spawn_submission("problem", async move {
        client.create_problem(&draft).await
    }));
}

fn render_test_cases(ui: &mut egui::Ui, test_cases: &mut Vec<TestCase>) {
    let mut remove_index = None;
    for (index, case) in test_cases.iter_mut().enumerate() {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("Test case {}", index + 1)).strong());
                ui.checkbox(&mut case.is_sample, "Sample");
                if ui.small_button("Remove").clicked() {
                    remove_index = Some(index);
                }
            });
            ui.columns(2, |columns| {
                columns[0].label("Input");
                columns[0].add(
                    egui::TextEdit::multiline(&mut case.input)
                        .code_editor()
                        .desired_rows(3),
                );
                columns[1].label("Expected output");
                columns[1].add(
                    egui::TextEdit::multiline(&mut case.expected_output)
                        .code_editor()
                        .desired_rows(3),
                );
            });
        });
        ui.add_space(4.0);
    }
    if let Some(index) = remove_index {
        test_cases.remove(index);
    }
    if ui.button("Add test case").clicked() {
        test_cases.push(TestCase::default());
    }
}

pub fn ui(ui: &mut egui::Ui, config: &ArenaConfig) {
    let mut state = new_problem_ui_state()
        .lock()
        .expect_or_log("new problem ui state lock poisoned");
    pump_submission(&mut state);
    let submitting = state.submit_rx.is_some();

    ui.heading("New Problem");
    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .id_salt("new_problem_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.label("Title");
            ui.add_sized(
                [600.0, 28.0],
                egui::TextEdit::singleline(&mut state.draft.title),
            );
            ui.add_space(6.0);

            ui.label("Description");
            ui.add_sized(
                [600.0, 120.0],
                egui::TextEdit::multiline(&mut state.draft.description),
            );
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                ui.label("Difficulty");
                egui::ComboBox::from_id_salt("problem_difficulty")
                    .selected_text(state.draft.difficulty.label())
                    .show_ui(ui, |ui| {
                        for difficulty in Difficulty::ALL {
                            ui.selectable_value(
                                &mut state.draft.difficulty,
                                difficulty,
                                difficulty.label(),
                            );
                        }
                    });
                ui.add_space(12.0);
                ui.label("Time limit (ms)");
                ui.add(egui::DragValue::new(&mut state.draft.time_limit_ms).speed(50));
                ui.add_space(12.0);
                ui.label("Memory limit (MB)");
                ui.add(egui::DragValue::new(&mut state.draft.memory_limit_mb).speed(16));
            });
            ui.add_space(6.0);

            ui.label("Tags (comma separated)");
            ui.add_sized([600.0, 28.0], egui::TextEdit::singleline(&mut state.tags_csv));
            ui.add_space(6.0);

            ui.label("Constraints");
            ui.add_sized(
                [600.0, 60.0],
                egui::TextEdit::multiline(&mut state.draft.constraints),
            );
            ui.add_space(10.0);

            render_test_cases(ui, &mut state.draft.test_cases);
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!submitting, egui::Button::new("Create problem"))
                    .clicked()
                {
                    submit(&mut state, config);
                }
                if submitting {
                    ui.add(egui::Spinner::new());
                }
            });

            if let Some(message) = &state.message {
                ui.colored_label(egui::Color32::LIGHT_GREEN, message);
            }
            for error in &state.errors {
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }
        });

    if submitting {
        ui.ctx().request_repaint();
    }
}
