use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chrono::Local;
use codearena::models::ContestSummary;
use codearena::services::contest_catalog::{self, ContestStatus};
use eframe::egui;
use rfd::FileDialog;
use tracing_unwrap::ResultExt;

#[derive(Default)]
struct ContestsUiState {
    source_path: Option<String>,
    contests: Vec<ContestSummary>,
    warnings: Vec<String>,
    error: Option<String>,
}

static CONTESTS_UI_STATE: OnceLock<Mutex<ContestsUiState>> = OnceLock::new();

fn contests_ui_state() -> &'static Mutex<ContestsUiState> {
    CONTESTS_UI_STATE.get_or_init(|| Mutex::new(ContestsUiState::default()))
}

fn status_color(status: ContestStatus) -> egui::Color32 {
    match status {
        ContestStatus::Ongoing => egui::Color32::from_rgb(49, 201, 80),
        ContestStatus::Upcoming => egui::Color32::from_rgb(43, 127, 255),
        ContestStatus::Ended => egui::Color32::from_rgb(98, 116, 142),
    }
}

pub fn ui(ui: &mut egui::Ui) {
    let mut state = contests_ui_state()
        .lock()
        .expect_or_log("contests ui state lock poisoned");

    ui.heading("Contests");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.button("Open contest list").clicked()
            && let Some(path) = FileDialog::new()
                .add_filter("JSON", &["json"])
                .set_directory(".")
                .pick_file()
        {
            match contest_catalog::load_contests(&path) {
                Ok((contests, warnings)) => {
                    state.contests = contests;
                    state.warnings = warnings;
                    state.error = None;
                }
                Err(err) => {
                    state.contests.clear();
                    state.warnings.clear();
                    state.error = Some(format!("{err:#}"));
                }
            }
            state.source_path = Some(path.display().to_string());
        }
        if let Some(path) = &state.source_path {
            ui.label(path);
        }
    });

    if let Some(message) = &state.error {
        ui.add_space(6.0);
        ui.colored_label(egui::Color32::LIGHT_RED, message);
    }

    if !state.warnings.is_empty() {
        ui.add_space(6.0);
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgb(56, 48, 20))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(190, 160, 70)))
            .show(ui, |ui| {
                for warning in &state.warnings {
                    ui.colored_label(egui::Color32::from_rgb(255, 220, 140), warning);
                }
            });
    }

    let now = Local::now().fixed_offset();
    contest_catalog::sort_for_listing(&mut state.contests, now);

    ui.add_space(8.0);
    if state.contests.is_empty() {
        ui.label("No contests loaded.");
        return;
    }

    let counts = contest_catalog::count_by_status(&state.contests, now);
    ui.label(format!(
        "Live: {} | Upcoming: {} | Ended: {}",
        counts.get(&ContestStatus::Ongoing).copied().unwrap_or(0),
        counts.get(&ContestStatus::Upcoming).copied().unwrap_or(0),
        counts.get(&ContestStatus::Ended).copied().unwrap_or(0),
    ));
    ui.add_space(6.0);

    egui::ScrollArea::vertical()
        .id_salt("contest_list_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("contest_list")
                .striped(true)
                .num_columns(5)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Contest").strong());
                    ui.label(egui::RichText::new("Status").strong());
                    ui.label(egui::RichText::new("When").strong());
                    ui.label(egui::RichText::new("Starts").strong());
                    ui.label(egui::RichText::new("Problems").strong());
                    ui.end_row();

                    for contest in &state.contests {
                        let status = contest.status(now);
                        let title = ui.label(&contest.title);
                        if let Some(description) = &contest.description {
                            title.on_hover_text(description);
                        }
                        ui.colored_label(status_color(status), status.label());
                        ui.label(contest.time_label(now));
                        ui.label(
                            contest
                                .start_time
                                .with_timezone(&Local)
                                .format("%Y-%m-%d %H:%M")
                                .to_string(),
                        );
                        ui.label(contest.problem_ids.len().to_string());
                        ui.end_row();
                    }
                });
        });

    ui.ctx().request_repaint_after(Duration::from_secs(1));
}
