use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Mutex, OnceLock};

use codearena::services::api_client::ApiClient;
use codearena::services::captcha::Captcha;
use codearena::services::config_loader::ArenaConfig;
use codearena::services::signup::{SignupError, SignupForm};
use codearena::services::submission::spawn_submission;
use eframe::egui;
use tracing::{info, warn};
use tracing_unwrap::ResultExt;

#[derive(Default)]
struct SignupUiState {
    form: SignupForm,
    captcha: Option<Captcha>,
    captcha_answer: String,
    errors: Vec<String>,
    message: Option<String>,
    submit_rx: Option<Receiver<Result<(), String>>>,
}

static SIGNUP_UI_STATE: OnceLock<Mutex<SignupUiState>> = OnceLock::new();

fn signup_ui_state() -> &'static Mutex<SignupUiState> {
    SIGNUP_UI_STATE.get_or_init(|| Mutex::new(SignupUiState::default()))
}

fn refresh_captcha(state: &mut SignupUiState) {
    state.captcha = Some(Captcha::generate(&mut rand::rng()));
    state.captcha_answer.clear();
}

fn submit(state: &mut SignupUiState, config: &ArenaConfig) {
    state.message = None;
    let Some(captcha) = state.captcha.clone() else {
        refresh_captcha(state);
        return;
    };

    let request = match state.form.validate(&captcha, &state.captcha_answer) {
        Ok(request) => request,
        Err(violations) => {
            if violations.contains(&SignupError::CaptchaMismatch) {
                warn!("Signup CAPTCHA mismatch, regenerating");
                refresh_captcha(state);
            }
            state.errors = violations.iter().map(ToString::to_string).collect();
            return;
        }
    };
    state.errors.clear();

    let client = match ApiClient::new(&config.api_base_url) {
        Ok(client) => client,
        Err(err) => {
            state.errors = vec![format!("{err:#}")];
            return;
        }
    };
    info!("Submitting signup for {}", request.username);
    state.submit_rx = Some(spawn_submission("signup", async move {
        client.signup(&request).await
    }));
}

fn pump_submission(state: &mut SignupUiState) {
    let result = match &state.submit_rx {
        Some(rx) => rx.try_recv(),
        None => return,
    };
    match result {
        Ok(Ok(())) => {
            state.submit_rx = None;
            state.message = Some(format!(
                "Account {} created. You can now log in.",
                state.form.username.trim()
            ));
            state.form = SignupForm::default();
            refresh_captcha(state);
        }
        Ok(Err(message)) => {
            state.submit_rx = None;
            state.errors = vec![message];
            refresh_captcha(state);
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
            state.submit_rx = None;
            state.errors = vec!["Signup thread stopped unexpectedly".to_string()];
        }
    }
}

fn paint_captcha(ui: &mut egui::Ui, captcha: &Captcha) {
    let glyph_width = 30.0;
    let size = egui::vec2(glyph_width * captcha.glyphs().len() as f32 + 20.0, 56.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(32));

    for (index, glyph) in captcha.glyphs().iter().enumerate() {
        let galley = painter.layout_no_wrap(
            glyph.ch.to_string(),
            egui::FontId::monospace(28.0),
            egui::Color32::from_rgb(255, 220, 140),
        );
        let pos = egui::pos2(
            rect.left() + 10.0 + index as f32 * glyph_width,
            rect.center().y - galley.size().y / 2.0 + glyph.offset_y,
        );
        painter.add(egui::Shape::Text(
            egui::epaint::TextShape::new(pos, galley, egui::Color32::WHITE)
                .with_angle(glyph.rotation_deg.to_radians()),
        ));
    }
}

pub fn ui(ui: &mut egui::Ui, config: &ArenaConfig) {
    let mut state = signup_ui_state()
        .lock()
        .expect_or_log("signup ui state lock poisoned");
    if state.captcha.is_none() {
        refresh_captcha(&mut state);
    }
    pump_submission(&mut state);
    let submitting = state.submit_rx.is_some();

    ui.heading("Sign Up");
    ui.add_space(8.0);

    ui.label("Username");
    ui.add_sized(
        [400.0, 28.0],
        egui::TextEdit::singleline(&mut state.form.username),
    );
    ui.add_space(6.0);
    ui.label("Email");
    ui.add_sized(
        [400.0, 28.0],
        egui::TextEdit::singleline(&mut state.form.email),
    );
    ui.add_space(6.0);
    ui.label("Password");
    ui.add_sized(
        [400.0, 28.0],
        egui::TextEdit::singleline(&mut state.form.password).password(true),
    );
    ui.add_space(6.0);
    ui.label("Confirm password");
    ui.add_sized(
        [400.0, 28.0],
        egui::TextEdit::singleline(&mut state.form.confirm_password).password(true),
    );
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if let Some(captcha) = &state.captcha {
            paint_captcha(ui, captcha);
        }
        if ui.button("New code").clicked() {
            refresh_captcha(&mut state);
        }
    });
    ui.label("Type the characters above");
    ui.add_sized(
        [200.0, 28.0],
        egui::TextEdit::singleline(&mut state.captcha_answer),
    );
    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!submitting, egui::Button::new("Create account"))
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

    if submitting {
        ui.ctx().request_repaint();
    }
}
