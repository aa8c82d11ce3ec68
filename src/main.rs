mod screens;

use std::fs;
use std::path::Path;

use codearena::services::config_loader::{self, ArenaConfig};
use eframe::egui;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, PartialEq, Eq)]
enum ArenaTab {
    Analyzer,
    Contests,
    NewProblem,
    Signup,
}

impl ArenaTab {
    const ALL: [ArenaTab; 4] = [
        ArenaTab::Analyzer,
        ArenaTab::Contests,
        ArenaTab::NewProblem,
        ArenaTab::Signup,
    ];

    fn title(self) -> &'static str {
        match self {
            ArenaTab::Analyzer => "Analyzer",
            ArenaTab::Contests => "Contests",
            ArenaTab::NewProblem => "New Problem",
            ArenaTab::Signup => "Sign Up",
        }
    }
}

struct ArenaApp {
    tab: ArenaTab,
    config: ArenaConfig,
}

impl ArenaApp {
    fn new(config: ArenaConfig) -> Self {
        Self {
            tab: ArenaTab::Analyzer,
            config,
        }
    }
}

impl eframe::App for ArenaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("arena_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in ArenaTab::ALL {
                    if ui
                        .selectable_label(self.tab == tab, tab.title())
                        .clicked()
                        && self.tab != tab
                    {
                        info!("Transition: {} -> {}", self.tab.title(), tab.title());
                        self.tab = tab;
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            match self.tab {
                ArenaTab::Analyzer => screens::analyzer::ui(ui, &self.config),
                ArenaTab::Contests => screens::contests::ui(ui),
                ArenaTab::NewProblem => screens::new_problem::ui(ui, &self.config),
                ArenaTab::Signup => screens::signup::ui(ui, &self.config),
            }
        });
    }
}

fn init_tracing() -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    let _ = fs::create_dir_all("logs");
    let file_appender = tracing_appender::rolling::daily("logs", "codearena.log");
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_target(true);

    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(err) = init_result {
        eprintln!("tracing init failed: {err}");
        return None;
    }

    Some(file_guard)
}

fn main() -> eframe::Result<()> {
    let _log_guard = init_tracing();
    info!("Starting CodeArena");

    let config = match config_loader::load_arena_config(Path::new(".")) {
        Ok(config) => config,
        Err(err) => {
            error!("Falling back to default config: {err:#}");
            ArenaConfig::default()
        }
    };
    info!(
        "Backend: {}, analysis spacing: {} ms",
        config.api_base_url, config.min_request_interval_ms
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CodeArena",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_pixels_per_point(1.1);

            let mut style = (*cc.egui_ctx.style()).clone();
            style
                .text_styles
                .insert(egui::TextStyle::Heading, egui::FontId::proportional(28.0));
            style
                .text_styles
                .insert(egui::TextStyle::Body, egui::FontId::proportional(16.0));
            style
                .text_styles
                .insert(egui::TextStyle::Button, egui::FontId::proportional(16.0));
            style.spacing.button_padding = egui::vec2(12.0, 6.0);
            cc.egui_ctx.set_style(style);

            Ok(Box::new(ArenaApp::new(config)))
        }),
    )
}
