#![deny(missing_docs)]

//! Entry point for the egui-based aelens dashboard.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use aelens::config;
use aelens::dashboard::{DashboardApp, MIN_VIEWPORT_SIZE};
use aelens::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_title("aelens");
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "aelens",
        native_options,
        Box::new(|_cc| match launch() {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => {
                tracing::error!("Failed to start dashboard: {err}");
                Ok(Box::new(LaunchError { message: err }))
            }
        }),
    )?;
    Ok(())
}

fn launch() -> Result<DashboardApp, String> {
    let settings =
        config::load_or_default().map_err(|err| format!("Failed to load config: {err}"))?;
    DashboardApp::new(settings)
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start dashboard");
                ui.label(&self.message);
            });
        });
    }
}
