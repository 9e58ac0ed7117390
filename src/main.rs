#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod assets;
mod behavior;
mod chat;
mod config;
mod dialogue;
mod mood;
mod probe;
mod scheduler;
mod typewriter;

use anyhow::Result;
use eframe::egui;

use crate::app::Deskmate;
use crate::config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load();
    let title = config.companion_name.clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(config.window_size)
            .with_position(config.window_pos)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false)
            .with_taskbar(false),
        ..Default::default()
    };

    eframe::run_native(&title, native_options, Box::new(|cc| Box::new(Deskmate::new(cc, config))))
        .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}
