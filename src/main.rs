#![warn(clippy::unwrap_used, clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::struct_field_names,
    clippy::struct_excessive_bools
)]

use color_eyre::eyre::{self, eyre};
use egui_notify::Toasts;
use orrery::engine::Engine;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use controls::{Controls, InfoPanel, Roster};
use view::SystemView;

mod controls;
mod view;
mod widgets;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let engine = Engine::solar_system()?;
    info!(bodies = engine.registry().len(), "catalog loaded");

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Orrery",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(App::new(engine)))
        }),
    )
    .map_err(|e| eyre!("failed to start application: {e}"))?;
    Ok(())
}

/// Which auxiliary windows are open.
#[derive(Default)]
struct Displays {
    roster: bool,
}

struct App {
    engine: Engine,
    view: SystemView,
    controls: Controls,
    info: InfoPanel,
    roster: Roster,
    dis: Displays,
    toasts: Toasts,
}

impl App {
    fn new(engine: Engine) -> Self {
        Self {
            controls: Controls::new(&engine),
            engine,
            view: SystemView::default(),
            info: InfoPanel::default(),
            roster: Roster::default(),
            dis: Displays::default(),
            toasts: Toasts::default(),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::R) {
                self.engine.reset_view();
            }
            if i.key_pressed(egui::Key::Escape) {
                self.engine.stop_following();
            }
            if i.key_pressed(egui::Key::Space) {
                self.engine.toggle_playing();
            }
            if i.key_pressed(egui::Key::A) {
                self.engine.toggle_auto_rotate();
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        // One simulation step per rendered frame; everything below
        // draws this snapshot. UI input lands on the next frame.
        let snapshot = self.engine.advance();

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            self.controls.show(
                ui,
                &mut self.engine,
                &mut self.view,
                &mut self.dis,
                &mut self.toasts,
            );
        });

        self.info.show(ctx, &mut self.engine);
        if self.dis.roster {
            self.roster
                .show(ctx, &mut self.engine, &mut self.dis.roster);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                self.view.show(ui, &mut self.engine, &snapshot);
            });

        self.toasts.show(ctx);
        ctx.request_repaint();
    }
}
