//! Control panels: transport, speed, date picker, info, and the body
//! roster.

use egui_extras::{Column, TableBuilder};
use egui_notify::Toasts;
use orrery::{catalog, engine::Engine, sim::SimState, time::SimTime};

use crate::{
    view::SystemView,
    widgets::{format_date_time, DateTimeInput},
    Displays,
};

pub struct Controls {
    speed_slider: f64,
    date_buf: String,
    date_parsed: Option<SimTime>,
}

impl Controls {
    pub fn new(engine: &Engine) -> Self {
        Self {
            speed_slider: 0.0,
            date_buf: format_date_time(engine.sim().time()),
            date_parsed: None,
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        engine: &mut Engine,
        view: &mut SystemView,
        dis: &mut Displays,
        toasts: &mut Toasts,
    ) {
        ui.horizontal(|ui| {
            let play_label = if engine.sim().is_playing() {
                "⏸ Pause"
            } else {
                "▶ Play"
            };
            if ui.button(play_label).clicked() {
                engine.toggle_playing();
            }
            if ui
                .button("Reset")
                .on_hover_text("Overview of the whole system (R)")
                .clicked()
            {
                engine.reset_view();
            }
            ui.toggle_value(&mut view.show_labels, "Labels");
            ui.toggle_value(&mut dis.roster, "Bodies");

            ui.separator();

            let slider = egui::Slider::new(&mut self.speed_slider, 0.0..=100.0)
                .show_value(false)
                .text("Speed");
            if ui.add(slider).changed() {
                engine.set_rate(SimState::rate_from_slider(self.speed_slider));
            }
            let rate = engine.sim().rate();
            if rate >= 365.0 {
                ui.monospace(format!("{:.1} years/sec", rate / 365.25));
            } else {
                ui.monospace(format!("{rate:.1} days/sec"));
            }

            ui.separator();

            ui.monospace(format!("{} UTC", format_date_time(engine.sim().time())));
            ui.add(DateTimeInput::new(
                &mut self.date_buf,
                &mut self.date_parsed,
                Some(120.0),
            ));
            if ui.button("Set date").clicked() {
                match self.date_parsed {
                    Some(time) => engine.set_time(time),
                    None => {
                        toasts.error("unparsable date/time, expected YYYY-MM-DD HH:MM");
                    }
                }
            }
            if ui
                .button("Now")
                .on_hover_text("Jump to the current date")
                .clicked()
            {
                let now = SimTime::now();
                engine.set_time(now);
                self.date_buf = format_date_time(now);
            }
        });
    }
}

/// Description and orbital metadata of the selected body, plus the
/// follow indicator.
#[derive(Default)]
pub struct InfoPanel;

impl InfoPanel {
    pub fn show(&mut self, ctx: &egui::Context, engine: &mut Engine) {
        let Some(name) = engine.sim().selected().cloned() else {
            return;
        };
        // A stale selection (name no longer in the registry) simply
        // renders nothing.
        let Some(body) = engine.registry().get(&name).cloned() else {
            return;
        };
        let distance = catalog::format_distance(engine.registry(), &name);

        egui::Window::new(name.as_ref())
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .show(ctx, |ui| {
                ui.label(body.description.as_ref());
                ui.separator();
                egui::Grid::new("body-metadata").num_columns(2).show(ui, |ui| {
                    ui.label("Orbital period");
                    ui.monospace(body.format_orbit_period());
                    ui.end_row();
                    ui.label("Rotation period");
                    ui.monospace(body.format_rotation_period());
                    ui.end_row();
                    ui.label("Distance");
                    ui.monospace(distance.unwrap_or_else(|| "N/A".into()));
                    ui.end_row();
                });
                if engine.sim().is_following() {
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.label(format!("Following: {name}"));
                        if ui.button("Stop following").clicked() {
                            engine.stop_following();
                        }
                    });
                }
            });
    }
}

/// Table of every catalog body with focus shortcuts.
#[derive(Default)]
pub struct Roster;

impl Roster {
    pub fn show(&mut self, ctx: &egui::Context, engine: &mut Engine, open: &mut bool) {
        struct Row {
            name: String,
            period: String,
            rotation: String,
            distance: String,
        }
        let rows: Vec<Row> = engine
            .registry()
            .bodies()
            .map(|(_, body)| Row {
                name: body.name.as_ref().to_owned(),
                period: body.format_orbit_period(),
                rotation: body.format_rotation_period(),
                distance: catalog::format_distance(engine.registry(), &body.name)
                    .unwrap_or_else(|| "N/A".into()),
            })
            .collect();

        let mut focus = None;
        egui::Window::new("Bodies").open(open).show(ctx, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(72.0))
                .column(Column::auto().at_least(120.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(72.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Name");
                    });
                    header.col(|ui| {
                        ui.strong("Orbital period");
                    });
                    header.col(|ui| {
                        ui.strong("Rotation");
                    });
                    header.col(|ui| {
                        ui.strong("Distance");
                    });
                    header.col(|_| {});
                })
                .body(|mut table| {
                    for row in &rows {
                        table.row(18.0, |mut cols| {
                            cols.col(|ui| {
                                ui.label(&row.name);
                            });
                            cols.col(|ui| {
                                ui.label(&row.period);
                            });
                            cols.col(|ui| {
                                ui.label(&row.rotation);
                            });
                            cols.col(|ui| {
                                ui.label(&row.distance);
                            });
                            cols.col(|ui| {
                                if ui.small_button("Focus").clicked() {
                                    focus = Some(row.name.clone());
                                }
                            });
                        });
                    }
                });
        });
        if let Some(name) = focus {
            engine.focus_body(&name);
        }
    }
}
