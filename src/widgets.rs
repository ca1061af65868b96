//! Reusable input widgets.

use std::sync::OnceLock;

use orrery::time::SimTime;
use time::{format_description::FormatItem, PrimitiveDateTime};

const DATE_TIME_FORMAT: &str = "[year]-[month]-[day] [hour]:[minute]";

fn date_time_format() -> &'static [FormatItem<'static>] {
    static FORMAT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FORMAT.get_or_init(|| {
        time::format_description::parse(DATE_TIME_FORMAT).expect("static format description")
    })
}

pub fn parse_date_time(buf: &str) -> Option<SimTime> {
    PrimitiveDateTime::parse(buf.trim(), date_time_format())
        .ok()
        .map(|dt| SimTime::from_datetime(dt.assume_utc()))
}

pub fn format_date_time(time: SimTime) -> String {
    time.to_datetime()
        .format(date_time_format())
        .unwrap_or_else(|_| time.to_string())
}

/// A single-line date/time input that re-parses on every frame and
/// shows a red border while the buffer does not parse.
pub struct DateTimeInput<'a> {
    buf: &'a mut String,
    parsed: &'a mut Option<SimTime>,
    desired_width: Option<f32>,
}

impl<'a> DateTimeInput<'a> {
    pub fn new(
        buf: &'a mut String,
        parsed: &'a mut Option<SimTime>,
        desired_width: Option<f32>,
    ) -> Self {
        Self {
            buf,
            parsed,
            desired_width,
        }
    }
}

impl egui::Widget for DateTimeInput<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        ui.scope(|ui| {
            *self.parsed = parse_date_time(self.buf);
            if self.parsed.is_none() {
                let visuals = ui.visuals_mut();
                visuals.selection.stroke.color = egui::Color32::from_rgb(255, 0, 0);
                visuals.widgets.active.bg_stroke.color = egui::Color32::from_rgb(255, 0, 0);
                visuals.widgets.active.bg_stroke.width = 1.0;
                // Only show a passive red border if our buffer is not empty
                if !self.buf.trim().is_empty() {
                    visuals.widgets.inactive.bg_stroke.color = egui::Color32::from_rgb(255, 0, 0);
                    visuals.widgets.inactive.bg_stroke.width = 1.0;
                }
                visuals.widgets.hovered.bg_stroke.color = egui::Color32::from_rgb(255, 0, 0);
                visuals.widgets.hovered.bg_stroke.width = 1.0;
            }

            let edit = egui::TextEdit::singleline(self.buf).hint_text(DATE_TIME_FORMAT);
            let edit = if let Some(desired_width) = self.desired_width {
                edit.desired_width(desired_width)
            } else {
                edit
            };
            edit.show(ui).response
        })
        .inner
    }
}
