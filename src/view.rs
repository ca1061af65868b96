//! The 3D system view: projection, painting, and pointer picking.

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};
use itertools::Itertools;
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};
use orrery::{
    bodies::BodyId,
    engine::{CameraFrame, Engine, FrameSnapshot},
};

/// Vertical field of view of the view camera.
const FOV_Y: f64 = 60.0 * std::f64::consts::PI / 180.0;
const Z_NEAR: f64 = 0.1;
const Z_FAR: f64 = 2_000_000.0;
/// Line segments per orbit ring.
const ORBIT_SEGMENTS: usize = 128;
/// Radians of camera rotation per pixel dragged.
const ORBIT_SPEED: f64 = 0.008;
/// Zoom scaling per scroll unit.
const ZOOM_SPEED: f64 = 0.003;
const STAR_COUNT: u64 = 400;
/// Minimum on-screen radius so distant bodies stay clickable.
const MIN_SCREEN_RADIUS: f32 = 2.0;
const PICK_SLOP: f32 = 8.0;

pub struct SystemView {
    pub show_labels: bool,
}

impl Default for SystemView {
    fn default() -> Self {
        Self { show_labels: true }
    }
}

/// Perspective projection of world points into a screen rect.
struct Projector {
    view: Isometry3<f64>,
    proj: Perspective3<f64>,
    rect: Rect,
}

impl Projector {
    fn new(camera: &CameraFrame, rect: Rect) -> Self {
        let eye = Point3::from(camera.position);
        let target = Point3::from(camera.look_at);
        let view = Isometry3::look_at_rh(&eye, &target, &Vector3::y());
        let aspect = f64::from(rect.width()) / f64::from(rect.height());
        let proj = Perspective3::new(aspect, FOV_Y, Z_NEAR, Z_FAR);
        Self { view, proj, rect }
    }

    /// Screen position and view depth, or `None` when behind the
    /// camera.
    fn project(&self, world: Vector3<f64>) -> Option<(Pos2, f64)> {
        let v = self.view.transform_point(&Point3::from(world));
        if v.z >= -Z_NEAR {
            return None;
        }
        let ndc = self.proj.project_point(&v);
        let x = self.rect.center().x + (ndc.x as f32) * self.rect.width() / 2.0;
        let y = self.rect.center().y - (ndc.y as f32) * self.rect.height() / 2.0;
        Some((Pos2::new(x, y), -v.z))
    }

    fn screen_radius(&self, world_radius: f64, depth: f64) -> f32 {
        let scale = f64::from(self.rect.height()) / 2.0 / libm::tan(FOV_Y / 2.0);
        (world_radius / depth * scale) as f32
    }

    /// World-space right and up vectors of the view plane, for
    /// panning.
    fn view_axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        let inverse = self.view.rotation.inverse();
        (inverse * Vector3::x(), inverse * Vector3::y())
    }
}

fn color32(packed: u32) -> Color32 {
    Color32::from_rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

impl SystemView {
    pub fn show(&mut self, ui: &mut egui::Ui, engine: &mut Engine, snapshot: &FrameSnapshot) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let projector = Projector::new(&snapshot.camera, rect);

        paint_starfield(&painter, rect);
        self.paint_orbits(&painter, engine, snapshot, &projector);
        self.paint_bodies(&painter, engine, snapshot, &projector);

        // Input lands on the next frame's snapshot.
        if response.double_clicked() {
            engine.reset_view();
        } else if response.clicked() {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pos| pick_body(engine, snapshot, &projector, pos));
            engine.pick(hit.as_deref());
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            engine.camera_orbit(
                f64::from(delta.x) * ORBIT_SPEED,
                f64::from(delta.y) * ORBIT_SPEED,
            );
        }
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            let (right, up) = projector.view_axes();
            let distance = (snapshot.camera.position - snapshot.camera.look_at).norm();
            let scale = distance * 0.002;
            engine.camera_pan(
                (right * -f64::from(delta.x) + up * f64::from(delta.y)) * scale,
            );
        }
        if response.hovered() {
            let scroll = ui.input(|i| f64::from(i.smooth_scroll_delta.y));
            if scroll != 0.0 {
                engine.camera_zoom((-scroll * ZOOM_SPEED).exp());
            }
        }
    }

    fn paint_orbits(
        &self,
        painter: &egui::Painter,
        engine: &Engine,
        snapshot: &FrameSnapshot,
        projector: &Projector,
    ) {
        for (id, body) in engine.registry().bodies() {
            if engine.registry().orbital_index(id).is_none() {
                continue;
            }
            let radius = engine.orbit_radius(id);
            let selected = snapshot.bodies[id.0].selected;
            let color = color32(body.color);
            // The selected body's orbit is highlighted, the rest stay
            // faint.
            let stroke = if selected {
                Stroke::new(2.5, color)
            } else {
                Stroke::new(1.2, color.gamma_multiply(0.5))
            };
            paint_world_circle(painter, projector, Vector3::zeros(), radius, stroke);
        }
    }

    fn paint_bodies(
        &self,
        painter: &egui::Painter,
        engine: &Engine,
        snapshot: &FrameSnapshot,
        projector: &Projector,
    ) {
        // Far to near, so closer bodies paint over farther ones.
        let mut order: Vec<(usize, Pos2, f64)> = snapshot
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(ix, b)| {
                projector
                    .project(b.position)
                    .map(|(pos, depth)| (ix, pos, depth))
            })
            .collect();
        order.sort_by(|a, b| b.2.total_cmp(&a.2));

        for (ix, pos, depth) in order {
            let frame = &snapshot.bodies[ix];
            let body = engine.registry().by_id(frame.id);
            let radius = projector
                .screen_radius(body.radius, depth)
                .max(MIN_SCREEN_RADIUS);
            let color = color32(body.color);

            if body.is_star {
                painter.circle_filled(pos, radius * 1.5, color.gamma_multiply(0.25));
            }
            if let Some(rings) = &body.rings {
                let mid = (rings.inner_radius + rings.outer_radius) / 2.0;
                let width = projector
                    .screen_radius(rings.outer_radius - rings.inner_radius, depth)
                    .max(1.0);
                paint_world_circle(
                    painter,
                    projector,
                    frame.position,
                    mid,
                    Stroke::new(width, color32(rings.color).gamma_multiply(0.7)),
                );
            }
            painter.circle_filled(pos, radius, color);
            if frame.selected {
                painter.circle_stroke(pos, radius + 2.0, Stroke::new(1.5, Color32::WHITE));
            }
            if self.show_labels {
                painter.text(
                    Pos2::new(pos.x, pos.y - radius - 4.0),
                    Align2::CENTER_BOTTOM,
                    frame.name.as_ref(),
                    FontId::proportional(12.0),
                    Color32::from_gray(220),
                );
            }
        }
    }
}

/// Deterministic screen-space star backdrop.
fn paint_starfield(painter: &egui::Painter, rect: Rect) {
    let mut state: u64 = 0x5eed_5eed_5eed_5eed;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 40) as f32 / 16_777_216.0
    };
    for _ in 0..STAR_COUNT {
        let x = rect.left() + next() * rect.width();
        let y = rect.top() + next() * rect.height();
        let size = 0.4 + next() * 1.1;
        let alpha = (40.0 + next() * 160.0) as u8;
        painter.circle_filled(
            Pos2::new(x, y),
            size,
            Color32::from_rgba_unmultiplied(255, 255, 255, alpha),
        );
    }
}

/// Project and stroke a world-space circle lying in the orbital plane.
fn paint_world_circle(
    painter: &egui::Painter,
    projector: &Projector,
    center: Vector3<f64>,
    radius: f64,
    stroke: Stroke,
) {
    let projected = (0..=ORBIT_SEGMENTS).map(|step| {
        let angle = step as f64 / ORBIT_SEGMENTS as f64 * std::f64::consts::TAU;
        let world = center + Vector3::new(libm::cos(angle) * radius, 0.0, libm::sin(angle) * radius);
        projector.project(world).map(|(pos, _)| pos)
    });
    // Segments with an endpoint behind the camera are skipped.
    for pair in projected.tuple_windows() {
        if let (Some(a), Some(b)) = pair {
            painter.add(Shape::line_segment([a, b], stroke));
        }
    }
}

/// Hit-test a click against each body's projected position and radius.
/// The nearest intersected body (smallest view depth) wins; no
/// intersection returns `None`.
fn pick_body(
    engine: &Engine,
    snapshot: &FrameSnapshot,
    projector: &Projector,
    pointer: Pos2,
) -> Option<String> {
    let mut best: Option<(f64, BodyId)> = None;
    for frame in &snapshot.bodies {
        let Some((pos, depth)) = projector.project(frame.position) else {
            continue;
        };
        let body = engine.registry().by_id(frame.id);
        let radius = projector
            .screen_radius(body.radius, depth)
            .max(MIN_SCREEN_RADIUS)
            + PICK_SLOP;
        if pos.distance(pointer) <= radius && best.map_or(true, |(d, _)| depth < d) {
            best = Some((depth, frame.id));
        }
    }
    best.map(|(_, id)| engine.registry().by_id(id).name.as_ref().to_owned())
}
