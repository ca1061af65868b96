//! The per-frame simulation step.
//!
//! One `advance()` call per rendered frame replaces the original's
//! tangle of timer callbacks and tween libraries: it ticks the clock,
//! evaluates every body, steps the camera against live positions, and
//! hands the presentation layer a plain snapshot to draw.

use std::sync::Arc;

use color_eyre::eyre;
use nalgebra::Vector3;
use tracing::warn;

use crate::{
    bodies::{BodyId, Registry},
    camera::CameraController,
    catalog,
    orbit,
    sim::SimState,
    time::SimTime,
};

/// Per-body output for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyFrame {
    pub id: BodyId,
    pub name: Arc<str>,
    pub position: Vector3<f64>,
    pub rotation_angle: f64,
    pub selected: bool,
}

/// Camera output for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Vector3<f64>,
    pub look_at: Vector3<f64>,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub bodies: Vec<BodyFrame>,
    pub camera: CameraFrame,
}

/// Owns the registry, simulation state, camera, and the per-body
/// rotation accumulators. Single-threaded and frame-driven; every
/// mutation happens inside one frame callback.
pub struct Engine {
    registry: Registry,
    sim: SimState,
    camera: CameraController,
    rotations: Vec<f64>,
}

impl Engine {
    /// An engine over the built-in solar system, starting at the
    /// current wall-clock date.
    pub fn solar_system() -> eyre::Result<Self> {
        Ok(Self::new(catalog::solar_system()?, SimState::new()))
    }

    pub fn new(registry: Registry, sim: SimState) -> Self {
        let camera = CameraController::new(registry.max_orbit_radius());
        let rotations = vec![0.0; registry.len()];
        Self {
            registry,
            sim,
            camera,
            rotations,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Advance one frame and emit the draw snapshot. Effects of frame
    /// N are visible to frame N+1; nothing blocks in between.
    pub fn advance(&mut self) -> FrameSnapshot {
        self.sim.tick();
        let t = self.sim.time().days();

        let mut bodies = Vec::with_capacity(self.registry.len());
        for (id, body) in self.registry.bodies() {
            // Pausing freezes self-rotation along with the clock.
            if self.sim.is_playing() {
                self.rotations[id.0] += orbit::rotation_step(body.rotation_period_days);
            }
            bodies.push(BodyFrame {
                id,
                name: body.name.clone(),
                position: orbit::world_position(&self.registry, id, t),
                rotation_angle: self.rotations[id.0],
                selected: self.sim.selected().is_some_and(|s| **s == *body.name),
            });
        }

        let followed = self
            .sim
            .selected()
            .filter(|_| self.sim.is_following())
            .and_then(|name| self.registry.get_id(name.as_ref()))
            .map(|id| bodies[id.0].position);
        self.camera.advance(followed);

        FrameSnapshot {
            bodies,
            camera: CameraFrame {
                position: self.camera.position(),
                look_at: self.camera.target(),
            },
        }
    }

    /// Programmatic selection. Unknown names are a no-op; prior state
    /// is retained.
    pub fn focus_body(&mut self, name: &str) {
        let Some(id) = self.registry.get_id(name) else {
            warn!(name, "focus on unknown body ignored");
            return;
        };
        let body = self.registry.by_id(id).clone();
        let position = orbit::world_position(&self.registry, id, self.sim.time().days());
        self.camera
            .focus(&mut self.sim, body.name.clone(), position, body.radius, body.is_star);
    }

    /// A pointer pick forwarded from the presentation layer's
    /// hit-testing. `None` (no intersection) leaves the previous
    /// selection untouched.
    pub fn pick(&mut self, hit: Option<&str>) {
        if let Some(name) = hit {
            self.focus_body(name);
        }
    }

    pub fn reset_view(&mut self) {
        self.camera
            .reset(&mut self.sim, self.registry.max_orbit_radius());
    }

    pub fn stop_following(&mut self) {
        self.camera.stop_following(&mut self.sim);
    }

    pub fn toggle_playing(&mut self) {
        self.sim.toggle_playing();
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.sim.set_rate(rate);
    }

    pub fn set_time(&mut self, time: SimTime) {
        self.sim.set_time(time);
    }

    /// Display orbit radius of a body, for drawing its orbit ring.
    pub fn orbit_radius(&self, id: BodyId) -> f64 {
        orbit::display_orbit_radius(&self.registry, id)
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.camera.toggle_auto_rotate();
    }

    pub fn camera_orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        self.camera.orbit(delta_yaw, delta_pitch);
    }

    pub fn camera_zoom(&mut self, factor: f64) {
        self.camera.zoom(factor);
    }

    pub fn camera_pan(&mut self, delta: Vector3<f64>) {
        self.camera.pan(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{FocusState, TRANSITION_FRAMES};
    use crate::sim::FIXED_STEP;

    fn engine() -> Engine {
        let registry = catalog::solar_system().unwrap();
        Engine::new(registry, SimState::starting_at(SimTime::default()))
    }

    #[test]
    fn snapshot_covers_all_bodies() {
        let mut engine = engine();
        let snapshot = engine.advance();
        assert_eq!(snapshot.bodies.len(), engine.registry().len());
        assert_eq!(snapshot.bodies[0].name.as_ref(), "Sun");
        assert_eq!(snapshot.bodies[0].position, Vector3::zeros());
    }

    #[test]
    fn rotation_accumulates_across_rate_changes() {
        let mut engine = engine();
        engine.advance();
        let first = engine.advance().bodies[1].rotation_angle;
        engine.set_rate(300.0);
        let second = engine.advance().bodies[1].rotation_angle;
        // The per-frame spin increment is continuous regardless of the
        // simulation rate.
        assert!((second - first * 1.5).abs() < 1e-9);
    }

    #[test]
    fn focus_then_follow_converges_to_live_position() {
        let mut engine = engine();
        engine.focus_body("Earth");
        assert_eq!(engine.sim().selected().map(|s| s.as_ref()), Some("Earth"));
        for _ in 0..TRANSITION_FRAMES {
            engine.advance();
        }
        assert!(matches!(engine.camera().state(), FocusState::Following(_)));
        let mut snapshot = engine.advance();
        for _ in 0..600 {
            snapshot = engine.advance();
        }
        let earth = engine.registry().get_id("Earth").unwrap();
        let earth_pos = snapshot.bodies[earth.0].position;
        // Earth moves ~1% of its orbit while the target chases it, so
        // allow a smoothing lag proportional to its speed.
        assert!((snapshot.camera.look_at - earth_pos).norm() < 100.0);
    }

    #[test]
    fn unknown_focus_and_empty_pick_are_noops() {
        let mut engine = engine();
        engine.focus_body("Earth");
        let state = engine.camera().state().clone();
        engine.focus_body("Vulcan");
        assert_eq!(*engine.camera().state(), state);
        engine.pick(None);
        assert_eq!(*engine.camera().state(), state);
        assert_eq!(engine.sim().selected().map(|s| s.as_ref()), Some("Earth"));
    }

    #[test]
    fn selected_flag_set_on_exactly_one_body() {
        let mut engine = engine();
        engine.pick(Some("Mars"));
        let snapshot = engine.advance();
        let selected: Vec<_> = snapshot
            .bodies
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.name.as_ref().to_owned())
            .collect();
        assert_eq!(selected, vec!["Mars".to_owned()]);
    }

    #[test]
    fn reset_after_focus() {
        let mut engine = engine();
        engine.focus_body("Neptune");
        engine.advance();
        engine.reset_view();
        assert_eq!(*engine.camera().state(), FocusState::Idle);
        assert!(engine.sim().selected().is_none());
    }

    #[test]
    fn pause_freezes_positions_and_rotation() {
        let mut engine = engine();
        engine.toggle_playing();
        let a = engine.advance();
        let b = engine.advance();
        assert_eq!(a.bodies[3].position, b.bodies[3].position);
        assert_eq!(a.bodies[3].rotation_angle, b.bodies[3].rotation_angle);
        engine.toggle_playing();
        let c = engine.advance();
        assert_ne!(b.bodies[3].position, c.bodies[3].position);
        assert!(c.bodies[3].rotation_angle > b.bodies[3].rotation_angle);
    }

    #[test]
    fn time_advances_by_fixed_step() {
        let mut engine = engine();
        engine.set_rate(100.0);
        let before = engine.sim().time().days();
        engine.advance();
        let after = engine.sim().time().days();
        assert!((after - before - 100.0 * FIXED_STEP).abs() < 1e-9);
    }
}
