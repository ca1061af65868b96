//! Selection and camera control.
//!
//! A small state machine (`Idle` → `Selected` → `Following`) plus the
//! camera's look-at target and position. Transitions are incremental
//! per-frame interpolation steps; nothing here blocks the frame loop.
//! Only one transition is ever in flight: a new `focus` overwrites the
//! previous one instead of queueing behind it.

use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{catalog::MIN_ORBIT_DISPLAY, sim::SimState};

/// Exponential smoothing factor for the look-at target while
/// following.
pub const FOLLOW_SMOOTHING: f64 = 0.1;
/// Frames a focus transition takes (~1 s at 60 fps).
pub const TRANSITION_FRAMES: u32 = 60;
/// Viewing offset per unit of display radius, star vs. ordinary body.
/// The star gets the larger multiplier to match its visual size.
pub const STAR_VIEW_MULTIPLIER: f64 = 20.0;
pub const BODY_VIEW_MULTIPLIER: f64 = 15.0;
/// Overview distance as a multiple of the farthest orbit radius.
pub const OVERVIEW_DISTANCE_FACTOR: f64 = 3.5;
/// Zoom clamp.
pub const MIN_VIEW_DISTANCE: f64 = 10.0;
pub const MAX_VIEW_DISTANCE: f64 = 500_000.0;
/// Yaw per frame while auto-rotation is on; a slow idle drift around
/// the target.
pub const AUTO_ROTATE_STEP: f64 = std::f64::consts::TAU / 3600.0 * 0.1;

/// Which body, if any, the camera is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusState {
    Idle,
    /// A body is selected; the camera transition has not started yet.
    Selected(Arc<str>),
    /// The look-at target tracks the body's live position every frame.
    Following(Arc<str>),
}

/// An in-flight eased interpolation toward a focused body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Transition {
    target_from: Vector3<f64>,
    target_to: Vector3<f64>,
    position_from: Vector3<f64>,
    position_to: Vector3<f64>,
    frame: u32,
}

/// Quadratic ease-in-out over `t` in 0..=1.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn lerp(a: Vector3<f64>, b: Vector3<f64>, t: f64) -> Vector3<f64> {
    a + (b - a) * t
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraController {
    position: Vector3<f64>,
    target: Vector3<f64>,
    state: FocusState,
    transition: Option<Transition>,
    auto_rotate: bool,
}

impl CameraController {
    /// A camera at the default overview of a system whose farthest
    /// orbit is `max_orbit_radius`.
    pub fn new(max_orbit_radius: f64) -> Self {
        let mut camera = Self {
            position: Vector3::zeros(),
            target: Vector3::zeros(),
            state: FocusState::Idle,
            transition: None,
            auto_rotate: false,
        };
        camera.overview(max_orbit_radius);
        camera
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn target(&self) -> Vector3<f64> {
        self.target
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
        debug!(on = self.auto_rotate, "auto-rotation toggled");
    }

    /// Select `name` and start an eased transition of the look-at
    /// target toward the body and of the camera toward a viewing
    /// offset proportional to the body's display radius. Overwrites
    /// any in-flight transition.
    pub fn focus(
        &mut self,
        sim: &mut SimState,
        name: Arc<str>,
        world_pos: Vector3<f64>,
        radius: f64,
        is_star: bool,
    ) {
        let multiplier = if is_star {
            STAR_VIEW_MULTIPLIER
        } else {
            BODY_VIEW_MULTIPLIER
        };
        let distance = radius * multiplier;
        let offset = Vector3::new(distance, distance / 2.0, distance);
        debug!(body = %name, ?world_pos, distance, "focusing camera");
        self.transition = Some(Transition {
            target_from: self.target,
            target_to: world_pos,
            position_from: self.position,
            position_to: world_pos + offset,
            frame: 0,
        });
        self.state = FocusState::Selected(name.clone());
        sim.set_selection(Some(name), true);
    }

    /// Advance the camera one frame. `followed_pos` resolves the
    /// followed body's live world position; it must be current, not
    /// the one captured at focus time, since the body keeps moving.
    pub fn advance(&mut self, followed_pos: Option<Vector3<f64>>) {
        if let FocusState::Selected(name) = &self.state {
            if self.transition.is_some() {
                self.state = FocusState::Following(name.clone());
            }
        }

        if let Some(transition) = &mut self.transition {
            transition.frame += 1;
            let t = ease_in_out(f64::from(transition.frame) / f64::from(TRANSITION_FRAMES));
            self.target = lerp(transition.target_from, transition.target_to, t);
            self.position = lerp(transition.position_from, transition.position_to, t);
            if transition.frame >= TRANSITION_FRAMES {
                self.transition = None;
            }
            return;
        }

        if let FocusState::Following(_) = &self.state {
            if let Some(body_pos) = followed_pos {
                // Smooth re-aim, never a hard snap; the camera position
                // keeps the user's chosen offset from the target so
                // zoom and rotation stay live while following.
                let new_target = lerp(self.target, body_pos, FOLLOW_SMOOTHING);
                self.position += new_target - self.target;
                self.target = new_target;
            }
        }

        if self.auto_rotate {
            self.orbit(AUTO_ROTATE_STEP, 0.0);
        }
    }

    /// Stop tracking; the camera stays wherever it currently is.
    pub fn stop_following(&mut self, sim: &mut SimState) {
        debug!("stopped following");
        self.state = FocusState::Idle;
        self.transition = None;
        sim.set_selection(None, false);
    }

    /// Clear selection and restore the default overview of the whole
    /// system.
    pub fn reset(&mut self, sim: &mut SimState, max_orbit_radius: f64) {
        self.state = FocusState::Idle;
        self.transition = None;
        sim.set_selection(None, false);
        self.overview(max_orbit_radius);
    }

    fn overview(&mut self, max_orbit_radius: f64) {
        let view = max_orbit_radius.max(MIN_ORBIT_DISPLAY) * OVERVIEW_DISTANCE_FACTOR;
        self.position = Vector3::new(view, view / 2.0, view);
        self.target = Vector3::zeros();
    }

    /// Rotate the camera around the target (user drag input).
    pub fn orbit(&mut self, delta_yaw: f64, delta_pitch: f64) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius == 0.0 {
            return;
        }
        let mut yaw = libm::atan2(offset.z, offset.x);
        let mut pitch = libm::asin((offset.y / radius).clamp(-1.0, 1.0));
        yaw += delta_yaw;
        pitch = (pitch + delta_pitch).clamp(-1.54, 1.54);
        self.position = self.target
            + radius
                * Vector3::new(
                    libm::cos(pitch) * libm::cos(yaw),
                    libm::sin(pitch),
                    libm::cos(pitch) * libm::sin(yaw),
                );
    }

    /// Scale the camera's distance to the target (scroll input),
    /// clamped to the zoom range.
    pub fn zoom(&mut self, factor: f64) {
        let offset = self.position - self.target;
        let distance = (offset.norm() * factor).clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE);
        if let Some(direction) = offset.try_normalize(1e-12) {
            self.position = self.target + direction * distance;
        }
    }

    /// Translate target and position together in the view plane.
    pub fn pan(&mut self, delta: Vector3<f64>) {
        self.position += delta;
        self.target += delta;
    }
}
