//! Circular orbit evaluation.
//!
//! Positions are pre-scripted circular paths parameterized by period,
//! not integrated from forces. Orbits lie in the x-z plane; world
//! positions compose additively through the parent chain.

use std::f64::consts;

use nalgebra::Vector3;

use crate::{
    bodies::{Body, BodyId, Registry},
    catalog::{MIN_ORBIT_DISPLAY, MOON_CLEARANCE},
};

/// Divisor applied to `rotation_period_days` when accumulating the
/// per-frame self-rotation step.
pub const ROTATION_TIME_CONSTANT: f64 = 1000.0;

/// Angle swept by a body at simulated time `t_days`.
///
/// The result grows without bound; it is deliberately not reduced
/// modulo 2π, since sine and cosine are periodic anyway. A zero period
/// (the root body) pins the angle at 0 rather than dividing by zero.
pub fn orbital_angle(t_days: f64, period_days: f64) -> f64 {
    if period_days == 0.0 {
        return 0.0;
    }
    (t_days / period_days) * consts::TAU
}

/// Position on a circular orbit of radius `radius` at `angle`,
/// relative to the parent.
pub fn orbit_position(angle: f64, radius: f64) -> Vector3<f64> {
    Vector3::new(libm::cos(angle) * radius, 0.0, libm::sin(angle) * radius)
}

/// An orbit distance guaranteed to keep the orbiting body outside its
/// parent: at least `clearance` (> 1.0) times the parent's display
/// radius, regardless of physically-derived scale.
pub fn safe_orbit_distance(parent_radius: f64, desired: f64, clearance: f64) -> f64 {
    desired.max(parent_radius * clearance)
}

/// Nominal orbit radius clamped to the visibility floor (top-level
/// bodies only).
pub fn effective_orbit_radius(orbit_radius_raw: f64) -> f64 {
    orbit_radius_raw.max(MIN_ORBIT_DISPLAY)
}

/// Deterministic spacing added to a top-level body's display orbit,
/// derived from registry order. Keeps orbits apart when several raw
/// radii collapse to the visibility floor; a presentation concern on
/// top of the physical radius.
pub fn spacing_offset(orbital_index: usize) -> f64 {
    orbital_index as f64 * 50.0 + 50.0
}

/// The orbit radius a body is actually drawn (and simulated) at.
pub fn display_orbit_radius(registry: &Registry, id: BodyId) -> f64 {
    let body = registry.by_id(id);
    match registry.orbital_index(id) {
        Some(ix) => effective_orbit_radius(body.orbit_radius_raw) + spacing_offset(ix),
        None if body.parent.is_none() => 0.0,
        None => {
            // A moon: clear the parent's sphere by a wide margin.
            let parent = body
                .parent
                .as_deref()
                .and_then(|p| registry.get(p))
                .map_or(0.0, |p| p.radius);
            safe_orbit_distance(parent, body.orbit_radius_raw, MOON_CLEARANCE)
        }
    }
}

/// World position of a body at simulated time `t_days`: the parent
/// chain's positions plus the local orbital offset.
pub fn world_position(registry: &Registry, id: BodyId, t_days: f64) -> Vector3<f64> {
    let body = registry.by_id(id);
    let local = local_position(registry, id, body, t_days);
    match body.parent.as_deref().and_then(|p| registry.get_id(p)) {
        Some(parent) => world_position(registry, parent, t_days) + local,
        None => local,
    }
}

fn local_position(registry: &Registry, id: BodyId, body: &Body, t_days: f64) -> Vector3<f64> {
    if body.parent.is_none() {
        return Vector3::zeros();
    }
    let angle = orbital_angle(t_days, body.orbit_period_days);
    orbit_position(angle, display_orbit_radius(registry, id))
}

/// Per-frame self-rotation increment. Accumulated rather than
/// recomputed from absolute time, so rotation stays continuous across
/// rate changes.
pub fn rotation_step(rotation_period_days: f64) -> f64 {
    consts::TAU / (rotation_period_days * ROTATION_TIME_CONSTANT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::Body;
    use crate::catalog;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    fn two_body(orbit_radius: f64) -> Registry {
        let sun = Body {
            name: "Sun".into(),
            radius: 100.0,
            color: 0,
            orbit_radius_raw: 0.0,
            orbit_period_days: 0.0,
            rotation_period_days: 25.0,
            description: "".into(),
            parent: None,
            satellites: ["Earth".into()].into_iter().collect(),
            rings: None,
            is_star: true,
        };
        let earth = Body {
            name: "Earth".into(),
            radius: 12.0,
            color: 0,
            orbit_radius_raw: orbit_radius,
            orbit_period_days: 365.25,
            rotation_period_days: 1.0,
            description: "".into(),
            parent: Some("Sun".into()),
            satellites: [].into_iter().collect(),
            rings: None,
            is_star: false,
        };
        Registry::new(vec![sun, earth]).unwrap()
    }

    #[test]
    fn angle_grows_unbounded() {
        assert_close(orbital_angle(365.25, 365.25), consts::TAU);
        assert_close(orbital_angle(730.5, 365.25), 2.0 * consts::TAU);
        assert_eq!(orbital_angle(123.0, 0.0), 0.0);
    }

    #[test]
    fn position_at_exact_radius_for_all_t() {
        let registry = catalog::solar_system().unwrap();
        for (id, body) in registry.bodies() {
            if body.parent.as_deref() != Some("Sun") {
                continue;
            }
            let radius = display_orbit_radius(&registry, id);
            for t in [0.0, 1.5, 365.25, 9000.75] {
                let angle = orbital_angle(t, body.orbit_period_days);
                assert_close(orbit_position(angle, radius).norm(), radius);
            }
        }
    }

    #[test]
    fn periodicity() {
        let registry = catalog::solar_system().unwrap();
        for (id, body) in registry.bodies() {
            let Some(parent) = body.parent.as_deref().and_then(|p| registry.get_id(p)) else {
                continue;
            };
            let t = 42.0;
            let period = body.orbit_period_days;
            let a = world_position(&registry, id, t) - world_position(&registry, parent, t);
            let b = world_position(&registry, id, t + period)
                - world_position(&registry, parent, t + period);
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn earth_revolution_scenario() {
        // Sun (period 0) and Earth (period 365.25, radius 800): angle 0
        // at t=0 puts Earth at (800, 0), and again after one full
        // revolution. 800 is the visibility floor, so the raw radius
        // passes through unchanged; spacing is checked separately.
        assert_close(orbital_angle(0.0, 365.25), 0.0);
        let p0 = orbit_position(0.0, effective_orbit_radius(800.0));
        assert_close(p0.x, 800.0);
        assert_close(p0.z, 0.0);
        let p1 = orbit_position(orbital_angle(365.25, 365.25), 800.0);
        assert!((p0 - p1).norm() < 1e-6);
    }

    #[test]
    fn clearance_floor() {
        // Moon scenario from the catalog scale: desired 5 loses to
        // parent 12 * 3.0.
        assert_close(safe_orbit_distance(12.0, 5.0, 3.0), 36.0);
        assert_close(safe_orbit_distance(12.0, 50.0, 3.0), 50.0);
        assert!(safe_orbit_distance(12.0, 0.0, 3.0) >= 12.0 * 3.0);
    }

    #[test]
    fn visibility_floor_and_spacing() {
        assert_close(effective_orbit_radius(100.0), MIN_ORBIT_DISPLAY);
        assert_close(effective_orbit_radius(5000.0), 5000.0);
        assert_close(spacing_offset(0), 50.0);
        assert_close(spacing_offset(3), 200.0);

        let registry = two_body(100.0);
        let earth = registry.get_id("Earth").unwrap();
        assert_close(
            display_orbit_radius(&registry, earth),
            MIN_ORBIT_DISPLAY + 50.0,
        );
    }

    #[test]
    fn moon_composes_through_parent() {
        let registry = catalog::solar_system().unwrap();
        let earth = registry.get_id("Earth").unwrap();
        let moon = registry.get_id("Moon").unwrap();
        let t = 17.25;
        let offset = world_position(&registry, moon, t) - world_position(&registry, earth, t);
        let expected = safe_orbit_distance(
            registry.get("Earth").unwrap().radius,
            registry.get("Moon").unwrap().orbit_radius_raw,
            MOON_CLEARANCE,
        );
        assert_close(offset.norm(), expected);
        // The clearance floor wins over the physically-derived radius.
        assert!(expected > registry.get("Moon").unwrap().orbit_radius_raw);
    }

    #[test]
    fn rotation_step_matches_constant() {
        assert_close(rotation_step(1.0), consts::TAU / 1000.0);
        assert_close(rotation_step(0.5), consts::TAU / 500.0);
    }
}
