//! Definitions of celestial bodies and the body registry.

use std::{collections::HashMap, sync::Arc};

use color_eyre::eyre::{self, bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Decorative ring system (display radii, no physical effect).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rings {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Packed `0xRRGGBB`.
    pub color: u32,
}

/// A celestial body.
///
/// All fields are display-scaled at catalog construction time and
/// immutable thereafter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Name of this body, unique within a registry.
    pub name: Arc<str>,
    /// Display radius of the body's sphere (pre-scaled for visibility,
    /// not true physical scale).
    pub radius: f64,
    /// Packed `0xRRGGBB` display color.
    pub color: u32,
    /// Nominal orbital distance around the parent, derived from the
    /// real-world distance. May be below the visibility floor.
    pub orbit_radius_raw: f64,
    /// Simulated days per revolution around the parent; `0` only for
    /// the root body.
    pub orbit_period_days: f64,
    /// Simulated days per spin on the body's own axis. May be
    /// fractional (sub-day).
    pub rotation_period_days: f64,
    /// Free-text description shown in the info panel.
    pub description: Arc<str>,
    /// The name of the parent body of this body, if any.
    pub parent: Option<Arc<str>>,
    /// A list of names of bodies orbiting this body, in registration
    /// order.
    pub satellites: Arc<[Arc<str>]>,
    /// Decorative rings, if any.
    pub rings: Option<Rings>,
    /// Is this the central star?
    pub is_star: bool,
}

/// Index of a body within a [`Registry`], in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BodyId(pub usize);

/// A body classified by its place in the tree, resolved once by the
/// registry instead of scanning object identities per click.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BodyRef {
    Star,
    Planet(BodyId),
    Moon { parent: BodyId, moon: BodyId },
}

/// Ordered, immutable catalog of bodies with O(1) lookup by name.
///
/// Parent/satellite relations are stored as names (weak keys into the
/// registry), never as owning pointers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registry {
    bodies: Vec<Arc<Body>>,
    by_name: HashMap<Arc<str>, BodyId>,
    root: BodyId,
}

impl Registry {
    /// Build a registry from catalog entries, validating tree
    /// integrity. Data errors are rejected here, not handled per frame.
    pub fn new(entries: Vec<Body>) -> eyre::Result<Self> {
        let bodies: Vec<Arc<Body>> = entries.into_iter().map(Arc::new).collect();
        if let Some(dup) = bodies.iter().map(|b| &b.name).duplicates().next() {
            bail!("duplicate body name: {dup}");
        }
        let by_name: HashMap<Arc<str>, BodyId> = bodies
            .iter()
            .enumerate()
            .map(|(ix, body)| (body.name.clone(), BodyId(ix)))
            .collect();

        let mut root = None;
        for body in &bodies {
            match (&body.parent, root) {
                (None, None) => {
                    if body.orbit_period_days != 0.0 {
                        bail!("root body {} must have orbit period 0", body.name);
                    }
                    root = Some(by_name[&body.name]);
                }
                (None, Some(_)) => bail!("more than one root body: {}", body.name),
                (Some(parent), _) => {
                    if body.orbit_period_days <= 0.0 {
                        bail!(
                            "body {} has non-positive orbit period {}",
                            body.name,
                            body.orbit_period_days
                        );
                    }
                    let Some(parent) = by_name.get(parent).map(|&id| &bodies[id.0]) else {
                        bail!("body {} orbits unknown parent {}", body.name, parent);
                    };
                    if !parent.satellites.contains(&body.name) {
                        bail!(
                            "body {} not listed among satellites of {}",
                            body.name,
                            parent.name
                        );
                    }
                }
            }
        }
        let Some(root) = root else {
            bail!("no root body in catalog");
        };

        for body in &bodies {
            for satellite in body.satellites.iter() {
                let Some(&id) = by_name.get(satellite) else {
                    bail!("{} lists unknown satellite {}", body.name, satellite);
                };
                if bodies[id.0].parent.as_deref() != Some(&*body.name) {
                    bail!(
                        "satellite {} of {} does not point back to it",
                        satellite,
                        body.name
                    );
                }
            }
        }

        Ok(Self {
            bodies,
            by_name,
            root,
        })
    }

    /// Look up a body by name. Unknown names (e.g. stale references)
    /// return `None`; callers treat that as a no-op.
    pub fn get(&self, name: &str) -> Option<&Arc<Body>> {
        self.get_id(name).map(|id| &self.bodies[id.0])
    }

    pub fn get_id(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    pub fn by_id(&self, id: BodyId) -> &Arc<Body> {
        &self.bodies[id.0]
    }

    /// All bodies in registration order (deterministic; drives
    /// z-ordering and index-based angular offsets).
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Arc<Body>)> {
        self.bodies.iter().enumerate().map(|(ix, b)| (BodyId(ix), b))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn root(&self) -> &Arc<Body> {
        &self.bodies[self.root.0]
    }

    /// Classify a body by its place in the tree.
    pub fn classify(&self, name: &str) -> Option<BodyRef> {
        let id = self.get_id(name)?;
        let body = &self.bodies[id.0];
        match &body.parent {
            None => Some(BodyRef::Star),
            Some(parent) => {
                let parent_id = self.get_id(parent)?;
                if parent_id == self.root {
                    Some(BodyRef::Planet(id))
                } else {
                    Some(BodyRef::Moon {
                        parent: parent_id,
                        moon: id,
                    })
                }
            }
        }
    }

    /// Index of a body among the root's satellites, in registration
    /// order. Used for the deterministic orbit spacing offset.
    pub fn orbital_index(&self, id: BodyId) -> Option<usize> {
        let body = &self.bodies[id.0];
        if body.parent.as_deref() != Some(&*self.root().name) {
            return None;
        }
        self.bodies
            .iter()
            .filter(|b| b.parent.as_deref() == Some(&*self.root().name))
            .position(|b| b.name == body.name)
    }

    /// Largest nominal orbit radius in the catalog, for the overview
    /// camera distance.
    pub fn max_orbit_radius(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.orbit_radius_raw)
            .fold(0.0, f64::max)
    }
}

impl Body {
    /// Orbital period for display: days under 1000 days, else years
    /// with days in parentheses. `"N/A"` for the root body.
    pub fn format_orbit_period(&self) -> String {
        if self.orbit_period_days <= 0.0 {
            return "N/A".into();
        }
        if self.orbit_period_days > 1000.0 {
            format!(
                "{:.1} years ({:.1} days)",
                self.orbit_period_days / 365.25,
                self.orbit_period_days
            )
        } else {
            format!("{:.1} days", self.orbit_period_days)
        }
    }

    /// Rotation period for display: hours for sub-day rotators, else
    /// days.
    pub fn format_rotation_period(&self) -> String {
        if self.rotation_period_days < 1.0 {
            format!("{:.1} hours", self.rotation_period_days * 24.0)
        } else {
            format!("{} days", self.rotation_period_days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn body(name: &str, parent: Option<&str>, satellites: &[&str], period: f64) -> Body {
        Body {
            name: name.into(),
            radius: 10.0,
            color: 0xff_ff_ff,
            orbit_radius_raw: 100.0,
            orbit_period_days: period,
            rotation_period_days: 1.0,
            description: "".into(),
            parent: parent.map(Into::into),
            satellites: satellites.iter().map(|&s| Arc::from(s)).collect(),
            rings: None,
            is_star: parent.is_none(),
        }
    }

    #[test]
    fn lookup_and_order() {
        let registry = catalog::solar_system().unwrap();
        assert_eq!(registry.root().name.as_ref(), "Sun");
        assert!(registry.get("Earth").is_some());
        assert!(registry.get("Vulcan").is_none());
        let names: Vec<_> = registry.bodies().map(|(_, b)| b.name.clone()).collect();
        assert_eq!(names[0].as_ref(), "Sun");
        assert_eq!(names[1].as_ref(), "Mercury");
    }

    #[test]
    fn orbital_index_skips_moons() {
        let registry = catalog::solar_system().unwrap();
        let mercury = registry.get_id("Mercury").unwrap();
        let mars = registry.get_id("Mars").unwrap();
        let moon = registry.get_id("Moon").unwrap();
        assert_eq!(registry.orbital_index(mercury), Some(0));
        // Mars is the fourth planet even though the Moon registers
        // between Earth and Mars.
        assert_eq!(registry.orbital_index(mars), Some(3));
        assert_eq!(registry.orbital_index(moon), None);
    }

    #[test]
    fn classify_tags_the_tree() {
        let registry = catalog::solar_system().unwrap();
        assert_eq!(registry.classify("Sun"), Some(BodyRef::Star));
        let earth = registry.get_id("Earth").unwrap();
        assert_eq!(registry.classify("Earth"), Some(BodyRef::Planet(earth)));
        let moon = registry.get_id("Moon").unwrap();
        assert_eq!(
            registry.classify("Moon"),
            Some(BodyRef::Moon {
                parent: earth,
                moon
            })
        );
        assert_eq!(registry.classify("Vulcan"), None);
    }

    #[test]
    fn rejects_second_root() {
        let err = Registry::new(vec![
            body("Sun", None, &[], 0.0),
            body("Sun 2", None, &[], 0.0),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_zero_period_non_root() {
        let err = Registry::new(vec![
            body("Sun", None, &["X"], 0.0),
            body("X", Some("Sun"), &[], 0.0),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_inconsistent_links() {
        // Parent does not list the satellite.
        assert!(Registry::new(vec![
            body("Sun", None, &[], 0.0),
            body("X", Some("Sun"), &[], 10.0),
        ])
        .is_err());
        // Satellite does not point back.
        assert!(Registry::new(vec![
            body("Sun", None, &["X", "Y"], 0.0),
            body("X", Some("Sun"), &["Y"], 10.0),
            body("Y", Some("Sun"), &[], 10.0),
        ])
        .is_err());
    }

    #[test]
    fn format_metadata() {
        let registry = catalog::solar_system().unwrap();
        assert_eq!(registry.get("Sun").unwrap().format_orbit_period(), "N/A");
        assert_eq!(
            registry.get("Earth").unwrap().format_orbit_period(),
            "365.2 days"
        );
        assert_eq!(
            registry.get("Jupiter").unwrap().format_orbit_period(),
            "11.9 years (4333.0 days)"
        );
        assert_eq!(
            registry.get("Jupiter").unwrap().format_rotation_period(),
            "9.8 hours"
        );
        assert_eq!(
            registry.get("Venus").unwrap().format_rotation_period(),
            "243 days"
        );
    }
}
