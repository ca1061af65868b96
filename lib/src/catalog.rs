//! The built-in solar system catalog.
//!
//! Radii and orbit distances are derived once from real-world figures,
//! pre-scaled for on-screen visibility. They are display units, not
//! kilometres.

use color_eyre::eyre;

use crate::{
    bodies::{Body, Registry, Rings},
    orbit::safe_orbit_distance,
};

/// One astronomical unit in kilometres.
pub const AU_KM: f64 = 149.6e6;
/// Divisor spreading orbital distances into display units.
pub const ORBITAL_FACTOR: f64 = 10_000.0;
/// Planet diameter to display radius factor.
pub const SIZE_FACTOR: f64 = 0.05;
/// The Sun gets a much smaller factor so it does not swallow the inner
/// planets.
pub const SUN_SIZE_FACTOR: f64 = 0.005;
/// Visibility floor for top-level orbit radii.
pub const MIN_ORBIT_DISPLAY: f64 = 800.0;
/// Minimum multiple of a parent's display radius any orbit must keep.
pub const MIN_ORBITAL_CLEARANCE: f64 = 1.2;
/// Moons use a larger clearance so they stay visible next to their
/// parent.
pub const MOON_CLEARANCE: f64 = 3.0;

fn planet_radius(diameter_km: f64) -> f64 {
    diameter_km / 2.0 * SIZE_FACTOR
}

fn orbit_radius(au: f64) -> f64 {
    au * AU_KM / ORBITAL_FACTOR
}

/// Ring dimensions clamped so the inner edge clears the planet's
/// sphere and the outer edge stays visibly wider than the inner one.
fn ring_system(planet_radius: f64, inner_km: f64, outer_km: f64, color: u32) -> Rings {
    let inner_radius = safe_orbit_distance(
        planet_radius,
        inner_km * SIZE_FACTOR,
        MIN_ORBITAL_CLEARANCE,
    );
    let outer_radius = (outer_km * SIZE_FACTOR).max(inner_radius * 1.5);
    Rings {
        inner_radius,
        outer_radius,
        color,
    }
}

struct Entry {
    name: &'static str,
    radius: f64,
    color: u32,
    orbit_radius: f64,
    orbit_period_days: f64,
    rotation_period_days: f64,
    description: &'static str,
    parent: Option<&'static str>,
    satellites: &'static [&'static str],
    rings: Option<Rings>,
}

impl Entry {
    fn into_body(self) -> Body {
        Body {
            name: self.name.into(),
            radius: self.radius,
            color: self.color,
            orbit_radius_raw: self.orbit_radius,
            orbit_period_days: self.orbit_period_days,
            rotation_period_days: self.rotation_period_days,
            description: self.description.into(),
            parent: self.parent.map(Into::into),
            satellites: self.satellites.iter().map(|&s| s.into()).collect(),
            rings: self.rings,
            is_star: self.parent.is_none(),
        }
    }
}

/// Build the Sun-through-Neptune registry (plus Earth's Moon).
pub fn solar_system() -> eyre::Result<Registry> {
    let earth_radius = planet_radius(12756.0);
    let saturn_radius = planet_radius(120_536.0);
    let entries = vec![
        Entry {
            name: "Sun",
            radius: 1_391_400.0 / 2.0 * SUN_SIZE_FACTOR,
            color: 0xfdb813,
            orbit_radius: 0.0,
            orbit_period_days: 0.0,
            rotation_period_days: 25.0,
            description:
                "The star at the center of our Solar System. Diameter: 1,391,400 km.",
            parent: None,
            satellites: &[
                "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
            ],
            rings: None,
        },
        Entry {
            name: "Mercury",
            radius: planet_radius(4879.0),
            color: 0xa37b7b,
            orbit_radius: orbit_radius(0.39),
            orbit_period_days: 88.0,
            rotation_period_days: 59.0,
            description:
                "The smallest and innermost planet in the Solar System. Diameter: 4,879 km. Distance from Sun: 0.39 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Venus",
            radius: planet_radius(12104.0),
            color: 0xe2b15b,
            orbit_radius: orbit_radius(0.72),
            orbit_period_days: 225.0,
            rotation_period_days: 243.0,
            description:
                "The second planet from the Sun and the hottest in our Solar System. Diameter: 12,104 km. Distance from Sun: 0.72 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Earth",
            radius: earth_radius,
            color: 0x4ba8ff,
            orbit_radius: orbit_radius(1.0),
            orbit_period_days: 365.25,
            rotation_period_days: 1.0,
            description:
                "Our home planet and the only known planet to harbor life. Diameter: 12,756 km. Distance from Sun: 1.0 AU.",
            parent: Some("Sun"),
            satellites: &["Moon"],
            rings: None,
        },
        Entry {
            name: "Moon",
            radius: earth_radius * 0.25,
            color: 0xcccccc,
            // Scaled up for visibility; still below the clearance floor.
            orbit_radius: orbit_radius(0.00243) * 5.0,
            orbit_period_days: 27.3,
            // Tidally locked.
            rotation_period_days: 27.3,
            description:
                "Earth's only natural satellite. Diameter: 3,474 km. Distance from Earth: 0.002430 AU (384,400 km).",
            parent: Some("Earth"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Mars",
            radius: planet_radius(6792.0),
            color: 0xe27b58,
            orbit_radius: orbit_radius(1.52),
            orbit_period_days: 687.0,
            rotation_period_days: 1.03,
            description:
                "The Red Planet, fourth from the Sun. Diameter: 6,792 km. Distance from Sun: 1.52 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Jupiter",
            radius: planet_radius(142_984.0),
            color: 0xe1caa7,
            orbit_radius: orbit_radius(5.2),
            orbit_period_days: 4333.0,
            rotation_period_days: 0.41,
            description:
                "The largest planet in our Solar System. Diameter: 142,984 km. Distance from Sun: 5.2 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Saturn",
            radius: saturn_radius,
            color: 0xf5e0b5,
            orbit_radius: orbit_radius(9.54),
            orbit_period_days: 10_759.0,
            rotation_period_days: 0.45,
            description:
                "The ringed planet, sixth from the Sun. Diameter: 120,536 km. Distance from Sun: 9.54 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: Some(ring_system(saturn_radius, 74_500.0, 140_000.0, 0xe1caa7)),
        },
        Entry {
            name: "Uranus",
            radius: planet_radius(51118.0),
            color: 0x9fe3de,
            orbit_radius: orbit_radius(19.2),
            orbit_period_days: 30_688.5,
            rotation_period_days: 0.72,
            description:
                "The seventh planet from the Sun, an ice giant with a tilted axis. Diameter: 51,118 km. Distance from Sun: 19.2 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
        Entry {
            name: "Neptune",
            radius: planet_radius(49528.0),
            color: 0x5b5ddf,
            orbit_radius: orbit_radius(30.06),
            orbit_period_days: 60_195.0,
            rotation_period_days: 0.67,
            description:
                "The eighth and most distant planet in our Solar System. Diameter: 49,528 km. Distance from Sun: 30.06 AU.",
            parent: Some("Sun"),
            satellites: &[],
            rings: None,
        },
    ];
    Registry::new(entries.into_iter().map(Entry::into_body).collect())
}

/// Distance for the info panel: AU for planets, kilometres from the
/// parent for moons, zero for the star.
pub fn format_distance(registry: &Registry, name: &str) -> Option<String> {
    use crate::bodies::BodyRef;
    let body = registry.get(name)?;
    Some(match registry.classify(name)? {
        BodyRef::Star => "0 AU".into(),
        BodyRef::Planet(_) => {
            format!("{:.2} AU", body.orbit_radius_raw * ORBITAL_FACTOR / AU_KM)
        }
        BodyRef::Moon { .. } => format!("{:.0} km", body.orbit_radius_raw * 1000.0),
    })
}
