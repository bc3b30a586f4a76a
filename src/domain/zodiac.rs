// src/domain/zodiac.rs
//
// Western zodiac vocabulary and the eleven-slot birth chart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// The fixed sign vocabulary, in zodiac order (seeded with ids 1..=12)
pub const SIGN_NAMES: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// A row of the reference vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZodiacSign {
    pub id: i64,
    pub name: String,
}

/// A chart slot. Each planet maps to one nullable sign column on `idol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Moon,
    Rising,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 11] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Rising,
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Moon => "moon",
            Planet::Rising => "rising",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    /// Foreign key column on `idol`
    pub fn sign_id_column(self) -> &'static str {
        match self {
            Planet::Sun => "sun_sign_id",
            Planet::Moon => "moon_sign_id",
            Planet::Rising => "rising_sign_id",
            Planet::Mercury => "mercury_sign_id",
            Planet::Venus => "venus_sign_id",
            Planet::Mars => "mars_sign_id",
            Planet::Jupiter => "jupiter_sign_id",
            Planet::Saturn => "saturn_sign_id",
            Planet::Uranus => "uranus_sign_id",
            Planet::Neptune => "neptune_sign_id",
            Planet::Pluto => "pluto_sign_id",
        }
    }

    /// Result column carrying the looked-up sign name
    pub fn sign_name_column(self) -> &'static str {
        match self {
            Planet::Sun => "sun_sign_name",
            Planet::Moon => "moon_sign_name",
            Planet::Rising => "rising_sign_name",
            Planet::Mercury => "mercury_sign_name",
            Planet::Venus => "venus_sign_name",
            Planet::Mars => "mars_sign_name",
            Planet::Jupiter => "jupiter_sign_name",
            Planet::Saturn => "saturn_sign_name",
            Planet::Uranus => "uranus_sign_name",
            Planet::Neptune => "neptune_sign_name",
            Planet::Pluto => "pluto_sign_name",
        }
    }

    /// Table alias for this slot's join against `western_zodiac_sign`
    pub fn join_alias(self) -> &'static str {
        match self {
            Planet::Sun => "ws_sun",
            Planet::Moon => "ws_moon",
            Planet::Rising => "ws_rising",
            Planet::Mercury => "ws_mercury",
            Planet::Venus => "ws_venus",
            Planet::Mars => "ws_mars",
            Planet::Jupiter => "ws_jupiter",
            Planet::Saturn => "ws_saturn",
            Planet::Uranus => "ws_uranus",
            Planet::Neptune => "ws_neptune",
            Planet::Pluto => "ws_pluto",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Planet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Planet::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvariantViolation(format!("Unknown planet: {}", s)))
    }
}

/// One optional value per planet.
///
/// `Chart<i64>` holds sign ids (what is stored), `Chart<String>` holds sign
/// names (what is read back, and what filters match on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart<T> {
    pub sun: Option<T>,
    pub moon: Option<T>,
    pub rising: Option<T>,
    pub mercury: Option<T>,
    pub venus: Option<T>,
    pub mars: Option<T>,
    pub jupiter: Option<T>,
    pub saturn: Option<T>,
    pub uranus: Option<T>,
    pub neptune: Option<T>,
    pub pluto: Option<T>,
}

/// Sign ids per slot
pub type SignIds = Chart<i64>;

/// Sign names per slot
pub type SignNames = Chart<String>;

impl<T> Default for Chart<T> {
    fn default() -> Self {
        Self {
            sun: None,
            moon: None,
            rising: None,
            mercury: None,
            venus: None,
            mars: None,
            jupiter: None,
            saturn: None,
            uranus: None,
            neptune: None,
            pluto: None,
        }
    }
}

impl<T> Chart<T> {
    pub fn get(&self, planet: Planet) -> Option<&T> {
        self.slot(planet).as_ref()
    }

    pub fn set(&mut self, planet: Planet, value: Option<T>) {
        *self.slot_mut(planet) = value;
    }

    /// Builder-style setter
    pub fn with(mut self, planet: Planet, value: T) -> Self {
        self.set(planet, Some(value));
        self
    }

    /// Every slot in chart order, set or not
    pub fn iter(&self) -> impl Iterator<Item = (Planet, Option<&T>)> + '_ {
        Planet::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Only the slots that carry a value
    pub fn present(&self) -> impl Iterator<Item = (Planet, &T)> + '_ {
        Planet::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|v| (p, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    fn slot(&self, planet: Planet) -> &Option<T> {
        match planet {
            Planet::Sun => &self.sun,
            Planet::Moon => &self.moon,
            Planet::Rising => &self.rising,
            Planet::Mercury => &self.mercury,
            Planet::Venus => &self.venus,
            Planet::Mars => &self.mars,
            Planet::Jupiter => &self.jupiter,
            Planet::Saturn => &self.saturn,
            Planet::Uranus => &self.uranus,
            Planet::Neptune => &self.neptune,
            Planet::Pluto => &self.pluto,
        }
    }

    fn slot_mut(&mut self, planet: Planet) -> &mut Option<T> {
        match planet {
            Planet::Sun => &mut self.sun,
            Planet::Moon => &mut self.moon,
            Planet::Rising => &mut self.rising,
            Planet::Mercury => &mut self.mercury,
            Planet::Venus => &mut self.venus,
            Planet::Mars => &mut self.mars,
            Planet::Jupiter => &mut self.jupiter,
            Planet::Saturn => &mut self.saturn,
            Planet::Uranus => &mut self.uranus,
            Planet::Neptune => &mut self.neptune,
            Planet::Pluto => &mut self.pluto,
        }
    }
}
