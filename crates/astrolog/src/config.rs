use crate::angle::GeoLocation;
use crate::celestial::Celestial;
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;
use crate::natal::{Natal, DEFAULT_CHART_ORB, DEFAULT_PARAN_ORB_MINUTES};
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chart description as read from a TOML file.
///
/// ```toml
/// person = "Ada"
/// birth = "1815-12-10T09:30:00Z"
/// bodies = ["Sun", "Moon", "BE Moon"]
/// aspect_orb = 1.5
/// mean_bodies = ["BE Moon"]
///
/// [location]
/// longitude = -0.1276
/// latitude = 51.5072
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub person: String,
    pub birth: DateTime<Utc>,
    pub location: GeoLocation,
    #[serde(default = "default_bodies")]
    pub bodies: Vec<String>,
    #[serde(default = "default_aspect_orb")]
    pub aspect_orb: f64,
    #[serde(default = "default_paran_orb_minutes")]
    pub paran_orb_minutes: i64,
    /// Orbital points computed from the mean orbit; each must be in `bodies`.
    #[serde(default)]
    pub mean_bodies: Vec<String>,
}

fn default_bodies() -> Vec<String> {
    crate::celestial::SEPTENER
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

fn default_aspect_orb() -> f64 {
    DEFAULT_CHART_ORB
}

fn default_paran_orb_minutes() -> i64 {
    DEFAULT_PARAN_ORB_MINUTES
}

impl ChartConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: ChartConfig = toml::from_str(text).context("Failed to parse chart config")?;
        if config.paran_orb_minutes < 0 {
            anyhow::bail!("paran_orb_minutes must not be negative, got {}", config.paran_orb_minutes);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read chart config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid chart config {}", path.display()))
    }

    /// Registered bodies named in `bodies`, in file order.
    pub fn celestials(&self) -> Result<Vec<&'static Celestial>> {
        self.bodies.iter().map(|name| Celestial::by_name(name)).collect()
    }

    pub fn paran_orb(&self) -> Duration {
        Duration::minutes(self.paran_orb_minutes)
    }

    pub fn natal<'a, P: EphemerisProvider + ?Sized>(&self, provider: &'a P) -> Result<Natal<'a, P>> {
        let celestials = self.celestials()?;
        let mut natal = Natal::new(
            self.person.clone(),
            self.birth,
            self.location,
            &celestials,
            provider,
        );
        for name in &self.mean_bodies {
            natal = natal.with_mean(Celestial::by_name(name)?)?;
        }
        Ok(natal)
    }
}
