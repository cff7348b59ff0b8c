use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pixel_statistics::round1;

/// Score reported for every metric when the face crop is unavailable.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// One of the six skin metrics, named as they appear in reports and
/// rule tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinMetric {
    Brightness,
    PigmentationDensity,
    Redness,
    TextureRoughness,
    DarkCircleIndex,
    FacialHairDensity,
}

impl SkinMetric {
    pub const ALL: [SkinMetric; 6] = [
        SkinMetric::Brightness,
        SkinMetric::PigmentationDensity,
        SkinMetric::Redness,
        SkinMetric::TextureRoughness,
        SkinMetric::DarkCircleIndex,
        SkinMetric::FacialHairDensity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SkinMetric::Brightness => "brightness",
            SkinMetric::PigmentationDensity => "pigmentation_density",
            SkinMetric::Redness => "redness",
            SkinMetric::TextureRoughness => "texture_roughness",
            SkinMetric::DarkCircleIndex => "dark_circle_index",
            SkinMetric::FacialHairDensity => "facial_hair_density",
        }
    }
}

impl fmt::Display for SkinMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown skin metric '{0}'")]
pub struct UnknownMetric(pub String);

impl FromStr for SkinMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkinMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// Six 0-100 skin metrics. Higher is "more" of the named property.
///
/// `measured` is false only for the neutral fallback produced when no face
/// crop was available, so callers can tell a real all-50 face apart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SkinScores {
    pub brightness: f64,
    pub pigmentation_density: f64,
    pub redness: f64,
    pub texture_roughness: f64,
    pub dark_circle_index: f64,
    pub facial_hair_density: f64,
    #[serde(skip)]
    pub measured: bool,
}

impl SkinScores {
    pub fn neutral() -> Self {
        Self {
            brightness: NEUTRAL_SCORE,
            pigmentation_density: NEUTRAL_SCORE,
            redness: NEUTRAL_SCORE,
            texture_roughness: NEUTRAL_SCORE,
            dark_circle_index: NEUTRAL_SCORE,
            facial_hair_density: NEUTRAL_SCORE,
            measured: false,
        }
    }

    pub fn get(&self, metric: SkinMetric) -> f64 {
        match metric {
            SkinMetric::Brightness => self.brightness,
            SkinMetric::PigmentationDensity => self.pigmentation_density,
            SkinMetric::Redness => self.redness,
            SkinMetric::TextureRoughness => self.texture_roughness,
            SkinMetric::DarkCircleIndex => self.dark_circle_index,
            SkinMetric::FacialHairDensity => self.facial_hair_density,
        }
    }

    pub fn set(&mut self, metric: SkinMetric, value: f64) {
        let slot = match metric {
            SkinMetric::Brightness => &mut self.brightness,
            SkinMetric::PigmentationDensity => &mut self.pigmentation_density,
            SkinMetric::Redness => &mut self.redness,
            SkinMetric::TextureRoughness => &mut self.texture_roughness,
            SkinMetric::DarkCircleIndex => &mut self.dark_circle_index,
            SkinMetric::FacialHairDensity => &mut self.facial_hair_density,
        };
        *slot = value;
    }

    /// Copy with every metric rounded to one decimal, for reporting.
    pub fn rounded(&self) -> Self {
        let mut out = *self;
        for metric in SkinMetric::ALL {
            out.set(metric, round1(self.get(metric)));
        }
        out
    }
}
