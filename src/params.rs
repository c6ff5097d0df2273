//! Live-tunable parameters and the shared color palette
//!
//! Every tunable has a knob range mirroring the control panel that drives it.
//! Out-of-range values are clamped onto the knob, never rejected. A change
//! that would invert a min/max pair is rejected and the last valid value kept,
//! so the frame loop always reads a consistent snapshot.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::consts::PALETTE_HEX;
use crate::error::{AsteroidError, Result};
use crate::{Rgba, hex_to_rgba};

/// Snapshot of all tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameters {
    /// Inner edge of the particle band
    pub min_radius: f32,
    /// Outer edge of the particle band
    pub max_radius: f32,
    /// Angular speed at the inner edge (radians/tick)
    pub min_speed: f32,
    /// Angular speed at the outer edge (radians/tick)
    pub max_speed: f32,
    /// Target ring size
    pub n_particles: u32,
    /// Smallest particle scale
    pub min_size: f32,
    /// Largest particle scale
    pub max_size: f32,
    /// Core rotation per tick (radians, may be negative)
    pub core_rotation: f32,
    /// Clamp the distance -> speed remap to `[min_speed, max_speed]`
    pub clamp_speed: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            min_radius: 30.0,
            max_radius: 50.0,
            min_speed: 0.015,
            max_speed: 0.025,
            n_particles: 300,
            min_size: 0.1,
            max_size: 2.0,
            core_rotation: 0.005,
            clamp_speed: false,
        }
    }
}

impl Parameters {
    /// Check the bound invariants
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.min_radius,
            self.max_radius,
            self.min_speed,
            self.max_speed,
            self.min_size,
            self.max_size,
            self.core_rotation,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(AsteroidError::InvalidConfiguration {
                field: "parameters",
                reason: "all values must be finite",
            });
        }
        if self.min_radius >= self.max_radius {
            return Err(AsteroidError::InvalidConfiguration {
                field: "minRadius",
                reason: "must be below maxRadius",
            });
        }
        if self.min_speed > self.max_speed {
            return Err(AsteroidError::InvalidConfiguration {
                field: "minSpeed",
                reason: "must not exceed maxSpeed",
            });
        }
        if self.min_size > self.max_size {
            return Err(AsteroidError::InvalidConfiguration {
                field: "minSize",
                reason: "must not exceed maxSize",
            });
        }
        Ok(())
    }

    /// Copy with every field clamped and snapped onto its knob range
    pub fn constrained(&self) -> Self {
        let mut out = *self;
        for field in ParamField::ALL {
            let value = field.range().constrain(field.read(self));
            field.write(&mut out, value);
        }
        out
    }

    /// Parse a JSON preset; missing keys fall back to defaults and
    /// out-of-range values are clamped onto their knobs
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Parameters = serde_json::from_str(json)?;
        let params = params.constrained();
        params.validate()?;
        Ok(params)
    }

    /// Serialize as a pretty JSON preset
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What has to be recomputed after a parameter change.
///
/// Ordered so that merging a batch is just `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Recompute {
    /// Consumed directly each tick
    #[default]
    None,
    /// Re-run the orbital layout
    Layout,
    /// Reconcile the pool, then re-run the layout
    Pool,
}

impl Recompute {
    pub fn merge(self, other: Recompute) -> Recompute {
        self.max(other)
    }
}

/// Declared knob range of a tunable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl KnobRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range and snap onto the step grid
    pub fn constrain(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        // Already on the grid up to float noise: keep the exact input
        if (snapped - clamped).abs() <= self.step * 1e-6 {
            return clamped;
        }
        snapped.clamp(self.min, self.max)
    }
}

/// A single tunable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    MinRadius,
    MaxRadius,
    MinSpeed,
    MaxSpeed,
    NParticles,
    MinSize,
    MaxSize,
    CoreRotation,
}

impl ParamField {
    pub const ALL: [ParamField; 8] = [
        ParamField::MinRadius,
        ParamField::MaxRadius,
        ParamField::NParticles,
        ParamField::MinSpeed,
        ParamField::MaxSpeed,
        ParamField::MinSize,
        ParamField::MaxSize,
        ParamField::CoreRotation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamField::MinRadius => "minRadius",
            ParamField::MaxRadius => "maxRadius",
            ParamField::MinSpeed => "minSpeed",
            ParamField::MaxSpeed => "maxSpeed",
            ParamField::NParticles => "nParticles",
            ParamField::MinSize => "minSize",
            ParamField::MaxSize => "maxSize",
            ParamField::CoreRotation => "coreRotation",
        }
    }

    /// Accepts `minRadius`, `min_radius` or `min-radius`, case-insensitive
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "minradius" => Some(ParamField::MinRadius),
            "maxradius" => Some(ParamField::MaxRadius),
            "minspeed" => Some(ParamField::MinSpeed),
            "maxspeed" => Some(ParamField::MaxSpeed),
            "nparticles" | "particles" => Some(ParamField::NParticles),
            "minsize" => Some(ParamField::MinSize),
            "maxsize" => Some(ParamField::MaxSize),
            "corerotation" => Some(ParamField::CoreRotation),
            _ => None,
        }
    }

    /// Control panel label
    pub fn label(&self) -> &'static str {
        match self {
            ParamField::MinRadius => "Ring inner radius",
            ParamField::MaxRadius => "Ring outer radius",
            ParamField::NParticles => "N. of Particles",
            ParamField::MinSpeed => "Rotation min speed",
            ParamField::MaxSpeed => "Rotation max speed",
            ParamField::MinSize => "Particles min size",
            ParamField::MaxSize => "Particles max size",
            ParamField::CoreRotation => "Core rotation speed",
        }
    }

    pub fn range(&self) -> KnobRange {
        match self {
            ParamField::MinRadius => KnobRange::new(20.0, 60.0, 1.0),
            ParamField::MaxRadius => KnobRange::new(40.0, 100.0, 1.0),
            ParamField::NParticles => KnobRange::new(0.0, 800.0, 1.0),
            ParamField::MinSpeed | ParamField::MaxSpeed => KnobRange::new(0.005, 0.05, 0.001),
            ParamField::MinSize | ParamField::MaxSize => KnobRange::new(0.1, 5.0, 0.1),
            ParamField::CoreRotation => KnobRange::new(-0.05, 0.05, 0.001),
        }
    }

    /// Recompute triggered by changing this field
    pub fn recompute(&self) -> Recompute {
        match self {
            ParamField::NParticles => Recompute::Pool,
            ParamField::CoreRotation => Recompute::None,
            _ => Recompute::Layout,
        }
    }

    pub fn read(&self, params: &Parameters) -> f64 {
        match self {
            ParamField::MinRadius => params.min_radius as f64,
            ParamField::MaxRadius => params.max_radius as f64,
            ParamField::MinSpeed => params.min_speed as f64,
            ParamField::MaxSpeed => params.max_speed as f64,
            ParamField::NParticles => params.n_particles as f64,
            ParamField::MinSize => params.min_size as f64,
            ParamField::MaxSize => params.max_size as f64,
            ParamField::CoreRotation => params.core_rotation as f64,
        }
    }

    fn write(&self, params: &mut Parameters, value: f64) {
        match self {
            ParamField::MinRadius => params.min_radius = value as f32,
            ParamField::MaxRadius => params.max_radius = value as f32,
            ParamField::MinSpeed => params.min_speed = value as f32,
            ParamField::MaxSpeed => params.max_speed = value as f32,
            ParamField::NParticles => params.n_particles = value.round() as u32,
            ParamField::MinSize => params.min_size = value as f32,
            ParamField::MaxSize => params.max_size = value as f32,
            ParamField::CoreRotation => params.core_rotation = value as f32,
        }
    }
}

/// Why a single-field change was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{field} rejected: value is not finite")]
    NonFinite { field: &'static str },

    #[error("{field} rejected: {value} would invert its bound against {other}")]
    Inverted {
        field: &'static str,
        value: f64,
        other: &'static str,
    },
}

/// Ordered colors shared by the core and the ring
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Rgba>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: PALETTE_HEX.iter().map(|hex| hex_to_rgba(*hex)).collect(),
        }
    }
}

impl ColorPalette {
    /// Build a palette, failing on an empty color list
    pub fn new(colors: Vec<Rgba>) -> Result<Self> {
        if colors.is_empty() {
            return Err(AsteroidError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn from_hex(hex: &[u32]) -> Result<Self> {
        Self::new(hex.iter().map(|h| hex_to_rgba(*h)).collect())
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Uniform pick; the color stays available
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Rgba> {
        self.colors.choose(rng).copied()
    }

    /// Uniform pick that removes the color from the palette
    pub fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Rgba> {
        if self.colors.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.colors.len());
        Some(self.colors.remove(index))
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.colors.shuffle(rng);
    }
}

/// Owner of the live parameter snapshot and the palette
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: Parameters,
    palette: ColorPalette,
}

impl ParameterStore {
    /// Out-of-range values are clamped onto their knobs; inverted pairs fail
    pub fn new(params: Parameters, palette: ColorPalette) -> Result<Self> {
        let params = params.constrained();
        params.validate()?;
        Ok(Self { params, palette })
    }

    /// Current snapshot
    pub fn get(&self) -> &Parameters {
        &self.params
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Change one field.
    ///
    /// The value is clamped onto the field's knob. If the result would invert
    /// a bound pair the store is left untouched.
    pub fn set(&mut self, field: ParamField, value: f64) -> std::result::Result<Recompute, ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NonFinite {
                field: field.as_str(),
            });
        }

        let value = field.range().constrain(value);
        let mut next = self.params;
        field.write(&mut next, value);

        if let Some(other) = inverted_against(field, &next) {
            return Err(ParamError::Inverted {
                field: field.as_str(),
                value,
                other: other.as_str(),
            });
        }

        if next == self.params {
            return Ok(Recompute::None);
        }
        self.params = next;
        Ok(field.recompute())
    }

    /// Replace the whole snapshot (presets).
    ///
    /// Values are clamped onto their knobs first; a snapshot that still
    /// inverts a bound pair is rejected and the store left untouched.
    pub fn apply(&mut self, params: Parameters) -> Result<Recompute> {
        let params = params.constrained();
        params.validate()?;
        let recompute = ParamField::ALL
            .iter()
            .filter(|f| f.read(&self.params) != f.read(&params))
            .fold(Recompute::None, |acc, f| acc.merge(f.recompute()));
        let recompute = if self.params.clamp_speed != params.clamp_speed {
            recompute.merge(Recompute::Layout)
        } else {
            recompute
        };
        self.params = params;
        Ok(recompute)
    }
}

/// The partner field whose bound `field` would cross in `params`, if any
fn inverted_against(field: ParamField, params: &Parameters) -> Option<ParamField> {
    match field {
        ParamField::MinRadius | ParamField::MaxRadius if params.min_radius >= params.max_radius => {
            Some(partner(field))
        }
        ParamField::MinSpeed | ParamField::MaxSpeed if params.min_speed > params.max_speed => {
            Some(partner(field))
        }
        ParamField::MinSize | ParamField::MaxSize if params.min_size > params.max_size => {
            Some(partner(field))
        }
        _ => None,
    }
}

fn partner(field: ParamField) -> ParamField {
    match field {
        ParamField::MinRadius => ParamField::MaxRadius,
        ParamField::MaxRadius => ParamField::MinRadius,
        ParamField::MinSpeed => ParamField::MaxSpeed,
        ParamField::MaxSpeed => ParamField::MinSpeed,
        ParamField::MinSize => ParamField::MaxSize,
        ParamField::MaxSize => ParamField::MinSize,
        other => other,
    }
}
