//! Completion variants attached to branch segments
//!
//! A completion hangs off exactly one branch segment (its outlet) and owns the
//! sub-segments that describe its own flow path. The set of variants is closed:
//! perforations, fishbone laterals, fractures, ICD/ICV valves and autonomous ICDs.

use serde::{Deserialize, Serialize};

use super::Segment;

/// Completion category as it appears in the exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    Perforation,
    PerforationIcd,
    PerforationIcv,
    PerforationAicd,
    Fishbones,
    FishbonesIcd,
    Fracture,
}

impl CompletionType {
    /// Perforation types: plain perforations and every perforation valve.
    pub const PERFORATIONS: &'static [Self] = &[
        Self::Perforation,
        Self::PerforationIcd,
        Self::PerforationIcv,
        Self::PerforationAicd,
    ];
    pub const FISHBONES: &'static [Self] = &[Self::FishbonesIcd, Self::Fishbones];
    pub const FRACTURES: &'static [Self] = &[Self::Fracture];

    /// Devices placed on a perforation interval. Their COMPSEGS lengths use the
    /// host segment rather than the device sub-segment.
    pub const fn is_perforation_valve(self) -> bool {
        matches!(self, Self::PerforationIcd | Self::PerforationIcv | Self::PerforationAicd)
    }

    /// Devices written to WSEGVALV.
    pub const fn is_wseg_valve(self) -> bool {
        matches!(self, Self::PerforationIcd | Self::PerforationIcv | Self::FishbonesIcd)
    }
}

impl std::fmt::Display for CompletionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Perforation => "Perforation",
            Self::PerforationIcd => "Perforation ICD",
            Self::PerforationIcv => "Perforation ICV",
            Self::PerforationAicd => "Perforation AICD",
            Self::Fishbones => "Fishbones",
            Self::FishbonesIcd => "Fishbones ICD",
            Self::Fracture => "Fracture",
        };
        f.write_str(name)
    }
}

/// Fields every completion carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionBody {
    #[serde(default)]
    pub label: String,
    pub branch_number: u32,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl CompletionBody {
    pub fn new(label: impl Into<String>, branch_number: u32) -> Self {
        Self { label: label.into(), branch_number, segments: Vec::new() }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }
}

/// Which kind of inflow control a `Valve` models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValveKind {
    Icd,
    Icv,
    FishbonesIcd,
}

/// ICD or ICV. Valid only when both flow coefficient and area are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valve {
    #[serde(flatten)]
    pub body: CompletionBody,
    pub kind: ValveKind,
    #[serde(default)]
    pub flow_coefficient: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
}

impl Valve {
    pub fn new(body: CompletionBody, kind: ValveKind, flow_coefficient: f64, area: f64) -> Self {
        Self { body, kind, flow_coefficient: Some(flow_coefficient), area: Some(area) }
    }

    pub fn is_valid(&self) -> bool {
        self.flow_coefficient.is_some() && self.area.is_some()
    }
}

/// Named AICD coefficients. `None` means "let the simulator use its default"
/// for optional items and "not configured" for required ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AicdParameters {
    pub strength: Option<f64>,
    pub density_calibration_fluid: Option<f64>,
    pub viscosity_calibration_fluid: Option<f64>,
    pub critical_water_in_liquid_fraction: Option<f64>,
    pub emulsion_viscosity_transition_region: Option<f64>,
    pub max_ratio_emulsion_viscosity: Option<f64>,
    pub max_flow_rate: Option<f64>,
    pub volume_flow_rate_exponent: Option<f64>,
    pub viscosity_function_exponent: Option<f64>,
    pub oil_fraction_density_exponent: Option<f64>,
    pub water_fraction_density_exponent: Option<f64>,
    pub gas_fraction_density_exponent: Option<f64>,
    pub oil_fraction_viscosity_exponent: Option<f64>,
    pub water_fraction_viscosity_exponent: Option<f64>,
    pub gas_fraction_viscosity_exponent: Option<f64>,
}

impl AicdParameters {
    /// Parameters the device cannot be exported without.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("strength", self.strength),
            ("density_calibration_fluid", self.density_calibration_fluid),
            ("viscosity_calibration_fluid", self.viscosity_calibration_fluid),
            ("volume_flow_rate_exponent", self.volume_flow_rate_exponent),
            ("viscosity_function_exponent", self.viscosity_function_exponent),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }
}

/// Autonomous inflow control device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aicd {
    #[serde(flatten)]
    pub body: CompletionBody,
    #[serde(default)]
    pub parameters: AicdParameters,
    #[serde(default = "default_flow_scaling_factor")]
    pub flow_scaling_factor: f64,
    #[serde(default = "default_open")]
    pub open: bool,
}

fn default_flow_scaling_factor() -> f64 {
    1.0
}
fn default_open() -> bool {
    true
}

impl Aicd {
    pub fn new(body: CompletionBody, parameters: AicdParameters) -> Self {
        Self { body, parameters, flow_scaling_factor: 1.0, open: true }
    }

    pub fn is_valid(&self) -> bool {
        self.parameters.missing_required().is_empty()
    }
}

/// Tagged completion attached to a branch segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Completion {
    Perforation(CompletionBody),
    Fishbones(CompletionBody),
    Fracture(CompletionBody),
    Valve(Valve),
    Aicd(Aicd),
}

impl Completion {
    pub fn body(&self) -> &CompletionBody {
        match self {
            Self::Perforation(b) | Self::Fishbones(b) | Self::Fracture(b) => b,
            Self::Valve(v) => &v.body,
            Self::Aicd(a) => &a.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut CompletionBody {
        match self {
            Self::Perforation(b) | Self::Fishbones(b) | Self::Fracture(b) => b,
            Self::Valve(v) => &mut v.body,
            Self::Aicd(a) => &mut a.body,
        }
    }

    pub fn completion_type(&self) -> CompletionType {
        match self {
            Self::Perforation(_) => CompletionType::Perforation,
            Self::Fishbones(_) => CompletionType::Fishbones,
            Self::Fracture(_) => CompletionType::Fracture,
            Self::Valve(v) => match v.kind {
                ValveKind::Icd => CompletionType::PerforationIcd,
                ValveKind::Icv => CompletionType::PerforationIcv,
                ValveKind::FishbonesIcd => CompletionType::FishbonesIcd,
            },
            Self::Aicd(_) => CompletionType::PerforationAicd,
        }
    }

    pub fn label(&self) -> &str {
        &self.body().label
    }

    pub fn branch_number(&self) -> u32 {
        self.body().branch_number
    }

    pub fn segments(&self) -> &[Segment] {
        &self.body().segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.body_mut().segments
    }

    /// Valves and AICDs are written as their own WELSEGS device segment.
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Valve(_) | Self::Aicd(_))
    }

    /// Device validity; non-device completions are always valid.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Valve(v) => v.is_valid(),
            Self::Aicd(a) => a.is_valid(),
            _ => true,
        }
    }
}

impl From<Valve> for Completion {
    fn from(valve: Valve) -> Self {
        Self::Valve(valve)
    }
}

impl From<Aicd> for Completion {
    fn from(aicd: Aicd) -> Self {
        Self::Aicd(aicd)
    }
}
