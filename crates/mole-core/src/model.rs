use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical field holding the sample identifier.
pub const SAMPLE_ID: &str = "sample_id";
/// Canonical field holding the chemical name, in both schemas.
pub const CHEMICAL: &str = "chemical";

/// One of the five tracked measurements.
///
/// The declaration order is the order metrics are checked and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Concentration,
    Ph,
    Temperature,
    Pressure,
    FlowRate,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Concentration,
        Metric::Ph,
        Metric::Temperature,
        Metric::Pressure,
        Metric::FlowRate,
    ];

    /// Human-readable name used in comments and reports.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Concentration => "Concentration",
            Metric::Ph => "pH",
            Metric::Temperature => "Temperature",
            Metric::Pressure => "Pressure",
            Metric::FlowRate => "Flow Rate",
        }
    }

    /// Canonical sample-schema field.
    pub fn field(self) -> &'static str {
        match self {
            Metric::Concentration => "concentration_ppm",
            Metric::Ph => "ph",
            Metric::Temperature => "temperature_celsius",
            Metric::Pressure => "pressure_kpa",
            Metric::FlowRate => "flow_rate_l_min",
        }
    }

    /// Canonical range-schema field for the lower bound.
    pub fn min_field(self) -> &'static str {
        match self {
            Metric::Concentration => "concentration_ppm_min",
            Metric::Ph => "ph_min",
            Metric::Temperature => "temperature_celsius_min",
            Metric::Pressure => "pressure_kpa_min",
            Metric::FlowRate => "flow_rate_l_min_min",
        }
    }

    /// Canonical range-schema field for the upper bound.
    pub fn max_field(self) -> &'static str {
        match self {
            Metric::Concentration => "concentration_ppm_max",
            Metric::Ph => "ph_max",
            Metric::Temperature => "temperature_celsius_max",
            Metric::Pressure => "pressure_kpa_max",
            Metric::FlowRate => "flow_rate_l_min_max",
        }
    }

    /// Column title used when writing the evaluated sample table.
    pub fn column_title(self) -> &'static str {
        match self {
            Metric::Concentration => "CONCENTRATION (ppm)",
            Metric::Ph => "pH LEVEL",
            Metric::Temperature => "TEMPERATURE (Celsius)",
            Metric::Pressure => "PRESSURE (kPa)",
            Metric::FlowRate => "FLOW RATE (L_min)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per tracked metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerMetric<T> {
    pub concentration: T,
    pub ph: T,
    pub temperature: T,
    pub pressure: T,
    pub flow_rate: T,
}

impl<T> PerMetric<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        PerMetric {
            concentration: f(Metric::Concentration),
            ph: f(Metric::Ph),
            temperature: f(Metric::Temperature),
            pressure: f(Metric::Pressure),
            flow_rate: f(Metric::FlowRate),
        }
    }

    /// Like [`PerMetric::from_fn`], stopping at the first error in metric order.
    pub fn try_from_fn<E>(mut f: impl FnMut(Metric) -> Result<T, E>) -> Result<Self, E> {
        Ok(PerMetric {
            concentration: f(Metric::Concentration)?,
            ph: f(Metric::Ph)?,
            temperature: f(Metric::Temperature)?,
            pressure: f(Metric::Pressure)?,
            flow_rate: f(Metric::FlowRate)?,
        })
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Concentration => &self.concentration,
            Metric::Ph => &self.ph,
            Metric::Temperature => &self.temperature,
            Metric::Pressure => &self.pressure,
            Metric::FlowRate => &self.flow_rate,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Concentration => &mut self.concentration,
            Metric::Ph => &mut self.ph,
            Metric::Temperature => &mut self.temperature,
            Metric::Pressure => &mut self.pressure,
            Metric::FlowRate => &mut self.flow_rate,
        }
    }

    /// Iterate in fixed metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Observed measurements for one sample. `None` means missing or unparsable.
pub type Measurements = PerMetric<Option<Decimal>>;

/// Inclusive acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Bounds {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Bounds { min, max }
    }

    /// Both ends are inclusive.
    pub fn contains(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// One input row, after schema resolution and numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub sample_id: Option<String>,
    pub chemical: Option<String>,
    pub measurements: Measurements,
}

impl Sample {
    pub fn new(chemical: impl Into<String>, measurements: Measurements) -> Self {
        Sample {
            sample_id: None,
            chemical: Some(chemical.into()),
            measurements,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.sample_id = Some(id.into());
        self
    }

    /// The chemical name if present and non-blank.
    pub fn chemical_name(&self) -> Option<&str> {
        self.chemical.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "COMPLIANT")]
    Compliant,
    #[serde(rename = "NON-COMPLIANT")]
    NonCompliant,
    #[serde(rename = "UNKNOWN CHEMICAL")]
    UnknownChemical,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Compliant => "COMPLIANT",
            Status::NonCompliant => "NON-COMPLIANT",
            Status::UnknownChemical => "UNKNOWN CHEMICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
