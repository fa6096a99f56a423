use std::fmt;
use std::str::FromStr;

use crate::units::{Quantity, Unit};

use super::{CompositionKind, IgnitionType, ModelError, Property};

/// One species entry of a composition
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    /// Species name (e.g. "H2")
    pub name: String,
    /// InChI identifier, if known
    pub inchi: Option<String>,
    /// Amount in the composition's kind
    pub amount: f64,
}

/// Initial mixture composition
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Mole or mass fraction
    pub kind: CompositionKind,
    /// Species in file order
    pub species: Vec<Species>,
}

impl Composition {
    /// Create an empty composition of the given kind
    pub fn new(kind: CompositionKind) -> Self {
        Self {
            kind,
            species: Vec::new(),
        }
    }

    /// Amount of the named species, if present
    pub fn amount_of(&self, name: &str) -> Option<f64> {
        self.species.iter().find(|s| s.name == name).map(|s| s.amount)
    }
}

/// What is monitored to locate ignition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IgnitionTarget {
    /// Pressure trace
    Pressure,
    /// Temperature trace
    Temperature,
    /// Concentration or emission of a species (e.g. "OH*")
    Species(String),
}

impl IgnitionTarget {
    /// Canonical ChemKED name
    pub fn as_str(&self) -> &str {
        match self {
            IgnitionTarget::Pressure => "pressure",
            IgnitionTarget::Temperature => "temperature",
            IgnitionTarget::Species(name) => name,
        }
    }
}

impl FromStr for IgnitionTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains(';') {
            return Err(ModelError::InvalidIgnitionTarget(s.to_string()));
        }
        Ok(match s {
            "pressure" => IgnitionTarget::Pressure,
            "temperature" => IgnitionTarget::Temperature,
            species => IgnitionTarget::Species(species.to_string()),
        })
    }
}

impl fmt::Display for IgnitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the ignition delay was determined
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IgnitionDefinition {
    /// Feature of the target profile
    pub kind: IgnitionType,
    /// Monitored quantity
    pub target: IgnitionTarget,
}

/// Sampled volume trace of an RCM run
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeHistory {
    /// Unit of the time axis
    pub time_units: Unit,
    /// Unit of the volume axis
    pub volume_units: Unit,
    /// (time, volume) samples in order
    pub values: Vec<(f64, f64)>,
}

impl VolumeHistory {
    /// Create an empty history with the given axis units
    pub fn new(time_units: Unit, volume_units: Unit) -> Self {
        Self {
            time_units,
            volume_units,
            values: Vec::new(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no samples are present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Values shared by every data point of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonProperties {
    /// Shared initial composition
    pub composition: Option<Composition>,
    /// Shared initial temperature
    pub temperature: Option<Quantity>,
    /// Shared initial pressure
    pub pressure: Option<Quantity>,
    /// Shared pressure rise
    pub pressure_rise: Option<Quantity>,
    /// Shared compression time
    pub compression_time: Option<Quantity>,
    /// Shared ignition definition
    pub ignition_type: Option<IgnitionDefinition>,
}

impl CommonProperties {
    /// Shared value of a scalar property
    pub fn get(&self, property: Property) -> Option<&Quantity> {
        match property {
            Property::Temperature => self.temperature.as_ref(),
            Property::Pressure => self.pressure.as_ref(),
            Property::PressureRise => self.pressure_rise.as_ref(),
            Property::CompressionTime => self.compression_time.as_ref(),
            _ => None,
        }
    }

    /// Set a shared scalar property; returns false for properties that cannot
    /// be shared
    pub fn set(&mut self, property: Property, value: Quantity) -> bool {
        let slot = match property {
            Property::Temperature => &mut self.temperature,
            Property::Pressure => &mut self.pressure,
            Property::PressureRise => &mut self.pressure_rise,
            Property::CompressionTime => &mut self.compression_time,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// True if nothing is shared
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single measurement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    /// Initial temperature
    pub temperature: Option<Quantity>,
    /// Initial pressure
    pub pressure: Option<Quantity>,
    /// Measured ignition delay
    pub ignition_delay: Option<Quantity>,
    /// Pressure rise
    pub pressure_rise: Option<Quantity>,
    /// RCM compression time
    pub compression_time: Option<Quantity>,
    /// Initial composition
    pub composition: Option<Composition>,
    /// Ignition definition
    pub ignition_type: Option<IgnitionDefinition>,
    /// Volume trace (RCM only)
    pub volume_history: Option<VolumeHistory>,
}

impl DataPoint {
    /// Value of a scalar property
    pub fn get(&self, property: Property) -> Option<&Quantity> {
        match property {
            Property::Temperature => self.temperature.as_ref(),
            Property::Pressure => self.pressure.as_ref(),
            Property::IgnitionDelay => self.ignition_delay.as_ref(),
            Property::PressureRise => self.pressure_rise.as_ref(),
            Property::CompressionTime => self.compression_time.as_ref(),
            Property::Volume | Property::Time => None,
        }
    }

    /// Set a scalar property; returns false for volume-history axes
    pub fn set(&mut self, property: Property, value: Quantity) -> bool {
        let slot = match property {
            Property::Temperature => &mut self.temperature,
            Property::Pressure => &mut self.pressure,
            Property::IgnitionDelay => &mut self.ignition_delay,
            Property::PressureRise => &mut self.pressure_rise,
            Property::CompressionTime => &mut self.compression_time,
            Property::Volume | Property::Time => return false,
        };
        *slot = Some(value);
        true
    }

    /// Fill every unset field from the common properties. Values the point
    /// already defines are kept.
    pub fn apply_common(&mut self, common: &CommonProperties) {
        fn fill<T: Clone>(slot: &mut Option<T>, shared: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(shared);
            }
        }
        fill(&mut self.composition, &common.composition);
        fill(&mut self.temperature, &common.temperature);
        fill(&mut self.pressure, &common.pressure);
        fill(&mut self.pressure_rise, &common.pressure_rise);
        fill(&mut self.compression_time, &common.compression_time);
        fill(&mut self.ignition_type, &common.ignition_type);
    }
}
