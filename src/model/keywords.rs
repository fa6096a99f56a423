//! Closed vocabularies used by experiment records.

use std::fmt;
use std::str::FromStr;

use super::ModelError;

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every accepted value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Keyword as written in ChemKED files
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ModelError::UnknownKeyword {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// Kind of experiment a record describes
    ExperimentType, "experiment type" {
        /// Ignition delay measurement
        IgnitionDelay => "ignition delay",
    }
}

impl ExperimentType {
    /// Text of the ReSpecTh `experimentType` element
    pub fn respecth_name(&self) -> &'static str {
        match self {
            ExperimentType::IgnitionDelay => "Ignition delay measurement",
        }
    }

    /// Parse the ReSpecTh `experimentType` text
    pub fn from_respecth_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.respecth_name() == name.trim())
    }
}

keyword_enum! {
    /// Facility used for the measurement
    ApparatusKind, "apparatus kind" {
        /// Shock tube
        ShockTube => "shock tube",
        /// Rapid compression machine (RCM)
        RapidCompressionMachine => "rapid compression machine",
    }
}

keyword_enum! {
    /// How species amounts in a composition are expressed
    CompositionKind, "composition kind" {
        /// Mole fraction
        MoleFraction => "mole fraction",
        /// Mass fraction
        MassFraction => "mass fraction",
    }
}

keyword_enum! {
    /// Feature of the target profile that defines the ignition point
    IgnitionType, "ignition type" {
        /// Maximum of the target
        Max => "max",
        /// Maximum of the time derivative
        DdtMax => "d/dt max",
        /// Half of the maximum
        HalfMax => "1/2 max",
        /// Minimum of the target
        Min => "min",
    }
}
