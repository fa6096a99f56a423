use std::fmt;

/// Properties with a fixed reference unit, used for dimensional checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Initial temperature
    Temperature,
    /// Initial pressure
    Pressure,
    /// Measured ignition delay
    IgnitionDelay,
    /// Pressure rise rate (dP/dt normalised by pressure)
    PressureRise,
    /// RCM compression time
    CompressionTime,
    /// Volume axis of a volume history
    Volume,
    /// Time axis of a volume history
    Time,
}

impl Property {
    /// Properties that may appear as data-group columns in ReSpecTh files, in
    /// column allocation order.
    pub const DATAGROUP: [Property; 4] = [
        Property::Temperature,
        Property::Pressure,
        Property::IgnitionDelay,
        Property::PressureRise,
    ];

    /// Reference unit the property must be dimensionally compatible with
    pub fn reference_unit(&self) -> &'static str {
        match self {
            Property::Temperature => "kelvin",
            Property::Pressure => "pascal",
            Property::IgnitionDelay => "second",
            Property::PressureRise => "1.0 / second",
            Property::CompressionTime => "second",
            Property::Volume => "meter**3",
            Property::Time => "second",
        }
    }

    /// ChemKED field name (`pressure-rise`)
    pub fn field_name(&self) -> &'static str {
        match self {
            Property::Temperature => "temperature",
            Property::Pressure => "pressure",
            Property::IgnitionDelay => "ignition-delay",
            Property::PressureRise => "pressure-rise",
            Property::CompressionTime => "compression-time",
            Property::Volume => "volume",
            Property::Time => "time",
        }
    }

    /// ReSpecTh property name (`pressure rise`)
    pub fn respecth_name(&self) -> &'static str {
        match self {
            Property::Temperature => "temperature",
            Property::Pressure => "pressure",
            Property::IgnitionDelay => "ignition delay",
            Property::PressureRise => "pressure rise",
            Property::CompressionTime => "compression time",
            Property::Volume => "volume",
            Property::Time => "time",
        }
    }

    /// Short column label used in exported data groups
    pub fn label(&self) -> &'static str {
        match self {
            Property::Temperature => "T",
            Property::Pressure => "P",
            Property::IgnitionDelay => "tau",
            Property::PressureRise => "dP/dt",
            Property::CompressionTime => "t_comp",
            Property::Volume => "V",
            Property::Time => "t",
        }
    }

    /// Look up a property by its ChemKED field name
    pub fn from_field_name(name: &str) -> Option<Property> {
        ALL.into_iter().find(|p| p.field_name() == name)
    }

    /// Look up a property by its ReSpecTh name
    pub fn from_respecth_name(name: &str) -> Option<Property> {
        ALL.into_iter().find(|p| p.respecth_name() == name)
    }
}

const ALL: [Property; 7] = [
    Property::Temperature,
    Property::Pressure,
    Property::IgnitionDelay,
    Property::PressureRise,
    Property::CompressionTime,
    Property::Volume,
    Property::Time,
];

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}
