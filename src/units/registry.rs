//! Unit definitions and SI prefixes known to the parser.

use super::Dimension;

/// A named unit relative to SI base units: `si = value * factor + offset`
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitDef {
    pub names: &'static [&'static str],
    pub factor: f64,
    pub offset: f64,
    pub dimension: Dimension,
    pub prefixable: bool,
}

const fn def(
    names: &'static [&'static str],
    factor: f64,
    dimension: Dimension,
    prefixable: bool,
) -> UnitDef {
    UnitDef {
        names,
        factor,
        offset: 0.0,
        dimension,
        prefixable,
    }
}

const PRESSURE: Dimension = Dimension::new(-1, 1, -2, 0, 0);
const VOLUME: Dimension = Dimension::new(3, 0, 0, 0, 0);

pub(crate) static UNITS: &[UnitDef] = &[
    // dimensionless
    def(&["dimensionless"], 1.0, Dimension::NONE, false),
    def(&["percent", "%"], 0.01, Dimension::NONE, false),
    def(&["ppm"], 1e-6, Dimension::NONE, false),
    // length
    def(&["m", "meter", "metre"], 1.0, Dimension::LENGTH, true),
    def(&["in", "inch"], 0.0254, Dimension::LENGTH, false),
    def(&["ft", "foot", "feet"], 0.3048, Dimension::LENGTH, false),
    // mass
    def(&["g", "gram"], 1e-3, Dimension::MASS, true),
    def(&["lb", "pound"], 0.45359237, Dimension::MASS, false),
    // time
    def(&["s", "sec", "second"], 1.0, Dimension::TIME, true),
    def(&["min", "minute"], 60.0, Dimension::TIME, false),
    def(&["h", "hr", "hour"], 3600.0, Dimension::TIME, false),
    def(&["Hz", "hertz"], 1.0, Dimension::TIME.powi(-1), true),
    // temperature
    def(&["K", "kelvin"], 1.0, Dimension::TEMPERATURE, false),
    UnitDef {
        names: &["degC", "celsius", "degree_Celsius", "°C"],
        factor: 1.0,
        offset: 273.15,
        dimension: Dimension::TEMPERATURE,
        prefixable: false,
    },
    UnitDef {
        names: &["degF", "fahrenheit", "degree_Fahrenheit", "°F"],
        factor: 5.0 / 9.0,
        offset: 459.67 * 5.0 / 9.0,
        dimension: Dimension::TEMPERATURE,
        prefixable: false,
    },
    def(&["degR", "rankine"], 5.0 / 9.0, Dimension::TEMPERATURE, false),
    // amount of substance
    def(&["mol", "mole"], 1.0, Dimension::AMOUNT, true),
    // volume
    def(&["L", "l", "liter", "litre"], 1e-3, VOLUME, true),
    def(&["cc"], 1e-6, VOLUME, false),
    // pressure
    def(&["Pa", "pascal"], 1.0, PRESSURE, true),
    def(&["bar"], 1e5, PRESSURE, true),
    def(&["atm", "atmosphere"], 101_325.0, PRESSURE, false),
    def(&["torr", "Torr"], 101_325.0 / 760.0, PRESSURE, false),
    def(&["mmHg", "millimeter_Hg"], 133.322_387_415, PRESSURE, false),
    def(&["psi"], 6_894.757_293_168, PRESSURE, false),
    // force and energy
    def(&["N", "newton"], 1.0, Dimension::new(1, 1, -2, 0, 0), true),
    def(&["J", "joule"], 1.0, Dimension::new(2, 1, -2, 0, 0), true),
    def(&["cal", "calorie"], 4.184, Dimension::new(2, 1, -2, 0, 0), true),
];

/// (symbol, name, factor)
static PREFIXES: &[(&str, &str, f64)] = &[
    ("Y", "yotta", 1e24),
    ("Z", "zetta", 1e21),
    ("E", "exa", 1e18),
    ("P", "peta", 1e15),
    ("T", "tera", 1e12),
    ("G", "giga", 1e9),
    ("M", "mega", 1e6),
    ("k", "kilo", 1e3),
    ("h", "hecto", 1e2),
    ("da", "deca", 1e1),
    ("d", "deci", 1e-1),
    ("c", "centi", 1e-2),
    ("m", "milli", 1e-3),
    ("u", "micro", 1e-6),
    ("µ", "micro", 1e-6),
    ("μ", "micro", 1e-6),
    ("n", "nano", 1e-9),
    ("p", "pico", 1e-12),
    ("f", "femto", 1e-15),
];

fn exact(name: &str) -> Option<UnitDef> {
    UNITS.iter().find(|u| u.names.contains(&name)).copied()
}

fn prefixed(name: &str) -> Option<UnitDef> {
    for &(symbol, long, scale) in PREFIXES {
        for prefix in [symbol, long] {
            let Some(rest) = name.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if let Some(unit) = exact(rest).filter(|u| u.prefixable) {
                return Some(UnitDef {
                    factor: unit.factor * scale,
                    ..unit
                });
            }
        }
    }
    None
}

fn lookup_once(name: &str) -> Option<UnitDef> {
    exact(name).or_else(|| prefixed(name))
}

/// Resolve a single unit name, trying exact names, SI prefixes, plurals and
/// finally a case-insensitive match on long names.
pub(crate) fn lookup(name: &str) -> Option<UnitDef> {
    if let Some(unit) = lookup_once(name) {
        return Some(unit);
    }
    if name.chars().count() > 3 {
        if let Some(singular) = name.strip_suffix('s') {
            if let Some(unit) = lookup_once(singular) {
                return Some(unit);
            }
        }
    }
    let lower = name.to_lowercase();
    if lower != name && lower.chars().count() > 2 {
        return lookup(&lower);
    }
    None
}
