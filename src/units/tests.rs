use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_parse_simple_units() {
    let k = Unit::parse("kelvin").unwrap();
    assert_eq!(k.dimension(), Dimension::TEMPERATURE);
    assert!(close(k.to_si(300.0), 300.0));

    let atm = Unit::parse("atm").unwrap();
    let pa = Unit::parse("pascal").unwrap();
    assert!(atm.is_compatible_with(&pa));
    assert!(close(atm.to_si(1.0), 101_325.0));
}

#[test]
fn test_prefixed_units() {
    let ms = Unit::parse("ms").unwrap();
    assert_eq!(ms.dimension(), Dimension::TIME);
    assert!(close(ms.to_si(1.0), 1e-3));

    let us = Unit::parse("us").unwrap();
    assert!(close(us.to_si(5.0), 5e-6));

    let kpa = Unit::parse("kPa").unwrap();
    assert!(close(kpa.to_si(2.0), 2000.0));

    let millisecond = Unit::parse("millisecond").unwrap();
    assert!(close(millisecond.to_si(1.0), 1e-3));

    // minute wins over milli-inch
    let min = Unit::parse("min").unwrap();
    assert!(close(min.to_si(1.0), 60.0));
}

#[test]
fn test_plural_and_case_variants() {
    assert!(close(Unit::parse("seconds").unwrap().to_si(2.0), 2.0));
    assert_eq!(Unit::parse("Kelvin").unwrap().dimension(), Dimension::TEMPERATURE);
}

#[test]
fn test_compound_expressions() {
    let rate = Unit::parse("1.0 / second").unwrap();
    assert_eq!(rate.dimension(), Dimension::TIME.powi(-1));

    let per_ms = Unit::parse("1/ms").unwrap();
    assert!(per_ms.is_compatible_with(&rate));
    assert!(close(per_ms.to_si(1.0), 1000.0));

    let volume = Unit::parse("meter**3").unwrap();
    assert_eq!(volume.dimension(), Dimension::LENGTH.powi(3));
    let cm3 = Unit::parse("cm3").unwrap();
    assert!(close(cm3.to_si(1.0), 1e-6));
    let caret = Unit::parse("cm^3").unwrap();
    assert!(close(caret.to_si(1.0), 1e-6));

    let force = Unit::parse("kg m / s**2").unwrap();
    assert_eq!(force.dimension(), Unit::parse("newton").unwrap().dimension());

    let grouped = Unit::parse("J/(mol*K)").unwrap();
    assert_eq!(grouped.dimension(), Dimension::new(2, 1, -2, -1, -1));
}

#[test]
fn test_torr_alias() {
    let upper = Unit::parse("Torr").unwrap();
    let lower = Unit::parse("torr").unwrap();
    assert!(close(upper.to_si(760.0), 101_325.0));
    assert!(close(lower.to_si(760.0), 101_325.0));
    assert_eq!(normalize_unit_name("Torr"), "torr");
    assert_eq!(normalize_unit_name(" atm "), "atm");
}

#[test]
fn test_offset_temperature() {
    let q = Quantity::parse("0 degC").unwrap();
    assert!(close(q.si_magnitude(), 273.15));

    let f = Quantity::parse("32 degF").unwrap();
    assert!(close(f.si_magnitude(), 273.15));

    let kelvin = Unit::parse("kelvin").unwrap();
    assert!(close(q.value_in(&kelvin).unwrap(), 273.15));
}

#[test]
fn test_quantity_parse_and_display() {
    let q = Quantity::parse("1000 kelvin").unwrap();
    assert_eq!(q.magnitude, 1000.0);
    assert_eq!(q.units.as_str(), "kelvin");
    assert_eq!(q.to_string(), "1000.0 kelvin");

    let q = Quantity::parse("2.18 atm").unwrap();
    assert_eq!(q.to_string(), "2.18 atm");

    let q = Quantity::parse("1.0e-3 1/s").unwrap();
    assert_eq!(q.magnitude, 1e-3);

    let bare = Quantity::parse("0.5").unwrap();
    assert!(bare.units.dimension().is_dimensionless());
    assert_eq!(bare.to_string(), "0.5");
}

#[test]
fn test_quantity_errors() {
    assert!(matches!(
        Quantity::parse("abc kelvin"),
        Err(UnitError::InvalidMagnitude(_))
    ));
    assert!(matches!(
        Quantity::parse("1.0 furlongs"),
        Err(UnitError::UnknownUnit(_))
    ));
    assert!(matches!(
        Unit::parse("m**x"),
        Err(UnitError::InvalidExpression { .. })
    ));
    assert!(Unit::parse("(m").is_err());
    assert!(Unit::parse("").is_err());
}

#[test]
fn test_value_in_and_same_as() {
    let p = Quantity::parse("1 atm").unwrap();
    let pa = Unit::parse("Pa").unwrap();
    assert!(close(p.value_in(&pa).unwrap(), 101_325.0));

    let k = Unit::parse("K").unwrap();
    assert!(matches!(p.value_in(&k), Err(UnitError::Incompatible { .. })));

    assert!(p.same_as(&Quantity::parse("101325 Pa").unwrap()));
    assert!(!p.same_as(&Quantity::parse("1 bar").unwrap()));
    assert!(!p.same_as(&Quantity::parse("1 K").unwrap()));
}

#[test]
fn test_format_magnitude() {
    assert_eq!(format_magnitude(1000.0), "1000.0");
    assert_eq!(format_magnitude(0.5), "0.5");
    assert_eq!(format_magnitude(471.54), "471.54");
    assert_eq!(format_magnitude(-2.0), "-2.0");
}

#[test]
fn test_exponent_overflow_is_an_error() {
    for expression in ["(m**100)**2", "m**100*m**100", "1/(s**100)/s**100", "m**127 m"] {
        match Unit::parse(expression) {
            Err(UnitError::InvalidExpression { reason, .. }) => {
                assert_eq!(reason, "dimension exponent out of range", "{}", expression)
            }
            other => panic!("{} parsed as {:?}", expression, other),
        }
    }
    assert_eq!(
        Unit::parse("m**100/m**100").unwrap().dimension(),
        Dimension::NONE
    );
}
