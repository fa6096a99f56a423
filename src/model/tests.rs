use super::*;
use crate::units::Quantity;

use std::str::FromStr;

fn q(text: &str) -> Quantity {
    Quantity::parse(text).unwrap()
}

fn shock_tube_record() -> ExperimentRecord {
    ExperimentRecord::new(
        Author::new("Kyle Niemeyer"),
        Apparatus::new(ApparatusKind::ShockTube),
        Reference::from_detail("Some citation."),
    )
}

#[test]
fn test_keyword_parsing() {
    assert_eq!(
        ApparatusKind::from_str("rapid compression machine").unwrap(),
        ApparatusKind::RapidCompressionMachine
    );
    assert_eq!(IgnitionType::from_str("d/dt max").unwrap(), IgnitionType::DdtMax);
    assert_eq!(CompositionKind::MassFraction.as_str(), "mass fraction");
    let err = ApparatusKind::from_str("flow reactor").unwrap_err();
    assert_eq!(err.to_string(), "Unknown apparatus kind: 'flow reactor'");
    assert_eq!(
        ExperimentType::from_respecth_name("Ignition delay measurement"),
        Some(ExperimentType::IgnitionDelay)
    );
    assert_eq!(ExperimentType::from_respecth_name("Laminar burning velocity"), None);
}

#[test]
fn test_ignition_target_parsing() {
    assert_eq!(IgnitionTarget::from_str("pressure").unwrap(), IgnitionTarget::Pressure);
    assert_eq!(
        IgnitionTarget::from_str("OH*").unwrap(),
        IgnitionTarget::Species("OH*".to_string())
    );
    assert!(IgnitionTarget::from_str("OH;CH").is_err());
    assert!(IgnitionTarget::from_str("  ").is_err());
}

#[test]
fn test_apply_common_does_not_overwrite() {
    let mut record = shock_tube_record();
    record.common_properties.temperature = Some(q("1000 kelvin"));
    record.common_properties.pressure = Some(q("1 atm"));

    let own = DataPoint {
        temperature: Some(q("1200 kelvin")),
        ..Default::default()
    };
    record.datapoints.push(own);
    record.datapoints.push(DataPoint::default());
    record.apply_common_properties();

    assert_eq!(record.datapoints[0].temperature, Some(q("1200 kelvin")));
    assert_eq!(record.datapoints[0].pressure, Some(q("1 atm")));
    assert_eq!(record.datapoints[1].temperature, Some(q("1000 kelvin")));

    // broadcasting again changes nothing
    let before = record.datapoints.clone();
    record.apply_common_properties();
    assert_eq!(record.datapoints, before);
}

#[test]
fn test_property_conflicts() {
    let mut record = shock_tube_record();
    assert!(record.property_conflicts().is_empty());

    record.datapoints.push(DataPoint {
        compression_time: Some(q("30 ms")),
        ..Default::default()
    });
    assert_eq!(record.property_conflicts().len(), 1);

    let mut rcm = shock_tube_record();
    rcm.apparatus.kind = ApparatusKind::RapidCompressionMachine;
    rcm.common_properties.pressure_rise = Some(q("0.1 1/ms"));
    let units = crate::units::Unit::parse("s").unwrap();
    let volume = crate::units::Unit::parse("cm3").unwrap();
    rcm.datapoints.push(DataPoint {
        volume_history: Some(VolumeHistory::new(units, volume)),
        ..Default::default()
    });
    let conflicts = rcm.property_conflicts();
    assert_eq!(conflicts.len(), 2);
    assert!(conflicts.iter().any(|c| c.contains("volume history")));
}

#[test]
fn test_reference_citation() {
    let reference = Reference {
        doi: Some("10.1016/j.combustflame.2011.08.014".to_string()),
        detail: Some("Fig. 4.".to_string()),
        journal: Some("Combustion and Flame".to_string()),
        year: Some(2012),
        volume: Some(159),
        pages: Some("918-926".to_string()),
        authors: vec![Author::new("Bryan W. Weber"), Author::new("Chih-Jen Sung")],
    };
    assert_eq!(
        reference.citation(),
        "Bryan W. Weber, Chih-Jen Sung, Combustion and Flame (2012) 159:918-926. Fig. 4."
    );

    assert_eq!(Reference::from_detail("Only text.").citation(), "Only text.");
    assert!(Reference::from_doi("10.1/x").is_identified());
    assert!(!Reference::default().is_identified());
}

#[test]
fn test_property_names() {
    assert_eq!(Property::from_respecth_name("ignition delay"), Some(Property::IgnitionDelay));
    assert_eq!(Property::from_field_name("pressure-rise"), Some(Property::PressureRise));
    assert_eq!(Property::PressureRise.label(), "dP/dt");
    assert_eq!(Property::from_respecth_name("composition"), None);
}

#[test]
fn test_composition_lookup() {
    let mut composition = Composition::new(CompositionKind::MoleFraction);
    composition.species.push(Species {
        name: "H2".to_string(),
        inchi: Some("1S/H2/h1H".to_string()),
        amount: 0.2,
    });
    assert_eq!(composition.amount_of("H2"), Some(0.2));
    assert_eq!(composition.amount_of("O2"), None);
}
