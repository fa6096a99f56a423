use super::*;
use crate::model::{ApparatusKind, CompositionKind, IgnitionTarget, IgnitionType};
use crate::resolver::OfflineResolver;
use crate::units::Quantity;
use crate::validator::{ValidationConfig, Validator};

const SHOCK_TUBE: &str = r#"
file-author:
  name: Kyle E Niemeyer
  ORCID: "0000-0003-4425-7097"
file-version: 0
chemked-version: "0.4.1"
reference:
  doi: "10.1016/j.combustflame.2009.12.022"
  authors:
    - name: Kyle E Niemeyer
  journal: Combustion and Flame
  year: 2010
  volume: 157
  pages: "1001-1010"
experiment-type: ignition delay
apparatus:
  kind: shock tube
  institution: Case Western Reserve University
  facility: CWRU shock tube
common-properties:
  pressure: ["2.18 atm"]
  composition:
    kind: mole fraction
    species:
      - species-name: H2
        InChI: 1S/H2/h1H
        amount: [0.00444]
      - species-name: O2
        InChI: 1S/O2/c1-2
        amount: [0.00556]
      - species-name: Ar
        amount: [0.99]
  ignition-type:
    target: pressure
    type: d/dt max
datapoints:
  - temperature: ["1164.48 K"]
    ignition-delay: ["471.54 us"]
  - temperature: ["1200.0 K"]
    pressure: ["2.0 atm"]
    ignition-delay: ["301.2 us"]
"#;

const RCM: &str = r#"
file-author:
  name: Bryan W Weber
file-version: 1
chemked-version: "0.4.1"
reference:
  detail: Weber et al. 2011
experiment-type: ignition delay
apparatus:
  kind: rapid compression machine
datapoints:
  - temperature: ["297.4 K"]
    pressure: ["958.0 torr"]
    ignition-delay: ["1.0 ms"]
    compression-time: ["38.0 ms"]
    composition:
      kind: mass fraction
      species:
        - species-name: nC4H10OH
          amount: [0.0338]
    ignition-type:
      target: OH*
      type: max
    volume-history:
      time:
        units: s
        column: 1
      volume:
        units: cm3
        column: 0
      values:
        - [500.0, 0.0]
        - [498.0, 0.001]
        - [490.0, 0.002]
"#;

fn validator() -> Validator<'static> {
    Validator::new(&OfflineResolver).with_config(ValidationConfig::all())
}

fn load(text: &str) -> Result<ExperimentRecord, ChemKedError> {
    from_yaml_str(text, &validator())
}

fn edited(text: &str, from: &str, to: &str) -> String {
    assert!(text.contains(from), "fixture has no '{}'", from);
    text.replacen(from, to, 1)
}

#[test]
fn test_load_shock_tube() {
    let record = load(SHOCK_TUBE).unwrap();

    assert_eq!(record.file_author.name, "Kyle E Niemeyer");
    assert_eq!(record.file_author.orcid.as_deref(), Some("0000-0003-4425-7097"));
    assert_eq!(record.apparatus.kind, ApparatusKind::ShockTube);
    assert_eq!(record.apparatus.facility, "CWRU shock tube");
    assert_eq!(record.reference.year, Some(2010));
    assert_eq!(record.reference.volume, Some(157));
    assert_eq!(record.datapoints.len(), 2);

    let first = &record.datapoints[0];
    assert_eq!(first.temperature, Some(Quantity::parse("1164.48 K").unwrap()));
    assert_eq!(first.ignition_delay, Some(Quantity::parse("471.54 us").unwrap()));
}

#[test]
fn test_common_properties_distributed() {
    let record = load(SHOCK_TUBE).unwrap();

    let first = &record.datapoints[0];
    assert_eq!(first.pressure, Some(Quantity::parse("2.18 atm").unwrap()));
    let composition = first.composition.as_ref().unwrap();
    assert_eq!(composition.kind, CompositionKind::MoleFraction);
    assert_eq!(composition.amount_of("O2"), Some(0.00556));
    let ignition = first.ignition_type.as_ref().unwrap();
    assert_eq!(ignition.target, IgnitionTarget::Pressure);
    assert_eq!(ignition.kind, IgnitionType::DdtMax);

    // own value wins over the common one
    assert_eq!(
        record.datapoints[1].pressure,
        Some(Quantity::parse("2.0 atm").unwrap())
    );
}

#[test]
fn test_load_rcm_volume_history() {
    let record = load(RCM).unwrap();
    let point = &record.datapoints[0];

    assert!(record.common_properties.is_empty());
    assert_eq!(point.compression_time, Some(Quantity::parse("38.0 ms").unwrap()));
    assert_eq!(
        point.ignition_type.as_ref().map(|i| i.target.clone()),
        Some(IgnitionTarget::Species("OH*".to_string()))
    );

    let history = point.volume_history.as_ref().unwrap();
    assert_eq!(history.time_units.as_str(), "s");
    assert_eq!(history.volume_units.as_str(), "cm3");
    assert_eq!(history.values[0], (0.0, 500.0));
    assert_eq!(history.values[2], (0.002, 490.0));
}

#[test]
fn test_invalid_units_rejected() {
    let text = edited(SHOCK_TUBE, "1164.48 K", "1164.48 Pa");
    match load(&text) {
        Err(ChemKedError::ValidationFailed(report)) => {
            assert_eq!(
                report.errors_for("datapoints[0].temperature"),
                vec!["incompatible units; should be consistent with kelvin"]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_missing_field_rejected() {
    let text = edited(SHOCK_TUBE, "    ignition-delay: [\"301.2 us\"]\n", "");
    let err = load(&text).unwrap_err();
    let ChemKedError::ValidationFailed(report) = &err else {
        panic!("expected validation failure, got {:?}", err);
    };
    assert_eq!(
        report.errors_for("datapoints[1].ignition-delay"),
        vec!["required field"]
    );
    assert!(err.to_string().contains("<string>"));
}

#[test]
fn test_negative_counts_rejected_by_field() {
    let text = edited(SHOCK_TUBE, "file-version: 0", "file-version: -1");
    let text = edited(&text, "volume: 157", "volume: -5");
    match load(&text) {
        Err(ChemKedError::ValidationFailed(report)) => {
            assert_eq!(
                report.errors_for("file-version"),
                vec!["must be a non-negative integer"]
            );
            assert_eq!(
                report.errors_for("reference.volume"),
                vec!["must be a non-negative integer"]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }

    let rcm = edited(RCM, "column: 1", "column: -1");
    match load(&rcm) {
        Err(ChemKedError::ValidationFailed(report)) => {
            assert_eq!(
                report.errors_for("datapoints[0].volume-history.time.column"),
                vec!["must be a non-negative integer"]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_record_rules_apply_without_semantic_checks() {
    let text = edited(
        SHOCK_TUBE,
        "    ignition-delay: [\"471.54 us\"]\n",
        "    ignition-delay: [\"471.54 us\"]\n    compression-time: [\"30.0 ms\"]\n",
    );
    let validator =
        Validator::new(&OfflineResolver).with_config(ValidationConfig::structural_only());
    match from_yaml_str(&text, &validator) {
        Err(ChemKedError::ValidationFailed(report)) => {
            assert_eq!(
                report.errors_for("datapoints[0].compression-time"),
                vec!["Compression time cannot be defined for shock tube."]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_malformed_yaml() {
    let err = load("file-author: [unclosed").unwrap_err();
    assert!(matches!(err, ChemKedError::YamlError(_)));
}

#[test]
fn test_yaml_round_trip() {
    let record = load(SHOCK_TUBE).unwrap();
    let text = to_yaml_string(&record).unwrap();

    assert!(text.contains("chemked-version:"));
    assert!(text.contains("- 2.18 atm"));
    assert!(text.contains("species-name: Ar"));

    let reloaded = load(&text).unwrap();
    assert_eq!(reloaded, record);
}

#[test]
fn test_rcm_round_trip_columns() {
    let record = load(RCM).unwrap();
    let value = to_value(&record).unwrap();

    let history = &value["datapoints"][0]["volume-history"];
    assert_eq!(history["time"]["column"].as_u64(), Some(0));
    assert_eq!(history["volume"]["column"].as_u64(), Some(1));
    assert_eq!(history["values"][1][1].as_f64(), Some(498.0));
    assert!(value.get("common-properties").is_none());

    let reloaded = from_value(value, &validator(), "round trip").unwrap();
    assert_eq!(reloaded, record);
}

#[test]
fn test_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rcm.yaml");
    std::fs::write(&path, RCM).unwrap();

    let record = from_yaml_file(&path, &validator()).unwrap();
    assert_eq!(record.apparatus.kind, ApparatusKind::RapidCompressionMachine);

    let missing = from_yaml_file(dir.path().join("absent.yaml"), &validator());
    assert!(matches!(missing, Err(ChemKedError::IoError(_))));
}
