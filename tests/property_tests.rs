//! Property tests for the name matcher and unit conversions

use chemked::units::{Quantity, Unit};
use chemked::validator::compare_name;

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn name_part() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,8}"
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    proptest! {
        #[test]
        fn full_name_matches(given in name_part(), family in name_part()) {
            let candidate = format!("{} {}", given, family);
            prop_assert!(compare_name(&given, &family, &candidate));
        }

        #[test]
        fn initial_and_middle_name_variants_match(
            given in name_part(),
            middle in name_part(),
            family in name_part(),
        ) {
            let initial = &given[..1];
            let middle_initial = &middle[..1];
            let variants = [
                format!("{}. {}", initial, family),
                format!("{} {}. {}", given, middle_initial, family),
                format!("{} {} {}", given, middle, family),
                format!("{}, {}", family, given),
                format!("{} {}", given.to_lowercase(), family.to_uppercase()),
            ];
            for candidate in &variants {
                prop_assert!(
                    compare_name(&given, &family, candidate),
                    "{} {} should match {}", given, family, candidate
                );
            }
        }

        #[test]
        fn different_family_name_never_matches(
            given in name_part(),
            family in name_part(),
            other in name_part(),
        ) {
            prop_assume!(family.to_lowercase() != other.to_lowercase());
            let candidate = format!("{} {}", given, other);
            prop_assert!(!compare_name(&given, &family, &candidate));
        }

        #[test]
        fn temperature_conversion_returns_to_start(kelvin in 1.0f64..5000.0) {
            let celsius = Unit::parse("degC").unwrap();
            let k = Unit::parse("K").unwrap();
            let there = Quantity::new(kelvin, "K").unwrap().value_in(&celsius).unwrap();
            prop_assert!(close(there, kelvin - 273.15));
            let back = Quantity::new(there, "degC").unwrap().value_in(&k).unwrap();
            prop_assert!(close(back, kelvin));
        }

        #[test]
        fn pressure_in_any_unit_is_the_same_quantity(atm in 0.01f64..1000.0) {
            let original = Quantity::new(atm, "atm").unwrap();
            for units in ["Pa", "kPa", "bar", "torr", "psi"] {
                let target = Unit::parse(units).unwrap();
                let converted = Quantity {
                    magnitude: original.value_in(&target).unwrap(),
                    units: target,
                };
                prop_assert!(close(converted.si_magnitude(), original.si_magnitude()));
            }
        }

        #[test]
        fn incompatible_units_are_rejected(value in 1.0f64..1e6) {
            let quantity = Quantity::new(value, "K").unwrap();
            prop_assert!(quantity.value_in(&Unit::parse("Pa").unwrap()).is_err());
        }

        #[test]
        fn displayed_quantity_parses_back(value in 1e-3f64..1e6, units in prop::sample::select(vec!["K", "ms", "atm", "cm3", "us"])) {
            let quantity = Quantity::new(value, units).unwrap();
            let reparsed = Quantity::parse(&quantity.to_string()).unwrap();
            prop_assert_eq!(reparsed, quantity);
        }
    }
}
