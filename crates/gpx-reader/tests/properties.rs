//! Property-based tests for scalar coercions and child ordering.

use gpx_model::{Element, FixType, Value};
use gpx_reader::coerce::{DECIMAL, DEGREES, DGPS_STATION, FIX, RawInput, default_registry};
use gpx_reader::schema::ROUTE;
use gpx_reader::{GPX_NAMESPACE, GpxError, Interpreter};
use proptest::prelude::*;

fn coerce(type_name: &str, text: &str) -> Result<Value, GpxError> {
    default_registry().coerce(type_name, RawInput::Text(Some(text)))
}

proptest! {
    /// Property: any string in the decimal grammar parses to its exact value
    #[test]
    fn decimal_accepts_grammar(text in "[+-]?([0-9]{1,8}(\\.[0-9]{0,8})?|\\.[0-9]{1,8})") {
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(coerce(DECIMAL, &text).unwrap(), Value::Decimal(expected));
    }

    /// Property: a trailing non-numeric character is rejected
    #[test]
    fn decimal_rejects_trailing_garbage(text in "[0-9]{0,4}\\.?[0-9]{0,4}[a-zA-Z%_ ]") {
        let result = coerce(DECIMAL, &text);
        prop_assert!(matches!(result, Err(GpxError::InvalidValue { .. })), "{:?}", result);
    }

    /// Property: degrees accept exactly the closed interval [0, 360]
    #[test]
    fn degrees_in_range(x in 0.0f64..=360.0) {
        prop_assert_eq!(coerce(DEGREES, &x.to_string()).unwrap(), Value::Decimal(x));
    }

    #[test]
    fn degrees_out_of_range(x in prop_oneof![-1.0e6f64..-1.0e-6, 360.000_001f64..1.0e6]) {
        let result = coerce(DEGREES, &x.to_string());
        prop_assert!(matches!(result, Err(GpxError::OutOfRange { .. })), "{:?}", result);
    }

    /// Property: DGPS station ids accept exactly [0, 1023]
    #[test]
    fn dgps_station_range(id in -5000i64..5000) {
        let result = coerce(DGPS_STATION, &id.to_string());
        if (0..=1023).contains(&id) {
            prop_assert_eq!(result.unwrap(), Value::Integer(id));
        } else {
            prop_assert!(matches!(result, Err(GpxError::OutOfRange { .. })), "{:?}", result);
        }
    }

    /// Property: fix accepts only its five tokens
    #[test]
    fn fix_rejects_other_tokens(
        token in "[a-z0-9]{1,5}".prop_filter("known token", |t| t.parse::<FixType>().is_err())
    ) {
        let result = coerce(FIX, &token);
        prop_assert!(matches!(result, Err(GpxError::InvalidEnum { .. })), "{:?}", result);
    }

    /// Property: repeated children keep document order around other siblings
    #[test]
    fn repeated_children_keep_order(layout in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mut route = Element::namespaced(GPX_NAMESPACE, "rte");
        let mut expected = Vec::new();
        for (index, is_point) in layout.iter().enumerate() {
            let child = if *is_point {
                expected.push(index as f64);
                Element::namespaced(GPX_NAMESPACE, "rtept")
                    .with_attribute("lat", "0")
                    .with_attribute("lon", index.to_string())
            } else {
                Element::namespaced(GPX_NAMESPACE, "desc").with_text("noise")
            };
            route = route.with_child(child);
        }

        let registry = default_registry();
        let record = Interpreter::new(&registry).parse(&route, &ROUTE).unwrap();
        let order: Vec<f64> = record
            .records("rtept")
            .iter()
            .filter_map(|point| point.decimal("lon"))
            .collect();
        prop_assert_eq!(order, expected);
    }
}

#[test]
fn fix_accepts_every_token() {
    for fix in FixType::all() {
        assert_eq!(coerce(FIX, fix.as_str()).unwrap(), Value::Fix(*fix));
    }
}
