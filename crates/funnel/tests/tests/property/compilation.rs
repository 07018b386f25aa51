//! Property tests: descriptor compilation is total, bounded and idempotent.

use funnel_engine::{compile, EngineConfig};
use funnel_types::{Descriptor, DescriptorField};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_raw_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -1.0f64..2.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn arb_descriptor() -> impl Strategy<Value = Descriptor> {
    prop::collection::vec(prop::option::of(arb_raw_value()), DescriptorField::ALL.len())
        .prop_map(|values| {
            let mut descriptor = Descriptor::new("compile");
            for (field, value) in DescriptorField::ALL.into_iter().zip(values) {
                if let Some(value) = value {
                    descriptor.fields.insert(field.key().to_string(), value);
                }
            }
            descriptor
        })
}

proptest! {
    #[test]
    fn compilation_is_bounded(descriptor in arb_descriptor()) {
        prop_assert!(compile(&descriptor).within_ranges());
    }

    #[test]
    fn compilation_is_idempotent(descriptor in arb_descriptor()) {
        let copy = descriptor.clone();
        prop_assert_eq!(compile(&descriptor), compile(&descriptor));
        prop_assert_eq!(compile(&descriptor), compile(&copy));
    }

    #[test]
    fn out_of_range_fields_compile_like_their_clamped_value(raw in -1.0f64..2.0) {
        let field = DescriptorField::PriceSensitivity;
        let raw_descriptor = Descriptor::new("r").with(field, raw);
        let clamped = Descriptor::new("r").with(field, raw.clamp(0.0, 1.0));
        prop_assert_eq!(compile(&raw_descriptor), compile(&clamped));
    }

    #[test]
    fn calibration_never_mutates_base(value in -5.0f64..5.0) {
        let base = EngineConfig::belief_collapse();
        let overrides = BTreeMap::from([("belief.effort_weight".to_string(), value)]);
        let (effective, _) = EngineConfig::calibrate(&base, &overrides).unwrap();
        prop_assert_eq!(&base, &EngineConfig::belief_collapse());
        prop_assert!((0.0..=10.0).contains(&effective.belief.effort_weight));
    }
}
