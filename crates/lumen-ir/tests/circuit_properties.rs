//! Property tests for the circuit model.

use lumen_ir::{Circuit, MAX_MODES, MIN_MODES, OperationKind};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = OperationKind> {
    prop::sample::select(OperationKind::ALL.to_vec())
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (
        0u32..12,
        prop::collection::vec((arb_kind(), 0u32..10, prop::option::of(-20i32..20)), 0..16),
    )
        .prop_map(|(modes, ops)| {
            let mut circuit = Circuit::with_modes(modes);
            for (kind, mode, position) in ops {
                match position {
                    Some(p) => circuit.add_operation_at(kind, mode, f64::from(p) / 4.0, None),
                    None => circuit.add_operation(kind, mode, None),
                };
            }
            circuit
        })
}

proptest! {
    #[test]
    fn mode_count_is_always_clamped(requested in 0u32..100) {
        let mut circuit = Circuit::new();
        let effective = circuit.set_mode_count(requested);
        prop_assert!((MIN_MODES..=MAX_MODES).contains(&effective));
        prop_assert_eq!(circuit.mode_count(), effective);
    }

    #[test]
    fn by_mode_has_one_sorted_bucket_per_mode(circuit in arb_circuit()) {
        let buckets = circuit.by_mode();
        prop_assert_eq!(buckets.len(), circuit.mode_count() as usize);

        for (index, bucket) in buckets.iter().enumerate() {
            for op in bucket {
                prop_assert_eq!(op.mode.index(), index);
            }
            for pair in bucket.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
        }

        let live: usize = buckets.iter().map(Vec::len).sum();
        prop_assert_eq!(live + circuit.dormant_operations().count(), circuit.num_operations());
    }

    #[test]
    fn json_preserves_circuit(circuit in arb_circuit()) {
        let json = serde_json::to_string(&circuit).unwrap();
        let restored: Circuit = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored.mode_count(), circuit.mode_count());
        prop_assert_eq!(restored.num_operations(), circuit.num_operations());

        for (a, b) in restored.operations().iter().zip(circuit.operations()) {
            prop_assert_eq!(a.id, b.id);
            prop_assert_eq!(a.kind, b.kind);
            prop_assert_eq!(a.mode, b.mode);
            prop_assert_eq!(a.position, b.position);
            prop_assert_eq!(a.parameters.len(), b.parameters.len());
            for (key, value) in &b.parameters {
                prop_assert!((a.parameters[key] - value).abs() < 1e-12);
            }
        }
    }
}
