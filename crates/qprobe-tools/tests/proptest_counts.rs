//! Property-based tests for measurement-count formatting.
//!
//! Hex state keys must come back as the same integer in binary, padded to
//! the register width and split per classical register.

use proptest::prelude::*;
use qprobe_hal::ExperimentHeader;
use qprobe_tools::format::{format_counts, format_state};
use serde_json::{Map, Value};

/// A header with 1-4 classical registers of 1-8 bits each.
fn arb_header() -> impl Strategy<Value = ExperimentHeader> {
    prop::collection::vec(1_usize..=8, 1..=4).prop_map(|sizes| {
        let memory_slots = sizes.iter().sum();
        ExperimentHeader {
            name: "circuit".into(),
            memory_slots: Some(memory_slots),
            creg_sizes: Some(
                sizes
                    .into_iter()
                    .enumerate()
                    .map(|(i, size)| (format!("c{i}"), size))
                    .collect(),
            ),
        }
    })
}

/// A header paired with a state that fits in its memory slots.
fn arb_header_and_state() -> impl Strategy<Value = (ExperimentHeader, u64)> {
    arb_header().prop_flat_map(|header| {
        let slots = header.memory_slots.unwrap_or(1);
        (Just(header), 0_u64..(1_u64 << slots))
    })
}

proptest! {
    #[test]
    fn formatted_state_preserves_value((header, state) in arb_header_and_state()) {
        let formatted = format_state(&format!("0x{state:x}"), &header);
        let bits: String = formatted.chars().filter(|c| *c != ' ').collect();
        prop_assert_eq!(bits.len(), header.memory_slots.unwrap_or(0));
        prop_assert_eq!(u64::from_str_radix(&bits, 2).unwrap(), state);
    }

    #[test]
    fn formatted_state_splits_per_register((header, state) in arb_header_and_state()) {
        let formatted = format_state(&format!("0x{state:x}"), &header);
        let chunk_sizes: Vec<usize> = formatted.split(' ').map(str::len).collect();
        let mut expected: Vec<usize> = header
            .creg_sizes
            .as_ref()
            .unwrap()
            .iter()
            .map(|(_, size)| *size)
            .collect();
        expected.reverse();
        prop_assert_eq!(chunk_sizes, expected);
    }

    #[test]
    fn format_counts_keeps_every_entry(
        states in prop::collection::btree_set(0_u32..256, 1..16),
        count in 1_u64..10_000,
    ) {
        let mut raw = Map::new();
        for state in &states {
            raw.insert(format!("0x{state:x}"), Value::from(count));
        }
        let header = ExperimentHeader {
            memory_slots: Some(8),
            ..ExperimentHeader::default()
        };
        let formatted = format_counts(&raw, &header);
        prop_assert_eq!(formatted.len(), states.len());
        for ((bits, n), state) in formatted.iter().zip(&states) {
            prop_assert_eq!(*n, count);
            prop_assert_eq!(u32::from_str_radix(bits, 2).unwrap(), *state);
        }
    }
}
