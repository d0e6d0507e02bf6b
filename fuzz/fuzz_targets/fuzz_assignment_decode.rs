#![no_main]

use offergrid_layout::SlotId;
use offergrid_runtime::{decode_assignment, encode_assignment};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the slot count (1..=16); the rest is the stored value.
    let Some((&count, payload)) = data.split_first() else {
        return;
    };
    let slot_count = usize::from(count % 16) + 1;
    let Ok(raw) = std::str::from_utf8(payload) else {
        return;
    };

    // Decoding must never panic, and anything accepted must be a permutation.
    let Ok(assignment) = decode_assignment(raw, slot_count) else {
        return;
    };
    assert_eq!(assignment.len(), slot_count);
    let mut seen = vec![false; slot_count];
    for &index in assignment.as_slice() {
        assert!(index < slot_count, "content index out of range");
        assert!(!seen[index], "duplicate content index");
        seen[index] = true;
    }

    // Re-encoding an accepted value reproduces it.
    let encoded = encode_assignment(&assignment).expect("encode");
    let again = decode_assignment(&encoded, slot_count).expect("re-decode");
    assert_eq!(again, assignment);

    // Every slot resolves both ways.
    for slot in 0..slot_count {
        let slot = SlotId::new(slot as u8);
        let content = assignment.content_index(slot).expect("slot in range");
        assert_eq!(assignment.slot_showing(content), Some(slot));
    }
});
