#![no_main]

use libfuzzer_sys::fuzz_target;
use meshmap_store::NodeDb;
use meshmap_types::{PruneTtls, Timestamp};

// Arbitrary snapshot files must parse or fail cleanly. Anything that parses
// must survive pruning and re-export.
fuzz_target!(|data: &[u8]| {
    let Ok(mut db) = serde_json::from_slice::<NodeDb>(data) else {
        return;
    };
    db.prune(&PruneTtls::default(), Timestamp::new(u64::MAX / 2));
    let valid = db.valid();
    let _ = serde_json::to_vec(&valid);
});
