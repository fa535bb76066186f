#![no_main]

use libfuzzer_sys::fuzz_target;
use meshmap_node::dispatcher::{AppPayload, NodeUpdate};
use meshmap_store::NodeDb;
use meshmap_types::{NodeNum, Timestamp};

// First two bytes pick the port; the rest is the payload. Whatever decodes
// and validates must apply to the table without panicking.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let port = i32::from(u16::from_le_bytes([data[0], data[1]]) % 80);
    let from = NodeNum::new(0xAAAA01);

    let Ok(payload) = AppPayload::decode(port, &data[2..]) else {
        return;
    };
    if let Ok(Some(update)) = NodeUpdate::from_payload(from, payload) {
        let mut db = NodeDb::new();
        update.apply(&mut db, from, "msh/US/2/map/", Timestamp::new(1));
        let json = serde_json::to_string(&db).expect("node table always serializes");
        let _: NodeDb = serde_json::from_str(&json).expect("serialized table parses back");
    }
});
