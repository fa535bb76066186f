#![no_main]

use libfuzzer_sys::fuzz_target;
use meshmap_protocol::EnvelopeDecoder;
use meshmap_types::NodeNum;

// Arbitrary bus payloads must decode or fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    let decoder = EnvelopeDecoder::default();
    let accept_all = |_: NodeNum| true;

    let _ = decoder.decode("msh/US/2/e/LongFast/!00aaaa01", data, &accept_all);
    let _ = decoder.decode("msh/US/2/map/", data, &accept_all);

    // Use the first bytes as the topic to exercise the topic filter too.
    if let Some(split) = data.iter().position(|&b| b == 0) {
        if let Ok(topic) = std::str::from_utf8(&data[..split]) {
            let _ = decoder.decode(topic, &data[split + 1..], &accept_all);
        }
    }
});
