#![no_main]

use libfuzzer_sys::fuzz_target;
use resremap::bytecode::ArrayPayload;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = ArrayPayload::parse(data) {
        let _ = payload.to_bytes();
        let _ = payload.as_u32s();
    }
});
