#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark_tour::TourManifest;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Cap length to keep fuzzing fast.
    if text.len() > 4096 {
        return;
    }

    // Loading must reject bad input with an error, never a panic, and
    // anything accepted must pass its own validation.
    for manifest in [
        TourManifest::from_toml_str(text),
        TourManifest::from_json_str(text),
    ]
    .into_iter()
    .flatten()
    {
        assert!(manifest.validate().is_empty());
    }
});
