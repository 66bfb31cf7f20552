//! Fuzz target for benchmark config file parsing.
//!
//! Arbitrary text must parse to a config or an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use gen_throughput::BenchConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = BenchConfig::from_toml(text) {
            let _ = config.validate();
            let _ = config.length_bounds();
        }
    }
});
