// IrBeacon - Build Script
//
// Injects build-time calibration constants and version info.

use std::env;
use std::process::Command;

/// Calibration overrides accepted from the build environment.
const CALIBRATION_VARS: [&str; 3] = [
    "IR_BEACON_CLOCK_HZ",
    "IR_BEACON_CARRIER_HZ",
    "IR_BEACON_SPIN_CYCLES",
];

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=VERSION_STRING=IrBeacon v{}-g{}", version, git_hash);

    // Forward calibration overrides; a bad value must fail the build,
    // a mistimed beacon is not detectable at runtime.
    for var in CALIBRATION_VARS {
        println!("cargo:rerun-if-env-changed={}", var);

        if let Ok(raw) = env::var(var) {
            let value: u32 = raw
                .trim()
                .parse()
                .unwrap_or_else(|_| panic!("{} must be an unsigned integer, got {:?}", var, raw));

            if value == 0 {
                panic!("{} must be non-zero", var);
            }

            println!("cargo:rustc-env={}={}", var, value);
        }
    }

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
