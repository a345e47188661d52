// Captures the build timestamp exposed by the environment endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let build_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    println!("cargo:rustc-env=BUILD_TIMESTAMP={build_timestamp}");
}
