//! Example: Generate raw captures and parameter files for every scenario.
//!
//! Run with: cargo run --example generate_dataset

use std::path::Path;
use xpress_testdata::{create_capture, CaptureManifest, CaptureScenario};

fn main() {
    println!("XPress Testdata Generator");
    println!("=========================\n");

    let dir = Path::new("datasets/press");
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Could not create {}: {}", dir.display(), e);
        return;
    }

    for scenario in CaptureScenario::ALL {
        let capture = create_capture(scenario, 42);
        let name = capture.name();

        // Raw historian rows
        let raw_path = dir.join(format!("{}.csv", name));
        match capture.write_raw(&raw_path) {
            Ok(()) => println!(
                "  Created {} ({} rows)",
                raw_path.display(),
                capture.historian_rows().len()
            ),
            Err(e) => eprintln!("  Warning: Could not save {}: {}", raw_path.display(), e),
        }

        // Parameter file
        let params_path = dir.join(format!("{}.yaml", name));
        if let Err(e) = capture.write_parameters(&params_path) {
            eprintln!("  Warning: Could not save parameters: {}", e);
        }

        // Manifest
        let manifest_path = dir.join(format!("{}.manifest.json", name));
        if let Err(e) = CaptureManifest::from_capture(&capture).to_json_file(&manifest_path) {
            eprintln!("  Warning: Could not save manifest: {}", e);
        }
    }

    println!("\nPrepare one with:");
    println!("  xpress-prep --config datasets/press/press_idle_gaps.yaml \\");
    println!("              --input datasets/press/press_idle_gaps.csv --output prepared.csv");
}
