//! Persist a cluster memory to disk and reload it, printing the active
//! backend configuration along the way.
//!
//! Run with: `cargo run -p hyperstream --example persist_memory`

use std::fs::File;

use hyperstream::config_report;
use hyperstream::encoding::ThermometerEncoder;
use hyperstream::io::{load_cluster, save_cluster};
use hyperstream::memory::ClusterMemory;
use hyperstream::BinaryHv;

const DIM: usize = 2048;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}\n", config_report(Some(DIM)));

    // Accumulate temperature readings into two clusters.
    let thermometer = ThermometerEncoder::new(DIM, -20.0, 50.0);
    let mut clusters = ClusterMemory::new(DIM, 4);
    let mut hv = BinaryHv::new(DIM);
    for reading in [18.5, 21.0, 19.2, 22.3] {
        thermometer.encode(reading, &mut hv);
        clusters.update(1, &hv)?; // indoor
    }
    for reading in [-5.0, 2.5, -1.2, 0.8] {
        thermometer.encode(reading, &mut hv);
        clusters.update(2, &hv)?; // outdoor
    }

    let path = std::env::temp_dir().join("hyperstream-demo.hser1");
    save_cluster(&mut File::create(&path)?, &clusters)?;
    println!("saved {} clusters to {}", clusters.len(), path.display());

    let mut restored = ClusterMemory::new(DIM, 4);
    load_cluster(&mut File::open(&path)?, &mut restored)?;
    println!("reloaded {} clusters", restored.len());

    let mut indoor = BinaryHv::new(DIM);
    restored.finalize(1, &mut indoor);
    thermometer.encode(20.0, &mut hv);
    println!(
        "20.0°C vs indoor majority: {} of {} bits differ",
        hyperstream::ops::hamming_distance(&hv, &indoor),
        DIM
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
