/// Diagnostic tool: decodes W2D streams and reports records, notifications,
/// bounds and the fit-to-page scale.
///
/// Usage:
///     cargo run --bin diag_w2d_dump -- <path_to_w2d> [--failsafe] [--records]
///     cargo run --bin diag_w2d_dump -- test_output/w2d/   (decodes all .w2d in dir)
///
/// Set `RUST_LOG=debug` (or `trace`) for per-opcode logging.

use anyhow::{bail, Context, Result};
use dwfrust::io::w2d::{read_many, W2dReaderConfiguration};
use dwfrust::{LayoutOptions, W2dDrawing};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let failsafe = args.iter().any(|a| a == "--failsafe");
    let show_records = args.iter().any(|a| a == "--records");
    let Some(target) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("Usage: diag_w2d_dump <path_to_w2d_or_directory> [--failsafe] [--records]");
    };

    let files = collect_files(Path::new(target))?;
    let buffers = files
        .iter()
        .map(|f| fs::read(f).with_context(|| format!("reading {}", f.display())))
        .collect::<Result<Vec<_>>>()?;
    let slices: Vec<&[u8]> = buffers.iter().map(Vec::as_slice).collect();

    let config = W2dReaderConfiguration {
        failsafe,
        ..Default::default()
    };
    let results = read_many(&slices, &config);

    let mut success = 0;
    let mut failed = 0;
    for (file, result) in files.iter().zip(results) {
        println!("=== {} ===", file.display());
        match result {
            Ok(drawing) => {
                report(&drawing, show_records);
                success += 1;
            }
            Err(e) => {
                println!("  FAILED: {}", e);
                failed += 1;
            }
        }
        println!();
    }

    println!(
        "Results: {} succeeded, {} failed out of {} total",
        success,
        failed,
        files.len()
    );
    Ok(())
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("listing {}", path.display()))? {
        let p = entry?.path();
        if p.extension().map(|e| e == "w2d").unwrap_or(false) {
            files.push(p);
        }
    }
    files.sort();
    Ok(files)
}

fn report(drawing: &W2dDrawing, show_records: bool) {
    match drawing.version {
        Some((major, minor)) => println!("  Version:  {}.{:02}", major, minor),
        None => println!("  Version:  (none)"),
    }
    println!(
        "  Records:  {} ({} geometry){}",
        drawing.records.len(),
        drawing.geometry().count(),
        if drawing.terminated { ", terminated" } else { "" }
    );
    for (name, value) in &drawing.metadata {
        println!("  {:<9} {}", format!("{}:", name), value);
    }
    for (number, name) in &drawing.layers {
        println!("  Layer {:>3}: {}", number, name);
    }

    if show_records {
        for record in &drawing.records {
            println!("    {}", record);
        }
    }

    for notification in &drawing.notifications {
        println!("  {}", notification);
    }

    let options = LayoutOptions::default();
    let bounds = drawing.bounds(&options);
    for (kind, bbox) in &bounds.per_kind {
        println!("  {:<16} {}", kind, bbox);
    }
    match drawing.fit_to_page(&options) {
        Ok(placement) => println!(
            "  Scale:    {:.6} -> {}",
            placement.scale, placement.translated_bbox
        ),
        Err(e) => println!("  Scale:    {}", e),
    }
}
