//! # split_bson CLI Entry Point
//!
//! Runs the schema-deduplication analyzer over files of concatenated
//! BSON-shape documents.
//!
//! ## Usage
//!
//! ```bash
//! split_bson <fieldname> <prefix> <cache_capacity> <file>...
//! ```
//!
//! For each input file, counts documents whose `<fieldname>` is a string
//! starting with `<prefix>`, measures schema redundancy through an LRU cache
//! of `<cache_capacity>` fingerprints, and writes `schema-count` and
//! `schema-trace` to the working directory. Summary lines go to the log
//! (`RUST_LOG=info`).

use std::env;
use std::fs::File;
use std::process;

use eyre::{Result, WrapErr};
use log::info;
use memmap2::Mmap;
use splitbson::Analyzer;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!(
            "usage: {} <fieldname> <prefix> <cache_capacity> <file>...",
            args[0]
        );
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let capacity: usize = args[3]
        .parse()
        .wrap_err("cache capacity must be an integer")?;
    let mut analyzer = Analyzer::new(&args[1], &args[2], capacity)?;

    for path in &args[4..] {
        let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path))?;
        // SAFETY: the mapping is read-only and lives only for this
        // iteration; concurrent truncation of an input file is outside the
        // tool's contract.
        let data = unsafe { Mmap::map(&file) }
            .wrap_err_with(|| format!("failed to map {}", path))?;
        info!("read {} of length {}", path, data.len());

        analyzer.analyze(path, &data)?;
    }

    Ok(())
}
