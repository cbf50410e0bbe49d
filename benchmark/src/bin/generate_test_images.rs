//! Generate the synthetic ground-truth benchmark images
//!
//! # Usage
//!
//! ```bash
//! # Every case, written under the current directory
//! cargo run --release --bin generate_test_images
//!
//! # A subset, with a custom label and output root
//! cargo run --release --bin generate_test_images -- \
//!     --label stars --case simple_star --case dim_star --output-root /tmp/bench
//!
//! # Show the catalog
//! cargo run --release --bin generate_test_images -- --list
//! ```
//!
//! Set `RUST_LOG=debug` for per-source photon counts.

use anyhow::Context;
use benchmark::cases::{find_cases, TEST_CASES};
use benchmark::generate::generate_fits_file;
use benchmark::shared_args::GenerateArgs;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = GenerateArgs::parse();

    if args.list {
        for definition in TEST_CASES {
            println!("{}", definition.name);
        }
        return Ok(());
    }

    let cases = find_cases(&args.cases)?;
    let generated = generate_fits_file(&args.label, &cases, &args.to_config())
        .with_context(|| format!("Failed to generate test images for label {:?}", args.label))?;

    println!(
        "Wrote {} HDUs to {}",
        generated.hdu_count,
        generated.fits_path.display()
    );
    Ok(())
}
