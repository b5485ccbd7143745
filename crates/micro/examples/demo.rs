//! Calls a numeric module both ways and prints the results.
//!
//! Prints, one per line: managed `add(1, 3)`, managed `sum([1, 2, 3])`,
//! raw `add(1, 3)`, raw `sum(ptr, 3)`. Diagnostics go to stderr and are
//! controlled by `RUST_LOG` (default `warn`).
//!
//! Run with:
//!   cargo run --example demo
//!   RUST_LOG=debug cargo run --example demo

use std::error::Error;
use std::io;

use micro::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut managed = Bindings::new(NativeModule::new(ModuleConfig::default())?);
    let mut raw = NativeModule::new(ModuleConfig::default())?;

    let stdout = io::stdout();
    let report = run_demo(&mut managed, &mut raw, RawRelease::Free, &mut stdout.lock())?;

    tracing::debug!(
        managed = ?managed.module().metrics(),
        raw = ?raw.metrics(),
        values = ?report.values(),
        "module state after demo"
    );
    Ok(())
}
