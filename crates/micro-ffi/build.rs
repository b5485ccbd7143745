//! Regenerates the C header for the exported entry points.

use std::error::Error;
use std::fs;
use std::path::Path;

const HEADER: &str = "include/micro.h";

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let root = Path::new(&manifest_dir);

    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src");

    let header = root.join(HEADER);
    if let Some(dir) = header.parent() {
        fs::create_dir_all(dir)?;
    }

    let bindings = cbindgen::Builder::new()
        .with_crate(root)
        .with_config(cbindgen::Config::from_file(root.join("cbindgen.toml"))?)
        .generate()?;
    bindings.write_to_file(&header);
    Ok(())
}
