//! `createc version` command

use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("createc {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
