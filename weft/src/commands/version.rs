use clap::Args;
use eyre::Result;

#[derive(Args)]
pub struct VersionCommand;

impl VersionCommand {
    pub fn run(&self) -> Result<()> {
        println!("weft version {}", env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
