use std::io;

use anyhow::Result;
use clap_complete::{Shell, generate};

pub fn execute(shell: Shell, cmd: &mut clap::Command) -> Result<()> {
    generate(shell, cmd, "dnscheck", &mut io::stdout());
    Ok(())
}
