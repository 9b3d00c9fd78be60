use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use dnscheck::application::Suite;
use dnscheck::cli;
use dnscheck::domain::HostName;
use dnscheck::infrastructure::tracing::init_tracing;

#[derive(Parser)]
#[command(name = "dnscheck")]
#[command(about = "Verify provisioned DNS hosts: OS, services, sockets, and resolution behavior")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Inventory file (defaults to $DNSCHECK_INVENTORY, then inventory/hosts.yml)
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Directory of per-role settings files
    #[arg(long, default_value = "inventory/group_vars")]
    group_vars: PathBuf,

    /// Suite to run (repeatable; default: all)
    #[arg(long = "suite")]
    suites: Vec<Suite>,
}

impl ConfigArgs {
    fn inventory_path(&self) -> PathBuf {
        self.inventory.clone().unwrap_or_else(|| {
            std::env::var_os("DNSCHECK_INVENTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("inventory/hosts.yml"))
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the check suites against the provisioned DNS hosts
    Check {
        #[command(flatten)]
        config: ConfigArgs,

        /// Restrict remote suites to a single DNS host
        #[arg(long)]
        host: Option<HostName>,
    },

    /// Print every check id without connecting to anything
    List {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { config, host } => cli::check::execute(
            &config.inventory_path(),
            &config.group_vars,
            &config.suites,
            host.as_ref(),
        ),
        Commands::List { config } => {
            cli::list::execute(&config.inventory_path(), &config.group_vars, &config.suites)
        }
        Commands::Completions { shell } => {
            cli::completions::execute(shell, &mut Cli::command())
        }
    }
}
