//! jzboot
//!
//! Command-line front end for X1000 bootloader packages: list and inspect
//! package archives, unpack their images, and (with the `usb` feature) boot a
//! player in USB boot mode.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod logger;
#[cfg(feature = "usb")]
mod usb;

#[derive(Parser)]
#[command(name = "jzboot")]
#[command(about = "X1000 bootloader package tool", long_about = None)]
#[command(version)]
struct Cli {
    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported players
    Targets,

    /// List the entries of a package archive
    List {
        /// Package file (bootloader.<target>)
        package: PathBuf,
    },

    /// Load a package and show version, image sizes and checksums
    Inspect {
        package: PathBuf,
        /// Target player (see `jzboot targets`)
        #[arg(short, long)]
        target: String,
        /// Print the summary and telemetry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the SPL, the decompressed bootloader and the version to a directory
    Unpack {
        package: PathBuf,
        #[arg(short, long)]
        target: String,
        /// Output directory, created if missing
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Boot a player that is waiting in USB boot mode
    #[cfg(feature = "usb")]
    Boot {
        package: PathBuf,
        #[arg(short, long)]
        target: String,
        /// Milliseconds to wait for the SPL before sending the bootloader
        #[arg(long)]
        settle_ms: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Targets => commands::targets::execute(),
        Commands::List { package } => commands::list::execute(&package),
        Commands::Inspect { package, target, json } => commands::inspect::execute(&package, &target, json),
        Commands::Unpack { package, target, output } => commands::unpack::execute(&package, &target, &output),
        #[cfg(feature = "usb")]
        Commands::Boot { package, target, settle_ms } => commands::boot::execute(&package, &target, settle_ms),
    }
}
