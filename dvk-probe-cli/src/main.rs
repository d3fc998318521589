use anyhow::{Context, bail};
use clap::Parser;
use dvk_probe_hal::{HidTransport, ProbeSession, SessionConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Commands;

mod cli;
mod gpio;
mod probes;
mod settings;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let probes = probes::discover()?;
    let connect = || -> anyhow::Result<ProbeSession<HidTransport>> {
        let probe = probes::select(&probes, cli.probe.as_deref())?;
        ProbeSession::connect(probe, SessionConfig::default())
            .with_context(|| format!("connecting to probe {}", probe.identity.unique_id))
    };

    match cli.command {
        Commands::List { details } => probes::list(&probes, details)?,
        Commands::Info => probes::info(&mut connect()?)?,
        Commands::Gpio(command) => gpio::action(&mut connect()?, command)?,
        Commands::Settings(command) => settings::action(&mut connect()?, command)?,
        Commands::Reboot { bootloader } => {
            let status = connect()?.reboot(bootloader)?;
            if status != 0 {
                bail!("probe refused to reboot (status {status:#04X})");
            }
        }
        Commands::Reset => connect()?.reset_target()?,
    }
    Ok(())
}

/// Log to stderr at `info`, or more with each `-v`. `RUST_LOG` overrides.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("RUST_LOG")
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}
