mod checks;
mod cli;
mod command;
mod config;
mod error;
mod host;
mod report;
mod runner;
mod service_name;
mod stats;
mod ui;

use anyhow::{Result, bail};
use clap::Parser;
use log::{debug, info};

use checks::Checks;
use cli::{CheckAction, Cli};
use command::RsyncOptions;
use config::Config;
use report::{NscaSettings, Report, Status};
use service_name::format_service_name;
use stats::parse_stats;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let config = Config::load()?;
    run(&cli, &config)
}

/// NSCA settings from flags, falling back to the config file. No remote
/// host anywhere means reports are only logged.
fn nsca_settings(cli: &Cli, config: &Config) -> Option<NscaSettings> {
    let remote_host = cli
        .nsca_remote_host
        .clone()
        .or_else(|| config.nsca.remote_host.clone())?;
    Some(NscaSettings {
        remote_host,
        port: cli.nsca_port.or(config.nsca.port),
        config: cli.nsca_config.clone().or_else(|| config.nsca.config.clone()),
    })
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let host_name = match cli.host_name.clone().or_else(|| config.host_name.clone()) {
        Some(name) => name,
        None => host::host_name()?,
    };
    let service_name = format_service_name(&host_name, &cli.src, &cli.dest);
    info!("Service name: {service_name}");

    let nsca = nsca_settings(cli, config);

    let mut checks = Checks::new(cli.action_check_failed == CheckAction::Exception);
    if let Some(file_path) = &cli.check_file {
        checks.check_file(file_path);
    }
    if let Some(dest) = &cli.check_ping {
        checks.check_ping(dest);
    }
    if let Some(ssh_login) = &cli.check_ssh_login {
        checks.check_ssh_login(ssh_login);
    }

    // With the exception policy have_passed errors out here, before the
    // rsync task and before anything is submitted.
    if !checks.have_passed()? {
        let report = Report {
            host_name,
            service_name,
            status: Status::Warning,
            text_output: checks.messages(),
        };
        report.submit(nsca.as_ref())?;
        if !cli.quiet {
            ui::warn(&checks.messages());
        }
        return Ok(());
    }

    let rsync_command = command::build_rsync_command(
        &cli.src,
        &cli.dest,
        &RsyncOptions {
            dest_user_group: cli.dest_user_group.as_deref(),
            excludes: &cli.exclude,
            rsync_args: cli.rsync_args.as_deref(),
        },
    )?;

    info!("Source: {}", cli.src);
    info!("Destination: {}", cli.dest);
    info!("Rsync command: {}", rsync_command.join(" "));

    let captured = runner::run_captured(&rsync_command[0], &rsync_command[1..])?;

    let ignored = command::ignore_exit_codes(cli.ignore_exit_codes.as_deref())?;
    if captured.code != 0 && !ignored.contains(&captured.code) {
        bail!(
            "The rsync task failed with a non-zero exit code ({}).",
            captured.code
        );
    }

    let stats = parse_stats(&captured.stdout)?;
    debug!("{stats:?}");

    let report = Report {
        host_name,
        service_name,
        status: Status::Ok,
        text_output: format!("RSYNC OK | {}", stats.performance_data()),
    };
    report.submit(nsca.as_ref())?;

    if !cli.quiet {
        ui::success(&format!(
            "Synced {} -> {} ({} of {} files transferred)",
            cli.src, cli.dest, stats.num_files_transferred, stats.num_files
        ));
    }
    Ok(())
}
