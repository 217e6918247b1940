// src/main.rs

use anyhow::{Context as _, Result};
use clap::Parser;
use debcollect::cli::Cli;
use debcollect::{
    AptCacheIndex, CollectReport, Config, Context, DistributionResolver, DpkgInstaller, DpkgRepack,
    FixedDistribution, InstallReport, OsReleaseResolver, OutputRoot, ToolRunner, collect, install,
    interrupt,
};
use tracing::{info, warn};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configuration file plus command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };

    if let Some(output) = &cli.output {
        config.output_root = Some(output.clone());
    }
    if let Some(distribution) = &cli.distribution {
        config.distribution = Some(distribution.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = Some(timeout);
    }
    if cli.no_force {
        config.force = false;
    }

    Ok(config)
}

fn resolve_distribution(config: &Config) -> Result<String> {
    let distribution = match (&config.distribution, &config.os_release_path) {
        (Some(label), _) => FixedDistribution(label.clone()).current_distribution()?,
        (None, Some(path)) => OsReleaseResolver::with_path(path, config.distribution_field)
            .current_distribution()
            .with_context(|| {
                format!(
                    "Cannot determine the distribution label from {}",
                    path.display()
                )
            })?,
        (None, None) => OsReleaseResolver::new(config.distribution_field)
            .current_distribution()
            .context("Cannot determine the distribution label; set it with --distribution")?,
    };
    info!("Distribution: {}", distribution);
    Ok(distribution)
}

fn print_install_report(report: &InstallReport) {
    for issue in &report.issues {
        eprintln!("ERROR: {}", issue);
    }
    for name in &report.unmatched {
        eprintln!("WARNING: no collected directory for '{}'", name);
    }
    println!(
        "Installed from {} of {} matching director{}",
        report.succeeded(),
        report.installed.len(),
        if report.installed.len() == 1 { "y" } else { "ies" }
    );
}

fn print_collect_report(report: &CollectReport) {
    for issue in &report.issues {
        eprintln!("ERROR: {}", issue);
    }
    println!(
        "Collected {} package(s): {} dependency archive(s) repacked, {} failed",
        report.packages.len(),
        report.repacked(),
        report.failed()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    interrupt::install_handler()?;

    let config = load_config(&cli)?;

    let output = match &config.output_root {
        Some(path) => OutputRoot::new(path),
        None => OutputRoot::beside_executable()?,
    };
    output
        .ensure()
        .with_context(|| format!("Failed to create output root {}", output.path().display()))?;

    let runner = ToolRunner::new().with_timeout(config.timeout());
    if let Some(timeout) = runner.timeout() {
        info!(
            "External tools are killed after {}s (no limit unless configured)",
            timeout.as_secs()
        );
    }

    let index = AptCacheIndex::new();
    let repacker = DpkgRepack::with_command(config.repack_command.clone(), runner.clone());
    let installer = DpkgInstaller::with_command(config.install_command.clone(), runner);

    // The label is filled in once the install pass is done
    let mut ctx =
        Context::new(output, String::new(), &index, &repacker, &installer).with_force(config.force);

    if let Some(names) = &cli.install {
        if !installer.is_available() {
            warn!("Installer {:?} not found on PATH", installer.command());
        }
        let report = install(&ctx, names.as_slice()).with_context(|| {
            format!("Failed to scan output root {}", ctx.output.path().display())
        })?;
        print_install_report(&report);
    }

    if let Some(names) = &cli.collect {
        if !repacker.is_available() {
            warn!("Repack tool {:?} not found on PATH", repacker.command());
        }
        ctx.distribution = resolve_distribution(&config)?;
        let report = collect(&ctx, names.as_slice());
        info!("Touched {} dependency name(s)", report.touched.len());
        print_collect_report(&report);
    }

    Ok(())
}
