use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use procsnap::config::{self, Config, load_config, load_config_from_path};
use procsnap::logging::{self, LogFormat};
use procsnap::output::{Sink, parse_delimiter, write_rows};
use procsnap::system::collector::{Collector, SnapshotSettings, system_host_name};

#[derive(Parser)]
#[command(
    name = "procsnap",
    about = "Snapshot per-user, per-command CPU and memory usage of this node"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file. Leave empty or provide - for stdout
    #[arg(long)]
    output_file: Option<String>,

    /// CPU consumption percentage cutoff [default: 0.5]
    #[arg(long, value_name = "FLOAT")]
    cpu_cutoff: Option<f64>,

    /// Memory consumption percentage cutoff [default: 0.0]
    #[arg(long, value_name = "FLOAT")]
    mem_cutoff: Option<f64>,

    /// Users to ignore as comma-separated list, replacing the built-in list
    #[arg(long, value_name = "STR,STR")]
    ignored_users: Option<String>,

    /// Delimiter for output columns [default: tab]
    #[arg(long, value_name = "CHAR")]
    output_delimiter: Option<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format)?;

    let config = load_config_for_cli(&cli);
    let settings = SnapshotSettings {
        cpu_cutoff: config.snapshot.cpu_cutoff,
        mem_cutoff: config.snapshot.mem_cutoff,
        ignored_users: config.snapshot.ignored_users.iter().cloned().collect(),
    };
    let delimiter = parse_delimiter(&config.output.delimiter).ok_or_else(|| {
        eyre!(
            "output delimiter must be a single character, got {:?}",
            config.output.delimiter
        )
    })?;
    let sink = Sink::parse(&config.output.destination);

    let host = config
        .host
        .resolve(system_host_name())
        .ok_or_else(|| eyre!("could not determine the host name; set [host].hostname"))?;

    let snapshot = Collector::system()
        .take_snapshot(&host, &settings)
        .wrap_err("failed to take snapshot")?;

    let mut out = sink
        .open()
        .wrap_err_with(|| format!("failed to open output {sink:?}"))?;
    write_rows(&mut out, &snapshot.rows, delimiter).wrap_err("failed to write snapshot")?;

    tracing::info!(
        rows = snapshot.rows.len(),
        host = %snapshot.host,
        timestamp = %snapshot.timestamp,
        "snapshot written"
    );
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(cutoff) = cli.cpu_cutoff {
        config.snapshot.cpu_cutoff = cutoff;
    }
    if let Some(cutoff) = cli.mem_cutoff {
        config.snapshot.mem_cutoff = cutoff;
    }
    if let Some(ref users) = cli.ignored_users {
        config.snapshot.ignored_users = split_user_list(users);
    }
    if let Some(ref destination) = cli.output_file {
        config.output.destination = destination.clone();
    }
    if let Some(ref delimiter) = cli.output_delimiter {
        config.output.delimiter = delimiter.clone();
    }

    tracing::debug!(
        path = ?cli.config.clone().or_else(config::config_path),
        cpu_cutoff = config.snapshot.cpu_cutoff,
        mem_cutoff = config.snapshot.mem_cutoff,
        "effective configuration"
    );
    config
}

fn split_user_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use procsnap::system::aggregate::IgnoreSet;

    use super::*;

    #[test]
    fn user_list_splitting() {
        assert_eq!(split_user_list("root, slurm,,munge"), vec!["root", "slurm", "munge"]);
        assert!(split_user_list("").is_empty());
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "procsnap",
            "--config",
            "/nonexistent/procsnap.toml",
            "--cpu-cutoff",
            "2.5",
            "--ignored-users",
            "bob,alice",
            "--output-file",
            "snap.tsv",
        ]);
        let config = load_config_for_cli(&cli);
        assert_eq!(config.snapshot.cpu_cutoff, 2.5);
        assert_eq!(config.snapshot.mem_cutoff, 0.0);
        assert_eq!(config.snapshot.ignored_users, vec!["bob", "alice"]);
        assert_eq!(config.output.destination, "snap.tsv");
        let ignored: IgnoreSet = config.snapshot.ignored_users.iter().cloned().collect();
        assert!(ignored.contains("bob"));
        assert!(!ignored.contains("root"));
    }

    #[test]
    fn empty_ignored_users_disables_ignoring() {
        let cli = Cli::parse_from([
            "procsnap",
            "--config",
            "/nonexistent/procsnap.toml",
            "--ignored-users",
            "",
        ]);
        assert!(load_config_for_cli(&cli).snapshot.ignored_users.is_empty());
    }
}
