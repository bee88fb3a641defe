use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "phenonet",
    version,
    about = "Filter and summarize phenotype association graphs"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into an exit code.
///
/// Exit codes:
///   0  success
///   1  general/unknown error
///   2  configuration or threshold error
///   3  data file not found / unreadable
///   4  nothing to show (no data, unknown node, ancestry unavailable,
///      overview weight column absent)
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("data file not found")
        || lower.contains("cannot read")
        || lower.contains("no such file")
    {
        3 // data not found
    } else if lower.contains("configuration error")
        || lower.contains("cannot load config")
        || lower.contains("invalid p-value")
        || lower.contains("invalid beta")
        || lower.contains("invalid direction")
    {
        2 // config or threshold error
    } else if lower.contains("no data")
        || lower.contains("unknown node")
        || lower.contains("missing weight column")
    {
        4 // nothing to show
    } else {
        1 // general error
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_missing_phenotype_file() {
        let err = anyhow::anyhow!("Data file not found for 999 under public/data/node_files");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_unreadable_table() {
        let err = anyhow::anyhow!("IO error: No such file or directory (os error 2)")
            .context("Cannot read overview tables from /tmp/x");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_config() {
        let err = anyhow::anyhow!("Configuration error: Parse error: expected `]`");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_config_file() {
        let err = anyhow::anyhow!("Parse error: expected `]`")
            .context("Cannot load config: /srv/phenonet.toml");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_ignores_config_in_paths() {
        let err = anyhow::anyhow!("Data file not found for 999 under /srv/config_data/node_files");
        assert_eq!(classify_exit_code(&err), 3);
        let err = anyhow::anyhow!("No data found: phenotypes 250 and 555 share no SNPs")
            .context("Cannot open phenotypes 250 and 555 under /srv/config_data");
        assert_eq!(classify_exit_code(&err), 4);
        let err = anyhow::anyhow!("Filter controller stopped in /srv/config_data");
        assert_eq!(classify_exit_code(&err), 1);
    }

    #[test]
    fn exit_code_threshold() {
        let err = anyhow::anyhow!("Invalid p-value cutoff: 3");
        assert_eq!(classify_exit_code(&err), 2);
        let err = anyhow::anyhow!("Invalid direction: 2 (expected -1, 0 or 1)");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_no_data() {
        let err = anyhow::anyhow!("No data found: phenotypes 250 and 401 share no SNPs");
        assert_eq!(classify_exit_code(&err), 4);
        let err = anyhow::anyhow!("Ancestry afr has no data for 250");
        assert_eq!(classify_exit_code(&err), 4);
        let err = anyhow::anyhow!("Unknown node: 999");
        assert_eq!(classify_exit_code(&err), 4);
        let err = anyhow::anyhow!("Missing weight column: afr_1e-04_same_dir_weight");
        assert_eq!(classify_exit_code(&err), 4);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("Something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }
}
