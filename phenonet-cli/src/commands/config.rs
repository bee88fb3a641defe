use clap::Args;

use super::DataArgs;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Print the built-in defaults, ignoring any config file
    #[arg(long)]
    pub defaults: bool,
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    let config = if args.defaults {
        phenonet_core::config::PhenonetConfig::default()
    } else {
        args.data.resolve()?.0
    };
    print!("{}", config.to_toml()?);
    Ok(())
}
