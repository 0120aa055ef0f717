use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simulation::{run_simulation, write_outputs, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "infall")]
#[command(about = "Integrate test particles falling into a Schwarzschild black hole")]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    config: Option<PathBuf>,

    /// Directory that receives out.json and out.npz
    #[arg(default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            log::info!("No configuration file given, using defaults");
            SimulationConfig::default()
        }
    };

    let outcome = run_simulation(&config).context("Simulation aborted")?;
    println!(
        "Simulation took {:.3} seconds",
        outcome.elapsed.as_secs_f64()
    );

    write_outputs(
        &config,
        &outcome.trajectory,
        &cli.output_dir.join("out.json"),
        &cli.output_dir.join("out.npz"),
    )
    .with_context(|| format!("Failed to write results to {}", cli.output_dir.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["infall"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_config_and_output_dir() {
        let cli = Cli::try_parse_from(["infall", "run.json", "results"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("run.json")));
        assert_eq!(cli.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_help_is_not_treated_as_a_config_path() {
        let err = Cli::try_parse_from(["infall", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_extra_argument_is_rejected() {
        let err = Cli::try_parse_from(["infall", "run.json", "results", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
