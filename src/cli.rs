use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mzprov")]
#[command(version)]
#[command(about = "Declarative provisioning for Materialize objects and identity settings", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Provider config file (default: ~/.config/mzprov/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Manifest of desired resources
    #[arg(short, long, global = true, default_value = "mzprov.toml")]
    pub manifest: PathBuf,

    /// Recorded state file
    #[arg(long, global = true, default_value = "mzprov.state.json")]
    pub state: PathBuf,

    /// App password for the identity API (mzp_...); also the SQL password
    #[arg(long, env = "MZ_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refresh recorded state and show what apply would change
    Plan(TargetArgs),

    /// Converge remote objects to the manifest
    Apply(ApplyArgs),

    /// Re-read every recorded resource and update the state file
    Refresh,

    /// Adopt an existing remote object into state
    Import {
        /// Manifest label of the resource
        label: String,

        /// Remote id, optionally prefixed with a region (`region:id`)
        id: String,
    },

    /// Delete recorded resources
    Destroy(ApplyArgs),

    /// Inspect the state file
    #[command(subcommand)]
    State(StateCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct TargetArgs {
    /// Only consider this resource label
    pub target: Option<String>,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only consider this resource label
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub auto_approve: bool,
}

// ============================================================================
// State Commands
// ============================================================================

#[derive(Subcommand)]
pub enum StateCommand {
    /// List recorded resources
    List,

    /// Show the recorded attributes of one resource
    Show {
        /// Resource label
        label: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_apply() {
        let cli = Cli::try_parse_from([
            "mzprov",
            "-vv",
            "--manifest",
            "infra.toml",
            "apply",
            "tunnel",
            "--auto-approve",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.manifest, PathBuf::from("infra.toml"));
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.target.as_deref(), Some("tunnel"));
                assert!(args.auto_approve);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn test_cli_parses_import() {
        let cli = Cli::try_parse_from(["mzprov", "import", "tunnel", "aws/us-east-1:u5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Import { ref label, ref id } if label == "tunnel" && id == "aws/us-east-1:u5"
        ));
        assert_eq!(cli.state, PathBuf::from("mzprov.state.json"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
