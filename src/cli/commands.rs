use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recon-hunter")]
#[command(version, about = "A modular reconnaissance aggregator for emails, usernames and files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single module against a target
    Run {
        /// Module to run (breach, footprint, metadata)
        module: String,

        /// Email, username or file path, depending on the module
        target: String,

        /// Save the findings as JSON under OUTPUT_DIR
        #[arg(short, long)]
        save: bool,
    },

    /// Run every module against a target at once
    All {
        /// Email, username or file path
        target: String,

        /// Save the findings as JSON under OUTPUT_DIR
        #[arg(short, long)]
        save: bool,
    },

    /// List available modules
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["recon-hunter", "-v", "run", "breach", "a@b.com", "--save"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                module,
                target,
                save,
            } => {
                assert_eq!(module, "breach");
                assert_eq!(target, "a@b.com");
                assert!(save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_all_and_list() {
        let cli = Cli::parse_from(["recon-hunter", "all", "alice"]);
        assert!(matches!(cli.command, Commands::All { ref target, save: false } if target == "alice"));

        let cli = Cli::parse_from(["recon-hunter", "list"]);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
