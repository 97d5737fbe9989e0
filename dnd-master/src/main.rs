//! Command-line dice and party tools for the game master.
//!
//! # Headless Mode
//!
//! `play` starts a line-oriented session suitable for scripting:
//!
//! ```bash
//! cargo run -p dnd-master -- --seed 42 play --scenario harbor
//! ```

mod commands;
mod headless;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dnd_master_core::dice::DieSource;
use dnd_master_core::{Config, DiceRoller};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "dnd-master",
    version,
    about = "Dice and party tools for an AI-facilitated tabletop RPG",
    propagate_version = true
)]
struct Cli {
    /// Party store file (overrides DND_MASTER_PARTY_FILE)
    #[arg(long, global = true)]
    party_file: Option<PathBuf>,

    /// Seed for reproducible dice (overrides DND_MASTER_SEED)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Roll dice notation such as 2d6+3 (several may be given)
    Roll {
        #[arg(required = true, allow_hyphen_values = true)]
        notation: Vec<String>,
    },

    /// Ability check: d20 plus a modifier
    Check {
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,

        /// Roll two d20 and keep the higher
        #[arg(long)]
        advantage: bool,

        /// Roll two d20 and keep the lower
        #[arg(long)]
        disadvantage: bool,
    },

    /// Attack roll: d20 plus the attack bonus
    Attack {
        #[arg(default_value_t = 0, allow_hyphen_values = true)]
        bonus: i32,
    },

    /// Damage roll: notation plus a flat bonus
    Damage {
        notation: String,

        #[arg(default_value_t = 0, allow_hyphen_values = true)]
        bonus: i32,
    },

    /// Initiative: d20 plus the dexterity modifier
    Initiative {
        #[arg(default_value_t = 0, allow_hyphen_values = true)]
        dex: i32,
    },

    /// Inspect and import saved parties
    Party {
        #[command(subcommand)]
        command: PartyCommand,
    },

    /// Interactive line-oriented session
    Play {
        /// Scenario whose party `#party` shows by default
        #[arg(short, long)]
        scenario: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PartyCommand {
    /// List scenarios with a saved party
    List,

    /// Show a scenario's party
    Show {
        scenario: String,

        /// Print the raw JSON payload
        #[arg(long)]
        json: bool,
    },

    /// Validate a party draft file and save it under a scenario
    Import { scenario: String, file: PathBuf },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(path) = cli.party_file {
        config = config.with_party_state_path(path);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "dnd_master=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match config.seed {
        Some(seed) => run(cli.command, DiceRoller::seeded(seed), &config).await,
        None => run(cli.command, DiceRoller::new(), &config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run<S: DieSource>(
    command: Commands,
    mut roller: DiceRoller<S>,
    config: &Config,
) -> Result<(), commands::CommandError> {
    match command {
        Commands::Roll { notation } => commands::roll(&mut roller, &notation),
        Commands::Check {
            modifier,
            advantage,
            disadvantage,
        } => commands::check(&mut roller, modifier, advantage, disadvantage),
        Commands::Attack { bonus } => commands::attack(&mut roller, bonus),
        Commands::Damage { notation, bonus } => commands::damage(&mut roller, &notation, bonus),
        Commands::Initiative { dex } => commands::initiative(&mut roller, dex),
        Commands::Party { command } => match command {
            PartyCommand::List => commands::party_list(config).await,
            PartyCommand::Show { scenario, json } => {
                commands::party_show(config, &scenario, json).await
            }
            PartyCommand::Import { scenario, file } => {
                commands::party_import(config, &scenario, &file).await
            }
        },
        Commands::Play { scenario } => headless::run_headless(roller, config, scenario).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_negative_modifier() {
        let cli = Cli::try_parse_from(["dnd-master", "check", "--modifier", "-2", "--advantage"])
            .unwrap();
        match cli.command {
            Commands::Check {
                modifier,
                advantage,
                disadvantage,
            } => {
                assert_eq!(modifier, -2);
                assert!(advantage);
                assert!(!disadvantage);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::try_parse_from([
            "dnd-master",
            "party",
            "show",
            "harbor",
            "--seed",
            "7",
            "--party-file",
            "saves/p.json",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.party_file, Some(PathBuf::from("saves/p.json")));
        assert!(matches!(
            cli.command,
            Commands::Party {
                command: PartyCommand::Show { json: false, .. }
            }
        ));
    }

    #[test]
    fn test_roll_requires_notation() {
        assert!(Cli::try_parse_from(["dnd-master", "roll"]).is_err());
    }
}
