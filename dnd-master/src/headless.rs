//! Headless mode.
//!
//! A line-oriented session for scripts and agents: plain lines are dice
//! notation, lines starting with `#` are commands.

use crate::commands::{describe_party, CommandError};
use dnd_master_core::dice::{Advantage, DieSource};
use dnd_master_core::{Config, DiceRoller, PartyStore};
use std::io::{self, BufRead, Write};

const HELP: &[&str] = &[
    "  <notation>                 - Roll dice, e.g. 2d6+3 or d20",
    "  #check <mod> [adv|dis]     - Ability check",
    "  #attack <bonus>            - Attack roll",
    "  #damage <notation> [bonus] - Damage roll",
    "  #init <dex>                - Initiative",
    "  #party [scenario]          - Show a saved party",
    "  #scenarios                 - List saved parties",
    "  #help                      - Show this help",
    "  #quit                      - Exit",
];

/// Result of handling one input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    Quit,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Reply::Lines(vec![text.into()])
    }
}

pub struct HeadlessSession<S> {
    roller: DiceRoller<S>,
    store: PartyStore,
    scenario: Option<String>,
}

impl<S: DieSource> HeadlessSession<S> {
    pub fn new(roller: DiceRoller<S>, store: PartyStore, scenario: Option<String>) -> Self {
        Self {
            roller,
            store,
            scenario,
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        if line.is_empty() {
            return Reply::Lines(Vec::new());
        }

        let Some(command) = line.strip_prefix('#') else {
            return Reply::line(self.roller.roll(line).to_string());
        };

        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.first().copied() {
            Some("quit") | Some("exit") => Reply::Quit,
            Some("help") => {
                let mut lines = vec!["[HELP]".to_string()];
                lines.extend(HELP.iter().map(|s| s.to_string()));
                Reply::Lines(lines)
            }
            Some("check") => {
                let Some(modifier) = parse_number(parts.get(1)) else {
                    return Reply::line("[ERROR] Usage: #check <mod> [adv|dis]");
                };
                let advantage = match parts.get(2).copied() {
                    None => Advantage::Normal,
                    Some("adv") => Advantage::Advantage,
                    Some("dis") => Advantage::Disadvantage,
                    Some(_) => return Reply::line("[ERROR] Usage: #check <mod> [adv|dis]"),
                };
                Reply::line(self.roller.ability_check(modifier, advantage).to_string())
            }
            Some("attack") => match parse_number(parts.get(1)) {
                Some(bonus) => Reply::line(self.roller.attack(bonus).to_string()),
                None => Reply::line("[ERROR] Usage: #attack <bonus>"),
            },
            Some("damage") => {
                let Some(notation) = parts.get(1) else {
                    return Reply::line("[ERROR] Usage: #damage <notation> [bonus]");
                };
                let bonus = match parts.get(2) {
                    None => 0,
                    Some(raw) => match raw.parse() {
                        Ok(bonus) => bonus,
                        Err(_) => return Reply::line("[ERROR] Usage: #damage <notation> [bonus]"),
                    },
                };
                Reply::line(self.roller.damage(notation, bonus).to_string())
            }
            Some("init") => match parse_number(parts.get(1)) {
                Some(dex) => Reply::line(self.roller.initiative(dex).to_string()),
                None => Reply::line("[ERROR] Usage: #init <dex>"),
            },
            Some("party") => {
                let scenario = parts
                    .get(1)
                    .map(|s| s.to_string())
                    .or_else(|| self.scenario.clone());
                let Some(scenario) = scenario else {
                    return Reply::line("[ERROR] Usage: #party <scenario>");
                };
                match self.store.get(&scenario) {
                    Some(payload) => {
                        let mut lines = vec![format!("[PARTY] {scenario}")];
                        lines.extend(describe_party(payload));
                        Reply::Lines(lines)
                    }
                    None => Reply::line(format!("[ERROR] No saved party for '{scenario}'")),
                }
            }
            Some("scenarios") => {
                let names: Vec<&str> = self.store.scenario_names().collect();
                if names.is_empty() {
                    Reply::line("[SCENARIOS] none")
                } else {
                    Reply::line(format!("[SCENARIOS] {}", names.join(", ")))
                }
            }
            _ => Reply::line("[ERROR] Unknown command. Type #help for help."),
        }
    }
}

fn parse_number(raw: Option<&&str>) -> Option<i32> {
    raw.and_then(|s| s.parse().ok())
}

/// Run the session over stdin and stdout until `#quit` or end of input.
pub async fn run_headless<S: DieSource>(
    roller: DiceRoller<S>,
    config: &Config,
    scenario: Option<String>,
) -> Result<(), CommandError> {
    let store = PartyStore::load_or_default(&config.party_state_path, &config.legacy_scenario).await;
    let mut session = HeadlessSession::new(roller, store, scenario);

    println!("=== Headless Mode ===");
    println!("Party store: {}", config.party_state_path.display());
    println!("Type #help for commands.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        match session.handle_line(&line) {
            Reply::Quit => {
                println!("Goodbye!");
                break;
            }
            Reply::Lines(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
        }
        stdout.flush().ok();
    }

    Ok(())
}
