use crate::config::MarketConfig;
use crate::domain::model::FlatFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "flat-market")]
#[command(about = "Register, fund an account, and trade flats stored in CSV tables")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding users.csv, flats.csv and owners.csv
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new account
    Register { username: String, password: String },
    /// Sign in and remember the session
    Login { username: String, password: String },
    /// Forget the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Add money to the balance
    Deposit { amount: u64 },
    /// Change username and/or password
    EditProfile {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// List flats on the market
    Flats {
        #[arg(long)]
        rooms: Option<u32>,
        #[arg(long, help = "Only flats that are still for sale")]
        available: bool,
        #[arg(long)]
        min_price: Option<u64>,
        #[arg(long)]
        max_price: Option<u64>,
    },
    /// List flats owned by the signed-in user
    Property,
    /// Buy a flat
    Buy { flat_id: u64 },
    /// Sell an owned flat back to the market
    Sell { flat_id: u64 },
}

impl CliConfig {
    /// Command-line flags win over the configuration file.
    pub fn apply_overrides(&self, config: &mut MarketConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

impl Command {
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Command::Register { .. } | Command::Login { .. } | Command::Logout | Command::Flats { .. }
        )
    }

    pub fn flat_filter(&self) -> Option<FlatFilter> {
        match self {
            Command::Flats {
                rooms,
                available,
                min_price,
                max_price,
            } => Some(FlatFilter {
                rooms: *rooms,
                available_only: *available,
                min_price: *min_price,
                max_price: *max_price,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flats_filter() {
        let cli = CliConfig::parse_from([
            "flat-market",
            "flats",
            "--rooms",
            "2",
            "--available",
            "--max-price",
            "5000000",
        ]);
        assert!(!cli.command.requires_session());
        assert_eq!(
            cli.command.flat_filter(),
            Some(FlatFilter {
                rooms: Some(2),
                available_only: true,
                min_price: None,
                max_price: Some(5_000_000),
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from(["flat-market", "buy", "3", "--data-dir", "/tmp/db", "--json"]);
        assert!(matches!(cli.command, Command::Buy { flat_id: 3 }));
        assert!(cli.command.requires_session());
        assert!(cli.json);

        let mut config = MarketConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.storage.data_dir, "/tmp/db");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_edit_profile_fields_default_to_empty() {
        let cli = CliConfig::parse_from(["flat-market", "edit-profile", "--password", "NewPass22#"]);
        match cli.command {
            Command::EditProfile { username, password } => {
                assert_eq!(username, "");
                assert_eq!(password, "NewPass22#");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
