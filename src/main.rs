use anyhow::{bail, Context};
use clap::Parser;
use flat_market::config::Command;
use flat_market::core::{FlatId, Session};
use flat_market::utils::{logger, validation::Validate};
use flat_market::{CliConfig, CsvMarketplace, MarketConfig, MarketError, SessionFile};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match MarketConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match config.logging.format.as_str() {
        "json" => logger::init_json_logger(&config.logging.level),
        _ => logger::init_cli_logger(cli.verbose, &config.logging.level),
    }
    tracing::debug!("Configuration: {:?}", config);

    let marketplace = CsvMarketplace::open(&config.storage)
        .with_context(|| format!("cannot open data directory {}", config.storage.data_dir))?;
    let sessions = SessionFile::new(config.storage.session_path());

    let session = if cli.command.requires_session() {
        match sessions.load()? {
            Some(session) => Some(session),
            None => bail!("not logged in, run `flat-market login <username> <password>` first"),
        }
    } else {
        None
    };

    match run(&cli, &marketplace, &sessions, session).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("❌ Command failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(
    cli: &CliConfig,
    marketplace: &CsvMarketplace,
    sessions: &SessionFile,
    session: Option<Session>,
) -> Result<(), MarketError> {
    // `requires_session` guarantees a session for every command that reads it.
    let current = || session.ok_or(MarketError::InvalidCredentials);

    match &cli.command {
        Command::Register { username, password } => {
            let user = marketplace.register().execute(username, password).await?;
            report(cli, &user, format!("✅ Registered '{}' (id {})", user.username, user.id))
        }
        Command::Login { username, password } => {
            let session = marketplace.login().execute(username, password).await?;
            sessions.save(&session)?;
            report(cli, &session, format!("✅ Logged in as user {}", session.user_id))
        }
        Command::Logout => {
            if sessions.clear()? {
                println!("👋 Logged out");
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
        Command::Whoami => {
            let user = marketplace.get_user().execute(current()?.user_id).await?;
            report(
                cli,
                &user,
                format!("👤 {} (id {}), balance: {}", user.username, user.id, user.balance),
            )
        }
        Command::Deposit { amount } => {
            let user = marketplace.add_money().execute(&current()?, *amount).await?;
            report(cli, &user, format!("✅ Balance: {}", user.balance))
        }
        Command::EditProfile { username, password } => {
            let user = marketplace
                .edit_profile()
                .execute(&current()?, username, password)
                .await?;
            report(cli, &user, format!("✅ Profile saved for '{}'", user.username))
        }
        Command::Flats { .. } => {
            let filter = cli.command.flat_filter().unwrap_or_default();
            let flats = marketplace.get_flat_list().execute_filtered(&filter).await?;
            let text = if flats.is_empty() {
                "Nothing found".to_string()
            } else {
                flats
                    .iter()
                    .map(|flat| {
                        format!(
                            "{:>4}  {}, flat {}  floor {}  rooms {}  price {}  {}",
                            flat.id,
                            flat.address,
                            flat.number,
                            flat.floor,
                            flat.room_amount,
                            flat.price,
                            if flat.is_available { "available" } else { "sold" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            report(cli, &flats, text)
        }
        Command::Property => {
            let property = marketplace
                .get_user_property()
                .execute(current()?.user_id)
                .await?;
            let text = if property.properties.is_empty() {
                "Nothing bought yet".to_string()
            } else {
                property
                    .properties
                    .iter()
                    .map(|flat| format!("{:>4}  {}, flat {}  price {}", flat.id, flat.address, flat.number, flat.price))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            report(cli, &property, text)
        }
        Command::Buy { flat_id } => {
            let trade = marketplace
                .buy_flat()
                .execute(&current()?, FlatId(*flat_id))
                .await?;
            report(
                cli,
                &trade,
                format!("✅ Bought flat {}, balance: {}", trade.flat.id, trade.user.balance),
            )
        }
        Command::Sell { flat_id } => {
            let trade = marketplace
                .sell_flat()
                .execute(&current()?, FlatId(*flat_id))
                .await?;
            report(
                cli,
                &trade,
                format!("✅ Sold flat {}, balance: {}", trade.flat.id, trade.user.balance),
            )
        }
    }
}

fn report<T: Serialize>(cli: &CliConfig, value: &T, text: String) -> Result<(), MarketError> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}
