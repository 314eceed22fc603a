//! Coven CLI binary.
//!
//! Runs the bot, applies migrations and inspects temporary bans.

use clap::Parser;
use coven::{CovenConfig, app, init_logging};
use coven_core::GuildId;
use coven_moderation::SchedulerStatus;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{BanCommands, Cli, Commands, OutputFormat};

    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CovenConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging, cli.verbose)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            app::run(&config).await?;
        }

        Commands::Migrate => {
            app::migrate(&config).await?;
            println!("Migrations applied");
        }

        Commands::Bans(BanCommands::List { guild, format }) => {
            let bans = app::list_bans(&config, GuildId(guild)).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bans)?),
                OutputFormat::Human if bans.is_empty() => println!("No active temporary bans"),
                OutputFormat::Human => {
                    println!("{:<20} {:<25} Reason", "User", "Unban time");
                    for ban in &bans {
                        println!(
                            "{:<20} {:<25} {}",
                            ban.user_id,
                            ban.unban_time.format("%Y-%m-%d %H:%M:%S UTC"),
                            ban.reason
                        );
                    }
                }
            }
        }

        Commands::Bans(BanCommands::Sweep) => match app::sweep(&config).await? {
            SchedulerStatus::Idle => println!("Sweep done; no temporary bans remain"),
            SchedulerStatus::Armed(at) => println!("Sweep done; next unban at {}", at),
        },
    }

    Ok(())
}
