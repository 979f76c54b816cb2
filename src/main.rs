use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedwatch::app::AppContext;
use feedwatch::cli::{commands, Cli, Commands, DaemonAction, RuleAction};
use feedwatch::config::Config;
use feedwatch::daemon::{self, Daemon, DaemonConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Register => {
            commands::register(&ctx, &cli.chat)?;
        }
        Commands::Add { url } => {
            commands::add_source(&ctx, &cli.chat, &url)?;
        }
        Commands::Remove { source } => {
            commands::remove_source(&ctx, &cli.chat, source)?;
        }
        Commands::List => {
            commands::list_sources(&ctx, &cli.chat)?;
        }
        Commands::Show { source } => {
            commands::show_source(&ctx, &cli.chat, source)?;
        }
        Commands::Rule { action } => match action {
            RuleAction::Add {
                source,
                regex,
                exprs,
            } => {
                commands::add_rules(&ctx, &cli.chat, source, regex, &exprs)?;
            }
            RuleAction::Rm {
                source,
                regex,
                numbers,
            } => {
                commands::remove_rules(&ctx, &cli.chat, source, regex, &numbers)?;
            }
        },
        Commands::Run => {
            commands::run_once(&ctx).await?;
        }
        Commands::Daemon { action } => match action {
            DaemonAction::Start {
                interval,
                no_initial_cycle,
            } => {
                let interval_secs = match interval {
                    Some(s) => DaemonConfig::parse_interval(&s)
                        .map_err(|e| anyhow::anyhow!("{e}"))?,
                    None => DaemonConfig::parse_interval(&ctx.config.scheduler.interval)
                        .map_err(|e| anyhow::anyhow!("{e}"))?,
                };
                let daemon_config = DaemonConfig {
                    interval_secs,
                    run_on_start: ctx.config.scheduler.run_on_start && !no_initial_cycle,
                };
                Daemon::new(Arc::new(ctx), daemon_config).run().await?;
            }
            DaemonAction::Stop => match daemon::stop_daemon() {
                Ok(()) => println!("Daemon stopped"),
                Err(e) => anyhow::bail!(e),
            },
            DaemonAction::Status => {
                println!("{}", daemon::daemon_status());
            }
        },
    }

    Ok(())
}
