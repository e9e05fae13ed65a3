mod cli;
mod commands;

use clap::Parser;
use cli::{AdminAction, Cli, Commands, SettingsAction};
use commands::Context;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        return commands::version::run();
    }

    let ctx = Context::load(&cli.user)?;

    match cli.command {
        Commands::Version => commands::version::run(),
        Commands::Compress { files } => commands::compress::run(&ctx, &files),
        Commands::History { limit } => commands::history::run(&ctx, limit),
        Commands::Stats => commands::stats::run(&ctx),
        Commands::Delete { index } => commands::delete::run_delete(&ctx, index),
        Commands::Clear => commands::delete::run_clear(&ctx),
        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::run_stats(&ctx),
            AdminAction::Daily => commands::admin::run_daily(&ctx),
            AdminAction::Types => commands::admin::run_types(&ctx),
            AdminAction::Top { limit } => commands::admin::run_top(&ctx, limit),
            AdminAction::Search { query } => commands::admin::run_search(&ctx, &query),
            AdminAction::Export { output } => commands::admin::run_export(&ctx, output.as_deref()),
            AdminAction::DeleteUser { user } => commands::admin::run_delete_user(&ctx, &user),
            AdminAction::Settings { action } => match action {
                SettingsAction::Show => commands::admin::run_settings_show(&ctx),
                SettingsAction::Set { key, value } => {
                    commands::admin::run_settings_set(&ctx, &key, &value)
                }
                SettingsAction::Reset => commands::admin::run_settings_reset(&ctx),
            },
        },
    }
}
