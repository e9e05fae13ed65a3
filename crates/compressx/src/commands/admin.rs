use compressx_core::analytics::{self, DailyStats, GlobalStats, UserLedger};
use compressx_core::Config;
use compressx_store::UserId;
use std::path::Path;

use super::Context;

fn load_users(ctx: &Context) -> anyhow::Result<Vec<UserLedger>> {
    let store = ctx.open_store()?;
    analytics::load_all(store.as_ref())
}

fn format_global(stats: &GlobalStats) -> String {
    format!(
        "Total users: {}\n\
         Files processed: {}\n\
         Space saved: {:.2} MB\n\
         Avg compression: {:.1}%",
        stats.total_users, stats.total_files, stats.total_space_saved, stats.average_compression
    )
}

fn format_day(day: &DailyStats) -> String {
    format!(
        "  {} | files: {} | saved: {:.2} MB | active users: {}",
        day.date, day.files, day.space_saved, day.active_users
    )
}

fn format_user(entry: &UserLedger) -> String {
    let summary = entry.ledger.summary();
    format!(
        "  {} | files: {} | saved: {:.2} MB",
        entry.user, summary.count, summary.total_space_saved
    )
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    println!("{}", format_global(&analytics::global_stats(&users)));
    Ok(())
}

pub fn run_daily(ctx: &Context) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    let daily = analytics::daily_stats(&users);
    if daily.is_empty() {
        println!("No activity recorded");
        return Ok(());
    }
    println!("Daily Activity");
    println!("==============");
    for day in &daily {
        println!("{}", format_day(day));
    }
    Ok(())
}

pub fn run_types(ctx: &Context) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    let types = analytics::file_type_stats(&users);
    if types.is_empty() {
        println!("No files compressed yet");
        return Ok(());
    }
    println!("File types:");
    for (ext, count) in &types {
        println!("  {ext}: {count}");
    }
    Ok(())
}

pub fn run_top(ctx: &Context, limit: usize) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    let top = analytics::top_users(&users, limit);
    println!("Top Users (by files compressed)");
    println!("===============================");
    for entry in top {
        println!("{}", format_user(entry));
    }
    Ok(())
}

pub fn run_search(ctx: &Context, query: &str) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    let found = analytics::search_users(&users, query);
    if found.is_empty() {
        println!("No users matching \"{query}\"");
        return Ok(());
    }
    for entry in found {
        println!("{}", format_user(entry));
    }
    Ok(())
}

pub fn run_export(ctx: &Context, output: Option<&Path>) -> anyhow::Result<()> {
    let users = load_users(ctx)?;
    let json = serde_json::to_string_pretty(&analytics::export(&users, &ctx.config))?;

    match output {
        Some(path) => {
            compressx_store::atomic_write(path, json.as_bytes())?;
            tracing::info!(path = %path.display(), users = users.len(), "exported data");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_delete_user(ctx: &Context, user: &UserId) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    if !analytics::delete_user(store.as_mut(), user)? {
        anyhow::bail!("No statistics stored for {user}");
    }
    println!("Deleted statistics for {user}");
    Ok(())
}

pub fn run_settings_show(ctx: &Context) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    Ok(())
}

pub fn run_settings_set(ctx: &Context, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = ctx.config.clone();
    config.set(key, value)?;
    config.save(&ctx.paths.config_file())?;
    tracing::info!(key, value, "setting updated");
    println!("Set {key} = {value}");
    Ok(())
}

pub fn run_settings_reset(ctx: &Context) -> anyhow::Result<()> {
    Config::default().save(&ctx.paths.config_file())?;
    println!("Settings reset to defaults");
    Ok(())
}
