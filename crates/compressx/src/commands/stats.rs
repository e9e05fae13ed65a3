use compressx_core::StatisticsSummary;

use super::{open_session, Context};

pub(crate) fn format_summary(summary: &StatisticsSummary) -> String {
    format!(
        "Files compressed: {}\n\
         Space saved: {:.2} MB\n\
         Avg compression: {:.1}%",
        summary.count, summary.total_space_saved, summary.average_compression
    )
}

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let session = open_session(ctx, store.as_mut())?;

    println!("Statistics for {}", session.user());
    println!("{}", format_summary(&session.summary()));
    Ok(())
}
