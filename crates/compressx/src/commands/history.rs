use compressx_core::CompressionRecord;

use super::{open_session, Context};

fn format_entry(index: usize, record: &CompressionRecord) -> String {
    format!(
        "  [{}] {} | {} | original: {:.2} MB | compressed: {:.2} MB | saved: {:.1}%",
        index,
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.name,
        record.original_size,
        record.compressed_size,
        record.saved_percent,
    )
}

pub fn run(ctx: &Context, limit: Option<usize>) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let session = open_session(ctx, store.as_mut())?;
    let ledger = session.ledger();

    if ledger.is_empty() {
        println!("No compression history yet. Start compressing files!");
        return Ok(());
    }

    let entries = ledger.recent_indexed(limit.unwrap_or(ctx.config.recent_limit));
    println!("Recent Activity (last {} of {})", entries.len(), ledger.len());
    println!("======================");
    for (index, record) in entries {
        println!("{}", format_entry(index, record));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_entry() {
        let record = CompressionRecord {
            name: "b.pdf".to_string(),
            original_size: 20.0,
            compressed_size: 5.0,
            saved_percent: 75.0,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 8, 5, 0).unwrap(),
        };
        assert_eq!(
            format_entry(1, &record),
            "  [1] 2025-06-01 08:05 | b.pdf | original: 20.00 MB | compressed: 5.00 MB | saved: 75.0%"
        );
    }
}
