use compressx_core::LedgerError;

use super::{open_session, stats::format_summary, Context};

pub fn run_delete(ctx: &Context, index: usize) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let mut session = open_session(ctx, store.as_mut())?;

    let removed = match session.remove_at(index) {
        Ok(record) => record,
        Err(e) => match e.downcast_ref::<LedgerError>() {
            Some(LedgerError::IndexOutOfRange { len, .. }) => {
                anyhow::bail!("No history entry {index} (history has {len} entries)")
            }
            _ => return Err(e),
        },
    };

    println!("Deleted {} from history", removed.name);
    println!("{}", format_summary(&session.summary()));
    Ok(())
}

pub fn run_clear(ctx: &Context) -> anyhow::Result<()> {
    let mut store = ctx.open_store()?;
    let mut session = open_session(ctx, store.as_mut())?;
    let count = session.summary().count;
    session.clear()?;
    println!("Deleted {count} entries from history");
    Ok(())
}
