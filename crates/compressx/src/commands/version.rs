pub fn run() -> anyhow::Result<()> {
    println!("compressx {}", env!("CARGO_PKG_VERSION"));
    println!("Simulated file compression with per-user statistics");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
