pub fn run() -> anyhow::Result<()> {
    println!("triage {}", env!("CARGO_PKG_VERSION"));
    println!("Category and KTAS annotation of medical intake dialogues");
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
