use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created"));

    let content = test.read_file(".lemmasyncrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert!(parsed.get("sourceRoots").is_some());
    assert!(parsed.get("langRoots").is_some());
    assert_eq!(parsed["fallbackLocale"], "en");
    assert_eq!(parsed["obsoleteArrayKey"], "LLH:obsolete");
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".lemmasyncrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(test.read_file(".lemmasyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::laravel()?;
    test.command().arg("init").output()?;
    test.write_file("app/Http/Login.php", "<?php echo __('auth.failed');")?;

    let output = test.sync_command().output()?;
    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        stderr(&output)
    );
    assert!(test.exists("lang/fr/auth.yaml"));

    Ok(())
}
