use anyhow::Result;
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

fn project() -> Result<CliTest> {
    let test = CliTest::laravel()?;
    test.write_file(
        "app/Http/Controllers/LoginController.php",
        r#"<?php
return back()->withErrors(['email' => __('auth.failed')]);
$message = trans('auth.throttle', ['seconds' => 60]);
"#,
    )?;
    test.write_file(
        "resources/views/home.blade.php",
        r#"<h1>{{ __('Welcome back') }}</h1>
<p>@lang('nav.home')</p>
"#,
    )?;
    Ok(test)
}

#[test]
fn test_missing_lang_root_is_a_configuration_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app/a.php", "<?php __('auth.failed');")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("no lang folder found"));

    Ok(())
}

#[test]
fn test_new_lemmas_are_written() -> Result<()> {
    let test = project()?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("4 lemmas have been found in code"));
    assert!(out.contains("lang/fr/auth.yaml"));
    assert!(out.contains("Process done!"));

    assert_eq!(
        test.read_catalog("lang/en/auth.yaml")?,
        json!({"failed": "failed", "throttle": "throttle"})
    );
    assert_eq!(
        test.read_catalog("lang/fr/auth.yaml")?,
        json!({"failed": "TODO: failed", "throttle": "TODO: throttle"})
    );
    assert_eq!(
        test.read_catalog("lang/fr/nav.yaml")?,
        json!({"home": "TODO: home"})
    );
    assert_eq!(
        test.read_catalog("lang/fr.json")?,
        json!({"Welcome back": "TODO: Welcome back"})
    );

    let auth = test.read_file("lang/fr/auth.yaml")?;
    assert!(auth.contains("Generated by lemmasync at"));
    assert!(auth.contains("app/Http/Controllers/LoginController.php"));

    Ok(())
}

#[test]
fn test_second_run_has_nothing_to_do() -> Result<()> {
    let test = project()?;
    test.sync_command().output()?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Nothing to do"));
    assert_eq!(test.list_dir("lang/fr")?, vec!["auth.yaml", "nav.yaml"]);

    Ok(())
}

#[test]
fn test_obsolete_lemmas_are_kept_and_backed_up() -> Result<()> {
    let test = project()?;
    test.write_file(
        "lang/fr/auth.yaml",
        "failed: \"Identifiants incorrects\"\npassword: \"Mot de passe incorrect\"\n",
    )?;

    let output = test.sync_command().arg("--no-date").output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("1 obsolete string"));
    assert!(stdout(&output).contains("Backup files:"));

    assert_eq!(
        test.read_catalog("lang/fr/auth.yaml")?,
        json!({
            "failed": "Identifiants incorrects",
            "throttle": "TODO: throttle",
            "LLH:obsolete": {"password": "Mot de passe incorrect"}
        })
    );
    assert!(!test.read_file("lang/fr/auth.yaml")?.contains("Generated by"));

    let backups: Vec<String> = test
        .list_dir("lang/fr")?
        .into_iter()
        .filter(|name| name.starts_with("auth.") && name != "auth.yaml")
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(test.read_file(&format!("lang/fr/{}", backups[0]))?.contains("password"));

    Ok(())
}

#[test]
fn test_no_obsolete_and_no_backup() -> Result<()> {
    let test = project()?;
    test.write_file("lang/fr/auth.yaml", "failed: \"Echec\"\npassword: \"Mot de passe\"\n")?;

    let output = test.sync_command().args(["-o", "-b"]).output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("(will be deleted)"));

    assert_eq!(
        test.read_catalog("lang/fr/auth.yaml")?,
        json!({"failed": "Echec", "throttle": "TODO: throttle"})
    );
    assert_eq!(test.list_dir("lang/fr")?, vec!["auth.yaml", "nav.yaml"]);

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = project()?;

    let output = test.sync_command().arg("--dry-run").output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Dry run: no file has been written."));
    assert!(test.list_dir("lang/fr")?.is_empty());
    assert!(!test.exists("lang/fr.json"));

    Ok(())
}

#[test]
fn test_silent_mode_only_reports_through_exit_code() -> Result<()> {
    let test = project()?;

    let output = test.sync_command().arg("-q").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(test.list_dir("lang/fr")?.is_empty());

    test.sync_command().output()?;
    let output = test.sync_command().arg("--silent").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());

    Ok(())
}

#[test]
fn test_output_flat_keeps_dotted_keys() -> Result<()> {
    let test = CliTest::laravel()?;
    test.write_file("app/a.php", "<?php __('menu.user.profile');")?;

    let output = test.sync_command().args(["--output-flat", "--new-value", "null"]).output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_catalog("lang/fr/menu.yaml")?,
        json!({"user.profile": null})
    );

    Ok(())
}

#[test]
fn test_no_lemma_found() -> Result<()> {
    let test = CliTest::laravel()?;
    test.write_file("app/a.php", "<?php echo 'hello';")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No lemma has been found in code."));

    Ok(())
}

#[test]
fn test_config_file_is_honored() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".lemmasyncrc.json",
        r#"{"sourceRoots": ["src"], "langRoots": ["i18n"], "extension": "tpl"}"#,
    )?;
    test.write_file("src/page.tpl", "{{ trans('page.title') }}")?;
    test.write_file("src/skipped.php", "<?php trans('other.title');")?;
    test.write_file("i18n/de/.keep", "")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_catalog("i18n/de/page.yaml")?,
        json!({"title": "TODO: title"})
    );
    assert!(!test.exists("i18n/de/other.yaml"));

    Ok(())
}

#[test]
fn test_invalid_config_is_a_configuration_error() -> Result<()> {
    let test = CliTest::laravel()?;
    test.write_file(".lemmasyncrc.json", "{ not json")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Failed to parse config file"));

    Ok(())
}

#[test]
fn test_unparsable_catalog_fails_only_its_pair() -> Result<()> {
    let test = project()?;
    test.write_file("lang/fr/auth.yaml", "failed: [unclosed\n")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("error:"));
    assert_eq!(test.read_file("lang/fr/auth.yaml")?, "failed: [unclosed\n");
    assert!(test.exists("lang/fr/nav.yaml"));
    assert!(test.exists("lang/en/auth.yaml"));

    Ok(())
}

#[test]
fn test_json_backups_are_not_locales() -> Result<()> {
    let test = project()?;
    let backup = Regex::new(r"^(en|fr)\.\d{8}_\d{6}\.json$")?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));

    test.write_file("resources/views/night.blade.php", "{{ __('Good night') }}")?;
    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Backup files:"));

    test.write_file("resources/views/later.blade.php", "{{ __('See you') }}")?;
    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(!out.contains("lang/fr.2"), "{out}");
    assert!(!out.contains("lang/en.2"), "{out}");

    for name in test.list_dir("lang")? {
        assert!(
            ["en", "fr", "en.json", "fr.json"].contains(&name.as_str()) || backup.is_match(&name),
            "unexpected entry lang/{name}"
        );
    }
    assert_eq!(
        test.read_catalog("lang/fr.json")?,
        json!({
            "Good night": "TODO: Good night",
            "See you": "TODO: See you",
            "Welcome back": "TODO: Welcome back"
        })
    );

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    Ok(())
}
