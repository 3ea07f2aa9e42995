//! Progress output of the CLI commands.
//!
//! Progress goes to stdout, warnings and errors to stderr. Separate from the
//! engine so lemmasync can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary, SyncSummary};
use crate::core::{BuildWarning, Counts, PairOutcome, PairReport};
use crate::utils::{plural, short_path};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Sync(summary) => {
            if summary.silent {
                return;
            }
            print_sync_to(summary, verbose, &mut io::stdout().lock(), &mut io::stderr().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

fn print_init(summary: &InitSummary) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", summary.path.display()).green()
    );
}

/// Print the whole sync run to custom writers.
pub fn print_sync_to<W: Write, E: Write>(
    summary: &SyncSummary,
    verbose: bool,
    out: &mut W,
    err: &mut E,
) {
    for root in &summary.missing_roots {
        let _ = writeln!(
            err,
            "{} source directory {} does not exist",
            "warning:".bold().yellow(),
            short_path(root, &summary.root)
        );
    }
    for file in &summary.unreadable {
        let _ = writeln!(
            err,
            "{} cannot read {}",
            "warning:".bold().yellow(),
            short_path(file, &summary.root)
        );
    }

    if summary.lemmas.is_empty() {
        print_no_lemma(summary, out);
        return;
    }

    let count = summary.lemmas.len();
    if count == 1 {
        let _ = writeln!(out, "1 lemma has been found in code");
    } else {
        let _ = writeln!(out, "{} lemmas have been found in code", count);
    }
    if verbose {
        print_lemmas(summary, out);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Scan files:");
    for pair in summary.collector.pairs() {
        print_pair(summary, pair, verbose, out, err);
    }

    match &summary.apply {
        Some(apply) => {
            if !apply.backups.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "Backup files:");
                for (original, backup) in &apply.backups {
                    let _ = writeln!(
                        out,
                        "    {} -> {}",
                        short_path(original, &summary.root).green(),
                        short_path(backup, &summary.root).green()
                    );
                }
            }

            let _ = writeln!(out);
            let _ = writeln!(out, "Save files:");
            for path in &apply.saved {
                let _ = writeln!(out, "    {}", short_path(path, &summary.root).green());
            }

            for (path, reason) in &apply.failures {
                let _ = writeln!(
                    err,
                    "{} {} {}: {}",
                    "error:".bold().red(),
                    FAILURE_MARK.red(),
                    short_path(path, &summary.root),
                    reason
                );
            }

            let _ = writeln!(out);
            if summary.dry_run {
                let _ = writeln!(
                    out,
                    "{} no file has been written.",
                    "Dry run:".yellow().bold()
                );
            } else if apply.failures.is_empty() {
                let _ = writeln!(out, "{} {}", SUCCESS_MARK.green(), "Process done!".green());
            }
        }
        None => {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} {}",
                SUCCESS_MARK.green(),
                "Nothing to do, every catalog is up to date.".green()
            );
        }
    }
}

fn print_no_lemma<W: Write>(summary: &SyncSummary, out: &mut W) {
    let _ = writeln!(out, "{}", "No lemma has been found in code.".yellow());
    let _ = writeln!(
        out,
        "Searched recursively in *.{} files in these directories:",
        summary.extension
    );
    for root in &summary.source_roots {
        let _ = writeln!(out, "    {}", root);
    }
    let _ = writeln!(out, "for these functions/methods:");
    for method in &summary.trans_methods {
        let _ = writeln!(out, "    {}", method);
    }
}

/// Dotted lemmas with their defining file, aligned on the widest key.
fn print_lemmas<W: Write>(summary: &SyncSummary, out: &mut W) {
    let dotted: Vec<(&String, &String)> = summary
        .lemmas
        .iter()
        .filter(|(lemma, _)| lemma.contains('.'))
        .collect();
    let width = dotted
        .iter()
        .map(|(lemma, _)| UnicodeWidthStr::width(lemma.as_str()))
        .max()
        .unwrap_or(0);

    for (lemma, file) in dotted {
        let padding = width - UnicodeWidthStr::width(lemma.as_str());
        let _ = writeln!(
            out,
            "    {}{}  in file {}",
            lemma.green(),
            " ".repeat(padding),
            file.yellow()
        );
    }
}

fn print_pair<W: Write, E: Write>(
    summary: &SyncSummary,
    pair: &PairReport,
    verbose: bool,
    out: &mut W,
    err: &mut E,
) {
    if pair.outcome == PairOutcome::Skipped {
        if verbose {
            let _ = writeln!(out, "    {}", format!("! Skip lang file '{}' !", pair.family).cyan());
        }
        return;
    }

    let _ = writeln!(out, "    {}", short_path(&pair.path, &summary.root));

    // Load or parse failures never reach the diff.
    if let PairOutcome::Failed(reason) = &pair.outcome
        && pair.counts == Counts::default()
    {
        let _ = writeln!(err, "{} {}", "error:".bold().red(), reason);
        return;
    }

    if pair.created && !summary.dry_run {
        let _ = writeln!(out, "        {}", "> File has been created".cyan());
    }

    for collision in &pair.collisions {
        let _ = writeln!(
            err,
            "{} {} is used as a key but {} is already defined in the catalog; {} not handled",
            "warning:".bold().yellow(),
            collision.new_key.green(),
            collision.old_key.yellow(),
            collision.new_key.green()
        );
    }

    let counts = pair.counts;
    if counts.new > 0 {
        let _ = writeln!(
            out,
            "        {}",
            format!("{} new string{} to translate", counts.new, plural(counts.new)).green()
        );
        if verbose {
            for (key, file) in &pair.new_keys {
                let _ = writeln!(out, "            {} in {}", key.green(), file);
            }
        }
    }

    if verbose && counts.kept > 0 {
        let _ = writeln!(
            out,
            "        {} already translated string{}",
            counts.kept,
            plural(counts.kept)
        );
    }

    if verbose {
        for (key, rule) in &pair.protected_keys {
            let _ = writeln!(
                out,
                "        {} is protected as a dynamic lemma (rule {})",
                key.yellow(),
                rule
            );
        }
    }

    if counts.obsolete > 0 {
        let fate = if summary.include_obsolete {
            "can be deleted manually in the generated file"
        } else {
            "will be deleted"
        };
        let _ = writeln!(
            out,
            "        {}",
            format!("{} obsolete string{} ({})", counts.obsolete, plural(counts.obsolete), fate)
                .yellow()
        );
        if verbose {
            for key in &pair.obsolete_keys {
                let _ = writeln!(out, "            {}", key.yellow());
            }
        }
    }

    for warning in &pair.warnings {
        let message = match warning {
            BuildWarning::Translation { key, error } => {
                format!("cannot translate {}, using the lemma instead: {}", key, error)
            }
            BuildWarning::Conflict { key } => {
                format!("{} overwrites another entry on the same path", key)
            }
        };
        let _ = writeln!(err, "{} {}", "warning:".bold().yellow(), message);
    }

    if let PairOutcome::Failed(reason) = &pair.outcome {
        let _ = writeln!(err, "{} {}", "error:".bold().red(), reason);
    } else if verbose && pair.outcome == PairOutcome::Unchanged {
        let _ = writeln!(out, "        > {}", "Nothing to do for this file".yellow());
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApplySummary, Family, ReportCollector};
    use std::path::PathBuf;

    fn summary() -> SyncSummary {
        let mut collector = ReportCollector::new();
        let mut pair = PairReport::new(
            "fr",
            &Family::Generic("messages".to_string()),
            PathBuf::from("/project/lang/fr/messages.yaml"),
        );
        pair.counts = Counts {
            new: 2,
            kept: 1,
            protected: 0,
            obsolete: 1,
        };
        pair.new_keys = vec![
            ("messages.hello".to_string(), "src/a.php".to_string()),
            ("messages.bye".to_string(), "src/b.php".to_string()),
        ];
        pair.obsolete_keys = vec!["gone".to_string()];
        pair.outcome = PairOutcome::Planned;
        collector.record(pair);

        SyncSummary {
            root: PathBuf::from("/project"),
            lemmas: [
                ("messages.hello".to_string(), "src/a.php".to_string()),
                ("messages.bye".to_string(), "src/b.php".to_string()),
            ]
            .into_iter()
            .collect(),
            files_scanned: 2,
            source_roots: vec!["src".to_string()],
            trans_methods: vec!["__".to_string()],
            extension: "php".to_string(),
            missing_roots: Vec::new(),
            unreadable: Vec::new(),
            collector,
            apply: Some(ApplySummary {
                backups: Vec::new(),
                saved: vec![PathBuf::from("/project/lang/fr/messages.yaml")],
                failures: Vec::new(),
            }),
            dry_run: false,
            silent: false,
            include_obsolete: true,
        }
    }

    fn render(summary: &SyncSummary, verbose: bool) -> (String, String) {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut err = Vec::new();
        print_sync_to(summary, verbose, &mut out, &mut err);
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_print_sync_counts_and_saved_files() {
        let (out, err) = render(&summary(), false);
        assert!(out.contains("2 lemmas have been found in code"));
        assert!(out.contains("    lang/fr/messages.yaml"));
        assert!(out.contains("2 new strings to translate"));
        assert!(out.contains("1 obsolete string (can be deleted manually in the generated file)"));
        assert!(out.contains("Save files:"));
        assert!(out.contains("Process done!"));
        assert!(!out.contains("messages.hello in src/a.php"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_print_sync_verbose_lists_keys() {
        let (out, _) = render(&summary(), true);
        assert!(out.contains("messages.hello in src/a.php"));
        assert!(out.contains("1 already translated string"));
        assert!(out.contains("            gone"));
    }

    #[test]
    fn test_print_sync_without_lemmas() {
        let mut summary = summary();
        summary.lemmas.clear();
        let (out, _) = render(&summary, false);
        assert!(out.contains("No lemma has been found in code."));
        assert!(out.contains("*.php"));
        assert!(out.contains("    __"));
        assert!(!out.contains("Scan files:"));
    }

    #[test]
    fn test_print_sync_dry_run_and_failures() {
        let mut summary = summary();
        summary.dry_run = true;
        let (out, _) = render(&summary, false);
        assert!(out.contains("Dry run: no file has been written."));
        assert!(!out.contains("Process done!"));

        let mut summary = self::summary();
        if let Some(apply) = summary.apply.as_mut() {
            apply.saved.clear();
            apply.failures = vec![(
                PathBuf::from("/project/lang/fr/messages.yaml"),
                "permission denied".to_string(),
            )];
        }
        let (out, err) = render(&summary, false);
        assert!(err.contains("error:"));
        assert!(err.contains("lang/fr/messages.yaml: permission denied"));
        assert!(!out.contains("Process done!"));
    }
}
