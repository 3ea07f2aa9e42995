use std::env;

use anyhow::{Context, Result};
use chrono::Local;

use super::super::{args::SyncArgs, exit_status::ExitStatus};
use super::{CommandResult, CommandSummary, SyncSummary};
use crate::{
    config::{Config, load_config},
    core::{ReportCollector, SyncOptions, Synchronizer, group_by_family},
    error::SyncError,
    extract::{Extractor, RegexExtractor},
    store::{FsStore, discover_locales, resolve_lang_root},
    translate::{MicrosoftTranslator, Translator},
};

pub fn sync(args: SyncArgs) -> Result<CommandResult> {
    let root = match &args.common.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to read the current directory")?,
    };
    let config = load_config(&root)?.config;
    let split_rule = config.split_rule()?;

    let lang_roots = match &args.lang_root {
        Some(lang_root) => vec![lang_root.clone()],
        None => config.lang_roots.clone(),
    };
    let lang_root = resolve_lang_root(&root, &lang_roots)?;
    let translator = build_translator(&args, &config)?;

    let extension = args
        .extension
        .clone()
        .unwrap_or_else(|| config.extension.clone());
    let extraction = RegexExtractor::new(&root, &config.ignores)
        .verbose(args.common.verbose)
        .extract(&config.source_roots, &config.trans_methods, &extension)?;

    let mut summary = SyncSummary {
        root: root.clone(),
        lemmas: extraction.lemmas,
        files_scanned: extraction.files_scanned,
        source_roots: config.source_roots.clone(),
        trans_methods: config.trans_methods.keys().cloned().collect(),
        extension,
        missing_roots: extraction.missing_roots,
        unreadable: extraction.unreadable,
        collector: ReportCollector::new(),
        apply: None,
        dry_run: args.dry_run,
        silent: args.silent,
        include_obsolete: !args.no_obsolete,
    };

    if summary.lemmas.is_empty() {
        return Ok(finish(summary, false));
    }

    let locales = discover_locales(&lang_root, &config.json_locales)?;
    let families = group_by_family(&summary.lemmas, &split_rule, args.output_flat);

    let now = Local::now().naive_local();
    let options = sync_options(&args, &config, &now.format("%Y/%m/%d %H:%M:%S").to_string());
    let store = FsStore;
    let synchronizer = Synchronizer::new(&store, &lang_root, &options, &split_rule)
        .with_translator(translator.as_ref().map(|t| t as &dyn Translator));

    let plans = synchronizer.plan(&locales, &families, &mut summary.collector);
    let has_plans = !plans.is_empty();
    if has_plans && !args.silent {
        summary.apply = Some(synchronizer.apply(&plans, &now, &mut summary.collector));
    }

    Ok(finish(summary, has_plans))
}

fn finish(summary: SyncSummary, has_plans: bool) -> CommandResult {
    let status = if summary.collector.has_failures() {
        ExitStatus::Io
    } else if summary.silent {
        if summary.collector.has_new() {
            ExitStatus::Changes
        } else {
            ExitStatus::Success
        }
    } else if has_plans {
        ExitStatus::Changes
    } else {
        ExitStatus::Success
    };

    CommandResult {
        summary: CommandSummary::Sync(Box::new(summary)),
        status,
    }
}

fn sync_options(args: &SyncArgs, config: &Config, generated_at: &str) -> SyncOptions {
    SyncOptions {
        dry_run: args.dry_run,
        force: args.force,
        no_backup: args.no_backup,
        include_comments: !args.no_comment,
        include_obsolete: !args.no_obsolete,
        output_flat: args.output_flat,
        disable_obsolete_check: args.disable_obsolete_check,
        header: (!args.no_date).then(|| format!("Generated by lemmasync at {generated_at}")),
        new_value: args
            .new_value
            .clone()
            .unwrap_or_else(|| config.new_value.clone()),
        todo_prefix: config.todo_prefix.clone(),
        obsolete_prefix: config.obsolete_prefix().to_string(),
        never_obsolete: config.never_obsolete_keys.clone(),
        fallback_locale: config.fallback_locale.clone(),
        escape_unicode: config.escape_unicode,
        ignore_families: config.ignore_families.clone(),
    }
}

fn build_translator(args: &SyncArgs, config: &Config) -> Result<Option<MicrosoftTranslator>> {
    if !args.translation {
        return Ok(None);
    }

    let key = args
        .translator_key
        .clone()
        .or_else(|| config.translator.key.clone())
        .ok_or_else(|| {
            SyncError::Configuration(
                "translation requested but no translator key is set (use --translator-key or LEMMASYNC_TRANSLATOR_KEY)"
                    .to_string(),
            )
        })?;
    let region = args
        .translator_region
        .clone()
        .or_else(|| config.translator.region.clone());

    Ok(Some(
        MicrosoftTranslator::new(&config.translator.endpoint, &key, region.as_deref())
            .with_default_from(&config.fallback_locale),
    ))
}
