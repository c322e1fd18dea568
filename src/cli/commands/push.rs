//! Push command implementation.
//!
//! Logs in once, then runs one of three modes:
//! - single file (`--file`)
//! - watch (`--watch`), until Ctrl+C
//! - one batch pass over the content directory (default)

use crate::cli::{Cli, PushArgs};
use crate::config::{load_config, resolve_content_dir, resolve_credentials, resolve_interval};
use crate::error::{Error, Result};
use crate::sync::{FileStatus, Shutdown, SyncEngine, print_pass, print_report, watch};
use crate::wiki::{MediaWikiClient, WikiApi};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Execute the push command.
///
/// # Errors
///
/// Returns `Error::Config` for incomplete settings, `Error::Auth` when login
/// fails, and `Error::SyncFailed`/`Error::FileSyncFailed` when any file could
/// not be published.
pub fn execute(args: &PushArgs, cli: &Cli, json: bool) -> Result<()> {
    let file_config = load_config(cli.config.as_deref())?;
    let credentials = resolve_credentials(
        cli.url.as_deref(),
        cli.username.as_deref(),
        cli.password.as_deref(),
        &file_config,
    )?;
    let content_dir = resolve_content_dir(args.content_dir.as_deref(), &file_config);
    let interval = if args.watch {
        Some(resolve_interval(args.interval, &file_config)?)
    } else {
        None
    };
    let quiet = cli.quiet;

    // Single-threaded: one session, one request at a time.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let client = MediaWikiClient::new(&credentials.endpoint)?;
        if !json && !quiet {
            println!("Logging into {} as {}", credentials.endpoint, credentials.username);
        }
        let mut engine = SyncEngine::connect(client, &credentials).await?;

        match (&args.file, interval) {
            (Some(file), _) => sync_single(&mut engine, file, args.force, json, quiet).await,
            (None, Some(interval)) => {
                watch_dir(&mut engine, &content_dir, interval, json, quiet).await
            }
            (None, None) => sync_batch(&mut engine, &content_dir, args.force, json, quiet).await,
        }
    })
}

async fn sync_single<A: WikiApi>(
    engine: &mut SyncEngine<A>,
    file: &Path,
    force: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let outcome = engine.sync_file(file, force).await;

    if json {
        let output = serde_json::json!({
            "success": outcome.succeeded(),
            "file": outcome,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        match &outcome.status {
            FileStatus::Published => println!("Published {}", file.display()),
            FileStatus::Unchanged => println!("Unchanged {}", file.display()),
            FileStatus::Failed(_) => {}
        }
    }

    match outcome.status {
        FileStatus::Failed(reason) => Err(Error::FileSyncFailed {
            path: outcome.path,
            reason,
        }),
        FileStatus::Published | FileStatus::Unchanged => Ok(()),
    }
}

async fn sync_batch<A: WikiApi>(
    engine: &mut SyncEngine<A>,
    content_dir: &Path,
    force: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if !json && !quiet {
        println!("Syncing content from {}", content_dir.display());
    }

    let report = engine.sync_directory(content_dir, force).await;

    if json {
        let output = serde_json::json!({
            "success": report.all_succeeded(),
            "content_dir": content_dir.display().to_string(),
            "summary": {
                "successful": report.succeeded(),
                "failed": report.failed(),
                "total": report.total(),
                "published": report.published(),
                "unchanged": report.unchanged(),
            },
            "files": report.files,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        print_report(&report);
    }

    if report.all_succeeded() {
        Ok(())
    } else {
        Err(Error::SyncFailed {
            failed: report.failed(),
            total: report.total(),
        })
    }
}

async fn watch_dir<A: WikiApi>(
    engine: &mut SyncEngine<A>,
    content_dir: &Path,
    interval: Duration,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trigger.trigger(),
            Err(e) => warn!(error = %e, "Could not listen for Ctrl+C"),
        }
    });

    if !json && !quiet {
        println!(
            "Watching {} for changes (checking every {}s)",
            content_dir.display(),
            interval.as_secs()
        );
        println!("Press Ctrl+C to stop watching...");
    }

    let summary = watch(engine, content_dir, interval, &shutdown, |pass, report| {
        if json {
            let line = serde_json::json!({
                "pass": pass,
                "published": report.published(),
                "failed": report.failed(),
                "files": report.files,
            });
            println!("{line}");
        } else if !quiet {
            print_pass(pass, report);
        }
    })
    .await;

    if json {
        println!("{}", serde_json::to_string(&serde_json::json!({ "stopped": summary }))?);
    } else if !quiet {
        println!();
        println!(
            "Stopped watching after {} pass(es), {} publish(es)",
            summary.passes, summary.published
        );
    }
    Ok(())
}
