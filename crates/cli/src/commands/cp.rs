//! cp command - Copy between S3 and the local filesystem
//!
//! Single objects go either way. A prefix source (or `--recursive`, or
//! `--pattern`) downloads everything under it into one local directory.

use clap::Args;
use piggin_core::{
    copy_object, parse_path, CopyReport, CopyTask, NamePattern, ParsedPath, RecursiveCopier,
    Transferred,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::{Context, RecursionArgs};
use crate::exit_code::ExitCode;
use crate::output::Spinner;

/// Copy objects
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source path (local path or s3:bucket/key)
    pub source: String,

    /// Destination path (local path or s3:bucket/key)
    pub target: String,

    #[command(flatten)]
    pub recursion: RecursionArgs,

    /// Only copy objects whose name contains this text (or matches it as a glob)
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
struct CpOutput<'a> {
    status: &'static str,
    #[serde(flatten)]
    transfer: &'a Transferred,
    size_human: String,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, ctx: &Context) -> ExitCode {
    let source = match parse_path(&args.source) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid source path", &e),
    };
    let target = match parse_path(&args.target) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid target path", &e),
    };

    let pattern = match args.pattern.as_deref().map(NamePattern::parse).transpose() {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid pattern", &e),
    };

    if is_tree_copy(&source, &target, args.recursion.enabled(), pattern.is_some()) {
        let task = match CopyTask::new(&source, &target, pattern, args.recursion.enabled()) {
            Ok(task) => task,
            Err(e) => return ctx.fail("Cannot copy", &e),
        };
        return copy_tree(&task, ctx).await;
    }

    let client = match ctx.client(None).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::new(ctx.formatter.config(), &format!("Copying {source}"));
    let result = copy_object(&client, &source, &target).await;
    spinner.finish_and_clear();

    match result {
        Ok(transfer) => {
            report_copied(ctx, &transfer);
            ExitCode::Success
        }
        Err(e) => ctx.fail(&format!("Failed to copy {source}"), &e),
    }
}

/// Whether the request walks a prefix rather than moving one object
fn is_tree_copy(source: &ParsedPath, target: &ParsedPath, recursive: bool, filtered: bool) -> bool {
    match (source, target) {
        (ParsedPath::Remote(src), ParsedPath::Local(_)) => recursive || filtered || src.is_dir(),
        _ => false,
    }
}

async fn copy_tree(task: &CopyTask, ctx: &Context) -> ExitCode {
    let client = match ctx.client(None).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received, stopping copy");
                cancel.cancel();
            }
        }
    });

    let spinner = Spinner::new(
        ctx.formatter.config(),
        &format!("Copying {} to {}", task.source, task.dest_dir.display()),
    );
    let result = RecursiveCopier::new(&client, &client)
        .with_cancellation(cancel)
        .copy(task)
        .await;
    spinner.finish_and_clear();
    watcher.abort();

    let report = match result {
        Ok(report) => report,
        Err(e) => return ctx.fail(&format!("Failed to copy {}", task.source), &e),
    };

    print_report(ctx, &report);
    report_exit_code(&report)
}

fn report_copied(ctx: &Context, transfer: &Transferred) {
    let size_human = humansize::format_size(transfer.size_bytes, humansize::BINARY);
    if ctx.formatter.is_json() {
        ctx.formatter.json(&CpOutput {
            status: "success",
            transfer,
            size_human,
        });
    } else {
        ctx.formatter.println(&format!(
            "{} -> {} ({size_human})",
            transfer.source, transfer.target
        ));
    }
}

fn print_report(ctx: &Context, report: &CopyReport) {
    if ctx.formatter.is_json() {
        ctx.formatter.json(report);
        return;
    }

    for transfer in &report.copied {
        ctx.formatter.println(&format!(
            "{} -> {} ({})",
            transfer.source,
            transfer.target,
            humansize::format_size(transfer.size_bytes, humansize::BINARY)
        ));
    }
    for failure in &report.failed {
        ctx.formatter
            .error(&format!("Failed to copy {}: {}", failure.key, failure.error));
    }

    if report.cancelled {
        ctx.formatter.warning("Copy interrupted");
    }
    if report.is_success() {
        ctx.formatter.success(&format!(
            "Copied {} object(s), {}",
            report.copied.len(),
            humansize::format_size(report.total_bytes(), humansize::BINARY)
        ));
    }
}

fn report_exit_code(report: &CopyReport) -> ExitCode {
    if report.cancelled {
        ExitCode::Interrupted
    } else if !report.failed.is_empty() {
        ExitCode::GeneralError
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piggin_core::FailedTransfer;

    fn remote(raw: &str) -> ParsedPath {
        parse_path(raw).unwrap()
    }

    #[test]
    fn test_prefix_source_is_tree_copy() {
        let local = ParsedPath::Local("out".into());
        assert!(is_tree_copy(&remote("s3:b/logs/"), &local, false, false));
        assert!(is_tree_copy(&remote("s3:b"), &local, false, false));
        assert!(!is_tree_copy(&remote("s3:b/logs/a.txt"), &local, false, false));
    }

    #[test]
    fn test_flags_force_tree_copy() {
        let local = ParsedPath::Local("out".into());
        assert!(is_tree_copy(&remote("s3:b/logs"), &local, true, false));
        assert!(is_tree_copy(&remote("s3:b/logs"), &local, false, true));
    }

    #[test]
    fn test_upload_is_never_tree_copy() {
        let local = ParsedPath::Local("file.txt".into());
        assert!(!is_tree_copy(&local, &remote("s3:b/dir/"), true, true));
    }

    #[test]
    fn test_report_exit_code() {
        let mut report = CopyReport::default();
        assert_eq!(report_exit_code(&report), ExitCode::Success);

        report.failed.push(FailedTransfer {
            key: "a".into(),
            error: "boom".into(),
        });
        assert_eq!(report_exit_code(&report), ExitCode::GeneralError);

        report.cancelled = true;
        assert_eq!(report_exit_code(&report), ExitCode::Interrupted);
    }

    #[test]
    fn test_cp_output_json_shape() {
        let transfer = Transferred {
            source: "s3:b/a.txt".into(),
            target: "out/a.txt".into(),
            size_bytes: 2048,
        };
        let output = CpOutput {
            status: "success",
            transfer: &transfer,
            size_human: humansize::format_size(2048u64, humansize::BINARY),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["size_bytes"], 2048);
        assert_eq!(json["size_human"], "2 KiB");
    }
}
