//! rm command - Remove objects, prefixes, or buckets
//!
//! A bare `s3:bucket` removes the bucket, a key ending in `/` removes the
//! whole prefix, anything else removes one object. Non-empty prefixes are
//! refused unless `--recursive` is given.

use clap::Args;
use piggin_core::{parse_remote_path, remove, RemoveOutcome, RemoveRequest, RemoveTarget};

use super::{Context, RecursionArgs, VerbosityArgs};
use crate::exit_code::ExitCode;
use crate::prompt::StdinPrompt;

/// Remove an object, a prefix, or a bucket
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Remote path (s3:bucket[/key]); the s3: scheme may be omitted
    pub path: String,

    #[command(flatten)]
    pub recursion: RecursionArgs,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.path) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid path", &e),
    };

    let client = match ctx.client(None).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = RemoveRequest {
        path,
        recursive: args.recursion.enabled(),
        confirmed: args.verbosity.silent(),
    };

    match remove(&client, &client, &StdinPrompt, &request).await {
        Ok(RemoveOutcome::Removed(target)) => {
            report_removed(ctx, &target);
            ExitCode::Success
        }
        Ok(RemoveOutcome::Aborted) => {
            ctx.formatter.warning("Aborted by user");
            ExitCode::Success
        }
        Err(piggin_core::Error::NotEmpty(what)) => {
            ctx.formatter.error(&format!(
                "{what} is not empty; use --recursive to remove it with its contents"
            ));
            ExitCode::Conflict
        }
        Err(e) => ctx.fail(&format!("Failed to remove {}", request.path), &e),
    }
}

pub(super) fn report_removed(ctx: &Context, target: &RemoveTarget) {
    if ctx.formatter.is_json() {
        ctx.formatter.json(target);
        return;
    }
    let message = match target {
        RemoveTarget::Bucket { bucket } => format!("Removed bucket '{bucket}'"),
        RemoveTarget::Prefix { bucket, prefix } => format!("Removed s3:{bucket}/{prefix}"),
        RemoveTarget::Object { bucket, key } => format!("Removed s3:{bucket}/{key}"),
    };
    ctx.formatter.success(&message);
}
