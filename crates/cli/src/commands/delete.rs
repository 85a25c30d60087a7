//! delete command - Delete a bucket
//!
//! Same guard as `rm s3:bucket`: a bucket with contents is refused unless
//! `--recursive` is given, and the user is asked first unless `--silent`.

use clap::Args;
use piggin_core::{parse_remote_path, remove, RemoveOutcome, RemoveRequest};

use super::rm::report_removed;
use super::{Context, RecursionArgs, VerbosityArgs};
use crate::exit_code::ExitCode;
use crate::prompt::StdinPrompt;

/// Delete a bucket
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Bucket to delete (s3:bucket or bare name)
    pub bucket: String,

    #[command(flatten)]
    pub recursion: RecursionArgs,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.bucket) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid bucket", &e),
    };
    if !path.is_bucket_root() {
        ctx.formatter
            .error(&format!("{path} is not a bucket; use rm to remove objects"));
        return ExitCode::UsageError;
    }

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
        Err(e) => ctx.fail(&format!("Failed to delete bucket '{}'", request.path.bucket), &e),
    }
}
