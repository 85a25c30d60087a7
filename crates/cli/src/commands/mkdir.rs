//! mkdir command - Create a directory marker
//!
//! `s3:bucket/a/b` creates the zero-byte object `a/b/`. A bucket-only path
//! creates the bucket instead, using `--acl` and `--location`.

use clap::Args;
use piggin_core::{make_bucket, make_dir, parse_path, ParsedPath};

use super::{Context, VerbosityArgs};
use crate::exit_code::ExitCode;

/// Create a directory marker or a bucket
#[derive(Args, Debug)]
pub struct MkdirArgs {
    /// Remote path (s3:bucket/key)
    pub path: String,

    /// AWS location when the path names a bucket, ignored otherwise
    #[arg(short, long)]
    pub location: Option<String>,

    /// AWS canned ACL when the path names a bucket, ignored otherwise
    #[arg(long)]
    pub acl: Option<String>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,
}

/// Execute the mkdir command
pub async fn execute(args: MkdirArgs, ctx: &Context) -> ExitCode {
    let path = match parse_path(&args.path) {
        Ok(ParsedPath::Remote(p)) => p,
        Ok(ParsedPath::Local(p)) => {
            ctx.formatter.error(&format!(
                "{} is not an S3 path; use s3:bucket/key",
                p.display()
            ));
            return ExitCode::UsageError;
        }
        Err(e) => return ctx.fail("Invalid path", &e),
    };

    if path.is_bucket_root() {
        let settings = ctx
            .defaults
            .bucket_settings(args.acl.as_deref(), args.location.as_deref());
        let client = match ctx.client(Some(&settings.location)).await {
            Ok(c) => c,
            Err(code) => return code,
        };
        return match make_bucket(&client, &path.bucket, &settings).await {
            Ok(()) => {
                if !args.verbosity.silent() {
                    ctx.formatter
                        .success(&format!("Bucket '{}' created in {}.", path.bucket, settings.location));
                }
                ExitCode::Success
            }
            Err(e) => ctx.fail("Failed to create bucket", &e),
        };
    }

    let client = match ctx.client(None).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    match make_dir(&client, &path).await {
        Ok(marker) => {
            if !args.verbosity.silent() {
                ctx.formatter.success(&format!("Created {marker}"));
            }
            ExitCode::Success
        }
        Err(e) => ctx.fail("Failed to create directory", &e),
    }
}
