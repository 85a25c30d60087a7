//! mkbucket command - Create a bucket

use clap::Args;
use piggin_core::{make_bucket, parse_remote_path};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;

/// Create a bucket
#[derive(Args, Debug)]
pub struct MkbucketArgs {
    /// Bucket to create (s3:bucket or bare name)
    pub bucket: String,

    /// AWS location constraint
    #[arg(short, long)]
    pub location: Option<String>,

    /// AWS canned ACL
    #[arg(long)]
    pub acl: Option<String>,
}

#[derive(Debug, Serialize)]
struct MkbucketOutput {
    bucket: String,
    location: String,
    acl: String,
}

/// Execute the mkbucket command
pub async fn execute(args: MkbucketArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.bucket) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid bucket", &e),
    };
    if !path.key.is_empty() {
        ctx.formatter
            .error(&format!("{path} names an object; mkbucket takes a bucket name only"));
        return ExitCode::UsageError;
    }

    let settings = ctx
        .defaults
        .bucket_settings(args.acl.as_deref(), args.location.as_deref());
    let client = match ctx.client(Some(&settings.location)).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = make_bucket(&client, &path.bucket, &settings).await {
        return ctx.fail(&format!("Failed to create bucket '{}'", path.bucket), &e);
    }

    if ctx.formatter.is_json() {
        ctx.formatter.json(&MkbucketOutput {
            bucket: path.bucket,
            location: settings.location,
            acl: settings.acl,
        });
    } else {
        ctx.formatter.success(&format!(
            "Bucket '{}' created in {}.",
            path.bucket, settings.location
        ));
    }
    ExitCode::Success
}
