//! ls command - List buckets and keys
//!
//! Lists all buckets when no bucket is named, otherwise one delimited level
//! of keys under the given prefix.

use clap::Args;
use piggin_core::{parse_remote_path, ListingClient as _};
use serde::Serialize;

use super::Context;
use crate::exit_code::ExitCode;
use crate::output::Spinner;

/// List buckets or keys
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote path (s3:bucket[/prefix]); the s3: scheme may be omitted
    #[arg(default_value = "s3:///")]
    pub path: String,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    items: Vec<String>,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, ctx: &Context) -> ExitCode {
    let path = match parse_remote_path(&args.path) {
        Ok(p) => p,
        Err(e) => return ctx.fail("Invalid path", &e),
    };

    let client = match ctx.client(None).await {
        Ok(c) => c,
        Err(code) => return code,
    };

    let spinner = Spinner::new(ctx.formatter.config(), &format!("Listing {path}"));
    let listing = if path.bucket.is_empty() {
        client.list_buckets().await
    } else {
        client.list(&path.bucket, &path.key).await
    };
    spinner.finish_and_clear();

    let items = match listing {
        Ok(items) => items,
        Err(e) => return ctx.fail(&format!("Failed to list {path}"), &e),
    };

    if ctx.formatter.is_json() {
        ctx.formatter.json(&LsOutput {
            bucket: (!path.bucket.is_empty()).then(|| path.bucket.clone()),
            items,
        });
    } else {
        for item in &items {
            ctx.formatter.println(item);
        }
    }

    ExitCode::Success
}
