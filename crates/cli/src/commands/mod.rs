//! CLI command definitions and execution
//!
//! Every subcommand takes `s3:bucket/key` paths or bare local paths and
//! returns an [`ExitCode`].

use clap::{Args, Parser, Subcommand};
use piggin_core::config::Defaults;
use piggin_core::{ConfigManager, Credentials};
use piggin_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

pub mod completions;
pub mod cp;
mod delete;
mod ls;
mod mkbucket;
mod mkdir;
mod rm;

/// piggin - work with AWS S3 buckets and objects
///
/// Remote paths use the form s3:bucket/key; anything else is a local path.
#[derive(Parser, Debug)]
#[command(name = "piggin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// AWS access key id
    #[arg(short = 'a', long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(short = 's', long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(short = 'p', long, global = true, env = "AWS_PROFILE")]
    pub profile_name: Option<String>,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List buckets, or keys under a bucket/prefix
    Ls(ls::LsArgs),

    /// Create a directory marker (or a bucket, for a bucket-only path)
    Mkdir(mkdir::MkdirArgs),

    /// Remove an object, a prefix, or a bucket
    Rm(rm::RmArgs),

    /// Copy between the local filesystem and S3
    #[command(visible_alias = "copy")]
    Cp(cp::CpArgs),

    /// Create a bucket
    Mkbucket(mkbucket::MkbucketArgs),

    /// Delete a bucket
    Delete(delete::DeleteArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// `--recursive/--norecursive` pair; the last one given wins
#[derive(Args, Debug, Clone, Default)]
pub struct RecursionArgs {
    /// Descend into prefixes
    #[arg(short, long, overrides_with = "norecursive")]
    pub recursive: bool,

    /// Stay at one level (default)
    #[arg(long, overrides_with = "recursive")]
    pub norecursive: bool,
}

impl RecursionArgs {
    pub fn enabled(&self) -> bool {
        self.recursive && !self.norecursive
    }
}

/// `--verbose/--silent` pair; `--silent` also skips confirmation prompts
#[derive(Args, Debug, Clone, Default)]
pub struct VerbosityArgs {
    /// Report each step and ask before deleting (default)
    #[arg(short, long, overrides_with = "silent")]
    pub verbose: bool,

    /// Do not ask for confirmation
    #[arg(long, visible_alias = "yes", overrides_with = "verbose")]
    pub silent: bool,
}

impl VerbosityArgs {
    pub fn silent(&self) -> bool {
        self.silent && !self.verbose
    }
}

/// Everything a command needs besides its own arguments
pub struct Context {
    pub formatter: Formatter,
    pub credentials: Credentials,
    pub defaults: Defaults,
}

impl Context {
    /// Build an S3 client, reporting failures through the formatter
    pub async fn client(&self, region: Option<&str>) -> Result<S3Client, ExitCode> {
        S3Client::new(&self.credentials, region).await.map_err(|e| {
            self.formatter.error(&format!("Failed to create S3 client: {e}"));
            ExitCode::from_error(&e)
        })
    }

    /// Report a core error and convert it to an exit code
    pub fn fail(&self, context: &str, err: &piggin_core::Error) -> ExitCode {
        self.formatter.error(&format!("{context}: {err}"));
        ExitCode::from_error(err)
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let command = match cli.command {
        Commands::Completions(args) => return completions::execute(args),
        command => command,
    };

    let bootstrap = Formatter::new(OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
        ..Default::default()
    });

    let config = match ConfigManager::new().and_then(|m| {
        tracing::debug!(path = %m.config_path().display(), "loading configuration");
        m.load()
    }) {
        Ok(config) => config,
        Err(e) => {
            bootstrap.error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let credentials = match Credentials::new(cli.access_key, cli.secret_key, cli.profile_name) {
        Ok(c) => c,
        Err(e) => {
            bootstrap.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let defaults = config.defaults;
    let output_config = OutputConfig {
        json: cli.json || defaults.output == "json",
        no_color: cli.no_color || defaults.color == "never",
        no_progress: cli.no_progress || !defaults.progress,
        quiet: cli.quiet,
    };

    let ctx = Context {
        formatter: Formatter::new(output_config),
        credentials,
        defaults,
    };

    match command {
        Commands::Ls(args) => ls::execute(args, &ctx).await,
        Commands::Mkdir(args) => mkdir::execute(args, &ctx).await,
        Commands::Rm(args) => rm::execute(args, &ctx).await,
        Commands::Cp(args) => cp::execute(args, &ctx).await,
        Commands::Mkbucket(args) => mkbucket::execute(args, &ctx).await,
        Commands::Delete(args) => delete::execute(args, &ctx).await,
        Commands::Completions(args) => completions::execute(args),
    }
}
