use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use version_report::cli::run_report_workflow;
use version_report::config::{self, Config};
use version_report::git::GitCli;
use version_report::publish::{ActionsEnv, CommentClient};
use version_report::render::ReportFormat;
use version_report::source::ToolExecutor;
use version_report::ui;

/// Every option can also come from the matching `INPUT_*` variable, which is
/// how GitHub Actions passes step inputs.
#[derive(clap::Parser)]
#[command(
    name = "version-report",
    version,
    about = "Generate a version report for a monorepo and publish it to CI"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, env = "INPUT_REPO_PATH", help = "Repository root")]
    repo_path: Option<PathBuf>,

    #[arg(long, env = "INPUT_PROJECT_DIR", help = "Only report projects under this directory")]
    project_dir: Option<String>,

    #[arg(short = 'f', long, env = "INPUT_OUTPUT_FORMAT", value_enum, help = "Report format")]
    output_format: Option<ReportFormat>,

    #[arg(short = 'o', long, env = "INPUT_OUTPUT_FILE", help = "Write the report to this file, relative to the repository")]
    output_file: Option<PathBuf>,

    #[arg(short, long, env = "INPUT_BRANCH", help = "Branch name passed to the version tool")]
    branch: Option<String>,

    #[arg(long, env = "INPUT_TAG_PREFIX", help = "Prefix of version tags")]
    tag_prefix: Option<String>,

    #[arg(long, env = "INPUT_INCLUDE_COMMITS", action = ArgAction::Set, help = "Include commit information")]
    include_commits: Option<bool>,

    #[arg(long, env = "INPUT_INCLUDE_DEPENDENCIES", action = ArgAction::Set, help = "Include project dependencies")]
    include_dependencies: Option<bool>,

    #[arg(long, env = "INPUT_CHANGED_ONLY", action = ArgAction::Set, help = "List only changed projects")]
    changed_only: Option<bool>,

    #[arg(long, env = "INPUT_POST_TO_PR", action = ArgAction::Set, help = "Post the report as a pull request comment")]
    post_to_pr: Option<bool>,

    #[arg(long, env = "INPUT_UPDATE_EXISTING_COMMENT", action = ArgAction::Set, help = "Update the previous report comment instead of adding one")]
    update_existing_comment: Option<bool>,

    #[arg(long, env = "INPUT_COMMENT_HEADER", help = "Header identifying the report comment")]
    comment_header: Option<String>,

    #[arg(long, env = "INPUT_TOOL_COMMAND", help = "Version tool executable")]
    tool_command: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "Token for the GitHub API")]
    github_token: Option<String>,

    #[arg(short, long, help = "Log pipeline stages to stderr")]
    verbose: bool,
}

impl Args {
    /// Command-line values win over the configuration file.
    fn apply(self, config: &mut Config) {
        if let Some(path) = self.repo_path {
            config.repo_path = path;
        }
        if self.project_dir.is_some() {
            config.project_dir = self.project_dir;
        }
        if let Some(format) = self.output_format {
            config.output_format = format;
        }
        if self.output_file.is_some() {
            config.output_file = self.output_file;
        }
        if self.branch.is_some() {
            config.branch = self.branch;
        }
        if let Some(prefix) = self.tag_prefix {
            config.tag_prefix = prefix;
        }
        if let Some(value) = self.include_commits {
            config.include_commits = value;
        }
        if let Some(value) = self.include_dependencies {
            config.include_dependencies = value;
        }
        if let Some(value) = self.changed_only {
            config.changed_only = value;
        }
        if let Some(value) = self.post_to_pr {
            config.post_to_pr = value;
        }
        if let Some(value) = self.update_existing_comment {
            config.update_existing_comment = value;
        }
        if let Some(header) = self.comment_header {
            config.comment_header = header;
        }
        if let Some(command) = self.tool_command {
            config.tool_command = command;
        }
        if self.github_token.is_some() {
            config.github_token = self.github_token;
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A client is only built when a comment will actually be posted. A client
/// that fails to build still goes to the publisher, which reports why.
fn comment_client(config: &Config, env: &ActionsEnv) -> Option<CommentClient> {
    if !config.post_to_pr {
        return None;
    }
    let token = config.github_token.as_deref()?;
    let repository = env.repository.as_deref()?;

    Some(CommentClient::connect(&env.api_url, repository, token))
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    debug!(format = %config.output_format, changed_only = config.changed_only, "configuration loaded");

    let env = ActionsEnv::from_env();
    let client = comment_client(&config, &env);
    let source = ToolExecutor::from_config(&config);
    let tags = GitCli::new(&config.repo_path);

    ui::display_status(&format!(
        "Generating {} report for {}",
        config.output_format,
        config.repo_path.display()
    ));

    let outcome = run_report_workflow(&config, &env, &source, &tags, client.as_ref())?;

    println!("{}", outcome.rendered);
    ui::display_run_summary(&outcome);
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
