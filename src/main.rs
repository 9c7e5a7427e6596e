//! prbuilder - make building GitHub pull requests automated

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::style::Stylize;
use pr_builder::branch::BranchNaming;
use pr_builder::config::{AuthorConfig, BuilderConfig, FileConfig, RepoSlug, load_file_config};
use pr_builder::detect::IgnorePolicy;
use pr_builder::publish::CollisionPolicy;
use pr_builder::signature::Signature;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXAMPLE: &str = "\
Example:
  prbuilder \\
    --workspace=./ \\
    --repo=n3wscott/prbuilder \\
    --target=main \\
    --title=\"Fix spelling errors\" \\
    --body=\"Produced via: github.com/client9/misspell\" \\
    --name=\"Demo Person\" \\
    --email=demo@example.com \\
    --token=abc-123 \\
    --commit-branch=random";

/// Make building GitHub pull requests automated
#[derive(Parser, Debug)]
#[command(name = "prbuilder", version, about, after_help = EXAMPLE)]
struct Cli {
    /// The workspace directory to turn into a PR
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// The GitHub base <owner>/<repo> this PR will target
    #[arg(long, value_name = "OWNER/REPO")]
    repo: String,

    /// The base branch this PR will target
    #[arg(long, visible_alias = "branch", value_name = "BRANCH")]
    target: String,

    /// Branch to create for the local changes ('random' for a generated name;
    /// defaults to $POD_NAME)
    #[arg(short = 'b', long, value_name = "BRANCH")]
    commit_branch: Option<String>,

    /// The title of the PR to send
    #[arg(long)]
    title: String,

    /// The body of the PR to send
    #[arg(long)]
    body: String,

    /// Token identifying this PR's provenance; earlier PRs with the same
    /// token are closed
    #[arg(long)]
    token: Option<String>,

    /// The author name (defaults to git config user.name)
    #[arg(long)]
    name: Option<String>,

    /// The author email (defaults to git config user.email)
    #[arg(long)]
    email: Option<String>,

    /// Add a Signed-off-by trailer to the commit message
    #[arg(short = 'S', long)]
    signoff: bool,

    /// Owner of the fork to push to (defaults to the authenticated user)
    #[arg(long)]
    fork_owner: Option<String>,

    /// File name whose changes alone do not warrant a PR (repeatable;
    /// defaults to Gopkg.lock)
    #[arg(long = "ignore", value_name = "FILE")]
    ignore: Vec<String>,

    /// What to do if the commit branch already exists
    #[arg(long, value_parser = ["fail", "overwrite"])]
    on_collision: Option<String>,

    /// GitHub Enterprise host
    #[arg(long)]
    host: Option<String>,

    /// Push to this URL instead of the fork
    #[arg(long, value_name = "URL")]
    push_url: Option<String>,

    /// Config file (defaults to <config dir>/prbuilder/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show what would be done without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Merge flags over file defaults into the run configuration
    fn into_config(self, file: FileConfig) -> pr_builder::Result<BuilderConfig> {
        let repo = RepoSlug::parse(&self.repo)?;
        let token = self.token.map(Signature::new).transpose()?;
        let on_collision = match self.on_collision.as_deref() {
            Some(value) => value.parse()?,
            None => file.on_collision.unwrap_or_default(),
        };
        let ignore = if self.ignore.is_empty() {
            file.ignore_policy()
        } else {
            IgnorePolicy::new(self.ignore)
        };

        let mut config = BuilderConfig::new(self.workspace, repo, self.target, self.title, self.body);
        config.branch = BranchNaming::from_option(self.commit_branch.as_deref());
        config.token = token;
        config.author = AuthorConfig {
            name: self.name,
            email: self.email,
        };
        config.signoff = self.signoff;
        config.fork_owner = self.fork_owner.or(file.fork_owner);
        config.host = self.host.or(file.host);
        config.push_url = self.push_url;
        config.ignore = ignore;
        config.on_collision = on_collision;
        config.dry_run = self.dry_run;
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,pr_builder={level},prbuilder={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = load_file_config(cli.config.as_deref()).context("failed to load configuration")?;
    let config = cli.into_config(file).context("invalid options")?;
    cli::run_build(config)
        .await
        .context("failed to run pr builder")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("{} {e:#}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
