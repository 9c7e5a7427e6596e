//! Build command - turn workspace changes into a PR

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, hyperlink};
use anstream::println;
use pr_builder::PrBuilder;
use pr_builder::config::BuilderConfig;
use pr_builder::error::Result;
use pr_builder::types::{Outcome, RunReport};

/// Run the builder and print a summary
#[allow(clippy::future_not_send)]
pub async fn run_build(config: BuilderConfig) -> Result<()> {
    let mut ctx = CommandContext::new(&config)?;
    let dry_run = config.dry_run;

    println!(
        "{} {} {}",
        "Building PR for".emphasis(),
        config.repo.accent(),
        format!("(base: {})", config.base_branch).muted()
    );

    let builder = PrBuilder::new(
        config,
        &mut ctx.workspace,
        ctx.platform.as_ref(),
        &ctx.credentials,
    );
    let report = builder.run().await?;

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    for number in &report.closed_prs {
        if dry_run {
            println!("  {} stale PR #{number}", "Would close".muted());
        } else {
            println!("{} Closed stale PR #{number}", check());
        }
    }

    match &report.outcome {
        Outcome::NoChanges => println!("{}", "No changes".muted()),
        Outcome::IgnoredOnly { paths } => {
            println!("{}", "Only ignorable files changed (skipping PR)".muted());
            for path in paths {
                println!("  {}", path.muted());
            }
        }
        Outcome::DryRun { branch, paths } => {
            println!(
                "{} would commit {} file(s) to branch {}",
                "Dry run:".emphasis(),
                paths.len().accent(),
                branch.accent()
            );
            for path in paths {
                println!("  {path}");
            }
        }
        Outcome::Created(pr) => {
            let label = format!("#{}", pr.number);
            println!(
                "{} Created PR {}: {}",
                check(),
                hyperlink(&label, &pr.html_url).accent(),
                pr.html_url.muted()
            );
        }
    }
}
