//! Stale PR cleanup
//!
//! Closes open PRs left behind by earlier runs, recognized by their
//! provenance signature.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::signature::Signature;
use tracing::{debug, info, warn};

/// What the cleaner did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Open PRs inspected, across all pages
    pub scanned: usize,
    /// PRs carrying the signature (closed unless this was a dry run)
    pub matched: Vec<u64>,
    /// Whether listing reported the repository as missing
    pub repository_missing: bool,
}

/// Close every open PR against `base` whose body carries `signature`.
///
/// Walks all pages until the platform reports no further page, then closes
/// the matches. A missing repository means there is nothing to clean. With
/// `dry_run`, matches are reported but left open.
pub async fn close_stale_prs(
    platform: &dyn PlatformService,
    base: &str,
    signature: &Signature,
    dry_run: bool,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();
    let mut page = 1;

    loop {
        let listed = match platform.list_open_prs(base, page).await {
            Ok(listed) => listed,
            Err(Error::RepositoryNotFound(slug)) => {
                warn!(repository = %slug, "repository not found, nothing to clean up");
                report.repository_missing = true;
                return Ok(report);
            }
            Err(e) => return Err(e),
        };

        report.scanned += listed.items.len();
        for pr in &listed.items {
            let Some(body) = pr.body.as_deref() else {
                continue;
            };
            if !signature.is_in(body) || report.matched.contains(&pr.number) {
                continue;
            }
            report.matched.push(pr.number);
        }

        match listed.next_page {
            Some(next) => page = next,
            None => break,
        }
    }

    // Closing shifts later PRs onto earlier pages of the open list, so close
    // only once every page has been read.
    for &number in &report.matched {
        if dry_run {
            info!(number, "would close stale PR");
        } else {
            platform.close_pr(number).await?;
            info!(number, "closed stale PR");
        }
    }

    debug!(
        scanned = report.scanned,
        matched = report.matched.len(),
        "stale PR cleanup complete"
    );
    Ok(report)
}
