//! Mock platform service for testing

use async_trait::async_trait;
use pr_builder::error::{Error, Result};
use pr_builder::platform::PlatformService;
use pr_builder::types::{
    PlatformConfig, PrPage, PullRequest, PullRequestSpec, RemotePullRequest,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `list_open_prs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub base: String,
    pub page: u32,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Open PRs served in configurable pages, recomputed on every call the way
///   GitHub does: closing a PR shifts the ones after it to earlier pages
/// - Auto-incrementing PR numbers for created PRs
/// - Call tracking, including the order of mutating calls
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    login: String,
    next_pr_number: AtomicU64,
    open_prs: Mutex<Vec<RemotePullRequest>>,
    page_size: Mutex<usize>,
    repository_missing: Mutex<bool>,
    // Call tracking
    list_calls: Mutex<Vec<ListCall>>,
    close_calls: Mutex<Vec<u64>>,
    create_pr_calls: Mutex<Vec<PullRequestSpec>>,
    current_user_calls: Mutex<usize>,
    events: Mutex<Vec<String>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_close: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            login: "bot".to_string(),
            next_pr_number: AtomicU64::new(100),
            open_prs: Mutex::new(Vec::new()),
            page_size: Mutex::new(100),
            repository_missing: Mutex::new(false),
            list_calls: Mutex::new(Vec::new()),
            close_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            current_user_calls: Mutex::new(0),
            events: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_close: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
        }
    }

    /// Serve `prs` split into pages of `page_size`
    pub fn set_open_prs(&self, prs: Vec<RemotePullRequest>, page_size: usize) {
        *self.open_prs.lock().unwrap() = prs;
        *self.page_size.lock().unwrap() = page_size.max(1);
    }

    /// Make listing report the repository as missing
    pub fn set_repository_missing(&self) {
        *self.repository_missing.lock().unwrap() = true;
    }

    // === Error injection methods ===

    /// Make `list_open_prs` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `close_pr` return an error
    pub fn fail_close(&self, msg: &str) {
        *self.error_on_close.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_close_calls(&self) -> Vec<u64> {
        self.close_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<PullRequestSpec> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn current_user_call_count(&self) -> usize {
        *self.current_user_calls.lock().unwrap()
    }

    /// Mutating calls in order, e.g. `["close #42", "create bot:branch"]`
    pub fn get_events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// PRs still open after the run
    pub fn open_pr_numbers(&self) -> Vec<u64> {
        self.open_prs
            .lock()
            .unwrap()
            .iter()
            .map(|pr| pr.number)
            .collect()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<PrPage> {
        self.list_calls.lock().unwrap().push(ListCall {
            base: base.to_string(),
            page,
        });

        if *self.repository_missing.lock().unwrap() {
            return Err(Error::RepositoryNotFound(format!(
                "{}/{}",
                self.config.owner, self.config.repo
            )));
        }
        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let open = self.open_prs.lock().unwrap();
        let page_size = *self.page_size.lock().unwrap();
        let start = (usize::try_from(page).unwrap() - 1) * page_size;
        let end = (start + page_size).min(open.len());
        let items = open.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_page = (end < open.len()).then_some(page + 1);
        Ok(PrPage { items, next_page })
    }

    async fn close_pr(&self, number: u64) -> Result<()> {
        self.close_calls.lock().unwrap().push(number);
        if let Some(msg) = self.error_on_close.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        self.events.lock().unwrap().push(format!("close #{number}"));
        // Closed PRs drop out of the open list immediately
        self.open_prs.lock().unwrap().retain(|pr| pr.number != number);
        Ok(())
    }

    async fn create_pr(&self, spec: &PullRequestSpec) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(spec.clone());
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("create {}", spec.head));

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            base_ref: spec.base.clone(),
            head_ref: spec.head.clone(),
            title: spec.title.clone(),
        })
    }

    async fn current_user(&self) -> Result<String> {
        *self.current_user_calls.lock().unwrap() += 1;
        Ok(self.login.clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
