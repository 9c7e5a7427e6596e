//! Provenance signatures embedded in PR bodies
//!
//! A signature is an HTML comment appended to the body, so it is invisible in
//! the rendered PR but lets later runs find the PRs they opened.

use crate::error::{Error, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

const MARKER_PREFIX: &str = "<!-- prbuilder:signature ";
const MARKER_SUFFIX: &str = " -->";

/// Length of the hex digest kept for title-derived tokens
const TITLE_DIGEST_LEN: usize = 12;

/// Tokens never contain whitespace or `>`, so a marker always ends at the
/// first ` -->` after the prefix.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._:@+=/-]+$").expect("token pattern is a valid regex")
});

/// A validated provenance token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Validate a caller-supplied token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Config("provenance token must not be empty".to_string()));
        }
        if !TOKEN_PATTERN.is_match(&token) {
            return Err(Error::Config(format!(
                "provenance token '{token}' may only contain letters, digits and . _ : @ + = / -"
            )));
        }
        Ok(Self(token))
    }

    /// Derive a token from a PR title
    pub fn from_title(title: &str) -> Self {
        let digest = hex::encode(Sha256::digest(title.as_bytes()));
        Self(format!("title-{}", &digest[..TITLE_DIGEST_LEN]))
    }

    /// The raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker embedded in signed bodies
    pub fn marker(&self) -> String {
        format!("{MARKER_PREFIX}{}{MARKER_SUFFIX}", self.0)
    }

    /// Append this signature to `body`
    pub fn sign(&self, body: &str) -> String {
        sign(self, body)
    }

    /// Whether `body` carries this signature
    pub fn is_in(&self, body: &str) -> bool {
        has_signature(self, body)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append the marker for `signature` to `body`.
///
/// The original body is kept intact as a prefix of the result.
pub fn sign(signature: &Signature, body: &str) -> String {
    let marker = signature.marker();
    if body.is_empty() {
        marker
    } else if body.ends_with('\n') {
        format!("{body}\n{marker}")
    } else {
        format!("{body}\n\n{marker}")
    }
}

/// Whether `body` contains the marker for `signature`
pub fn has_signature(signature: &Signature, body: &str) -> bool {
    body.contains(&signature.marker())
}
