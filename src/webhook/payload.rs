//! Post-commit payloads sent by source-control providers.
use serde_derive::Deserialize;

/// Prefix of branch refs in GitHub push events.
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Host prepended to Bitbucket's host-relative repository URLs.
const BITBUCKET_HOST: &str = "bitbucket.org";

/// Repository section of a GitHub push event.
#[derive(Debug, Deserialize)]
pub struct GithubRepository {
    /// Repository name.
    pub name: String,
    /// Web URL of the repository.
    pub url: String,
}

/// GitHub push event.
#[derive(Debug, Deserialize)]
pub struct GithubPayload {
    /// Pushed repository.
    pub repository: GithubRepository,
    /// Pushed ref, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl GithubPayload {
    /// Repository URL without its scheme, for matching against project repos.
    #[must_use]
    pub fn normalized_url(&self) -> String {
        strip_scheme(&self.repository.url)
    }

    /// Pushed branch name.
    #[must_use]
    pub fn branch(&self) -> &str {
        self.git_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .unwrap_or(&self.git_ref)
    }
}

/// Repository section of a Bitbucket post-commit hook.
#[derive(Debug, Deserialize)]
pub struct BitbucketRepository {
    /// Repository name.
    pub name: String,
    /// Host-relative URL of the repository, e.g. `/owner/repo/`.
    pub absolute_url: String,
}

/// Bitbucket post-commit hook.
#[derive(Debug, Deserialize)]
pub struct BitbucketPayload {
    /// Pushed repository.
    pub repository: BitbucketRepository,
}

impl BitbucketPayload {
    /// Repository URL without a scheme, for matching against project repos.
    #[must_use]
    pub fn normalized_url(&self) -> String {
        format!(
            "{BITBUCKET_HOST}{}",
            self.repository.absolute_url.trim_end_matches('/')
        )
    }
}

/// Remove a leading `http://` or `https://`.
fn strip_scheme(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .to_owned()
}
