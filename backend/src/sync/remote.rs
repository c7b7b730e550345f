use super::{FetchError, RemoteFileRef};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("countries-api/", env!("CARGO_PKG_VERSION"));
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Read-only access to files in a hosted repository.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Human-readable label for log lines.
    fn label(&self) -> &str;

    /// Return the full contents of the referenced file.
    async fn fetch(&self, file: &RemoteFileRef) -> Result<Vec<u8>, FetchError>;
}

/// [`RemoteSource`] backed by the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: Client,
    api_url: String,
    git_ref: Option<String>,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(api_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            git_ref: None,
            token: None,
        })
    }

    /// Read from a branch, tag or commit instead of the default branch.
    pub fn with_ref(mut self, git_ref: Option<String>) -> Self {
        self.git_ref = git_ref;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn contents_url(&self, file: &RemoteFileRef) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            file.owner,
            file.repo,
            file.path.trim_start_matches('/')
        );
        if let Some(git_ref) = &self.git_ref {
            url.push_str("?ref=");
            url.push_str(git_ref);
        }
        url
    }
}

#[async_trait]
impl RemoteSource for GithubSource {
    fn label(&self) -> &str {
        &self.api_url
    }

    async fn fetch(&self, file: &RemoteFileRef) -> Result<Vec<u8>, FetchError> {
        let url = self.contents_url(file);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(convert_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RemoteFetch {
                status: Some(status.as_u16()),
                message: format!("{} answered {}", url, status),
            });
        }

        let body = response.bytes().await.map_err(convert_reqwest_error)?;
        Ok(body.to_vec())
    }
}

fn convert_reqwest_error(err: reqwest::Error) -> FetchError {
    FetchError::RemoteFetch {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
