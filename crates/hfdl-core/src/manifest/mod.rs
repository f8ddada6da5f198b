//! Dataset manifest listing over the repository API.
//!
//! `GET {base}/api/datasets/{id}` returns repository metadata whose
//! `siblings` array carries one entry per file. Each entry is mapped to a
//! [`FileDescriptor`] with a fully resolved `/resolve/main/` download URL.
//! Any failure here is fatal: the job aborts before a single download starts.

mod parse;

use crate::job::FileDescriptor;
use std::time::Duration;
use url::Url;

pub use parse::{RepoInfo, RepoSibling};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fatal listing failure. Nothing is downloaded when one of these occurs.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("dataset '{0}' not found (check the id, or pass a token for private datasets)")]
    NotFound(String),
    #[error("dataset '{dataset}' is gated or private (HTTP {status}); pass --token to authenticate")]
    AccessDenied { dataset: String, status: u32 },
    #[error("manifest request for '{dataset}' returned HTTP {status}")]
    Http { dataset: String, status: u32 },
    #[error("manifest request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("manifest response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base URL '{0}'")]
    BadBase(String),
}

/// Lists all files in a dataset repository as download descriptors.
///
/// Dotfiles (entries whose filename starts with `.`, e.g. `.gitattributes`)
/// are skipped. Entry order follows the API response.
pub fn list_dataset_files(
    api_base: &str,
    dataset: &str,
    token: Option<&str>,
) -> Result<Vec<FileDescriptor>, ManifestError> {
    let base = parse_base(api_base)?;
    let manifest_url = api_url(&base, dataset);

    let (status, body) = http_get(&manifest_url, token)?;
    if status == 404 {
        return Err(ManifestError::NotFound(dataset.to_string()));
    }
    if status == 401 || status == 403 {
        return Err(ManifestError::AccessDenied {
            dataset: dataset.to_string(),
            status,
        });
    }
    if status < 200 || status >= 300 {
        return Err(ManifestError::Http {
            dataset: dataset.to_string(),
            status,
        });
    }

    let info: RepoInfo = serde_json::from_slice(&body)?;
    Ok(info
        .siblings
        .into_iter()
        .filter(|s| !s.rfilename.starts_with('.'))
        .map(|s| FileDescriptor {
            source_url: resolve_url(&base, dataset, &s.rfilename),
            relative_path: s.rfilename,
        })
        .collect())
}

fn parse_base(api_base: &str) -> Result<Url, ManifestError> {
    let base =
        Url::parse(api_base).map_err(|e| ManifestError::BadBase(format!("{}: {}", api_base, e)))?;
    if base.cannot_be_a_base() {
        return Err(ManifestError::BadBase(api_base.to_string()));
    }
    Ok(base)
}

/// `{base}/api/datasets/{dataset}` with path-segment escaping.
fn api_url(base: &Url, dataset: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.push("api");
        segments.push("datasets");
        segments.extend(dataset.split('/'));
    }
    url.to_string()
}

/// `{base}/datasets/{dataset}/resolve/main/{rfilename}` with path-segment
/// escaping. Slashes in `rfilename` are real separators, so it is pushed
/// segment by segment rather than as one escaped blob.
fn resolve_url(base: &Url, dataset: &str, rfilename: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.push("datasets");
        segments.extend(dataset.split('/'));
        segments.push("resolve");
        segments.push("main");
        segments.extend(rfilename.split('/'));
    }
    url.to_string()
}

/// GET `url`, collecting status and full body. Non-2xx is not an error at
/// this layer; the caller maps the status.
fn http_get(url: &str, token: Option<&str>) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    easy.timeout(REQUEST_TIMEOUT)?;

    if let Some(token) = token {
        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: Bearer {}", token))?;
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok((status, body))
}
