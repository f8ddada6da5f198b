//! Minimal repository-info structures for the dataset API response.

use serde::Deserialize;

/// Repository metadata; only the file list is needed here.
#[derive(Debug, Deserialize)]
pub struct RepoInfo {
    #[serde(default)]
    pub siblings: Vec<RepoSibling>,
}

/// One file entry in the repository manifest.
#[derive(Debug, Deserialize)]
pub struct RepoSibling {
    pub rfilename: String,
}
