//! GitHub release metadata.
//!
//! Only the fields this tool consumes are modeled. The `releases/latest`
//! endpoint returns a single release object; version discovery is the
//! `tag_name` field and nothing else. If it is absent the install fails,
//! with no retry and no fallback source.

use serde::Deserialize;

use crate::error::{Error, Result};

/// A published release.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g. "v0.44.1").
    pub tag_name: String,
    /// Display name, when set.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the release is marked as a prerelease.
    #[serde(default)]
    pub prerelease: bool,
    /// Downloadable assets.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable asset of a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset file name.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Version without a leading `v` (lazygit tags `v0.44.1`, assets use
    /// `0.44.1`).
    #[must_use]
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }

    /// Find an asset by exact file name.
    #[must_use]
    pub fn find_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// API URL for the latest release of `owner/repo`.
#[must_use]
pub fn latest_release_url(repo: &str) -> String {
    format!("https://api.github.com/repos/{repo}/releases/latest")
}

/// Parse a `releases/latest` API response.
pub fn parse_release(body: &[u8]) -> Result<Release> {
    // Deserialize through Value first so a missing tag_name is reported as
    // the field scrape failing, not as an opaque serde error.
    let value: serde_json::Value = serde_json::from_slice(body)?;

    if value.get("tag_name").and_then(|t| t.as_str()).is_none() {
        return Err(Error::MissingField { field: "tag_name" });
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tag_name": "v0.44.1",
        "name": "v0.44.1",
        "prerelease": false,
        "assets": [
            {
                "name": "lazygit_0.44.1_Linux_x86_64.tar.gz",
                "browser_download_url": "https://github.com/jesseduffield/lazygit/releases/download/v0.44.1/lazygit_0.44.1_Linux_x86_64.tar.gz",
                "size": 1024
            },
            {
                "name": "lazygit_0.44.1_Linux_arm64.tar.gz",
                "browser_download_url": "https://github.com/jesseduffield/lazygit/releases/download/v0.44.1/lazygit_0.44.1_Linux_arm64.tar.gz",
                "size": 1000
            }
        ]
    }"#;

    #[test]
    fn parses_latest_release() {
        let release = parse_release(SAMPLE.as_bytes()).unwrap();
        assert_eq!(release.tag_name, "v0.44.1");
        assert_eq!(release.version(), "0.44.1");
        assert_eq!(release.assets.len(), 2);
    }

    #[test]
    fn version_without_v_prefix() {
        let release = parse_release(br#"{"tag_name": "2024-01-15"}"#).unwrap();
        assert_eq!(release.version(), "2024-01-15");
    }

    #[test]
    fn missing_tag_name_is_fatal() {
        let err = parse_release(br#"{"message": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "tag_name" }));
    }

    #[test]
    fn invalid_json_is_fatal() {
        assert!(parse_release(b"<html>rate limited</html>").is_err());
    }

    #[test]
    fn find_asset_by_name() {
        let release = parse_release(SAMPLE.as_bytes()).unwrap();
        let asset = release
            .find_asset("lazygit_0.44.1_Linux_x86_64.tar.gz")
            .unwrap();
        assert!(asset.download_url.contains("/releases/download/v0.44.1/"));
        assert!(release.find_asset("lazygit_0.44.1_Darwin_arm64.tar.gz").is_none());
    }

    #[test]
    fn latest_url() {
        assert_eq!(
            latest_release_url("jesseduffield/lazygit"),
            "https://api.github.com/repos/jesseduffield/lazygit/releases/latest"
        );
    }
}
