//! Container registry operations
//!
//! Talks to the registry v2 HTTP API directly: manifest lookups for config
//! digests and the tag list endpoint. Requests are plain `http://` unless
//! basic-auth credentials are supplied, in which case the registry is
//! assumed to sit behind TLS.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::domain::build_tag;
use crate::error::RegistryError;

const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Basic-auth credentials for a registry
#[derive(Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

impl RegistryCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// v2 manifest body, reduced to the one field we read.
/// Both levels default to `None` so a manifest without a config section
/// parses as "no digest" instead of failing.
#[derive(Debug, Deserialize)]
struct ManifestResponse {
    #[serde(default)]
    config: Option<ManifestConfig>,
}

#[derive(Debug, Deserialize)]
struct ManifestConfig {
    #[serde(default)]
    digest: Option<String>,
}

/// v2 tag list body; the registry reports `null` for an image with no tags
#[derive(Debug, Deserialize)]
struct TagListResponse {
    tags: Option<Vec<String>>,
}

/// Source of manifest config digests.
///
/// Tag matching only needs digest lookups, so it takes this narrow trait
/// instead of the full client and can run against an in-memory fake in tests.
#[allow(async_fn_in_trait)]
pub trait ManifestSource {
    async fn config_digest(&self, image: &str, tag: &str)
        -> Result<Option<String>, RegistryError>;
}

/// Client for registry v2 API lookups
pub struct RegistryClient {
    http: reqwest::Client,
    registry: String,
    credentials: Option<RegistryCredentials>,
}

impl RegistryClient {
    /// Create a client for a registry address given without a scheme
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            registry: registry.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials (switches requests to https)
    pub fn with_credentials(mut self, credentials: RegistryCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn base_url(&self) -> String {
        let scheme = if self.credentials.is_some() {
            "https"
        } else {
            "http"
        };
        format!("{}://{}", scheme, self.registry)
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let mut request = self.http.get(url);
        if let Some(ref creds) = self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        request
    }

    /// List an image's tags in the order the registry publishes them.
    /// No additional sorting is imposed.
    pub async fn tag_list(&self, image: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v2/{}/tags/list", self.base_url(), image);
        debug!("Fetching tag list: {}", url);

        let body: TagListResponse = self
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::TagList {
                image: image.to_string(),
                message: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| RegistryError::TagList {
                image: image.to_string(),
                message: e.to_string(),
            })?;

        Ok(body.tags.unwrap_or_default())
    }
}

impl ManifestSource for RegistryClient {
    /// Fetch the config digest for an image tag via a v2 manifest lookup.
    /// Returns `Ok(None)` when the manifest has no `config.digest` field.
    async fn config_digest(
        &self,
        image: &str,
        tag: &str,
    ) -> Result<Option<String>, RegistryError> {
        let url = format!("{}/v2/{}/manifests/{}", self.base_url(), image, tag);
        debug!("Fetching manifest: {}", url);

        let body: ManifestResponse = self
            .get(url)
            .header(ACCEPT, MANIFEST_V2_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| RegistryError::ManifestRequest {
                image: image.to_string(),
                tag: tag.to_string(),
                message: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| RegistryError::ManifestRequest {
                image: image.to_string(),
                tag: tag.to_string(),
                message: e.to_string(),
            })?;

        Ok(body.config.and_then(|c| c.digest))
    }
}

/// Find the build number published under the same digest as the upstream alias.
///
/// Iterates tags last-listed-first: several tags alias the same digest and
/// the most recently listed versioned build tag is the one we want. Tags
/// whose manifest has no digest can never match and are skipped.
pub async fn find_matching_build_number<S: ManifestSource>(
    source: &S,
    container: &str,
    tags: &[String],
    target_digest: &str,
) -> Result<String, RegistryError> {
    for tag in tags.iter().rev() {
        let digest = source.config_digest(container, tag).await?;
        if digest.as_deref() == Some(target_digest) {
            if let Some(number) = build_tag::build_number(tag) {
                debug!("Tag {} carries the latest digest", tag);
                return Ok(number.to_string());
            }
        }
    }

    Err(RegistryError::NoMatch {
        container: container.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory manifest source keyed by tag
    struct FakeRegistry {
        digests: HashMap<String, Option<String>>,
    }

    impl FakeRegistry {
        fn new(entries: &[(&str, Option<&str>)]) -> Self {
            Self {
                digests: entries
                    .iter()
                    .map(|&(tag, digest)| (tag.to_string(), digest.map(String::from)))
                    .collect(),
            }
        }
    }

    impl ManifestSource for FakeRegistry {
        async fn config_digest(
            &self,
            _image: &str,
            tag: &str,
        ) -> Result<Option<String>, RegistryError> {
            Ok(self.digests.get(tag).cloned().flatten())
        }
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_last_listed_build_tag_wins() {
        let fake = FakeRegistry::new(&[
            ("5.1-41", Some("sha256:aaa")),
            ("5.1-42", Some("sha256:aaa")),
        ]);
        let number = tokio_test::block_on(find_matching_build_number(
            &fake,
            "app",
            &tags(&["5.1-41", "5.1-42"]),
            "sha256:aaa",
        ))
        .unwrap();
        assert_eq!(number, "42");
    }

    #[test]
    fn test_alias_tags_sharing_the_digest_are_skipped() {
        // 5.1-latest is listed after the build tag and aliases the same
        // digest, but it is not a versioned build tag.
        let fake = FakeRegistry::new(&[
            ("5.1-42", Some("sha256:aaa")),
            ("5.1-latest", Some("sha256:aaa")),
        ]);
        let number = tokio_test::block_on(find_matching_build_number(
            &fake,
            "app",
            &tags(&["5.1-42", "5.1-latest"]),
            "sha256:aaa",
        ))
        .unwrap();
        assert_eq!(number, "42");
    }

    #[test]
    fn test_digest_mismatch_reports_no_match() {
        let fake = FakeRegistry::new(&[("5.1-42", Some("sha256:bbb"))]);
        let err = tokio_test::block_on(find_matching_build_number(
            &fake,
            "app",
            &tags(&["5.1-42"]),
            "sha256:aaa",
        ))
        .unwrap_err();
        assert!(matches!(err, RegistryError::NoMatch { .. }));
    }

    #[test]
    fn test_manifest_without_digest_never_matches() {
        let fake = FakeRegistry::new(&[("master-7", None)]);
        let err = tokio_test::block_on(find_matching_build_number(
            &fake,
            "app",
            &tags(&["master-7"]),
            "sha256:aaa",
        ))
        .unwrap_err();
        assert!(matches!(err, RegistryError::NoMatch { .. }));
    }

    #[test]
    fn test_empty_tag_list_reports_no_match() {
        let fake = FakeRegistry::new(&[]);
        let err =
            tokio_test::block_on(find_matching_build_number(&fake, "app", &[], "sha256:aaa"))
                .unwrap_err();
        assert!(matches!(err, RegistryError::NoMatch { .. }));
    }

    #[test]
    fn test_tag_list_null_parses_to_empty() {
        let body: TagListResponse = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(body.tags.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_manifest_without_config_parses_to_none() {
        let body: ManifestResponse = serde_json::from_str(r#"{"schemaVersion": 2}"#).unwrap();
        assert!(body.config.and_then(|c| c.digest).is_none());
    }
}
