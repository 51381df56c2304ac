//! Resolve the build number of the currently published "latest" image
//!
//! Looks up the digest the branch's alias tag points at, then walks the
//! image's tag list backwards until a versioned build tag carries the same
//! digest. Prints the bare build number on stdout so the surrounding
//! pipeline can capture it.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::build_tag;
use crate::error::RegistryError;
use crate::infrastructure::registry::{
    find_matching_build_number, ManifestSource, RegistryClient, RegistryCredentials,
};

/// Resolve the digest behind the upstream alias tag.
/// A manifest without a config digest is an error here - the alias is the
/// reference point for the whole resolution.
async fn resolve_upstream_digest<S: ManifestSource>(
    source: &S,
    image: &str,
    tag: &str,
) -> Result<String, RegistryError> {
    source
        .config_digest(image, tag)
        .await?
        .ok_or_else(|| RegistryError::MissingDigest {
            image: image.to_string(),
            tag: tag.to_string(),
        })
}

pub async fn execute(
    registry: String,
    branch: String,
    container: String,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut client = RegistryClient::new(registry);
    if let (Some(user), Some(pass)) = (username, password) {
        client = client.with_credentials(RegistryCredentials::new(user, pass));
    }

    let upstream_tag = build_tag::upstream_alias(&branch);
    debug!("Branch {} tracks alias tag {}", branch, upstream_tag);

    let latest_digest = resolve_upstream_digest(&client, &container, &upstream_tag)
        .await
        .with_context(|| {
            format!(
                "Error during looking up the latest public image {}:{}",
                container, upstream_tag
            )
        })?;

    let tags = client.tag_list(&container).await?;
    debug!("Registry lists {} tag(s) for {}", tags.len(), container);

    let number = find_matching_build_number(&client, &container, &tags, &latest_digest).await?;

    info!("Latest published build for {} is {}", branch, number);
    println!("{}", number);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Manifest source with a single known tag
    struct SingleTag {
        tag: &'static str,
        digest: Option<&'static str>,
    }

    impl ManifestSource for SingleTag {
        async fn config_digest(
            &self,
            _image: &str,
            tag: &str,
        ) -> Result<Option<String>, RegistryError> {
            if tag == self.tag {
                Ok(self.digest.map(String::from))
            } else {
                Ok(None)
            }
        }
    }

    #[test]
    fn test_resolve_upstream_digest() {
        let source = SingleTag {
            tag: "latest",
            digest: Some("sha256:aaa"),
        };
        let digest =
            tokio_test::block_on(resolve_upstream_digest(&source, "app", "latest")).unwrap();
        assert_eq!(digest, "sha256:aaa");
    }

    #[test]
    fn test_resolve_upstream_digest_missing_field() {
        let source = SingleTag {
            tag: "latest",
            digest: None,
        };
        let err =
            tokio_test::block_on(resolve_upstream_digest(&source, "app", "latest")).unwrap_err();
        assert!(matches!(err, RegistryError::MissingDigest { .. }));
    }
}
