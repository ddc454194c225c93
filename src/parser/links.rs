//! Canonical link construction for validated references.

use serde::Serialize;
use tracing::debug;

use super::validate::ValidationResult;
use crate::policy::LinkPolicy;

/// The three equivalent links for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSet {
    /// Custom-scheme deep link handled by the F-Droid client
    pub repo_link: String,
    /// Plain web address of the repository
    pub http_address: String,
    /// Universal link embedding `http_address` in its fragment
    pub share_link: String,
}

/// Encoded pieces shared by every link template.
struct LinkParts {
    authority_path: String,
    suffix: String,
}

impl LinkParts {
    fn new(result: &ValidationResult) -> Self {
        // The path was serialized by the URL parser and is already encoded.
        let authority_path = result.repo_authority_path.clone();
        let suffix = result
            .fingerprint
            .as_deref()
            .map(|fingerprint| format!("?fingerprint={}", urlencoding::encode(fingerprint)))
            .unwrap_or_default();
        Self {
            authority_path,
            suffix,
        }
    }
}

/// Builds the link set for a result without fatal errors.
///
/// Returns `None` when the result carries errors.
#[tracing::instrument(skip(result, policy), fields(authority_path = %result.repo_authority_path))]
#[must_use]
pub fn build_links(result: &ValidationResult, policy: &LinkPolicy) -> Option<LinkSet> {
    if !result.is_usable() {
        return None;
    }

    let LinkParts {
        authority_path,
        suffix,
    } = LinkParts::new(result);

    let custom_scheme = policy.custom_scheme_for(result.scheme);
    let repo_link = format!("{custom_scheme}://{authority_path}{suffix}");
    let http_address = format!("{}://{authority_path}{suffix}", result.scheme);
    let share_link = format!("https://{}/#{http_address}", policy.share_host);

    debug!(%repo_link, %http_address, "links built");
    Some(LinkSet {
        repo_link,
        http_address,
        share_link,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::normalize::normalize;
    use super::super::validate::validate;
    use super::*;
    use crate::policy::OFFICIAL_FINGERPRINT;

    fn links_for(reference: &str) -> Option<LinkSet> {
        let policy = LinkPolicy::default();
        let result = validate(&normalize(reference, &policy).unwrap(), &policy);
        build_links(&result, &policy)
    }

    #[test]
    fn test_build_links_with_fingerprint() {
        let links = links_for(&format!(
            "https://f-droid.org/repo?fingerprint={OFFICIAL_FINGERPRINT}"
        ))
        .unwrap();
        assert_eq!(
            links.repo_link,
            format!("fdroidrepos://f-droid.org/repo?fingerprint={OFFICIAL_FINGERPRINT}")
        );
        assert_eq!(
            links.http_address,
            format!("https://f-droid.org/repo?fingerprint={OFFICIAL_FINGERPRINT}")
        );
        assert_eq!(
            links.share_link,
            format!("https://fdroid.link/#https://f-droid.org/repo?fingerprint={OFFICIAL_FINGERPRINT}")
        );
    }

    #[test]
    fn test_build_links_without_fingerprint_has_no_suffix() {
        let links = links_for("example.com/fdroid/repo").unwrap();
        assert_eq!(links.repo_link, "fdroidrepos://example.com/fdroid/repo");
        assert_eq!(links.http_address, "https://example.com/fdroid/repo");
        assert!(!links.share_link.ends_with('?'));
        assert!(!links.share_link.ends_with('&'));
    }

    #[test]
    fn test_build_links_insecure_uses_insecure_custom_scheme() {
        let links = links_for("http://example.com/fdroid/repo").unwrap();
        assert_eq!(links.repo_link, "fdroidrepo://example.com/fdroid/repo");
        assert_eq!(links.http_address, "http://example.com/fdroid/repo");
        assert_eq!(
            links.share_link,
            "https://fdroid.link/#http://example.com/fdroid/repo"
        );
    }

    #[test]
    fn test_build_links_encodes_consistently() {
        let links = links_for("example.com/my repo/fdroid/repo?fingerprint=a%26b").unwrap();
        assert_eq!(
            links.repo_link,
            "fdroidrepos://example.com/my%20repo/fdroid/repo?fingerprint=a%26b"
        );
        assert!(links.http_address.ends_with("/my%20repo/fdroid/repo?fingerprint=a%26b"));
        assert!(links.share_link.ends_with(&links.http_address));
    }

    #[test]
    fn test_build_links_escapes_markup_in_fingerprint() {
        let links = links_for("example.com/fdroid/repo?fingerprint=%3Cscript%3E").unwrap();
        assert!(!links.repo_link.contains('<'));
        assert!(links.repo_link.ends_with("?fingerprint=%3Cscript%3E"));
    }

    #[test]
    fn test_build_links_none_on_errors() {
        assert!(links_for("example.com/fdroid/repo?x=1").is_none());
    }

    #[test]
    fn test_build_links_uses_policy_share_host() {
        let policy = LinkPolicy {
            share_host: "links.example.org".to_string(),
            ..LinkPolicy::default()
        };
        let result = validate(&normalize("example.com/fdroid/repo", &policy).unwrap(), &policy);
        let links = build_links(&result, &policy).unwrap();
        assert_eq!(
            links.share_link,
            "https://links.example.org/#https://example.com/fdroid/repo"
        );
    }
}
