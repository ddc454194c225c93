//! Integration tests for the reference pipeline.
//!
//! These tests drive the public API end to end: location in, render result out.

use fdroid_link_core::parser::{ErrorKind, InfoKind, WarningKind};
use fdroid_link_core::render::CollectingPresenter;
use fdroid_link_core::{
    InputConvention, LinkOutcome, LinkPolicy, Presenter, RenderResult, Scheme, Trust,
    ValidationResult, parse_location, parse_reference,
};

const OFFICIAL: &str = "43238D512C1E5EB2D6569F4A3AFBF5523418B82E0A3ED1552770ABB9A9C9CCAB";

fn validated(reference: &str) -> ValidationResult {
    match parse_reference(reference, &LinkPolicy::default()) {
        LinkOutcome::Validated { result, .. } => result,
        other => panic!("expected validation for {reference}, got {other:?}"),
    }
}

fn rendered(reference: &str) -> RenderResult {
    RenderResult::from(&parse_reference(reference, &LinkPolicy::default()))
}

// ==================== Scenarios ====================

#[test]
fn test_official_repository_scenario() {
    let reference = format!("https://f-droid.org/repo?fingerprint={OFFICIAL}");
    let result = validated(&reference);
    assert!(result.errors.is_empty());
    assert_eq!(result.trust, Some(Trust::Official));

    let render = rendered(&reference);
    let links = render.links.expect("links for official repo");
    assert_eq!(
        links.http_address,
        format!("https://f-droid.org/repo?fingerprint={OFFICIAL}")
    );
}

#[test]
fn test_verified_mirror_scenario() {
    let result = validated(&format!(
        "https://mirror.example.com/fdroid/repo?fingerprint={OFFICIAL}"
    ));
    assert_eq!(result.trust, Some(Trust::OfficialMirror));
    assert_eq!(result.info_notices, vec![InfoKind::VerifiedMirror]);

    let render = rendered(&format!(
        "https://mirror.example.com/fdroid/repo?fingerprint={OFFICIAL}"
    ));
    assert!(render.info_notices[0].contains("verified mirror"));
}

#[test]
fn test_malformed_fingerprint_is_advisory_scenario() {
    let result = validated("https://example.com/somewhere?fingerprint=zzz");
    assert!(result.errors.is_empty());
    assert!(result.warnings.contains(&WarningKind::FingerprintMalformed));
    assert!(result.warnings.contains(&WarningKind::PathShapeUnrecognized));

    let render = rendered("https://example.com/somewhere?fingerprint=zzz");
    assert!(render.links.is_some());
}

#[test]
fn test_unsupported_parameter_scenario() {
    let result = validated("https://example.com/fdroid/repo?x=1&fingerprint=1");
    assert!(
        result
            .errors
            .contains(&ErrorKind::UnsupportedParameter("x".to_string()))
    );
    assert!(rendered("https://example.com/fdroid/repo?x=1&fingerprint=1").links.is_none());
}

#[test]
fn test_empty_input_scenario() {
    let policy = LinkPolicy::default();
    assert_eq!(parse_reference("", &policy), LinkOutcome::NoInput);
    assert_eq!(parse_location("https://fdroid.link/", &policy), LinkOutcome::NoInput);

    let render = rendered("");
    assert!(!render.has_input);
    assert!(render.errors.is_empty());
    assert!(render.warnings.is_empty());
    assert!(render.info_notices.is_empty());
    assert!(render.links.is_none());
}

// ==================== Properties ====================

#[test]
fn test_pipeline_is_idempotent() {
    let inputs = [
        "",
        "https://[broken",
        "example.com/fdroid/repo?foo=bar",
        "fdroidrepo://example.com/fdroid/repo?fingerprint=abc",
    ];
    for input in inputs {
        assert_eq!(rendered(input), rendered(input), "input: {input}");
    }
}

#[test]
fn test_scheme_equivalence() {
    let tail = format!("mirror.example.com/fdroid/repo?fingerprint={OFFICIAL}");
    let secure_custom = validated(&format!("fdroidrepos://{tail}"));
    let insecure_custom = validated(&format!("fdroidrepo://{tail}"));
    let https = validated(&format!("https://{tail}"));
    let http = validated(&format!("http://{tail}"));
    let bare = validated(&tail);

    for result in [&secure_custom, &insecure_custom, &https, &http, &bare] {
        assert_eq!(result.repo_authority_path, "mirror.example.com/fdroid/repo");
        assert_eq!(result.trust, Some(Trust::OfficialMirror));
    }

    assert_eq!(secure_custom.scheme, Scheme::Https);
    assert_eq!(bare.scheme, Scheme::Https);
    assert_eq!(insecure_custom.scheme, Scheme::Http);
    assert_eq!(http.scheme, Scheme::Http);
    assert!(http.warnings.contains(&WarningKind::InsecureScheme));
    assert!(!https.warnings.contains(&WarningKind::InsecureScheme));
}

#[test]
fn test_duplicate_detection_never_links() {
    for reference in [
        "example.com/fdroid/repo?fingerprint=A&fingerprint=B",
        &format!("f-droid.org/repo?fingerprint={OFFICIAL}&fingerprint={OFFICIAL}"),
    ] {
        let result = validated(reference);
        assert!(result.errors.contains(&ErrorKind::DuplicateParameter));
        assert!(rendered(reference).links.is_none());
    }
}

#[test]
fn test_unsupported_parameter_names_key() {
    let result = validated("example.com/fdroid/repo?foo=bar");
    assert_eq!(
        result.errors,
        vec![ErrorKind::UnsupportedParameter("foo".to_string())]
    );
    assert_eq!(
        rendered("example.com/fdroid/repo?foo=bar").errors,
        vec!["parameter not supported: foo".to_string()]
    );
}

#[test]
fn test_trust_partition() {
    let policy = LinkPolicy::default();
    for location in &policy.official_locations {
        for fingerprint in [None, Some(OFFICIAL), Some("00")] {
            let reference = match fingerprint {
                Some(fp) => format!("{location}?fingerprint={fp}"),
                None => location.clone(),
            };
            assert_eq!(validated(&reference).trust, Some(Trust::Official), "{reference}");
        }
    }

    for location in ["example.com/fdroid/repo", "example.com/other", "f-droid.org/repo2"] {
        assert_eq!(
            validated(&format!("{location}?fingerprint={OFFICIAL}")).trust,
            Some(Trust::OfficialMirror)
        );
        assert_eq!(
            validated(&format!("{location}?fingerprint={}", "B".repeat(64))).trust,
            Some(Trust::ThirdParty)
        );
        assert_eq!(validated(location).trust, Some(Trust::ThirdParty));
    }
}

#[test]
fn test_fingerprint_format() {
    let ok = ["a".repeat(64), "F".repeat(64), OFFICIAL.to_lowercase()];
    for fp in ok {
        let result = validated(&format!("example.com/fdroid/repo?fingerprint={fp}"));
        assert!(!result.warnings.contains(&WarningKind::FingerprintMalformed));
    }

    let bad = ["a".repeat(63), "a".repeat(65), format!("{}g", "a".repeat(63))];
    for fp in bad {
        let result = validated(&format!("example.com/fdroid/repo?fingerprint={fp}"));
        assert!(result.warnings.contains(&WarningKind::FingerprintMalformed));
    }
}

// ==================== Configuration and conventions ====================

#[test]
fn test_substitute_policy_changes_classification() {
    let policy = LinkPolicy {
        official_locations: vec!["repo.example.org/fdroid/repo".to_string()],
        official_fingerprint: "C".repeat(64),
        ..LinkPolicy::default()
    };

    let LinkOutcome::Validated { result, .. } =
        parse_reference("repo.example.org/fdroid/repo", &policy)
    else {
        panic!("expected validation");
    };
    assert_eq!(result.trust, Some(Trust::Official));

    let LinkOutcome::Validated { result, .. } = parse_reference(
        &format!("mirror.example.com/fdroid/repo?fingerprint={OFFICIAL}"),
        &policy,
    ) else {
        panic!("expected validation");
    };
    assert_eq!(result.trust, Some(Trust::ThirdParty));
}

#[test]
fn test_legacy_query_convention_end_to_end() {
    let policy = LinkPolicy::default().with_convention(InputConvention::LegacyQuery);
    let outcome = parse_location(
        &format!(
            "https://fdroid.link/#repo=https://f-droid.org/repo&fingerprint={OFFICIAL}&package=org.fdroid.fdroid"
        ),
        &policy,
    );
    let render = RenderResult::from(&outcome);
    assert!(render.errors.is_empty());
    assert_eq!(render.trust, Some(Trust::Official));
    assert_eq!(render.package.as_deref(), Some("org.fdroid.fdroid"));
    assert_eq!(
        render.links.unwrap().repo_link,
        format!("fdroidrepos://f-droid.org/repo?fingerprint={OFFICIAL}")
    );
}

#[test]
fn test_legacy_query_is_not_auto_detected() {
    let render = rendered("repo=https://f-droid.org/repo&package=org.fdroid.fdroid");
    assert_ne!(render.trust, Some(Trust::Official));
    assert!(render.package.is_none());
}

#[test]
fn test_presenter_sees_each_run() {
    let policy = LinkPolicy::default();
    let mut presenter = CollectingPresenter::default();
    for location in ["f-droid.org/repo", "", "example.com/fdroid/repo?x=1"] {
        let outcome = parse_reference(location, &policy);
        presenter.present(&RenderResult::from(&outcome)).unwrap();
    }
    assert_eq!(presenter.results.len(), 3);
    let latest = presenter.latest().unwrap();
    assert!(latest.has_input);
    assert!(latest.links.is_none());
}
