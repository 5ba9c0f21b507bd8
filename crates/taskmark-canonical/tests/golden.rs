use taskmark_canonical::{
    compute_intent_hash, verify_intent_hash, CanonicalizationError, Canonicalizer, HygieneStatus,
    IntentDigest, SimpleFrontmatterParser,
};

const SAMPLE: &str = r#"---
id: test-task
title: "Test Task"
kind: feature
scope: minor
risk: low
epistemic_state: candidate
confidence: low
origin: human
lifecycle_state: inactive
created_at: "2026-01-09T10:00:00Z"
intent_hash: "placeholder"
intent_hash_algo: sha256-v1
intent_hash_scope: canonical-intent
---

# Test Task

## Goal

Test goal content.

## Acceptance

- [ ] Test criterion

## Constraints

- Test constraint

## Dependencies

- None
"#;

const SAMPLE_BLOB: &str = r#"---
confidence: low
created_at: "2026-01-09T10:00:00Z"
epistemic_state: candidate
id: test-task
intent_hash_algo: sha256-v1
intent_hash_scope: canonical-intent
kind: feature
lifecycle_state: inactive
origin: human
risk: low
scope: minor
title: Test Task
---
## Goal

Test goal content.

## Acceptance

- [ ] Test criterion

## Constraints

- Test constraint

## Dependencies

- None"#;

fn blob(text: &str) -> String {
    Canonicalizer::default().canonicalize(text).unwrap().blob
}

fn digest(text: &str) -> IntentDigest {
    compute_intent_hash(text, &Canonicalizer::default()).unwrap()
}

#[test]
fn sample_document_produces_golden_blob() {
    assert_eq!(blob(SAMPLE), SAMPLE_BLOB);
}

#[test]
fn fallback_parser_produces_the_same_blob() {
    let simple = Canonicalizer::new(Box::new(SimpleFrontmatterParser));
    assert_eq!(simple.canonicalize(SAMPLE).unwrap().blob, SAMPLE_BLOB);
}

#[test]
fn canonicalization_is_deterministic() {
    let canonicalizer = Canonicalizer::default();
    let first = canonicalizer.canonicalize(SAMPLE).unwrap();
    let second = canonicalizer.canonicalize(SAMPLE).unwrap();
    assert_eq!(first.bytes(), second.bytes());
    assert_eq!(digest(SAMPLE), digest(SAMPLE));
}

#[test]
fn whitespace_and_line_endings_do_not_change_the_digest() {
    let noisy = SAMPLE
        .replace("kind: feature\n", "kind: feature   \n\n\n")
        .replace("# Test Task\n", "# Test Task\n\n\n\n\n")
        .replace("- None\n", "- None   \n\n\n\n")
        .replace("Test goal content.\n", "Test goal content.\t\n");
    let crlf = noisy.replace('\n', "\r\n");

    assert_eq!(digest(&noisy), digest(SAMPLE));
    assert_eq!(digest(&crlf), digest(SAMPLE));

    let result = Canonicalizer::default().canonicalize(&crlf).unwrap();
    assert_eq!(result.report.status, HygieneStatus::Normalized);
    assert!(result.report.metrics["line_endings_rewritten"] > 0);
}

#[test]
fn carriage_return_only_documents_keep_their_sections() {
    let classic_mac = SAMPLE.replace('\n', "\r");
    assert_eq!(blob(&classic_mac), SAMPLE_BLOB);
    assert_eq!(digest(&classic_mac), digest(SAMPLE));

    let simple = Canonicalizer::new(Box::new(SimpleFrontmatterParser));
    let result = simple.canonicalize(&classic_mac).unwrap();
    assert_eq!(result.blob, SAMPLE_BLOB);
    assert_eq!(result.report.sections_kept, ["Goal", "Acceptance", "Constraints", "Dependencies"]);
    assert!(result.report.metrics["line_endings_rewritten"] > 0);
}

#[test]
fn frontmatter_key_order_does_not_matter() {
    let reordered = SAMPLE.replace(
        "id: test-task\ntitle: \"Test Task\"\n",
        "title: \"Test Task\"\n",
    )
    .replace("origin: human\n", "origin: human\nid: test-task\n");
    assert_eq!(blob(&reordered), SAMPLE_BLOB);
}

#[test]
fn comments_inside_sections_are_ignored() {
    let commented = SAMPLE.replace(
        "Test goal content.\n",
        "<!-- describe the goal -->\nTest goal content.\n<!--\n-->\n",
    );
    assert_eq!(digest(&commented), digest(SAMPLE));
}

#[test]
fn excluded_section_content_never_reaches_the_blob() {
    let with_evidence = SAMPLE.replace(
        "## Acceptance\n",
        "## Evidence\n\nTest goal content. EVIDENCE-ONLY-MARKER\n\n## Acceptance\n",
    );
    let canonical = blob(&with_evidence);
    assert!(!canonical.contains("EVIDENCE-ONLY-MARKER"));
    assert!(!canonical.contains("## Evidence"));
    assert_eq!(canonical, SAMPLE_BLOB);
}

#[test]
fn unknown_sections_are_dropped() {
    let with_notes = format!("{SAMPLE}\n## Notes\n\nscratch pad\n");
    assert_eq!(blob(&with_notes), SAMPLE_BLOB);
}

#[test]
fn fields_outside_the_allow_list_are_ignored() {
    let extended = SAMPLE.replace(
        "origin: human\n",
        "origin: human\nlast_reviewed_at: \"2026-02-01T00:00:00Z\"\nowner: someone\n",
    );
    assert_eq!(digest(&extended), digest(SAMPLE));

    let result = Canonicalizer::default().canonicalize(&extended).unwrap();
    assert!(result.report.fields_dropped.contains(&"owner".to_string()));
    assert!(result.report.fields_dropped.contains(&"intent_hash".to_string()));
}

#[test]
fn recorded_intent_hash_does_not_feed_the_blob() {
    let hashed = SAMPLE.replace("\"placeholder\"", &digest(SAMPLE).hex);
    assert_eq!(digest(&hashed), digest(SAMPLE));
}

#[test]
fn allow_listed_field_changes_change_the_digest() {
    let validated = SAMPLE.replace("epistemic_state: candidate", "epistemic_state: validated");
    assert_ne!(digest(&validated), digest(SAMPLE));

    let tagged = SAMPLE.replace("origin: human\n", "origin: human\ntags:\n  - infra\n");
    assert_ne!(digest(&tagged), digest(SAMPLE));
}

#[test]
fn canonical_section_changes_change_the_digest() {
    let edited = SAMPLE.replace("- Test constraint", "- A different constraint");
    assert_ne!(digest(&edited), digest(SAMPLE));
}

#[test]
fn verify_reports_recorded_hash_state() {
    let canonicalizer = Canonicalizer::default();
    assert_eq!(verify_intent_hash(SAMPLE, &canonicalizer).unwrap(), None);

    let good = SAMPLE.replace("\"placeholder\"", &digest(SAMPLE).hex);
    assert_eq!(verify_intent_hash(&good, &canonicalizer).unwrap(), Some(true));

    let drifted = good.replace("Test goal content.", "Changed goal.");
    assert_eq!(verify_intent_hash(&drifted, &canonicalizer).unwrap(), Some(false));
}

#[test]
fn malformed_documents_are_rejected() {
    let canonicalizer = Canonicalizer::default();
    assert_eq!(
        canonicalizer.canonicalize("# no frontmatter").unwrap_err(),
        CanonicalizationError::MissingOpeningDelimiter
    );
    assert_eq!(
        canonicalizer.canonicalize("---\nid: x\n").unwrap_err(),
        CanonicalizationError::MissingClosingDelimiter
    );
    let missing_title = SAMPLE.replace("title: \"Test Task\"\n", "");
    match canonicalizer.canonicalize(&missing_title).unwrap_err() {
        CanonicalizationError::MissingRequiredFields(fields) => assert_eq!(fields, ["title"]),
        other => panic!("unexpected error: {other}"),
    }
}
