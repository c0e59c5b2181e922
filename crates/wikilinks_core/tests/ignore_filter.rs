use wikilinks_core::{IgnoreFilter, IgnoreRuleError, LinkFilter};

fn rules(pairs: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
    pairs
        .iter()
        .map(|(link, files)| {
            (
                link.to_string(),
                files.iter().map(|f| f.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn matching_link_in_matching_file_is_ignored() {
    let filter = IgnoreFilter::new(rules(&[("*.md", &["path/to/*.md"])])).unwrap();

    assert!(filter.should_ignore("test.md", "path/to/file.md"));
    assert!(!filter.should_ignore("test.md", "other/file.md"));
    assert!(!filter.should_ignore("test.png", "path/to/file.md"));
}

#[test]
fn single_star_does_not_cross_directories() {
    let filter = IgnoreFilter::new(rules(&[("*.md", &["docs/*.md"])])).unwrap();

    assert!(filter.should_ignore("page.md", "docs/index.md"));
    assert!(!filter.should_ignore("page.md", "docs/nested/index.md"));
    assert!(!filter.should_ignore("sub/page.md", "docs/index.md"));
}

#[test]
fn double_star_crosses_directories() {
    let filter = IgnoreFilter::new(rules(&[("**/*.md", &["docs/**/*.md"])])).unwrap();

    assert!(filter.should_ignore("sub/page.md", "docs/a/b/index.md"));
}

#[test]
fn any_file_pattern_in_the_list_matches() {
    let filter =
        IgnoreFilter::new(rules(&[("private-?.md", &["a/*.md", "b/*.md"])])).unwrap();

    assert!(filter.should_ignore("private-1.md", "b/index.md"));
    assert!(!filter.should_ignore("private-10.md", "b/index.md"));
}

#[test]
fn empty_filter_ignores_nothing() {
    let filter = IgnoreFilter::default();
    assert!(filter.is_empty());
    assert!(!filter.should_ignore("anything.md", "file.md"));
}

#[test]
fn wildcard_pair_is_rejected() {
    let err = IgnoreFilter::new(rules(&[("*", &["docs/*.md", "*"])])).unwrap_err();
    match err {
        IgnoreRuleError::Disallowed { rule, reason } => {
            assert_eq!(rule, "*:*");
            assert_eq!(reason, "it would ignore all links");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn markdown_wildcard_pair_is_rejected() {
    let err = IgnoreFilter::new(rules(&[("*.md", &["*.md"])])).unwrap_err();
    assert!(err.to_string().contains("\"*.md:*.md\" is not allowed"));
}

#[test]
fn broken_glob_is_reported() {
    let err = IgnoreFilter::new(rules(&[("[unclosed", &["*.md"])])).unwrap_err();
    assert!(matches!(err, IgnoreRuleError::InvalidPattern { ref pattern, .. } if pattern == "[unclosed"));
}
