use super::*;

#[test]
fn empty_collection_is_not_an_error() {
    let c = ErrorCollection::new();
    assert!(c.is_empty());
    assert!(c.if_not_empty().is_none());
}

#[test]
fn recording_success_is_a_noop() {
    let mut c = ErrorCollection::new();
    c.record("pkg-a", Ok(()));
    assert!(c.if_not_empty().is_none());
}

#[test]
fn recording_failure_keeps_the_key() {
    let mut c = ErrorCollection::new();
    c.record("pkg-a", Err(PakkError::Other("boom".into())));
    let c = c.if_not_empty().expect("one entry collected");
    assert_eq!(c.len(), 1);
    assert!(c.to_string().contains("pkg-a"));
    assert!(c.to_string().contains("boom"));
}

#[test]
fn add_overwrites_prior_entry_for_same_key() {
    let mut c = ErrorCollection::new();
    c.add("pkg", PakkError::Other("first".into()));
    c.add("pkg", PakkError::Other("second".into()));
    assert_eq!(c.len(), 1);
    assert!(c.to_string().contains("second"));
    assert!(!c.to_string().contains("first"));
}

#[test]
fn merge_is_last_write_wins() {
    let mut a = ErrorCollection::new();
    a.add("shared", PakkError::Other("from a".into()));
    a.add("only-a", PakkError::Other("a".into()));

    let mut b = ErrorCollection::new();
    b.add("shared", PakkError::Other("from b".into()));
    b.add("only-b", PakkError::Other("b".into()));

    a.merge(b);
    assert_eq!(a.len(), 3);
    assert!(a.to_string().contains("from b"));
    assert!(!a.to_string().contains("from a"));
}

#[test]
fn display_renders_one_line_per_key() {
    let mut c = ErrorCollection::new();
    c.add("b-key", PakkError::Other("second".into()));
    c.add("a-key", PakkError::Other("first".into()));

    let rendered = c.to_string();
    let lines: Vec<&str> = rendered.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2);
    // BTreeMap iteration renders keys sorted
    assert!(lines[0].starts_with("a-key:\t"));
    assert!(lines[1].starts_with("b-key:\t"));
}

#[test]
fn into_result_round_trips() {
    assert!(ErrorCollection::new().into_result().is_ok());

    let mut c = ErrorCollection::new();
    c.add("k", PakkError::Other("e".into()));
    assert!(c.into_result().is_err());
}
