use super::{overlay_lines, DomainCount, Message};

#[test]
fn test_activation_is_keyed_by_action() {
    let message = Message::from_json(r#"{"action":"activateGetData"}"#).unwrap();

    assert_eq!(message, Message::Activate);
}

#[test]
fn test_scan_is_keyed_by_type() {
    let message = Message::from_json(r#"{"type":"scanForHighTextElements"}"#).unwrap();

    assert_eq!(message, Message::Scan);
}

#[test]
fn test_domain_counts_accept_both_spellings() {
    let json = r#"{"type":"updateDomainCounts","counts":{
        "example.com":{"count":3,"bytes":2048,"formattedBytes":"2 KB"},
        "cdn.net":{"count":1,"bytes":10,"formatedBytes":"10 B"}
    }}"#;

    let Message::DomainCounts(counts) = Message::from_json(json).unwrap() else {
        panic!("expected domain counts");
    };

    assert_eq!(
        counts["example.com"],
        DomainCount {
            count: 3,
            bytes: 2048,
            formatted_bytes: "2 KB".to_string(),
        }
    );
    assert_eq!(counts["cdn.net"].formatted_bytes, "10 B");
    assert_eq!(
        overlay_lines(&counts),
        vec!["cdn.net: 1 [10 B]", "example.com: 3 [2 KB]"]
    );
}

#[test]
fn test_activation_wins_over_type() {
    let json = r#"{"action":"activateGetData","type":"scanForHighTextElements"}"#;

    assert_eq!(Message::from_json(json).unwrap(), Message::Activate);
}

#[test]
fn test_unknown_discriminator_is_other() {
    let message = Message::from_json(r#"{"type":"somethingElse"}"#).unwrap();

    assert_eq!(message, Message::Other("somethingElse".to_string()));
}

#[test]
fn test_non_object_is_an_error() {
    assert!(Message::from_json("[1,2]").is_err());
    assert!(Message::from_json("not json").is_err());
}
