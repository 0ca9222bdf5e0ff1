use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use style_sampler::*;

const USER: &str = "anna@example.com";

type Fetched = std::result::Result<RawMessage, String>;

fn sent(id: &str, from: &str, body: &str) -> RawMessage {
    RawMessage {
        id: Some(id.into()),
        payload: Some(Payload {
            headers: vec![Header::new("From", from)],
            body: Some(PartBody::with_data(URL_SAFE_NO_PAD.encode(body.as_bytes()))),
            ..Payload::default()
        }),
        ..RawMessage::default()
    }
}

fn user_session() -> Session {
    let mut session = Session::authorized("token-1234");
    session.set_user_email(USER);
    session
}

fn ok(messages: Vec<RawMessage>) -> Vec<Fetched> {
    messages.into_iter().map(Ok).collect()
}

#[test]
fn test_api_samples_in_order() {
    let messages = ok(vec![
        sent("1", "Anna <anna@example.com>", "First message that is long enough."),
        sent("2", "Anna <anna@example.com>", "Second message that is long enough."),
    ]);

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        [
            "First message that is long enough.",
            "Second message that is long enough."
        ]
    );
    assert_eq!(samples[0].message_id.as_deref(), Some("1"));
    assert!(samples.iter().all(|s| s.source == SampleSource::Api));
}

#[test]
fn test_api_samples_are_quote_stripped() {
    let body = "Thanks, that works for me. Talk soon.\n\nOn Mon, Bob wrote:\n> Does Friday work?";
    let messages = ok(vec![sent("1", USER, body)]);

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, "Thanks, that works for me. Talk soon.");
}

#[test]
fn test_api_batch_survives_failures() {
    let undecodable = RawMessage {
        id: Some("bad".into()),
        payload: Some(Payload {
            headers: vec![Header::new("From", USER)],
            body: Some(PartBody::with_data("%%%")),
            ..Payload::default()
        }),
        ..RawMessage::default()
    };
    let messages: Vec<Fetched> = vec![
        Ok(sent("1", USER, "Message one is long enough to keep.")),
        Err("HTTP 500".into()),
        Ok(undecodable),
        Ok(sent("4", USER, "Message four is long enough to keep.")),
    ];

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    let ids: Vec<&str> = samples.iter().filter_map(|s| s.message_id.as_deref()).collect();
    assert_eq!(ids, ["1", "4"]);
}

#[test]
fn test_api_skips_other_senders() {
    let messages = ok(vec![
        sent("1", "Bob <bob@example.com>", "Written by somebody else entirely."),
        sent("2", "ANNA@EXAMPLE.COM", "Written by the user, different case."),
    ]);

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].message_id.as_deref(), Some("2"));
}

#[test]
fn test_api_without_known_user_keeps_all_senders() {
    let messages = ok(vec![
        sent("1", "Bob <bob@example.com>", "Written by somebody else entirely."),
        sent("2", USER, "Written by the user for this test."),
    ]);

    let samples = collect_api_samples(&Session::authorized("t"), &SampleWindow::API, messages);

    assert_eq!(samples.len(), 2);
}

#[test]
fn test_api_length_window_is_exclusive() {
    let exactly_20 = "a".repeat(20);
    let exactly_21 = "b".repeat(21);
    let exactly_10000 = "c".repeat(10_000);
    let messages = ok(vec![
        sent("1", USER, &exactly_20),
        sent("2", USER, &exactly_21),
        sent("3", USER, &exactly_10000),
        sent("4", USER, "short"),
    ]);

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, exactly_21);
}

#[test]
fn test_api_window_counts_utf16_units() {
    // Each emoji is two UTF-16 units
    let ten = "😀".repeat(10);
    let eleven = "😀".repeat(11);
    let fifteen = "😀".repeat(15);
    let messages = ok(vec![
        sent("1", USER, &ten),
        sent("2", USER, &eleven),
        sent("3", USER, &fifteen),
    ]);

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    let ids: Vec<&str> = samples.iter().filter_map(|s| s.message_id.as_deref()).collect();
    assert_eq!(ids, ["2", "3"]);
    assert_eq!(samples[1].utf16_len(), 30);
}

#[test]
fn test_api_cap_limits_messages_considered() {
    let window = SampleWindow {
        min_exclusive: 0,
        max_exclusive: 100,
        cap: 2,
    };
    let messages: Vec<Fetched> = vec![
        Err("timeout".into()),
        Ok(sent("2", USER, "kept")),
        Ok(sent("3", USER, "beyond the cap")),
    ];

    let samples = collect_api_samples(&user_session(), &window, messages);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, "kept");
}

#[test]
fn test_api_default_cap() {
    let messages = ok((0..60)
        .map(|i| sent(&i.to_string(), USER, &format!("Message number {i} with enough text.")))
        .collect());

    let samples = collect_api_samples(&user_session(), &SampleWindow::API, messages);

    assert_eq!(samples.len(), 50);
    assert_eq!(samples[49].message_id.as_deref(), Some("49"));
}

#[test]
fn test_authored_text() {
    let msg = sent("1", USER, "Mine\n> theirs");
    assert_eq!(authored_text(&msg).as_deref(), Some("Mine"));
    assert_eq!(authored_text(&RawMessage::default()), None);
}

// --- Rendered view ---

fn long(tag: &str) -> String {
    format!("{tag}: this paragraph is comfortably longer than fifty characters.")
}

#[test]
fn test_dom_samples() {
    let snapshot = DomSnapshot {
        message_bodies: vec![format!("  {}  ", long("one")), "too short".into()],
        expanded_blocks: vec![long("two")],
    };

    let samples = collect_dom_samples(&SampleWindow::DOM, &snapshot);

    let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, [long("one"), long("two")]);
    assert!(samples.iter().all(|s| s.source == SampleSource::Dom));
}

#[test]
fn test_dom_trims_byte_order_marks() {
    let snapshot = DomSnapshot {
        message_bodies: vec![format!("\u{feff}{}\n", long("bom"))],
        expanded_blocks: vec![format!(" {}\u{feff}", long("bom"))],
    };

    let samples = collect_dom_samples(&SampleWindow::DOM, &snapshot);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, long("bom"));
}

#[test]
fn test_dom_window_counts_utf16_units() {
    let window = SampleWindow {
        min_exclusive: 20,
        max_exclusive: 100,
        cap: 5,
    };
    let snapshot = DomSnapshot {
        message_bodies: vec!["𝔸".repeat(10), "𝔹".repeat(11)],
        expanded_blocks: vec![],
    };

    let samples = collect_dom_samples(&window, &snapshot);

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, "𝔹".repeat(11));
}

#[test]
fn test_dom_expanded_duplicates_skipped() {
    let snapshot = DomSnapshot {
        message_bodies: vec![long("same")],
        expanded_blocks: vec![long("same"), long("other"), long("other")],
    };

    let samples = collect_dom_samples(&SampleWindow::DOM, &snapshot);

    let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, [long("same"), long("other")]);
}

#[test]
fn test_dom_not_quote_stripped() {
    let text = format!("{}\n> quoted line stays on this path", long("reply"));
    let snapshot = DomSnapshot {
        message_bodies: vec![text.clone()],
        expanded_blocks: vec![],
    };

    let samples = collect_dom_samples(&SampleWindow::DOM, &snapshot);

    assert_eq!(samples[0].text, text);
}

#[test]
fn test_dom_cap_and_window() {
    let snapshot = DomSnapshot {
        message_bodies: (0..8).map(|i| long(&i.to_string())).collect(),
        expanded_blocks: vec!["x".repeat(5_000), "y".repeat(4_999)],
    };

    let samples = collect_dom_samples(&SampleWindow::DOM, &snapshot);

    assert_eq!(samples.len(), 5);
    assert_eq!(samples[4].text, long("4"));
}

#[test]
fn test_collector_uses_config() {
    let config = Config {
        dom_window: SampleWindow {
            min_exclusive: 0,
            max_exclusive: 10,
            cap: 1,
        },
        ..Config::default()
    };
    let collector = SampleCollector::new(Extractor::default(), config);
    let snapshot = DomSnapshot {
        message_bodies: vec!["tiny".into(), "also".into()],
        expanded_blocks: vec![],
    };

    let samples = collector.collect_dom(&snapshot);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].text, "tiny");

    let api = collector.collect_api(
        &user_session(),
        ok(vec![sent("1", USER, "An API sample that passes the default window.")]),
    );
    assert_eq!(api.len(), 1);
}
