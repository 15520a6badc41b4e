//! End-to-end tests: logger, tracing writer and a capturing subscriber.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_httplog::infrastructure::mocks::{MockCaptureLayer, MockClock};
use tracing_httplog::{FieldValue, HttpLogger, Options, RequestLog, TracingWriter, TARGET};
use tracing_subscriber::layer::SubscriberExt;

fn logger(options: Options) -> (HttpLogger, MockClock) {
    let clock = MockClock::new(Instant::now());
    let logger = HttpLogger::builder()
        .with_options(options)
        .with_clock(Arc::new(clock.clone()))
        .build();
    (logger, clock)
}

#[test]
fn test_requests_emitted_as_tracing_events() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let (logger, clock) = logger(Options {
        quiet_down_routes: vec!["/health".to_string()],
        quiet_down_period: Duration::from_secs(10),
        ..Options::default()
    });
    let writer = TracingWriter::for_options(logger.options());

    tracing::subscriber::with_default(subscriber, || {
        for second in 0..20 {
            logger.log_with(&RequestLog::new("GET", "/health").with_status(200), &writer);
            if second == 7 {
                logger.log_with(&RequestLog::new("GET", "/missing").with_status(404), &writer);
                logger.log_with(&RequestLog::new("POST", "/orders").with_status(503), &writer);
            }
            clock.advance(Duration::from_secs(1));
        }
    });

    let events: Vec<_> = capture
        .get_captured()
        .into_iter()
        .filter(|e| e.target == TARGET)
        .collect();

    // /health at t=0 and t=10, plus the two other requests
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].level, Level::INFO);
    assert!(events[0].message.contains(r#"path="/health""#));
    assert_eq!(events[1].level, Level::WARN);
    assert!(events[1].message.contains(r#"message="Response: 404 Not Found""#));
    assert_eq!(events[2].level, Level::ERROR);
    assert!(events[2].message.contains("status=503"));
    assert_eq!(events[2].fields.get("status").map(String::as_str), Some("503"));
    assert_eq!(events[2].fields.get("method").map(String::as_str), Some("POST"));
    assert_eq!(events[3].level, Level::INFO);

    let snapshot = logger.metrics().snapshot();
    assert_eq!(snapshot.requests_logged, 2);
    assert_eq!(snapshot.requests_suppressed, 18);
    assert_eq!(snapshot.requests_exempt, 2);
    assert_eq!(snapshot.total_requests(), 22);
}

#[test]
fn test_custom_field_names_and_tags() {
    let mut tags = BTreeMap::new();
    tags.insert("env".to_string(), "prod".to_string());
    tags.insert("severity".to_string(), "shadowed".to_string());

    let (logger, _clock) = logger(Options {
        level_field_name: "severity".to_string(),
        message_field_name: "msg".to_string(),
        time_field_name: "ts".to_string(),
        tags,
        ..Options::default()
    });

    let record = logger
        .log_request(&RequestLog::new("GET", "/users").with_status(201))
        .unwrap();

    let names: Vec<_> = record.fields().iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["severity", "msg", "ts", "method", "path", "status", "request_headers", "env"]
    );
    assert_eq!(record.get_str("severity"), Some("INFO"));
    assert_eq!(record.get_str("msg"), Some("Response: 201 Created"));
    assert_eq!(record.get_str("env"), Some("prod"));
    assert!(matches!(record.get("ts"), Some(FieldValue::Time(_))));
}

#[test]
fn test_tag_named_like_request_field_is_dropped() {
    let mut tags = BTreeMap::new();
    tags.insert("path".to_string(), "tagged".to_string());
    tags.insert("status".to_string(), "x".to_string());

    let (logger, _clock) = logger(Options {
        tags,
        ..Options::default()
    });
    let record = logger
        .log_request(&RequestLog::new("GET", "/users").with_status(200))
        .unwrap();

    let paths: Vec<_> = record.fields().iter().filter(|(name, _)| name == "path").collect();
    assert_eq!(paths.len(), 1);
    assert_eq!(record.get_str("path"), Some("/users"));
    assert_eq!(record.get("status"), Some(&FieldValue::U64(200)));
    assert!(!record.to_string().contains("tagged"));
}

#[test]
fn test_verbose_mode_adds_request_details() {
    let (logger, _clock) = logger(Options {
        concise: false,
        request_headers: false,
        ..Options::default()
    });
    let request = RequestLog::new("PUT", "/items/7")
        .with_status(204)
        .with_duration(Duration::from_millis(12))
        .with_remote_addr("10.0.0.1:51234")
        .with_user_agent("monitor/1.0")
        .with_content_length(512);

    let record = logger.log_request(&request).unwrap();

    assert_eq!(record.get_str("remote_addr"), Some("10.0.0.1:51234"));
    assert_eq!(record.get_str("user_agent"), Some("monitor/1.0"));
    assert_eq!(record.get("content_length"), Some(&FieldValue::U64(512)));
    assert!(record.get("duration_ms").is_some());
    assert!(record.get("request_headers").is_none());
}

#[test]
fn test_configured_log_level_for_success() {
    let capture = MockCaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let (logger, _clock) = logger(Options {
        log_level: Level::DEBUG,
        ..Options::default()
    });

    tracing::subscriber::with_default(subscriber, || {
        let writer = TracingWriter::new();
        logger.log_with(&RequestLog::new("GET", "/").with_status(200), &writer);
        logger.log_with(&RequestLog::new("GET", "/").with_status(500), &writer);
    });

    let levels: Vec<_> = capture
        .get_captured()
        .iter()
        .filter(|e| e.target == TARGET)
        .map(|e| e.level)
        .collect();
    assert_eq!(levels, [Level::DEBUG, Level::ERROR]);
}

#[test]
fn test_from_http_types() {
    let (logger, _clock) = logger(Options {
        concise: false,
        response_headers: true,
        ..Options::default()
    });

    let request = http::Request::builder()
        .method("DELETE")
        .uri("/sessions/1?force=true")
        .header("authorization", "Bearer t")
        .header("user-agent", "client/2")
        .body(())
        .unwrap();
    let response = http::Response::builder()
        .status(204)
        .header("set-cookie", "session=; Max-Age=0")
        .body(())
        .unwrap();

    let record = logger
        .log_request(&RequestLog::from_request(&request).with_response(&response))
        .unwrap();

    assert_eq!(record.get_str("method"), Some("DELETE"));
    assert_eq!(record.get_str("path"), Some("/sessions/1"));
    assert_eq!(record.get("status"), Some(&FieldValue::U64(204)));
    assert_eq!(record.get_str("user_agent"), Some("client/2"));

    match record.get("request_headers") {
        Some(FieldValue::Headers(headers)) => assert!(!headers.contains_key("authorization")),
        other => panic!("unexpected request_headers field: {:?}", other),
    }
    match record.get("response_headers") {
        Some(FieldValue::Headers(headers)) => assert!(headers.contains_key("set-cookie")),
        other => panic!("unexpected response_headers field: {:?}", other),
    }
}
