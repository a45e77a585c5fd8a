use std::sync::Mutex;

use companion::{FallbackMessages, GroqClient, MessageProvider};
use log::{Level, LevelFilter, Log, Metadata, Record};
use mockito::Server;

/// Keeps every record emitted by this crate.
struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("companion")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[tokio::test]
async fn error_body_is_logged_once() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let body = r#"{"error":{"message":"model overloaded"}}"#;
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body(body)
        .create_async()
        .await;

    let client = GroqClient::new(
        Some("k".into()),
        "m",
        &format!("{}/v1", server.url()),
        None,
    )
    .unwrap();
    let provider = MessageProvider::new(client, FallbackMessages::builtin());
    let reply = provider.get_message("Hello").await;
    assert!(reply.is_fallback());

    let records = LOGGER.records.lock().unwrap();
    let with_body: Vec<_> = records.iter().filter(|(_, msg)| msg.contains(body)).collect();
    assert_eq!(with_body.len(), 1, "records: {:?}", *records);
    assert_eq!(with_body[0].0, Level::Error);
    assert!(with_body[0].1.contains("500"));

    assert!(records
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains("using fallback message")));
}
