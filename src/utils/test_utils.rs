use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::api::{CompletionRequest, CompletionResponse};
use crate::core::backend::{BackendError, CompletionBackend};
use crate::core::controller::{ChatController, ChatView, Screen};
use crate::core::exchange::{ExchangeReceiver, ExchangeService};
use crate::core::message::Message;
use crate::core::password::{ExpectedPassword, PasswordOrigin};
use crate::core::session::MemorySessionStore;
use crate::ui::theme::Theme;
use crate::ui::view::TerminalView;
use crate::utils::logging::LoggingState;

pub const TEST_PASSWORD: &str = "yc-coach-2025";
pub const TEST_GREETING: &str = "Welcome, founder.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Screen(Screen),
    Turn(Message),
    Busy(bool),
    LoginError(String),
    ClearLoginError,
    ClearPassword,
    FocusPassword,
    ResetChat(String),
}

/// A view that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn turns(&self) -> Vec<Message> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Turn(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Screen(screen) => Some(*screen),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ChatView for RecordingView {
    fn show_screen(&mut self, screen: Screen) {
        self.events.push(ViewEvent::Screen(screen));
    }

    fn render_turn(&mut self, message: &Message) {
        self.events.push(ViewEvent::Turn(message.clone()));
    }

    fn set_busy(&mut self, busy: bool) {
        self.events.push(ViewEvent::Busy(busy));
    }

    fn show_login_error(&mut self, text: &str) {
        self.events.push(ViewEvent::LoginError(text.to_string()));
    }

    fn clear_login_error(&mut self) {
        self.events.push(ViewEvent::ClearLoginError);
    }

    fn clear_password_input(&mut self) {
        self.events.push(ViewEvent::ClearPassword);
    }

    fn focus_password_input(&mut self) {
        self.events.push(ViewEvent::FocusPassword);
    }

    fn reset_chat(&mut self, greeting: &str) {
        self.events.push(ViewEvent::ResetChat(greeting.to_string()));
    }
}

/// Replays queued replies in order and records every request it receives.
/// A queued `Err(status)` becomes an HTTP status failure.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = Result<&'static str, u16>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, BackendError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let next = self.replies.lock().expect("replies lock").pop_front();
        match next {
            Some(Ok(reply)) => Ok(CompletionResponse::reply(reply)),
            Some(Err(status)) => Err(BackendError::Status {
                status,
                detail: None,
            }),
            None => Err(BackendError::Malformed("no scripted reply left".to_string())),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub fn test_password() -> ExpectedPassword {
    ExpectedPassword::new(TEST_PASSWORD, PasswordOrigin::Environment)
        .expect("test password is not empty")
}

/// Controller over a recording view and an in-memory session flag.
pub fn create_test_controller(
    backend: Arc<dyn CompletionBackend>,
    authenticated: bool,
) -> (ChatController<RecordingView>, ExchangeReceiver) {
    let (exchanges, rx) = ExchangeService::new();
    let controller = ChatController::new(
        RecordingView::default(),
        backend,
        exchanges,
        Box::new(MemorySessionStore::new(authenticated)),
        test_password(),
        TEST_GREETING.to_string(),
    );
    (controller, rx)
}

/// Authenticated controller over a real [`TerminalView`] with logging off.
pub fn create_terminal_controller(
    backend: Arc<dyn CompletionBackend>,
) -> (ChatController<TerminalView>, ExchangeReceiver) {
    let (exchanges, rx) = ExchangeService::new();
    let view = TerminalView::new(
        LoggingState::new(None).expect("logging without a file"),
        Theme::dark_default(),
    );
    let controller = ChatController::new(
        view,
        backend,
        exchanges,
        Box::new(MemorySessionStore::new(true)),
        test_password(),
        TEST_GREETING.to_string(),
    );
    (controller, rx)
}

/// Waits for the next outcome and hands it to the controller.
pub async fn settle_next_exchange<V: ChatView>(
    controller: &mut ChatController<V>,
    rx: &mut ExchangeReceiver,
) {
    let (outcome, exchange_id) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("exchange outcome should arrive")
        .expect("exchange channel open");
    controller.complete_exchange(exchange_id, outcome);
}

/// In-memory sink for diagnostic output, for asserting on what was logged.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// A subscriber that writes every event at debug level and above here.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().expect("log buffer lock")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn test_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("test client builds")
}

pub struct StubResponse {
    status: u16,
    body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal HTTP/1.1 server answering one request per connection with the
/// given responses, in order. Resolves to the captured requests.
pub async fn spawn_http_stub(
    responses: Vec<StubResponse>,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept connection");
            captured.push(read_http_request(&mut stream).await);

            let reason = if response.status < 400 { "OK" } else { "Error" };
            let raw = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                response.status,
                reason,
                response.body.len(),
                response.body
            );
            stream
                .write_all(raw.as_bytes())
                .await
                .expect("write response");
            let _ = stream.shutdown().await;
        }
        captured
    });

    (format!("http://{addr}/prod/chat"), handle)
}

async fn read_http_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
        let read = stream.read(&mut chunk).await.expect("read request");
        assert!(read > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.expect("read body");
        assert!(read > 0, "connection closed before body was complete");
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    CapturedRequest {
        request_line,
        headers,
        body,
    }
}
