//! Session and chat state machine.
//!
//! [`ChatController`] owns the login state, the committed [`Transcript`] and
//! the single in-flight exchange. It never touches a terminal: every visible
//! effect goes through [`ChatView`], and every request goes through the
//! [`ExchangeService`], whose outcomes the event loop feeds back into
//! [`ChatController::complete_exchange`].
//!
//! Sending is single-flight. While an exchange is pending, further sends are
//! rejected, not queued. The user turn is rendered immediately but committed
//! to the transcript only together with its reply, so a failed exchange
//! leaves the transcript exactly as it was.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::CompletionRequest;
use crate::core::backend::CompletionBackend;
use crate::core::exchange::{ExchangeOutcome, ExchangeService};
use crate::core::message::Message;
use crate::core::password::ExpectedPassword;
use crate::core::session::SessionStore;
use crate::core::transcript::Transcript;

pub const LOGIN_ERROR: &str = "Incorrect password. Please try again.";
pub const EMPTY_MESSAGE_ERROR: &str = "Please enter a message";
pub const GENERIC_EXCHANGE_ERROR: &str =
    "Sorry, there was an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Chat,
}

/// Everything the controller may ask of a UI surface.
pub trait ChatView {
    fn show_screen(&mut self, screen: Screen);
    fn render_turn(&mut self, message: &Message);
    /// Disables sending and shows the loading indicator while `true`.
    fn set_busy(&mut self, busy: bool);
    fn show_login_error(&mut self, text: &str);
    fn clear_login_error(&mut self);
    fn clear_password_input(&mut self);
    fn focus_password_input(&mut self);
    /// Drops all rendered turns and shows the greeting again.
    fn reset_chat(&mut self, greeting: &str);
}

/// How a delivered outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStatus {
    Committed,
    Failed,
    /// The exchange was abandoned (e.g. by logout) before it settled.
    Stale,
}

#[derive(Debug)]
struct PendingExchange {
    id: u64,
    message: String,
}

pub struct ChatController<V: ChatView> {
    view: V,
    backend: Arc<dyn CompletionBackend>,
    exchanges: ExchangeService,
    session: Box<dyn SessionStore>,
    password: ExpectedPassword,
    greeting: String,
    authenticated: bool,
    transcript: Transcript,
    pending: Option<PendingExchange>,
    last_exchange_id: u64,
}

impl<V: ChatView> ChatController<V> {
    /// Restores the persisted session flag and puts the view on the matching
    /// screen.
    pub fn new(
        view: V,
        backend: Arc<dyn CompletionBackend>,
        exchanges: ExchangeService,
        session: Box<dyn SessionStore>,
        password: ExpectedPassword,
        greeting: String,
    ) -> Self {
        let authenticated = session.is_authenticated();
        let mut controller = Self {
            view,
            backend,
            exchanges,
            session,
            password,
            greeting,
            authenticated,
            transcript: Transcript::new(),
            pending: None,
            last_exchange_id: 0,
        };

        controller.view.reset_chat(&controller.greeting);
        if authenticated {
            debug!("restored authenticated session");
            controller.view.show_screen(Screen::Chat);
        } else {
            controller.view.show_screen(Screen::Login);
            controller.view.focus_password_input();
        }
        controller
    }

    pub fn attempt_login(&mut self, submitted: &str) -> bool {
        if !self.password.matches(submitted) {
            info!("login rejected");
            self.view.show_login_error(LOGIN_ERROR);
            self.view.clear_password_input();
            self.view.focus_password_input();
            return false;
        }

        if let Err(err) = self.session.persist_authenticated() {
            warn!(error = %err, "could not persist session flag");
        }
        self.view.clear_login_error();
        if !self.authenticated {
            self.authenticated = true;
            info!(origin = %self.password.origin(), "login succeeded");
            self.view.show_screen(Screen::Chat);
        }
        true
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "could not clear session flag");
        }
        if let Some(pending) = self.pending.take() {
            debug!(exchange_id = pending.id, "abandoning in-flight exchange on logout");
        }
        self.authenticated = false;
        self.transcript.clear();

        self.view.set_busy(false);
        self.view.reset_chat(&self.greeting);
        self.view.show_screen(Screen::Login);
        self.view.clear_password_input();
        self.view.focus_password_input();
        info!("logged out");
    }

    /// Starts an exchange and returns its id, or `None` when nothing was sent.
    pub fn send_message(&mut self, raw_text: &str) -> Option<u64> {
        if !self.authenticated {
            debug!("send ignored: not authenticated");
            return None;
        }
        if let Some(pending) = &self.pending {
            debug!(exchange_id = pending.id, "send rejected: exchange in flight");
            return None;
        }

        let message = raw_text.trim();
        if message.is_empty() {
            self.view.render_turn(&Message::app_error(EMPTY_MESSAGE_ERROR));
            return None;
        }

        self.view.render_turn(&Message::user(message));

        let request = CompletionRequest::new(message, self.transcript.turns());
        self.last_exchange_id += 1;
        let exchange_id = self.last_exchange_id;
        self.pending = Some(PendingExchange {
            id: exchange_id,
            message: message.to_string(),
        });
        self.view.set_busy(true);

        debug!(
            exchange_id,
            history_len = request.history.len(),
            "dispatching exchange"
        );
        self.exchanges
            .spawn(Arc::clone(&self.backend), request, exchange_id);
        Some(exchange_id)
    }

    /// Applies an outcome delivered by the exchange service. Outcomes for
    /// anything but the pending exchange are dropped.
    pub fn complete_exchange(
        &mut self,
        exchange_id: u64,
        outcome: ExchangeOutcome,
    ) -> ExchangeStatus {
        let Some(pending) = self.pending.take_if(|pending| pending.id == exchange_id) else {
            debug!(exchange_id, "discarding stale exchange outcome");
            return ExchangeStatus::Stale;
        };

        let status = match outcome {
            ExchangeOutcome::Reply(response) => {
                info!(
                    exchange_id,
                    tokens_used = ?response.tokens_used,
                    model_used = ?response.model_used,
                    "exchange completed"
                );
                self.view.render_turn(&Message::assistant(response.response.as_str()));
                self.transcript
                    .commit_exchange(pending.message, response.response);
                ExchangeStatus::Committed
            }
            ExchangeOutcome::Failed(reason) => {
                warn!(exchange_id, %reason, "exchange failed");
                self.view.render_turn(&Message::app_error(GENERIC_EXCHANGE_ERROR));
                ExchangeStatus::Failed
            }
        };

        self.view.set_busy(false);
        status
    }

    /// Renders an app-authored note that is never sent or committed.
    pub fn show_notice(&mut self, text: &str) {
        self.view.render_turn(&Message::app_info(text));
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn backend_label(&self) -> String {
        self.backend.describe()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CompletionResponse, HistoryTurn};
    use crate::core::backend::HttpBackend;
    use crate::utils::test_utils::{
        create_test_controller, settle_next_exchange, spawn_http_stub, test_http_client,
        CapturedLogs, ScriptedBackend, StubResponse, ViewEvent, TEST_GREETING, TEST_PASSWORD,
    };

    fn history(turns: &[(&str, &str)]) -> Vec<HistoryTurn> {
        turns
            .iter()
            .map(|(role, content)| HistoryTurn {
                role: role.to_string(),
                content: content.to_string(),
            })
            .collect()
    }

    #[test]
    fn starts_on_login_screen_without_persisted_flag() {
        let (controller, _rx) = create_test_controller(ScriptedBackend::new([]), false);
        assert!(!controller.is_authenticated());
        assert_eq!(
            controller.view().events,
            vec![
                ViewEvent::ResetChat(TEST_GREETING.to_string()),
                ViewEvent::Screen(Screen::Login),
                ViewEvent::FocusPassword,
            ]
        );
    }

    #[test]
    fn persisted_flag_skips_login() {
        let (controller, _rx) = create_test_controller(ScriptedBackend::new([]), true);
        assert!(controller.is_authenticated());
        assert_eq!(controller.view().screens(), vec![Screen::Chat]);
    }

    #[test]
    fn correct_password_switches_screen_exactly_once() {
        let (mut controller, _rx) = create_test_controller(ScriptedBackend::new([]), false);
        controller.view_mut().clear();

        assert!(controller.attempt_login(&format!("  {TEST_PASSWORD} ")));
        assert!(controller.attempt_login(TEST_PASSWORD));

        assert!(controller.is_authenticated());
        assert_eq!(controller.view().screens(), vec![Screen::Chat]);
        assert!(controller
            .view()
            .events
            .contains(&ViewEvent::ClearLoginError));
    }

    #[test]
    fn wrong_password_shows_error_and_keeps_screen() {
        let (mut controller, _rx) = create_test_controller(ScriptedBackend::new([]), false);
        controller.view_mut().clear();

        assert!(!controller.attempt_login("yc-coach-2024"));

        assert!(!controller.is_authenticated());
        assert_eq!(
            controller.view().events,
            vec![
                ViewEvent::LoginError(LOGIN_ERROR.to_string()),
                ViewEvent::ClearPassword,
                ViewEvent::FocusPassword,
            ]
        );
    }

    #[test]
    fn sending_before_login_does_nothing() {
        let backend = ScriptedBackend::new([Ok("unused")]);
        let (mut controller, _rx) = create_test_controller(backend.clone(), false);
        controller.view_mut().clear();

        assert_eq!(controller.send_message("Hello"), None);
        assert!(controller.view().events.is_empty());
        assert!(!controller.is_busy());
    }

    #[test]
    fn blank_message_renders_validation_error_without_request() {
        let backend = ScriptedBackend::new([]);
        let (mut controller, _rx) = create_test_controller(backend.clone(), true);
        controller.view_mut().clear();

        assert_eq!(controller.send_message("   \n\t"), None);

        assert_eq!(
            controller.view().turns(),
            vec![Message::app_error(EMPTY_MESSAGE_ERROR)]
        );
        assert!(!controller.is_busy());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn first_message_is_sent_with_empty_history_and_committed_in_order() {
        let backend = ScriptedBackend::new([Ok("Hi there")]);
        let (mut controller, mut rx) = create_test_controller(backend.clone(), true);
        controller.view_mut().clear();

        assert!(controller.send_message("Hello").is_some());
        assert!(controller.is_busy());
        assert!(controller.transcript().is_empty());
        settle_next_exchange(&mut controller, &mut rx).await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "Hello");
        assert!(requests[0].history.is_empty());

        assert_eq!(
            controller.transcript().turns(),
            &[Message::user("Hello"), Message::assistant("Hi there")]
        );
        assert_eq!(
            controller.view().events,
            vec![
                ViewEvent::Turn(Message::user("Hello")),
                ViewEvent::Busy(true),
                ViewEvent::Turn(Message::assistant("Hi there")),
                ViewEvent::Busy(false),
            ]
        );
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn second_request_carries_first_exchange_as_history() {
        let backend = ScriptedBackend::new([Ok("first reply"), Ok("second reply")]);
        let (mut controller, mut rx) = create_test_controller(backend.clone(), true);

        controller.send_message("A");
        settle_next_exchange(&mut controller, &mut rx).await;
        controller.send_message("B");
        settle_next_exchange(&mut controller, &mut rx).await;

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].message, "B");
        assert_eq!(
            requests[1].history,
            history(&[("user", "A"), ("assistant", "first reply")])
        );
        assert_eq!(controller.transcript().len(), 4);
    }

    #[tokio::test]
    async fn sends_while_busy_are_rejected_without_requests() {
        let backend = ScriptedBackend::new([Ok("only reply")]);
        let (mut controller, mut rx) = create_test_controller(backend.clone(), true);
        controller.view_mut().clear();

        let first = controller.send_message("first");
        assert!(first.is_some());
        assert_eq!(controller.send_message("second"), None);
        assert_eq!(controller.send_message("third"), None);
        settle_next_exchange(&mut controller, &mut rx).await;

        assert_eq!(backend.requests().len(), 1);
        assert_eq!(
            controller.view().turns(),
            vec![Message::user("first"), Message::assistant("only reply")]
        );
        assert_eq!(
            controller.transcript().turns(),
            &[Message::user("first"), Message::assistant("only reply")]
        );
    }

    #[tokio::test]
    async fn failed_exchange_leaves_transcript_untouched_and_retry_resends_same_history() {
        let backend = ScriptedBackend::new([Ok("ok"), Err(502), Ok("retried")]);
        let (mut controller, mut rx) = create_test_controller(backend.clone(), true);

        controller.send_message("A");
        settle_next_exchange(&mut controller, &mut rx).await;
        let before = controller.transcript().turns().to_vec();

        controller.view_mut().clear();
        controller.send_message("B");
        settle_next_exchange(&mut controller, &mut rx).await;

        assert_eq!(controller.transcript().turns(), before.as_slice());
        assert_eq!(
            controller.view().events,
            vec![
                ViewEvent::Turn(Message::user("B")),
                ViewEvent::Busy(true),
                ViewEvent::Turn(Message::app_error(GENERIC_EXCHANGE_ERROR)),
                ViewEvent::Busy(false),
            ]
        );

        controller.send_message("B");
        settle_next_exchange(&mut controller, &mut rx).await;
        let requests = backend.requests();
        assert_eq!(requests[1].history, requests[2].history);
        assert_eq!(controller.transcript().len(), 4);
    }

    #[tokio::test]
    async fn http_500_renders_generic_error_and_clears_busy() {
        let (url, server) = spawn_http_stub(vec![StubResponse::json(
            500,
            r#"{"error":"Internal server error"}"#,
        )])
        .await;
        let backend =
            HttpBackend::with_client(test_http_client(), &url, None).expect("stub url is valid");
        let (mut controller, mut rx) = create_test_controller(Arc::new(backend), true);
        controller.view_mut().clear();

        controller.send_message("Hello");
        settle_next_exchange(&mut controller, &mut rx).await;

        assert!(controller.transcript().is_empty());
        assert!(!controller.is_busy());
        assert_eq!(
            controller.view().turns(),
            vec![
                Message::user("Hello"),
                Message::app_error(GENERIC_EXCHANGE_ERROR)
            ]
        );
        assert_eq!(
            controller.view().events.last(),
            Some(&ViewEvent::Busy(false))
        );

        let captured = server.await.expect("stub server joins");
        let body: serde_json::Value =
            serde_json::from_slice(&captured[0].body).expect("request body is json");
        assert_eq!(body["message"], "Hello");
        assert_eq!(body["history"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn failure_cause_is_logged_but_never_shown() {
        let backend = ScriptedBackend::new([Err(500)]);
        let (mut controller, mut rx) = create_test_controller(backend, true);
        controller.view_mut().clear();

        controller.send_message("Hello");
        let (outcome, exchange_id) = rx.recv().await.expect("exchange outcome");

        let logs = CapturedLogs::default();
        let status = tracing::subscriber::with_default(logs.subscriber(), || {
            controller.complete_exchange(exchange_id, outcome)
        });

        assert_eq!(status, ExchangeStatus::Failed);
        let diagnostics = logs.contents();
        assert!(diagnostics.contains("exchange failed"));
        assert!(diagnostics.contains("HTTP 500"));

        let turns = controller.view().turns();
        assert_eq!(
            turns,
            vec![
                Message::user("Hello"),
                Message::app_error(GENERIC_EXCHANGE_ERROR)
            ]
        );
        assert!(turns.iter().all(|turn| !turn.content.contains("500")));
    }

    #[tokio::test]
    async fn logout_always_ends_unauthenticated_with_empty_transcript() {
        let backend = ScriptedBackend::new([Ok("reply")]);
        let (mut controller, mut rx) = create_test_controller(backend, true);
        controller.send_message("A");
        settle_next_exchange(&mut controller, &mut rx).await;
        assert_eq!(controller.transcript().len(), 2);

        controller.view_mut().clear();
        controller.logout();

        assert!(!controller.is_authenticated());
        assert!(controller.transcript().is_empty());
        assert_eq!(
            controller.view().events,
            vec![
                ViewEvent::Busy(false),
                ViewEvent::ResetChat(TEST_GREETING.to_string()),
                ViewEvent::Screen(Screen::Login),
                ViewEvent::ClearPassword,
                ViewEvent::FocusPassword,
            ]
        );

        controller.logout();
        assert!(!controller.is_authenticated());
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn reply_arriving_after_logout_is_discarded() {
        let backend = ScriptedBackend::new([Ok("late reply"), Ok("fresh reply")]);
        let (mut controller, mut rx) = create_test_controller(backend, true);

        let stale = controller.send_message("before logout").expect("dispatched");
        controller.logout();
        controller.view_mut().clear();

        let (outcome, exchange_id) = rx.recv().await.expect("outcome delivered");
        assert_eq!(exchange_id, stale);
        assert_eq!(
            controller.complete_exchange(exchange_id, outcome),
            ExchangeStatus::Stale
        );
        assert!(controller.view().events.is_empty());
        assert!(controller.transcript().is_empty());

        assert!(controller.attempt_login(TEST_PASSWORD));
        controller.send_message("after login");
        settle_next_exchange(&mut controller, &mut rx).await;
        assert_eq!(
            controller.transcript().turns(),
            &[
                Message::user("after login"),
                Message::assistant("fresh reply")
            ]
        );
    }

    #[test]
    fn outcome_for_unknown_exchange_is_ignored() {
        let (mut controller, _rx) = create_test_controller(ScriptedBackend::new([]), true);
        let status = controller.complete_exchange(
            42,
            ExchangeOutcome::Reply(CompletionResponse::reply("ghost")),
        );
        assert_eq!(status, ExchangeStatus::Stale);
        assert!(controller.transcript().is_empty());
    }
}
