use std::error::Error;
use std::fmt;

use tracing::info;

use crate::core::backend::build_backend;
use crate::core::config::Config;
use crate::core::controller::{ChatController, ChatView};
use crate::core::exchange::{ExchangeReceiver, ExchangeService};
use crate::core::password::resolve_password;
use crate::core::session::FileSessionStore;

const ENDPOINT_FIXES: &[&str] = &[
    "yccoach set endpoint-url https://<api-id>.execute-api.<region>.amazonaws.com/prod/chat",
    "export YCCOACH_ENDPOINT=https://...",
    "yccoach set backend mock   # offline practice replies",
];

const PASSWORD_FIXES: &[&str] = &[
    "yccoach set-password",
    "export YCCOACH_PASSWORD=...",
    "yccoach set password-file ~/app_password.txt",
];

/// A problem that prevents the chat from starting. Printed with quick fixes
/// before the terminal is taken over.
#[derive(Debug)]
pub struct StartupError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl StartupError {
    pub fn missing_endpoint() -> Self {
        Self::new(
            "❌ The HTTP backend is selected but no completion endpoint is configured.",
            ENDPOINT_FIXES,
            2,
        )
    }

    pub fn invalid_endpoint(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            format!("❌ Invalid completion endpoint '{url}': {reason}"),
            ENDPOINT_FIXES,
            2,
        )
    }

    pub fn http_client(reason: impl fmt::Display) -> Self {
        Self::new(format!("❌ Could not build HTTP client: {reason}"), &[], 1)
    }

    pub fn missing_password() -> Self {
        Self::new(
            "❌ No login password is configured. The chat cannot be unlocked.",
            PASSWORD_FIXES,
            2,
        )
    }

    pub fn password_source(source: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            format!("❌ Could not read the login password from {source}: {reason}"),
            PASSWORD_FIXES,
            2,
        )
    }

    fn new(
        message: impl Into<String>,
        quick_fixes: &'static [&'static str],
        exit_code: i32,
    ) -> Self {
        Self {
            message: message.into(),
            quick_fixes,
            exit_code,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn print(&self) {
        eprintln!("{self}");
        if !self.quick_fixes.is_empty() {
            eprintln!();
            eprintln!("💡 Quick fixes:");
            for fix in self.quick_fixes {
                eprintln!("  • {fix}");
            }
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StartupError {}

/// Loads the config and wires a controller around `view`. Problems the user
/// can fix come back as a [`StartupError`] inside the box.
pub fn bootstrap_controller<V: ChatView>(
    view: V,
    force_mock: bool,
) -> Result<(ChatController<V>, ExchangeReceiver), Box<dyn Error>> {
    let config = Config::load()?;
    let backend = build_backend(&config, force_mock)?;
    let password = resolve_password(&config)?;
    let session = FileSessionStore::new();

    let (exchanges, outcomes) = ExchangeService::new();
    let controller = ChatController::new(
        view,
        backend,
        exchanges,
        Box::new(session),
        password,
        config.greeting().to_string(),
    );
    info!(
        backend = %controller.backend_label(),
        authenticated = controller.is_authenticated(),
        "controller ready"
    );
    Ok((controller, outcomes))
}
