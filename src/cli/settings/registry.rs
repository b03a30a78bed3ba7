//! Registry of configurable keys.

use std::path::PathBuf;

use reqwest::Url;

use super::error::SettingError;
use super::FieldHandler;
use crate::core::config::data::path_display;
use crate::core::config::{BackendKind, Config};

/// All keys in display order.
pub static SETTINGS: &[FieldHandler] = &[
    FieldHandler {
        key: "endpoint-url",
        example: "yccoach set endpoint-url https://abc123.execute-api.us-east-1.amazonaws.com/prod/chat",
        secret: false,
        apply: set_endpoint_url,
        clear: |config| config.endpoint_url = None,
    },
    FieldHandler {
        key: "backend",
        example: "yccoach set backend mock",
        secret: false,
        apply: set_backend,
        clear: |config| config.backend = None,
    },
    FieldHandler {
        key: "api-key",
        example: "yccoach set api-key <gateway key>",
        secret: true,
        apply: set_api_key,
        clear: |config| config.api_key = None,
    },
    FieldHandler {
        key: "password-file",
        example: "yccoach set password-file ~/app_password.txt",
        secret: false,
        apply: set_password_file,
        clear: |config| config.password_file = None,
    },
    FieldHandler {
        key: "greeting",
        example: "yccoach set greeting \"Let's work on your application.\"",
        secret: false,
        apply: set_greeting,
        clear: |config| config.greeting = None,
    },
    FieldHandler {
        key: "mock-latency-ms",
        example: "yccoach set mock-latency-ms 250",
        secret: false,
        apply: set_mock_latency,
        clear: |config| config.mock_latency_ms = None,
    },
];

pub fn find_setting(key: &str) -> Option<&'static FieldHandler> {
    SETTINGS
        .iter()
        .find(|setting| setting.key.eq_ignore_ascii_case(key))
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> SettingError {
    SettingError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn set_endpoint_url(config: &mut Config, value: &str) -> Result<String, SettingError> {
    let url = Url::parse(value).map_err(|err| invalid("endpoint-url", value, err))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("endpoint-url", value, "expected an http or https URL"));
    }
    config.endpoint_url = Some(url.to_string());
    Ok(url.to_string())
}

fn set_backend(config: &mut Config, value: &str) -> Result<String, SettingError> {
    let kind = BackendKind::parse(value)
        .ok_or_else(|| invalid("backend", value, "expected 'http' or 'mock'"))?;
    config.backend = Some(kind);
    Ok(kind.to_string())
}

fn set_api_key(config: &mut Config, value: &str) -> Result<String, SettingError> {
    config.api_key = Some(value.to_string());
    Ok(value.to_string())
}

fn set_password_file(config: &mut Config, value: &str) -> Result<String, SettingError> {
    let path = expand_home(value);
    if !path.is_file() {
        return Err(invalid("password-file", value, "no such file"));
    }
    let display = path_display(&path);
    config.password_file = Some(path);
    Ok(display)
}

fn set_greeting(config: &mut Config, value: &str) -> Result<String, SettingError> {
    config.greeting = Some(value.to_string());
    Ok(value.to_string())
}

fn set_mock_latency(config: &mut Config, value: &str) -> Result<String, SettingError> {
    let millis = value
        .parse::<u64>()
        .map_err(|err| invalid("mock-latency-ms", value, err))?;
    config.mock_latency_ms = Some(millis);
    Ok(millis.to_string())
}

fn expand_home(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(value),
    }
}
