//! Readers for the individual `SESSION_*` variables.
//!
//! Every reader follows one rule: a problem that has a safe fallback is a
//! warning in debug builds and an error in release builds.

use actix_web::cookie::SameSite;
use chrono::Duration;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const SPAN_EXPECTED: &str = "a positive whole number";

/// Fall back to `fallback` in debug builds, logging `warning`; fail with
/// `error` in release builds.
fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warning: &str,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "{}", warning);
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Read a required on/off toggle. Missing or unreadable values use
/// `default_value` only in debug builds.
pub(super) fn parse_bool_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default_value: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return lenient(
            mode,
            default_value,
            SessionConfigError::MissingEnv { name },
            "session toggle not set; using default",
        );
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => lenient(
            mode,
            default_value,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
            "unreadable session toggle; using default",
        ),
    }
}

/// Read `SESSION_SAMESITE`. Debug builds default to `Lax`, release builds
/// require the variable. `None` needs a secure cookie in release builds.
pub(super) fn parse_same_site_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            "SESSION_SAMESITE not set; using default",
        );
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            "SESSION_SAMESITE=None without a secure cookie; browsers may drop it",
        ),
        _ => lenient(
            mode,
            default_same_site,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
            "unreadable SESSION_SAMESITE; using default",
        ),
    }
}

/// Read a positive whole-number lifetime such as `SESSION_IDLE_MINUTES`.
/// Unset variables keep `default_value` in every build mode.
pub(super) fn parse_span_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    unit: fn(i64) -> Duration,
    default_value: Duration,
) -> Result<Duration, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default_value);
    };
    match value.trim().parse::<u16>() {
        Ok(amount) if amount > 0 => Ok(unit(i64::from(amount))),
        _ => lenient(
            mode,
            default_value,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: SPAN_EXPECTED,
            },
            "unreadable session lifetime; using default",
        ),
    }
}
