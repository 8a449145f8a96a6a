//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use uuid::Uuid;

struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("menus-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write temporary key");
        Self { path }
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn key_file() -> TempKeyFile {
    TempKeyFile::new(SESSION_KEY_MIN_LEN)
}

fn release_vars(key_file: &TempKeyFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_file.path_str()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_settings_use_default_policy(key_file: TempKeyFile) {
    let env = mock_env(release_vars(&key_file));
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.policy, SessionPolicy::default());
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_cookie_toggles(key_file: TempKeyFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&key_file);
    vars.remove(missing);
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("missing toggle rejected");
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_malformed_cookie_secure(key_file: TempKeyFile, #[case] value: &str) {
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("malformed flag rejected");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());
    let env = mock_env(vars);

    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("ephemeral rejected");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_or_missing_keys() {
    let short = TempKeyFile::new(32);
    let env = mock_env(release_vars(&short));
    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("short key rejected");
    assert!(matches!(err, SessionConfigError::KeyTooShort { .. }));

    let mut vars = release_vars(&short);
    vars.insert(KEY_FILE_ENV, "/nonexistent/menus/session_key".to_owned());
    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("missing key rejected");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_insecure_same_site_none(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let err = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("insecure SameSite=None rejected");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn lifetimes_are_read_in_their_units(key_file: TempKeyFile) {
    let mut vars = release_vars(&key_file);
    vars.insert(IDLE_MINUTES_ENV, "10".to_owned());
    vars.insert(ABSOLUTE_HOURS_ENV, "4".to_owned());
    vars.insert(REMEMBER_DAYS_ENV, " 7 ".to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Release).expect("valid settings");
    assert_eq!(settings.policy.idle_timeout, Duration::minutes(10));
    assert_eq!(settings.policy.absolute_lifetime, Duration::hours(4));
    assert_eq!(settings.policy.remember_me_lifetime, Duration::days(7));
}

#[rstest]
#[case("0")]
#[case("-5")]
#[case("soon")]
fn malformed_lifetimes_fail_in_release_and_default_in_debug(
    key_file: TempKeyFile,
    #[case] value: &str,
) {
    let mut vars = release_vars(&key_file);
    vars.insert(IDLE_MINUTES_ENV, value.to_owned());

    let err = session_settings_from_env(&mock_env(vars.clone()), BuildMode::Release)
        .err()
        .expect("malformed lifetime rejected");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: IDLE_MINUTES_ENV,
            ..
        }
    ));

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug falls back");
    assert_eq!(
        settings.policy.idle_timeout,
        SessionPolicy::default().idle_timeout
    );
}

#[rstest]
fn debug_defaults_allow_ephemeral_key() {
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, "/nonexistent/menus/session_key".to_owned());
    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_tiny_key_files_fall_back_to_generated_key() {
    let tiny = TempKeyFile::new(8);
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, tiny.path_str());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("tiny key tolerated in debug");
    assert!(settings.cookie_secure);
}

#[rstest]
fn process_environment_is_read_through_default_env() {
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some("/nonexistent/menus/session_key".to_owned())),
        (COOKIE_SECURE_ENV, Some("0".to_owned())),
        (SAMESITE_ENV, Some("Strict".to_owned())),
        (ALLOW_EPHEMERAL_ENV, None),
        (IDLE_MINUTES_ENV, Some("20".to_owned())),
        (ABSOLUTE_HOURS_ENV, None),
        (REMEMBER_DAYS_ENV, None),
    ]);
    let settings = session_settings_from_env(&mockable::DefaultEnv::new(), BuildMode::Debug)
        .expect("debug settings from the process environment");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.policy.idle_timeout, Duration::minutes(20));
}
