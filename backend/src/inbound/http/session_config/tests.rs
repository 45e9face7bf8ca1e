//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn with_secret(len: usize) -> HashMap<&'static str, String> {
    HashMap::from([(SESSION_SECRET_ENV, "k".repeat(len))])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn missing_secret_is_rejected(#[case] mode: BuildMode) {
    let env = mock_env(HashMap::new());
    let err = expect_error(
        session_settings_from_env(&env, mode),
        "expected missing secret to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::MissingEnv {
            name: SESSION_SECRET_ENV
        }
    ));
}

#[rstest]
fn blank_secret_counts_as_missing() {
    let env = mock_env(HashMap::from([(SESSION_SECRET_ENV, "   ".to_owned())]));
    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Debug),
        "expected blank secret to fail",
    );
    assert!(matches!(err, SessionConfigError::MissingEnv { .. }));
}

#[rstest]
fn release_short_secret_is_rejected() {
    let env = mock_env(with_secret(SESSION_SECRET_MIN_LEN - 1));
    let err = expect_error(
        session_settings_from_env(&env, BuildMode::Release),
        "expected short secret to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::SecretTooShort {
            length: 63,
            min_len: SESSION_SECRET_MIN_LEN
        }
    ));
}

#[rstest]
#[case(1)]
#[case(6)]
#[case(31)]
#[case(SESSION_SECRET_MIN_LEN - 1)]
fn debug_short_secret_is_stretched(#[case] length: usize) {
    let env = mock_env(with_secret(length));
    let first = session_settings_from_env(&env, BuildMode::Debug)
        .unwrap_or_else(|err| panic!("debug should accept short secret: {err}"));
    let second = session_settings_from_env(&env, BuildMode::Debug)
        .unwrap_or_else(|err| panic!("debug should accept short secret: {err}"));
    assert_eq!(first.same_site, SameSite::Lax);
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
fn same_secret_derives_same_key() {
    let env = mock_env(with_secret(SESSION_SECRET_MIN_LEN));
    let first = session_settings_from_env(&env, BuildMode::Release)
        .unwrap_or_else(|err| panic!("first resolution: {err}"));
    let second = session_settings_from_env(&env, BuildMode::Release)
        .unwrap_or_else(|err| panic!("second resolution: {err}"));
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
#[case(BuildMode::Debug, SameSite::Lax)]
#[case(BuildMode::Release, SameSite::Strict)]
fn toggles_default_when_absent(#[case] mode: BuildMode, #[case] same_site: SameSite) {
    let env = mock_env(with_secret(SESSION_SECRET_MIN_LEN));
    let settings = session_settings_from_env(&env, mode)
        .unwrap_or_else(|err| panic!("defaults should resolve: {err}"));
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, same_site);
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(#[case] value: &str) {
    let mut vars = with_secret(SESSION_SECRET_MIN_LEN);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn debug_invalid_same_site_falls_back() {
    let mut vars = with_secret(SESSION_SECRET_MIN_LEN);
    vars.insert(SAMESITE_ENV, "sideways".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .unwrap_or_else(|err| panic!("debug should fall back: {err}"));
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn release_insecure_none_same_site_is_rejected() {
    let mut vars = with_secret(SESSION_SECRET_MIN_LEN);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn secure_none_same_site_is_accepted() {
    let mut vars = with_secret(SESSION_SECRET_MIN_LEN);
    vars.insert(COOKIE_SECURE_ENV, "yes".to_owned());
    vars.insert(SAMESITE_ENV, "none".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .unwrap_or_else(|err| panic!("secure None should resolve: {err}"));
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn key_fingerprint_is_stable_and_short() {
    let env = mock_env(with_secret(SESSION_SECRET_MIN_LEN));
    let first = session_settings_from_env(&env, BuildMode::Release)
        .unwrap_or_else(|err| panic!("settings should resolve: {err}"));
    let second = session_settings_from_env(&env, BuildMode::Release)
        .unwrap_or_else(|err| panic!("settings should resolve: {err}"));
    let fingerprint = first.key_fingerprint();
    assert_eq!(fingerprint.len(), 16);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(fingerprint, second.key_fingerprint());
}
