//! End-to-end behaviour of `clean_env`.

#![allow(clippy::pedantic)]

use std::sync::{Arc, Mutex};

use cleanenv::validators::{bool, json, num, port, str};
use cleanenv::{
    EnvValue, Error, ErrorReport, MODE_KEY, Mode, Options, RawEnv, Source, SpecMap, SpecOptions,
    clean_env,
};

fn options() -> Options {
    Options::new().no_dotenv()
}

/// Options whose reporter stashes the collected error keys and lets the run
/// through.
fn collecting(seen: Arc<Mutex<Vec<String>>>) -> Options {
    options().reporter(move |report: ErrorReport<'_>| -> Result<(), Error> {
        seen.lock().unwrap().extend(report.errors.into_keys());
        Ok(())
    })
}

// ============================================================================
// Missing values
// ============================================================================

#[test]
fn test_missing_without_default_is_reported() {
    let specs = SpecMap::new().with("DATABASE_URL", str(SpecOptions::new()));

    let err = clean_env(RawEnv::new(), &specs, options()).unwrap_err();
    assert!(matches!(err, Error::Missing { ref key, .. } if key == "DATABASE_URL"));
}

#[test]
fn test_missing_without_default_throws_in_throw_mode() {
    let specs = SpecMap::new().with("DATABASE_URL", str(SpecOptions::new()));

    let err = clean_env(RawEnv::new(), &specs, options().throw_on_error()).unwrap_err();
    assert_eq!(err.key(), Some("DATABASE_URL"));
}

#[test]
fn test_all_errors_reported_together() {
    let specs = SpecMap::new()
        .with("A", str(SpecOptions::new()))
        .with("B", num(SpecOptions::new()))
        .with("C", port(SpecOptions::new()));
    let raw = RawEnv::from_pairs([("B", "x"), ("C", "99999")]);

    let err = clean_env(raw, &specs, options()).unwrap_err();
    let Error::Multiple { errors } = err else {
        panic!("Expected Multiple variant");
    };
    let keys: Vec<_> = errors.iter().filter_map(Error::key).collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_falsy_defaults_are_kept() {
    let specs = SpecMap::new()
        .with("ZERO", num(SpecOptions::new().default("0")))
        .with("EMPTY", str(SpecOptions::new().default("")))
        .with("OFF", bool(SpecOptions::new().default("false")))
        .with("NOTHING", str(SpecOptions::new().optional()));

    let env = clean_env(RawEnv::new(), &specs, options()).unwrap();

    assert_eq!(env.get("ZERO"), Some(&EnvValue::Integer(0)));
    assert_eq!(env.get_str("EMPTY"), Some(""));
    assert_eq!(env.get_bool("OFF"), Some(false));
    assert!(env.get("NOTHING").is_none());
    assert_eq!(env.sources().get("NOTHING"), Some(&Source::NotSet));
}

#[test]
fn test_dev_default_only_outside_production() {
    let specs = SpecMap::new().with(
        "LOG_LEVEL",
        str(SpecOptions::new().default("info").dev_default("debug")),
    );

    let dev = clean_env(
        RawEnv::new().with(MODE_KEY, "development"),
        &specs,
        options(),
    )
    .unwrap();
    assert_eq!(dev.get_str("LOG_LEVEL"), Some("debug"));
    assert_eq!(dev.sources().get("LOG_LEVEL"), Some(&Source::DevDefault));

    let prod = clean_env(
        RawEnv::new().with(MODE_KEY, "production"),
        &specs,
        options(),
    )
    .unwrap();
    assert_eq!(prod.get_str("LOG_LEVEL"), Some("info"));

    let unset = clean_env(RawEnv::new(), &specs, options()).unwrap();
    assert_eq!(unset.get_str("LOG_LEVEL"), Some("info"));
}

#[test]
fn test_dev_default_follows_overridden_mode_default() {
    let specs = SpecMap::new()
        .with(
            MODE_KEY,
            str(SpecOptions::new()
                .choices(["development", "test", "production"])
                .default("development")),
        )
        .with("SECRET", str(SpecOptions::new().dev_default("dev-secret")));

    let env = clean_env(RawEnv::new(), &specs, options()).unwrap();
    assert!(env.is_development());
    assert_eq!(env.get_str("SECRET"), Some("dev-secret"));
}

#[test]
fn test_test_only_default() {
    let specs = SpecMap::new().with(
        "FIXTURES",
        str(SpecOptions::new()
            .test_only("./fixtures")
            .desc("Fixture directory")),
    );

    let in_test = clean_env(RawEnv::new().with(MODE_KEY, "test"), &specs, options()).unwrap();
    assert_eq!(in_test.get_str("FIXTURES"), Some("./fixtures"));
    assert_eq!(in_test.sources().get("FIXTURES"), Some(&Source::TestDefault));

    let err = clean_env(
        RawEnv::new().with(MODE_KEY, "production"),
        &specs,
        options(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Missing { ref help, .. } if help == "Fixture directory"));
}

#[test]
fn test_environment_value_wins_over_defaults() {
    let specs = SpecMap::new().with("PORT", port(SpecOptions::new().default("8080")));

    let env = clean_env(RawEnv::new().with("PORT", "3000"), &specs, options()).unwrap();
    assert_eq!(env.get_i64("PORT"), Some(3000));
    assert_eq!(env.sources().get("PORT"), Some(&Source::Environment));
}

// ============================================================================
// Parsing & choices
// ============================================================================

#[test]
fn test_numeric_value_is_typed() {
    let specs = SpecMap::new().with("FOO", num(SpecOptions::new()));

    let env = clean_env(RawEnv::new().with("FOO", "3"), &specs, options()).unwrap();
    assert_eq!(env["FOO"], EnvValue::Integer(3));
}

#[test]
fn test_numeric_choices_accept_equal_spellings() {
    let specs = SpecMap::new().with("N", num(SpecOptions::new().choices([1_i64, 2])));

    for raw in ["1", "1.0", "1e0"] {
        let env = clean_env(RawEnv::new().with("N", raw), &specs, options()).unwrap();
        assert_eq!(env.get("N"), Some(&EnvValue::Integer(1)), "{raw}");
    }

    let floats = SpecMap::new().with("N", num(SpecOptions::new().choices([EnvValue::Float(1.0)])));
    let env = clean_env(RawEnv::new().with("N", "1"), &floats, options()).unwrap();
    assert_eq!(env.get_f64("N"), Some(1.0));
}

#[test]
fn test_choice_enforcement() {
    let specs = SpecMap::new().with("LETTER", str(SpecOptions::new().choices(["a", "b"])));

    let err = clean_env(RawEnv::new().with("LETTER", "c"), &specs, options()).unwrap_err();
    assert!(matches!(err, Error::InvalidChoice { ref choices, .. } if choices.len() == 2));

    let env = clean_env(RawEnv::new().with("LETTER", "a"), &specs, options()).unwrap();
    assert_eq!(env.get_str("LETTER"), Some("a"));
}

#[test]
fn test_default_is_checked_against_choices() {
    let specs = SpecMap::new().with(
        "LETTER",
        str(SpecOptions::new().choices(["a", "b"]).default("z")),
    );

    let err = clean_env(RawEnv::new(), &specs, options()).unwrap_err();
    assert!(matches!(err, Error::InvalidChoice { .. }));
}

#[test]
fn test_json_values() {
    let specs = SpecMap::new().with("LIMITS", json(SpecOptions::new().default(r#"{"rps": 10}"#)));

    let env = clean_env(RawEnv::new(), &specs, options()).unwrap();
    assert_eq!(
        env.get("LIMITS").and_then(EnvValue::as_json),
        Some(&serde_json::json!({"rps": 10}))
    );
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_config_error_ignores_custom_reporter() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let specs = SpecMap::new().with("BROKEN", SpecOptions::new().into_spec(None));

    let err = clean_env(RawEnv::new(), &specs, collecting(Arc::clone(&seen))).unwrap_err();
    assert!(err.is_config());
    assert!(seen.lock().unwrap().is_empty());
}

// ============================================================================
// Conditional keys
// ============================================================================

fn tls_specs() -> SpecMap {
    SpecMap::new()
        .with(
            "TLS_CERT",
            str(SpecOptions::new().required_when(|env| {
                env.get("TLS").and_then(EnvValue::as_bool) == Some(true)
            })),
        )
        .with("TLS", bool(SpecOptions::new().default("false")))
}

#[test]
fn test_conditional_key_not_required() {
    let env = clean_env(RawEnv::new(), &tls_specs(), options()).unwrap();

    assert!(env.get("TLS_CERT").is_none());
    assert!(env.sources().get("TLS_CERT").is_none());
}

#[test]
fn test_conditional_key_required() {
    let err = clean_env(RawEnv::new().with("TLS", "true"), &tls_specs(), options()).unwrap_err();
    assert!(matches!(err, Error::Missing { ref key, .. } if key == "TLS_CERT"));
}

#[test]
fn test_conditional_key_in_throw_mode() {
    let env = clean_env(RawEnv::new(), &tls_specs(), options().throw_on_error()).unwrap();
    assert!(env.get("TLS_CERT").is_none());

    let err = clean_env(
        RawEnv::new().with("TLS", "true"),
        &tls_specs(),
        options().throw_on_error(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Missing { ref key, .. } if key == "TLS_CERT"));
}

#[test]
fn test_conditional_key_present_is_validated() {
    let env = clean_env(
        RawEnv::from_pairs([("TLS", "true"), ("TLS_CERT", "/etc/cert.pem")]),
        &tls_specs(),
        options(),
    )
    .unwrap();
    assert_eq!(env.get_str("TLS_CERT"), Some("/etc/cert.pem"));
}

// ============================================================================
// Output assembly
// ============================================================================

#[test]
fn test_non_strict_passthrough() {
    let specs = SpecMap::new().with("FOO", num(SpecOptions::new()));
    let raw = RawEnv::from_pairs([("FOO", "3"), ("UNDECLARED", "x")]);

    let env = clean_env(raw, &specs, options()).unwrap();
    assert_eq!(env.get("FOO"), Some(&EnvValue::Integer(3)));
    assert_eq!(env.get_str("UNDECLARED"), Some("x"));
    assert!(env.try_get("UNDECLARED").is_ok());
}

#[test]
fn test_strict_mode() {
    let specs = SpecMap::new().with("FOO", num(SpecOptions::new()));
    let raw = RawEnv::from_pairs([("FOO", "3"), ("UNDECLARED", "x")]);

    let env = clean_env(raw, &specs, options().strict(true)).unwrap();
    assert!(env.is_strict());
    assert!(env.get("UNDECLARED").is_none());
    assert!(matches!(
        env.try_get("UNDECLARED"),
        Err(Error::Undeclared { .. })
    ));
    assert_eq!(env.try_get("FOO").unwrap(), Some(&EnvValue::Integer(3)));
    assert_eq!(env.keys().collect::<Vec<_>>(), vec!["FOO", MODE_KEY]);
}

#[test]
fn test_mode_flags() {
    let env = clean_env(RawEnv::new().with(MODE_KEY, "test"), &SpecMap::new(), options()).unwrap();

    assert_eq!(env.mode(), Some(Mode::Test));
    assert!(env.is_test());
    assert!(!env.is_dev());
    assert!(!env.is_development());
    assert!(!env.is_prod());
    assert!(!env.is_production());
}

#[test]
fn test_default_mode_is_production() {
    let env = clean_env(RawEnv::new(), &SpecMap::new(), options()).unwrap();
    assert!(env.is_production());
    assert_eq!(env.get_str(MODE_KEY), Some("production"));
}

#[test]
fn test_invalid_mode_is_an_error() {
    let err = clean_env(RawEnv::new().with(MODE_KEY, "staging"), &SpecMap::new(), options())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidChoice { ref key, .. } if key == MODE_KEY));
}

#[test]
fn test_transformer_runs_before_freeze() {
    let specs = SpecMap::new().with("PORT", port(SpecOptions::new().default("8080")));
    let options = options().transformer(|draft| {
        let next = draft.get("PORT").and_then(EnvValue::to_i64).unwrap_or(0) + 1;
        draft.insert("NEXT_PORT", EnvValue::Integer(next));
        draft.insert(MODE_KEY, "development");
    });

    let env = clean_env(RawEnv::new(), &specs, options).unwrap();
    assert_eq!(env.get_i64("NEXT_PORT"), Some(8081));
    // Flags are fixed at assembly time.
    assert!(env.is_production());
}

#[test]
fn test_custom_reporter_lets_run_through() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let specs = SpecMap::new()
        .with("A", num(SpecOptions::new()))
        .with("B", num(SpecOptions::new().default("2")));

    let env = clean_env(RawEnv::new(), &specs, collecting(Arc::clone(&seen))).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["A".to_string()]);
    assert!(env.get("A").is_none());
    assert_eq!(env.get_i64("B"), Some(2));
}

#[test]
fn test_reporter_called_once_on_clean_run() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let options = options().reporter(move |report: ErrorReport<'_>| -> Result<(), Error> {
        assert!(report.is_clean());
        assert!(report.env.get(MODE_KEY).is_some());
        *counter.lock().unwrap() += 1;
        Ok(())
    });

    clean_env(RawEnv::new(), &SpecMap::new(), options).unwrap();
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn test_input_map_is_not_mutated() {
    let specs = SpecMap::new().with("PORT", port(SpecOptions::new().default("8080")));
    let raw = RawEnv::from_pairs([("OTHER", "1")]);
    let before = raw.clone();

    clean_env(raw.clone(), &specs, options()).unwrap();
    assert_eq!(raw, before);
    assert!(!raw.contains_key("PORT"));
}
