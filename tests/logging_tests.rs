use sns_hook::setup_logging;

#[test]
fn test_logging_setup_is_idempotent() {
    // A second call must not panic even though a global subscriber is already set
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
