use std::error::Error;
use sns_hook::errors::HookError;

#[test]
fn test_hook_error_implements_error_trait() {
    // Verify HookError implements the Error trait
    fn assert_error<T: Error>(_: &T) {}

    let error = HookError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_hook_error_display() {
    let error = HookError::ApiError("channel_not_found".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access Slack API: channel_not_found"
    );

    let error = HookError::AwsError("ssm get_parameter: throttled".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to interact with AWS services: ssm get_parameter: throttled"
    );

    let error = HookError::InvalidTopicPattern {
        pattern: "(".to_string(),
        reason: "unclosed group".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "Invalid topic pattern '(': unclosed group"
    );

    let error = HookError::TemplateError("Variable `page` not found".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to render page: Variable `page` not found"
    );
}

#[test]
fn test_hook_error_from_conversions() {
    let err = anyhow::anyhow!("test error");
    let hook_err: HookError = err.into();
    match hook_err {
        HookError::GeneralError(msg) => assert!(msg.contains("test error")),
        _ => panic!("Unexpected error type"),
    }

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(HookError::from(json_err), HookError::ParseError(_)));

    // reqwest::Error cannot be built directly; this only checks the conversion exists
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> HookError {
        HookError::from(err)
    }
}
