//! Tests for the log context prefix
//!

use shared::Context;

#[test]
fn prefixes_user_and_step() {
    let context = Context {
        user: Some("alice".to_string()),
        step: "Folders",
    };

    assert_eq!(context.to_string(), "[alice] [Folders] ");
}

#[test]
fn omits_missing_user() {
    let context = Context {
        user: None,
        step: "Prepare",
    };

    assert_eq!(context.to_string(), "[Prepare] ");
}
