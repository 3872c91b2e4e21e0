//! Field-level checks for item payloads.
//!
//! Every check returns a [`ValidationError`] with a stable `code`; the
//! service collects them per field into [`validator::ValidationErrors`].
//!
//! | code             | field                     |
//! |------------------|---------------------------|
//! | `required`       | name, last_modified_by    |
//! | `null`           | name, last_modified_by    |
//! | `blank`          | name                      |
//! | `max_length`     | name                      |
//! | `unique`         | name                      |
//! | `does_not_exist` | last_modified_by          |

use std::borrow::Cow;
use validator::ValidationError;

pub const NAME_MAX_LENGTH: usize = 255;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn required() -> ValidationError {
    error("required", "This field is required.")
}

pub fn not_null() -> ValidationError {
    error("null", "This field may not be null.")
}

/// Trim surrounding whitespace, then check the name is non-empty and short enough.
pub fn clean_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(error("blank", "This field may not be blank."));
    }

    let length = name.chars().count();
    if length > NAME_MAX_LENGTH {
        let mut err = error(
            "max_length",
            format!("Ensure this field has no more than {} characters.", NAME_MAX_LENGTH),
        );
        err.add_param(Cow::from("max_length"), &NAME_MAX_LENGTH);
        err.add_param(Cow::from("length"), &length);
        return Err(err);
    }

    Ok(name.to_string())
}

/// Descriptions are free text; only surrounding whitespace is dropped.
pub fn clean_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_string())
}

pub fn name_taken(name: &str) -> ValidationError {
    let mut err = error("unique", "item with this name already exists.");
    err.add_param(Cow::from("value"), &name);
    err
}

pub fn unknown_user(user_id: i32) -> ValidationError {
    let mut err = error(
        "does_not_exist",
        format!("Invalid pk \"{}\" - object does not exist.", user_id),
    );
    err.add_param(Cow::from("value"), &user_id);
    err
}
