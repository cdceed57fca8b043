//! Request body validation
//!
//! Fields are checked in schema order and the first failure wins. Text
//! fields must be non-empty JSON strings. Unknown keys (including `authKey`)
//! are ignored and never reach the store.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::store::{NewLog, NewPost, NewQuote, PostPatch};
use crate::types::{GatewayError, Result};

const POST_FIELDS: [&str; 4] = ["title", "description", "thumbnail", "content"];

/// Parse a request body into a JSON object. An empty body counts as `{}`.
pub fn parse_body(body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) if value.is_object() => Ok(value),
        _ => Err(GatewayError::BadRequest("Invalid JSON body".into())),
    }
}

fn invalid(field: &str, message: String) -> GatewayError {
    GatewayError::Validation {
        field: field.to_string(),
        message,
    }
}

/// `None` only when the key is absent; a present value (including `null`)
/// must be a non-empty string
fn optional_text(body: &Value, field: &str) -> Result<Option<String>> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => {
            Err(invalid(field, format!("{field} must not be empty")))
        }
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(field, format!("{field} must be a string"))),
    }
}

fn required_text(body: &Value, field: &str) -> Result<String> {
    optional_text(body, field)?.ok_or_else(|| invalid(field, format!("{field} is required")))
}

pub fn new_post(body: &Value) -> Result<NewPost> {
    let [title, description, thumbnail, content] = POST_FIELDS;
    Ok(NewPost {
        title: required_text(body, title)?,
        description: required_text(body, description)?,
        thumbnail: required_text(body, thumbnail)?,
        content: required_text(body, content)?,
    })
}

pub fn post_patch(body: &Value) -> Result<PostPatch> {
    let [title, description, thumbnail, content] = POST_FIELDS;
    Ok(PostPatch {
        title: optional_text(body, title)?,
        description: optional_text(body, description)?,
        thumbnail: optional_text(body, thumbnail)?,
        content: optional_text(body, content)?,
    })
}

pub fn new_quote(body: &Value) -> Result<NewQuote> {
    Ok(NewQuote {
        content: required_text(body, "content")?,
        author: required_text(body, "author")?,
    })
}

pub fn new_log(body: &Value) -> Result<NewLog> {
    Ok(NewLog {
        title: required_text(body, "title")?,
        content: required_text(body, "content")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failing_field(err: GatewayError) -> String {
        err.field().unwrap().to_string()
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(&Bytes::new()).unwrap(), json!({}));
        assert_eq!(parse_body(&Bytes::from_static(b"  \n")).unwrap(), json!({}));
        assert_eq!(
            parse_body(&Bytes::from_static(br#"{"a":1}"#)).unwrap(),
            json!({"a": 1})
        );
        assert!(parse_body(&Bytes::from_static(b"{nope")).is_err());
        assert!(parse_body(&Bytes::from_static(b"[1,2]")).is_err());
    }

    #[test]
    fn test_new_post_valid() {
        let body = json!({
            "title": "Hello",
            "description": "First post",
            "thumbnail": "/uploads/1.png",
            "content": "<p>hi</p>",
            "authKey": "secret",
            "extra": true
        });
        let post = new_post(&body).unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "<p>hi</p>");
    }

    #[test]
    fn test_new_post_reports_first_failing_field() {
        let body = json!({ "title": "", "description": 5 });
        let err = new_post(&body).unwrap_err();
        assert_eq!(failing_field(err), "title");

        let body = json!({ "title": "ok", "description": 5 });
        let err = new_post(&body).unwrap_err();
        assert_eq!(err.public_message(), "description must be a string");

        let body = json!({ "title": "ok", "description": "ok", "thumbnail": "ok" });
        let err = new_post(&body).unwrap_err();
        assert_eq!(failing_field(err), "content");
    }

    #[test]
    fn test_post_patch_optional_but_typed() {
        let patch = post_patch(&json!({ "title": "X", "authKey": "k" })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("X"));
        assert!(patch.description.is_none());

        assert!(post_patch(&json!({})).unwrap().is_empty());

        let err = post_patch(&json!({ "thumbnail": 3 })).unwrap_err();
        assert_eq!(failing_field(err), "thumbnail");

        let err = post_patch(&json!({ "content": "" })).unwrap_err();
        assert_eq!(failing_field(err), "content");
    }

    #[test]
    fn test_null_is_not_absent() {
        let err = post_patch(&json!({ "title": null })).unwrap_err();
        assert_eq!(err.public_message(), "title must be a string");
        assert_eq!(failing_field(err), "title");

        let err = new_quote(&json!({ "content": null, "author": "A" })).unwrap_err();
        assert_eq!(failing_field(err), "content");
    }

    #[test]
    fn test_quote_and_log() {
        let quote = new_quote(&json!({ "content": "hello", "author": "A" })).unwrap();
        assert_eq!(quote.author, "A");

        let err = new_quote(&json!({ "content": "hello" })).unwrap_err();
        assert_eq!(err.public_message(), "author is required");

        let log = new_log(&json!({ "title": "t", "content": "c" })).unwrap();
        assert_eq!(log.title, "t");
        assert!(new_log(&json!({ "content": "c" })).is_err());
    }
}
