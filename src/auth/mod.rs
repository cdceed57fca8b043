//! Authorization for mutating requests
//!
//! A single shared AuthSecret gates every create/update/delete. The
//! credential travels in the JSON body as `authKey`, or in the `x-auth-key`
//! header as a fallback.

pub mod secret;

pub use secret::{extract_credential, AuthSecret, AUTH_BODY_FIELD, AUTH_HEADER};
