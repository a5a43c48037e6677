//! # Media change and authentication adapters.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! MediaChange     error_description (str), url (str), medium (int),
//!                 wanted_label (str), devices (list of str),
//!                 current_device (int)
//! Authentication  url (str), message (str), username (str)
//! ```
//!
//! The media-change answer is free-form: literal codes first, everything
//! else is tried as a replacement URL (see
//! [`MediaChangeDecision::decode`]). The authentication answer is a map
//! with keys `username`, `password`, `continue`.

use tracing::warn;

use crate::decision::{AuthAnswer, MediaChangeDecision};
use crate::engine::{AuthenticationReport, MediaChangeReport};
use crate::kind::CallbackKind;
use crate::receivers::BridgeContext;
use crate::value::Value;

/// Adapter for the media-change channel.
pub struct MediaChangeReceiver {
    ctx: BridgeContext,
}

impl MediaChangeReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl MediaChangeReport for MediaChangeReceiver {
    fn request(
        &self,
        error_description: &str,
        url: &str,
        medium: i64,
        wanted_label: &str,
        devices: &[String],
        current_device: i64,
    ) -> MediaChangeDecision {
        let mut invoker = self.ctx.invoker(CallbackKind::MediaChange);
        if !invoker.is_set() {
            return MediaChangeDecision::Retry;
        }

        let devices = devices.iter().map(|d| Value::Str(d.clone())).collect();
        invoker
            .arg_str(error_description)
            .arg_str(url)
            .arg_int(medium)
            .arg_str(wanted_label)
            .arg_list(devices)
            .arg_int(current_device);

        // A failed sink answers "" here, which decodes to Retry - the
        // same decision the engine default path takes.
        let answer = invoker.evaluate_str("");
        MediaChangeDecision::decode(&answer)
    }
}

/// Adapter for the authentication channel.
pub struct AuthenticationReceiver {
    ctx: BridgeContext,
}

impl AuthenticationReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl AuthenticationReport for AuthenticationReceiver {
    fn request(&self, url: &str, message: &str, username: &str) -> AuthAnswer {
        let mut invoker = self.ctx.invoker(CallbackKind::Authentication);
        invoker.arg_str(url).arg_str(message).arg_str(username);
        match invoker.evaluate() {
            Some(Value::Map(map)) => AuthAnswer::decode(&map),
            Some(other) => {
                warn!(actual = other.tag(), "authentication answer must be a map; denying");
                AuthAnswer::default()
            }
            None => AuthAnswer::default(),
        }
    }
}
