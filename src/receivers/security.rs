//! # Trust and digest adapters.
//!
//! Three channels: digest verification, key trust confirmation, and key
//! trust signals. All confirmations are bool answers and default to
//! **reject** - a missing policy handler must never widen trust.
//!
//! Argument orders (fixed, part of each kind's contract):
//! ```text
//! AcceptWrongDigest          file (str), expected (str), found (str)
//! AcceptUnknownDigest        file (str), name (str)
//! AcceptFileWithoutChecksum  file (str)
//! AcceptUnsignedFile         file (str)
//! AcceptUnknownGpgKey        file (str), key_id (str)
//! ImportGpgKey               key_id (str), name (str), fingerprint (str)
//! AcceptVerificationFailed   file (str), key_id (str), name (str)
//! TrustedKeyAdded            key_id (str), name (str)
//! TrustedKeyRemoved          key_id (str), name (str)
//! ```

use crate::engine::{DigestReport, KeyringConfirmReport, KeyringSignalReport};
use crate::kind::CallbackKind;
use crate::receivers::BridgeContext;

/// Adapter for the digest-check channel.
pub struct DigestReceiver {
    ctx: BridgeContext,
}

impl DigestReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl DigestReport for DigestReceiver {
    fn accept_wrong_digest(&self, file: &str, expected: &str, found: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptWrongDigest)
            .arg_str(file)
            .arg_str(expected)
            .arg_str(found)
            .evaluate_bool(false)
    }

    fn accept_unknown_digest(&self, file: &str, name: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptUnknownDigest)
            .arg_str(file)
            .arg_str(name)
            .evaluate_bool(false)
    }

    fn accept_file_without_checksum(&self, file: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptFileWithoutChecksum)
            .arg_str(file)
            .evaluate_bool(false)
    }
}

/// Adapter for the keyring-confirm channel.
pub struct KeyringConfirmReceiver {
    ctx: BridgeContext,
}

impl KeyringConfirmReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl KeyringConfirmReport for KeyringConfirmReceiver {
    fn accept_unsigned_file(&self, file: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptUnsignedFile)
            .arg_str(file)
            .evaluate_bool(false)
    }

    fn accept_unknown_key(&self, file: &str, key_id: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptUnknownGpgKey)
            .arg_str(file)
            .arg_str(key_id)
            .evaluate_bool(false)
    }

    fn import_key(&self, key_id: &str, name: &str, fingerprint: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::ImportGpgKey)
            .arg_str(key_id)
            .arg_str(name)
            .arg_str(fingerprint)
            .evaluate_bool(false)
    }

    fn accept_verification_failed(&self, file: &str, key_id: &str, name: &str) -> bool {
        self.ctx
            .invoker(CallbackKind::AcceptVerificationFailed)
            .arg_str(file)
            .arg_str(key_id)
            .arg_str(name)
            .evaluate_bool(false)
    }
}

/// Adapter for the keyring-signal channel (informational).
pub struct KeyringSignalReceiver {
    ctx: BridgeContext,
}

impl KeyringSignalReceiver {
    pub fn new(ctx: BridgeContext) -> Self {
        Self { ctx }
    }
}

impl KeyringSignalReport for KeyringSignalReceiver {
    fn trusted_key_added(&self, key_id: &str, name: &str) {
        self.ctx
            .invoker(CallbackKind::TrustedKeyAdded)
            .arg_str(key_id)
            .arg_str(name)
            .evaluate();
    }

    fn trusted_key_removed(&self, key_id: &str, name: &str) {
        self.ctx
            .invoker(CallbackKind::TrustedKeyRemoved)
            .arg_str(key_id)
            .arg_str(name)
            .evaluate();
    }
}
