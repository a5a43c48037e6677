//! # Engine boundary: report channels and their default behavior.
//!
//! The native engine exposes one report channel per long-running
//! concern. Each channel is a trait whose **default method bodies are
//! the engine defaults** - an engine running without any bridge attached
//! compiles against the exact same contract, and a bridge whose sink has
//! no handler produces exactly these values.
//!
//! ## Channels (connect order)
//! ```text
//! rebuild-db, convert-db, scan-db,
//! install-resolvable, remove-resolvable,
//! download-resolvable, download-progress,
//! script-exec, message,
//! authentication, media-change,
//! digest-check, keyring-confirm, keyring-signal,
//! generic-progress
//! ```
//!
//! The engine supports exactly one active receiver per channel;
//! registering a second silently replaces the first. The
//! [`LifecycleManager`](crate::LifecycleManager) therefore
//! attaches and detaches all channels in one deterministic pass.

use crate::decision::{AuthAnswer, MediaChangeDecision, ProblemResponse};
use std::sync::Arc;

/// The fifteen engine report channels, in connect order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportChannel {
    RebuildDb,
    ConvertDb,
    ScanDb,
    InstallResolvable,
    RemoveResolvable,
    DownloadResolvable,
    DownloadProgress,
    ScriptExec,
    Message,
    Authentication,
    MediaChange,
    DigestCheck,
    KeyringConfirm,
    KeyringSignal,
    GenericProgress,
}

impl ReportChannel {
    /// All channels in the deterministic connect/disconnect order.
    pub const ALL: [ReportChannel; 15] = [
        ReportChannel::RebuildDb,
        ReportChannel::ConvertDb,
        ReportChannel::ScanDb,
        ReportChannel::InstallResolvable,
        ReportChannel::RemoveResolvable,
        ReportChannel::DownloadResolvable,
        ReportChannel::DownloadProgress,
        ReportChannel::ScriptExec,
        ReportChannel::Message,
        ReportChannel::Authentication,
        ReportChannel::MediaChange,
        ReportChannel::DigestCheck,
        ReportChannel::KeyringConfirm,
        ReportChannel::KeyringSignal,
        ReportChannel::GenericProgress,
    ];

    /// Returns a short stable label (snake_case) for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            ReportChannel::RebuildDb => "rebuild_db",
            ReportChannel::ConvertDb => "convert_db",
            ReportChannel::ScanDb => "scan_db",
            ReportChannel::InstallResolvable => "install_resolvable",
            ReportChannel::RemoveResolvable => "remove_resolvable",
            ReportChannel::DownloadResolvable => "download_resolvable",
            ReportChannel::DownloadProgress => "download_progress",
            ReportChannel::ScriptExec => "script_exec",
            ReportChannel::Message => "message",
            ReportChannel::Authentication => "authentication",
            ReportChannel::MediaChange => "media_change",
            ReportChannel::DigestCheck => "digest_check",
            ReportChannel::KeyringConfirm => "keyring_confirm",
            ReportChannel::KeyringSignal => "keyring_signal",
            ReportChannel::GenericProgress => "generic_progress",
        }
    }
}

/// Database rebuild channel.
pub trait RebuildDbReport: Send + Sync {
    fn start(&self, _path: &str) {}
    /// Returns whether the engine should continue. Default: `true`.
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    fn notify(&self, _message: &str) {}
    fn stop(&self, _error: i64, _reason: &str) {}
}

/// Database conversion channel. Same shape as rebuild.
pub trait ConvertDbReport: Send + Sync {
    fn start(&self, _path: &str) {}
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    fn notify(&self, _message: &str) {}
    fn stop(&self, _error: i64, _reason: &str) {}
}

/// Database scan channel.
pub trait ScanDbReport: Send + Sync {
    fn start(&self) {}
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    /// Default: abort the scan on error.
    fn error(&self, _code: i64, _description: &str) -> ProblemResponse {
        ProblemResponse::Abort
    }
    fn done(&self, _code: i64, _reason: &str) {}
}

/// Package installation channel.
pub trait InstallReport: Send + Sync {
    fn start(&self, _name: &str, _summary: &str, _size_kib: i64, _is_update: bool) {}
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    /// Default: abort the commit on an installation problem.
    fn problem(&self, _name: &str, _code: i64, _description: &str) -> ProblemResponse {
        ProblemResponse::Abort
    }
    fn finish(&self, _name: &str, _code: i64, _reason: &str) {}
}

/// Package removal channel.
pub trait RemoveReport: Send + Sync {
    fn start(&self, _name: &str) {}
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    /// Default: skip the affected package but keep removing the rest.
    fn problem(&self, _name: &str, _code: i64, _description: &str) -> ProblemResponse {
        ProblemResponse::Ignore
    }
    fn finish(&self, _name: &str, _code: i64, _reason: &str) {}
}

/// Resolvable download (provide) channel.
pub trait DownloadResolvableReport: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn start(
        &self,
        _source: &str,
        _medium: i64,
        _name: &str,
        _url: &str,
        _size_kib: i64,
        _remote: bool,
    ) {
    }
    fn progress(&self, _percent: i64) -> bool {
        true
    }
    /// Default: abort the provide on a transfer problem.
    fn problem(&self, _url: &str, _code: i64, _description: &str) -> ProblemResponse {
        ProblemResponse::Abort
    }
    fn finish(&self, _code: i64, _reason: &str) {}
}

/// Byte-level download progress channel.
pub trait DownloadProgressReport: Send + Sync {
    fn start(&self, _url: &str, _local_path: &str) {}
    fn progress(&self, _percent: i64, _bps_avg: i64, _bps_now: i64) -> bool {
        true
    }
    /// Default: abort the download.
    fn problem(&self, _url: &str, _code: i64, _description: &str) -> ProblemResponse {
        ProblemResponse::Abort
    }
    fn finish(&self, _url: &str, _code: i64, _reason: &str) {}
}

/// Post-install / pre-remove script execution channel.
pub trait ScriptExecReport: Send + Sync {
    fn start(&self, _package: &str, _path: &str) {}
    /// `ping` distinguishes keep-alive ticks from output lines.
    /// Returns whether the script should continue. Default: `true`.
    fn progress(&self, _ping: bool, _output: &str) -> bool {
        true
    }
    /// Default: abort the script.
    fn problem(&self, _description: &str) -> ProblemResponse {
        ProblemResponse::Abort
    }
    fn finish(&self) {}
}

/// Informational message channel.
pub trait MessageReport: Send + Sync {
    /// Returns whether the engine should continue. Default: `true`.
    fn show(&self, _package: &str, _text: &str) -> bool {
        true
    }
}

/// Credential request channel.
pub trait AuthenticationReport: Send + Sync {
    /// Default: empty credentials, do not proceed.
    fn request(&self, _url: &str, _message: &str, _username: &str) -> AuthAnswer {
        AuthAnswer::default()
    }
}

/// Media change request channel.
pub trait MediaChangeReport: Send + Sync {
    /// Default: retry with the same medium.
    #[allow(clippy::too_many_arguments)]
    fn request(
        &self,
        _error_description: &str,
        _url: &str,
        _medium: i64,
        _wanted_label: &str,
        _devices: &[String],
        _current_device: i64,
    ) -> MediaChangeDecision {
        MediaChangeDecision::Retry
    }
}

/// Checksum verification channel. All confirmations default to reject.
pub trait DigestReport: Send + Sync {
    fn accept_wrong_digest(&self, _file: &str, _expected: &str, _found: &str) -> bool {
        false
    }
    fn accept_unknown_digest(&self, _file: &str, _name: &str) -> bool {
        false
    }
    fn accept_file_without_checksum(&self, _file: &str) -> bool {
        false
    }
}

/// Key trust confirmation channel. All confirmations default to reject.
pub trait KeyringConfirmReport: Send + Sync {
    fn accept_unsigned_file(&self, _file: &str) -> bool {
        false
    }
    fn accept_unknown_key(&self, _file: &str, _key_id: &str) -> bool {
        false
    }
    fn import_key(&self, _key_id: &str, _name: &str, _fingerprint: &str) -> bool {
        false
    }
    fn accept_verification_failed(&self, _file: &str, _key_id: &str, _name: &str) -> bool {
        false
    }
}

/// Key trust signal channel (informational, answers ignored).
pub trait KeyringSignalReport: Send + Sync {
    fn trusted_key_added(&self, _key_id: &str, _name: &str) {}
    fn trusted_key_removed(&self, _key_id: &str, _name: &str) {}
}

/// Free-form progress ticket channel.
pub trait ProgressReport: Send + Sync {
    fn start(&self, _id: i64, _label: &str, _total: i64) {}
    /// Returns whether the operation should continue. Default: `true`.
    fn progress(&self, _id: i64, _value: i64) -> bool {
        true
    }
    fn done(&self, _id: i64) {}
}

/// Engine-side registration surface: one receiver slot per channel.
///
/// `None` clears the slot. Setting an occupied slot silently replaces
/// the previous receiver (engine contract), which is why the bridge
/// attaches and detaches deterministically and symmetrically.
pub trait EngineHooks {
    fn set_rebuild_db(&mut self, receiver: Option<Arc<dyn RebuildDbReport>>);
    fn set_convert_db(&mut self, receiver: Option<Arc<dyn ConvertDbReport>>);
    fn set_scan_db(&mut self, receiver: Option<Arc<dyn ScanDbReport>>);
    fn set_install(&mut self, receiver: Option<Arc<dyn InstallReport>>);
    fn set_remove(&mut self, receiver: Option<Arc<dyn RemoveReport>>);
    fn set_download_resolvable(&mut self, receiver: Option<Arc<dyn DownloadResolvableReport>>);
    fn set_download_progress(&mut self, receiver: Option<Arc<dyn DownloadProgressReport>>);
    fn set_script_exec(&mut self, receiver: Option<Arc<dyn ScriptExecReport>>);
    fn set_message(&mut self, receiver: Option<Arc<dyn MessageReport>>);
    fn set_authentication(&mut self, receiver: Option<Arc<dyn AuthenticationReport>>);
    fn set_media_change(&mut self, receiver: Option<Arc<dyn MediaChangeReport>>);
    fn set_digest(&mut self, receiver: Option<Arc<dyn DigestReport>>);
    fn set_keyring_confirm(&mut self, receiver: Option<Arc<dyn KeyringConfirmReport>>);
    fn set_keyring_signal(&mut self, receiver: Option<Arc<dyn KeyringSignalReport>>);
    fn set_progress(&mut self, receiver: Option<Arc<dyn ProgressReport>>);
}
