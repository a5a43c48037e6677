//! # Callback kinds and families.
//!
//! [`CallbackKind`] enumerates every distinct reportable event the engine
//! can raise. The set is defined once and never grows at runtime; each
//! kind carries a fixed, documented argument order and decision table
//! (owned by the adapter that dispatches it, see [`crate::receivers`]).
//!
//! Kinds are grouped into [`CallbackFamily`] buckets that mirror the
//! engine's report channels:
//!
//! | Family            | Channels covered                                  |
//! |-------------------|---------------------------------------------------|
//! | `DbMaintenance`   | rebuild-db, convert-db, scan-db                   |
//! | `PackageTransfer` | provide, download, install, remove, delta          |
//! | `ScriptMessage`   | script execution, user messages                    |
//! | `SourceLifecycle` | source create/probe/refresh/report, media, auth    |
//! | `GenericProgress` | free-form progress tickets                         |
//! | `TrustDigest`     | digest checks, key trust confirmations and signals |

/// Family grouping for [`CallbackKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallbackFamily {
    DbMaintenance,
    PackageTransfer,
    ScriptMessage,
    SourceLifecycle,
    GenericProgress,
    TrustDigest,
}

/// One distinct reportable event.
///
/// Naming follows the engine's report surface: `Start*`/`Progress*`/
/// `Problem*`/`Done*` (or `Stop*`/`Finish*`/`End*` where the engine
/// uses those words) per operation, plus one-shot kinds such as
/// [`CallbackKind::MediaChange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CallbackKind {
    // --- db maintenance ---
    StartRebuildDb,
    ProgressRebuildDb,
    NotifyRebuildDb,
    StopRebuildDb,
    StartConvertDb,
    ProgressConvertDb,
    NotifyConvertDb,
    StopConvertDb,
    StartScanDb,
    ProgressScanDb,
    ErrorScanDb,
    DoneScanDb,

    // --- package transfer / commit ---
    StartProvide,
    ProgressProvide,
    ProblemProvide,
    DoneProvide,
    StartDownload,
    ProgressDownload,
    ProblemDownload,
    DoneDownload,
    InitDownload,
    DestDownload,
    StartPackage,
    ProgressPackage,
    ProblemPackage,
    DonePackage,
    StartRemove,
    ProgressRemove,
    ProblemRemove,
    DoneRemove,
    StartDeltaDownload,
    ProgressDeltaDownload,
    ProblemDeltaDownload,
    FinishDeltaDownload,
    StartDeltaApply,
    ProgressDeltaApply,
    ProblemDeltaApply,
    FinishDeltaApply,

    // --- script / message ---
    ScriptStart,
    ScriptProgress,
    ScriptProblem,
    ScriptFinish,
    Message,

    // --- source / repository lifecycle ---
    SourceCreateStart,
    SourceCreateProgress,
    SourceCreateError,
    SourceCreateEnd,
    SourceProbeStart,
    SourceProbeSucceeded,
    SourceProbeFailed,
    SourceProbeProgress,
    SourceProbeError,
    SourceProbeEnd,
    SourceRefreshStart,
    SourceRefreshProgress,
    SourceRefreshError,
    SourceRefreshDone,
    SourceReportStart,
    SourceReportProgress,
    SourceReportError,
    SourceReportEnd,
    SourceChange,
    MediaChange,
    Authentication,

    // --- generic progress ---
    ProgressStart,
    ProgressProgress,
    ProgressDone,

    // --- trust / digest ---
    AcceptUnsignedFile,
    AcceptUnknownGpgKey,
    ImportGpgKey,
    AcceptVerificationFailed,
    AcceptWrongDigest,
    AcceptUnknownDigest,
    AcceptFileWithoutChecksum,
    TrustedKeyAdded,
    TrustedKeyRemoved,
}

impl CallbackKind {
    /// Returns the family this kind belongs to. Total over all kinds.
    pub fn family(self) -> CallbackFamily {
        use CallbackKind::*;
        match self {
            StartRebuildDb | ProgressRebuildDb | NotifyRebuildDb | StopRebuildDb
            | StartConvertDb | ProgressConvertDb | NotifyConvertDb | StopConvertDb
            | StartScanDb | ProgressScanDb | ErrorScanDb | DoneScanDb => {
                CallbackFamily::DbMaintenance
            }

            StartProvide | ProgressProvide | ProblemProvide | DoneProvide | StartDownload
            | ProgressDownload | ProblemDownload | DoneDownload | InitDownload | DestDownload
            | StartPackage | ProgressPackage | ProblemPackage | DonePackage | StartRemove
            | ProgressRemove | ProblemRemove | DoneRemove | StartDeltaDownload
            | ProgressDeltaDownload | ProblemDeltaDownload | FinishDeltaDownload
            | StartDeltaApply | ProgressDeltaApply | ProblemDeltaApply | FinishDeltaApply => {
                CallbackFamily::PackageTransfer
            }

            ScriptStart | ScriptProgress | ScriptProblem | ScriptFinish | Message => {
                CallbackFamily::ScriptMessage
            }

            SourceCreateStart | SourceCreateProgress | SourceCreateError | SourceCreateEnd
            | SourceProbeStart | SourceProbeSucceeded | SourceProbeFailed
            | SourceProbeProgress | SourceProbeError | SourceProbeEnd | SourceRefreshStart
            | SourceRefreshProgress | SourceRefreshError | SourceRefreshDone
            | SourceReportStart | SourceReportProgress | SourceReportError | SourceReportEnd
            | SourceChange | MediaChange | Authentication => CallbackFamily::SourceLifecycle,

            ProgressStart | ProgressProgress | ProgressDone => CallbackFamily::GenericProgress,

            AcceptUnsignedFile | AcceptUnknownGpgKey | ImportGpgKey | AcceptVerificationFailed
            | AcceptWrongDigest | AcceptUnknownDigest | AcceptFileWithoutChecksum
            | TrustedKeyAdded | TrustedKeyRemoved => CallbackFamily::TrustDigest,
        }
    }

    /// Returns a short stable label (snake_case) for logs and the
    /// registration surface.
    pub fn as_label(self) -> &'static str {
        use CallbackKind::*;
        match self {
            StartRebuildDb => "start_rebuild_db",
            ProgressRebuildDb => "progress_rebuild_db",
            NotifyRebuildDb => "notify_rebuild_db",
            StopRebuildDb => "stop_rebuild_db",
            StartConvertDb => "start_convert_db",
            ProgressConvertDb => "progress_convert_db",
            NotifyConvertDb => "notify_convert_db",
            StopConvertDb => "stop_convert_db",
            StartScanDb => "start_scan_db",
            ProgressScanDb => "progress_scan_db",
            ErrorScanDb => "error_scan_db",
            DoneScanDb => "done_scan_db",
            StartProvide => "start_provide",
            ProgressProvide => "progress_provide",
            ProblemProvide => "problem_provide",
            DoneProvide => "done_provide",
            StartDownload => "start_download",
            ProgressDownload => "progress_download",
            ProblemDownload => "problem_download",
            DoneDownload => "done_download",
            InitDownload => "init_download",
            DestDownload => "dest_download",
            StartPackage => "start_package",
            ProgressPackage => "progress_package",
            ProblemPackage => "problem_package",
            DonePackage => "done_package",
            StartRemove => "start_remove",
            ProgressRemove => "progress_remove",
            ProblemRemove => "problem_remove",
            DoneRemove => "done_remove",
            StartDeltaDownload => "start_delta_download",
            ProgressDeltaDownload => "progress_delta_download",
            ProblemDeltaDownload => "problem_delta_download",
            FinishDeltaDownload => "finish_delta_download",
            StartDeltaApply => "start_delta_apply",
            ProgressDeltaApply => "progress_delta_apply",
            ProblemDeltaApply => "problem_delta_apply",
            FinishDeltaApply => "finish_delta_apply",
            ScriptStart => "script_start",
            ScriptProgress => "script_progress",
            ScriptProblem => "script_problem",
            ScriptFinish => "script_finish",
            Message => "message",
            SourceCreateStart => "source_create_start",
            SourceCreateProgress => "source_create_progress",
            SourceCreateError => "source_create_error",
            SourceCreateEnd => "source_create_end",
            SourceProbeStart => "source_probe_start",
            SourceProbeSucceeded => "source_probe_succeeded",
            SourceProbeFailed => "source_probe_failed",
            SourceProbeProgress => "source_probe_progress",
            SourceProbeError => "source_probe_error",
            SourceProbeEnd => "source_probe_end",
            SourceRefreshStart => "source_refresh_start",
            SourceRefreshProgress => "source_refresh_progress",
            SourceRefreshError => "source_refresh_error",
            SourceRefreshDone => "source_refresh_done",
            SourceReportStart => "source_report_start",
            SourceReportProgress => "source_report_progress",
            SourceReportError => "source_report_error",
            SourceReportEnd => "source_report_end",
            SourceChange => "source_change",
            MediaChange => "media_change",
            Authentication => "authentication",
            ProgressStart => "progress_start",
            ProgressProgress => "progress_progress",
            ProgressDone => "progress_done",
            AcceptUnsignedFile => "accept_unsigned_file",
            AcceptUnknownGpgKey => "accept_unknown_gpg_key",
            ImportGpgKey => "import_gpg_key",
            AcceptVerificationFailed => "accept_verification_failed",
            AcceptWrongDigest => "accept_wrong_digest",
            AcceptUnknownDigest => "accept_unknown_digest",
            AcceptFileWithoutChecksum => "accept_file_without_checksum",
            TrustedKeyAdded => "trusted_key_added",
            TrustedKeyRemoved => "trusted_key_removed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_grouping() {
        assert_eq!(CallbackKind::StartRebuildDb.family(), CallbackFamily::DbMaintenance);
        assert_eq!(CallbackKind::ProgressDownload.family(), CallbackFamily::PackageTransfer);
        assert_eq!(CallbackKind::ScriptProgress.family(), CallbackFamily::ScriptMessage);
        assert_eq!(CallbackKind::MediaChange.family(), CallbackFamily::SourceLifecycle);
        assert_eq!(CallbackKind::ProgressProgress.family(), CallbackFamily::GenericProgress);
        assert_eq!(CallbackKind::ImportGpgKey.family(), CallbackFamily::TrustDigest);
    }

    #[test]
    fn test_labels_are_snake_case() {
        assert_eq!(CallbackKind::StartProvide.as_label(), "start_provide");
        assert_eq!(CallbackKind::MediaChange.as_label(), "media_change");
        assert_eq!(CallbackKind::AcceptWrongDigest.as_label(), "accept_wrong_digest");
    }
}
