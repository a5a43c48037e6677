//! # Bridge lifecycle.
//!
//! [`LifecycleManager`] owns the whole bridge: the registry, the shared
//! adapter context, and one adapter per engine report channel. It
//! attaches all fifteen channels to an engine in one deterministic pass
//! and detaches them symmetrically.
//!
//! ```text
//!                 ┌────────────────────────────┐
//!   engine ◄──────┤      LifecycleManager      ├──────► sink env
//!   (EngineHooks) │  registry + 15 receivers   │  (handler namespaces)
//!                 └────────────────────────────┘
//! ```
//!
//! ## Rules
//! - One manager per engine instance; all shared adapter state (medium
//!   correlation, dedup gates) lives inside it. Dropping the manager
//!   drops the whole bridge.
//! - `connect` and `disconnect` walk [`ReportChannel::ALL`] in order, so
//!   attach/detach is reproducible in logs.
//! - Handler (de)registration is forwarded to the registry and stays
//!   valid across connect/disconnect cycles.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{EngineHooks, ReportChannel};
use crate::error::RegistrationError;
use crate::kind::CallbackKind;
use crate::receivers::{
    AuthenticationReceiver, BridgeContext, ConvertDbReceiver, DigestReceiver,
    DownloadProgressReceiver, DownloadResolvableReceiver, InstallReceiver,
    KeyringConfirmReceiver, KeyringSignalReceiver, MediaChangeReceiver, MessageReceiver,
    ProgressReceiver, RebuildDbReceiver, RemoveReceiver, ScanDbReceiver, ScriptExecReceiver,
};
use crate::registry::{CallbackRegistry, HandlerGuard};
use crate::sink::SinkEnv;

/// Owns the registry and all receiver adapters for one engine instance.
pub struct LifecycleManager {
    registry: Arc<CallbackRegistry>,
    rebuild_db: Arc<RebuildDbReceiver>,
    convert_db: Arc<ConvertDbReceiver>,
    scan_db: Arc<ScanDbReceiver>,
    install: Arc<InstallReceiver>,
    remove: Arc<RemoveReceiver>,
    download_resolvable: Arc<DownloadResolvableReceiver>,
    download_progress: Arc<DownloadProgressReceiver>,
    script_exec: Arc<ScriptExecReceiver>,
    message: Arc<MessageReceiver>,
    authentication: Arc<AuthenticationReceiver>,
    media_change: Arc<MediaChangeReceiver>,
    digest: Arc<DigestReceiver>,
    keyring_confirm: Arc<KeyringConfirmReceiver>,
    keyring_signal: Arc<KeyringSignalReceiver>,
    progress: Arc<ProgressReceiver>,
}

impl LifecycleManager {
    /// Builds the bridge over the given sink environment. All adapters
    /// share one context, so cross-channel state (medium correlation)
    /// is scoped to this manager.
    pub fn new(env: Arc<dyn SinkEnv>) -> Self {
        let registry = Arc::new(CallbackRegistry::new(env));
        let ctx = BridgeContext::new(registry.clone());
        Self {
            registry,
            rebuild_db: Arc::new(RebuildDbReceiver::new(ctx.clone())),
            convert_db: Arc::new(ConvertDbReceiver::new(ctx.clone())),
            scan_db: Arc::new(ScanDbReceiver::new(ctx.clone())),
            install: Arc::new(InstallReceiver::new(ctx.clone())),
            remove: Arc::new(RemoveReceiver::new(ctx.clone())),
            download_resolvable: Arc::new(DownloadResolvableReceiver::new(ctx.clone())),
            download_progress: Arc::new(DownloadProgressReceiver::new(ctx.clone())),
            script_exec: Arc::new(ScriptExecReceiver::new(ctx.clone())),
            message: Arc::new(MessageReceiver::new(ctx.clone())),
            authentication: Arc::new(AuthenticationReceiver::new(ctx.clone())),
            media_change: Arc::new(MediaChangeReceiver::new(ctx.clone())),
            digest: Arc::new(DigestReceiver::new(ctx.clone())),
            keyring_confirm: Arc::new(KeyringConfirmReceiver::new(ctx.clone())),
            keyring_signal: Arc::new(KeyringSignalReceiver::new(ctx.clone())),
            progress: Arc::new(ProgressReceiver::new(ctx)),
        }
    }

    /// The registry backing this bridge.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Registers a sink handler for `kind`. See
    /// [`CallbackRegistry::set_handler`].
    pub fn set_handler(
        &self,
        kind: CallbackKind,
        qualified: &str,
    ) -> Result<(), RegistrationError> {
        self.registry.set_handler(kind, qualified)
    }

    /// Pops the active handler for `kind`.
    pub fn clear_handler(&self, kind: CallbackKind) {
        self.registry.clear_handler(kind);
    }

    /// True iff `kind` currently has a bound handler.
    pub fn is_active(&self, kind: CallbackKind) -> bool {
        self.registry.is_active(kind)
    }

    /// Registers a scoped override that is popped when the guard drops.
    pub fn push_scoped(
        &self,
        kind: CallbackKind,
        qualified: &str,
    ) -> Result<HandlerGuard<'_>, RegistrationError> {
        self.registry.push_scoped(kind, qualified)
    }

    /// Attaches every receiver to the engine, in [`ReportChannel::ALL`]
    /// order.
    pub fn connect(&self, hooks: &mut dyn EngineHooks) {
        for channel in ReportChannel::ALL {
            debug!(channel = channel.as_label(), "receiver attached");
            match channel {
                ReportChannel::RebuildDb => hooks.set_rebuild_db(Some(self.rebuild_db.clone())),
                ReportChannel::ConvertDb => hooks.set_convert_db(Some(self.convert_db.clone())),
                ReportChannel::ScanDb => hooks.set_scan_db(Some(self.scan_db.clone())),
                ReportChannel::InstallResolvable => hooks.set_install(Some(self.install.clone())),
                ReportChannel::RemoveResolvable => hooks.set_remove(Some(self.remove.clone())),
                ReportChannel::DownloadResolvable => {
                    hooks.set_download_resolvable(Some(self.download_resolvable.clone()));
                }
                ReportChannel::DownloadProgress => {
                    hooks.set_download_progress(Some(self.download_progress.clone()));
                }
                ReportChannel::ScriptExec => hooks.set_script_exec(Some(self.script_exec.clone())),
                ReportChannel::Message => hooks.set_message(Some(self.message.clone())),
                ReportChannel::Authentication => {
                    hooks.set_authentication(Some(self.authentication.clone()));
                }
                ReportChannel::MediaChange => {
                    hooks.set_media_change(Some(self.media_change.clone()));
                }
                ReportChannel::DigestCheck => hooks.set_digest(Some(self.digest.clone())),
                ReportChannel::KeyringConfirm => {
                    hooks.set_keyring_confirm(Some(self.keyring_confirm.clone()));
                }
                ReportChannel::KeyringSignal => {
                    hooks.set_keyring_signal(Some(self.keyring_signal.clone()));
                }
                ReportChannel::GenericProgress => hooks.set_progress(Some(self.progress.clone())),
            }
        }
    }

    /// Detaches every receiver, mirroring [`LifecycleManager::connect`].
    /// Registered handlers survive a disconnect; only the engine side is
    /// released.
    pub fn disconnect(&self, hooks: &mut dyn EngineHooks) {
        for channel in ReportChannel::ALL {
            debug!(channel = channel.as_label(), "receiver detached");
            match channel {
                ReportChannel::RebuildDb => hooks.set_rebuild_db(None),
                ReportChannel::ConvertDb => hooks.set_convert_db(None),
                ReportChannel::ScanDb => hooks.set_scan_db(None),
                ReportChannel::InstallResolvable => hooks.set_install(None),
                ReportChannel::RemoveResolvable => hooks.set_remove(None),
                ReportChannel::DownloadResolvable => hooks.set_download_resolvable(None),
                ReportChannel::DownloadProgress => hooks.set_download_progress(None),
                ReportChannel::ScriptExec => hooks.set_script_exec(None),
                ReportChannel::Message => hooks.set_message(None),
                ReportChannel::Authentication => hooks.set_authentication(None),
                ReportChannel::MediaChange => hooks.set_media_change(None),
                ReportChannel::DigestCheck => hooks.set_digest(None),
                ReportChannel::KeyringConfirm => hooks.set_keyring_confirm(None),
                ReportChannel::KeyringSignal => hooks.set_keyring_signal(None),
                ReportChannel::GenericProgress => hooks.set_progress(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        AuthenticationReport, ConvertDbReport, DigestReport, DownloadProgressReport,
        DownloadResolvableReport, InstallReport, KeyringConfirmReport, KeyringSignalReport,
        MediaChangeReport, MessageReport, ProgressReport, RebuildDbReport, RemoveReport,
        ScanDbReport, ScriptExecReport,
    };
    use crate::sink::{FnNamespace, MapSinkEnv, Namespace};
    use crate::value::Value;

    #[derive(Default)]
    struct MockEngine {
        rebuild_db: Option<Arc<dyn RebuildDbReport>>,
        convert_db: Option<Arc<dyn ConvertDbReport>>,
        scan_db: Option<Arc<dyn ScanDbReport>>,
        install: Option<Arc<dyn InstallReport>>,
        remove: Option<Arc<dyn RemoveReport>>,
        download_resolvable: Option<Arc<dyn DownloadResolvableReport>>,
        download_progress: Option<Arc<dyn DownloadProgressReport>>,
        script_exec: Option<Arc<dyn ScriptExecReport>>,
        message: Option<Arc<dyn MessageReport>>,
        authentication: Option<Arc<dyn AuthenticationReport>>,
        media_change: Option<Arc<dyn MediaChangeReport>>,
        digest: Option<Arc<dyn DigestReport>>,
        keyring_confirm: Option<Arc<dyn KeyringConfirmReport>>,
        keyring_signal: Option<Arc<dyn KeyringSignalReport>>,
        progress: Option<Arc<dyn ProgressReport>>,
    }

    impl MockEngine {
        fn occupied(&self) -> usize {
            [
                self.rebuild_db.is_some(),
                self.convert_db.is_some(),
                self.scan_db.is_some(),
                self.install.is_some(),
                self.remove.is_some(),
                self.download_resolvable.is_some(),
                self.download_progress.is_some(),
                self.script_exec.is_some(),
                self.message.is_some(),
                self.authentication.is_some(),
                self.media_change.is_some(),
                self.digest.is_some(),
                self.keyring_confirm.is_some(),
                self.keyring_signal.is_some(),
                self.progress.is_some(),
            ]
            .iter()
            .filter(|set| **set)
            .count()
        }
    }

    impl EngineHooks for MockEngine {
        fn set_rebuild_db(&mut self, receiver: Option<Arc<dyn RebuildDbReport>>) {
            self.rebuild_db = receiver;
        }
        fn set_convert_db(&mut self, receiver: Option<Arc<dyn ConvertDbReport>>) {
            self.convert_db = receiver;
        }
        fn set_scan_db(&mut self, receiver: Option<Arc<dyn ScanDbReport>>) {
            self.scan_db = receiver;
        }
        fn set_install(&mut self, receiver: Option<Arc<dyn InstallReport>>) {
            self.install = receiver;
        }
        fn set_remove(&mut self, receiver: Option<Arc<dyn RemoveReport>>) {
            self.remove = receiver;
        }
        fn set_download_resolvable(
            &mut self,
            receiver: Option<Arc<dyn DownloadResolvableReport>>,
        ) {
            self.download_resolvable = receiver;
        }
        fn set_download_progress(&mut self, receiver: Option<Arc<dyn DownloadProgressReport>>) {
            self.download_progress = receiver;
        }
        fn set_script_exec(&mut self, receiver: Option<Arc<dyn ScriptExecReport>>) {
            self.script_exec = receiver;
        }
        fn set_message(&mut self, receiver: Option<Arc<dyn MessageReport>>) {
            self.message = receiver;
        }
        fn set_authentication(&mut self, receiver: Option<Arc<dyn AuthenticationReport>>) {
            self.authentication = receiver;
        }
        fn set_media_change(&mut self, receiver: Option<Arc<dyn MediaChangeReport>>) {
            self.media_change = receiver;
        }
        fn set_digest(&mut self, receiver: Option<Arc<dyn DigestReport>>) {
            self.digest = receiver;
        }
        fn set_keyring_confirm(&mut self, receiver: Option<Arc<dyn KeyringConfirmReport>>) {
            self.keyring_confirm = receiver;
        }
        fn set_keyring_signal(&mut self, receiver: Option<Arc<dyn KeyringSignalReport>>) {
            self.keyring_signal = receiver;
        }
        fn set_progress(&mut self, receiver: Option<Arc<dyn ProgressReport>>) {
            self.progress = receiver;
        }
    }

    fn test_manager() -> (LifecycleManager, Arc<FnNamespace>) {
        let ns = Arc::new(FnNamespace::new());
        let env = MapSinkEnv::new().with("Pkg", ns.clone() as Arc<dyn Namespace>);
        (LifecycleManager::new(Arc::new(env)), ns)
    }

    #[test]
    fn test_connect_fills_every_slot() {
        let (manager, _ns) = test_manager();
        let mut engine = MockEngine::default();

        manager.connect(&mut engine);
        assert_eq!(engine.occupied(), 15, "every channel must be attached");

        manager.disconnect(&mut engine);
        assert_eq!(engine.occupied(), 0, "disconnect must release every channel");
    }

    #[test]
    fn test_dispatch_flows_through_connected_engine() {
        let (manager, ns) = test_manager();
        ns.define("message", |args| {
            assert_eq!(args[1].as_str(), Some("license text"));
            Ok(Value::from(false))
        });
        manager.set_handler(CallbackKind::Message, "Pkg::message").unwrap();

        let mut engine = MockEngine::default();
        manager.connect(&mut engine);

        let message = engine.message.as_ref().unwrap();
        assert!(!message.show("pkg", "license text"), "handler answer must reach the engine");
    }

    #[test]
    fn test_handlers_survive_reconnect() {
        let (manager, ns) = test_manager();
        ns.define("message", |_| Ok(Value::from(false)));
        manager.set_handler(CallbackKind::Message, "Pkg::message").unwrap();

        let mut engine = MockEngine::default();
        manager.connect(&mut engine);
        manager.disconnect(&mut engine);
        manager.connect(&mut engine);

        assert!(manager.is_active(CallbackKind::Message));
        assert!(!engine.message.as_ref().unwrap().show("pkg", "text"));
    }

    #[test]
    fn test_scoped_override_via_manager() {
        let (manager, ns) = test_manager();
        ns.define("base", |_| Ok(Value::from(true)));
        ns.define("quiet", |_| Ok(Value::from(false)));
        manager.set_handler(CallbackKind::Message, "Pkg::base").unwrap();

        {
            let _guard = manager.push_scoped(CallbackKind::Message, "Pkg::quiet").unwrap();
            assert_eq!(
                manager.registry().active(CallbackKind::Message).unwrap().symbol(),
                "quiet"
            );
        }
        assert_eq!(manager.registry().active(CallbackKind::Message).unwrap().symbol(), "base");
    }
}
