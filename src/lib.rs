//! # callvisor
//!
//! **Callvisor** is a callback bridge between a native package-management
//! engine and a dynamic scripting sink.
//!
//! The engine reports long-running work (downloads, installs, database
//! maintenance, trust decisions) through typed report channels; the sink
//! registers named handler functions at runtime. Callvisor connects the
//! two: it keeps per-event handler stacks, marshals engine arguments into
//! a tagged [`Value`] union, dispatches, and decodes the answer back into
//! the engine's decision types - falling back to documented engine
//! defaults whenever no handler is bound or a sink misbehaves.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  engine (native, blocking)                       sink (dynamic)
//!  ┌──────────────────────┐                    ┌──────────────────────┐
//!  │ report channels      │                    │ namespaces           │
//!  │  rebuild-db          │                    │  Pkg::DoneProvide    │
//!  │  download-resolvable │                    │  Pkg::MediaChange    │
//!  │  media-change        │                    │  UI::Progress        │
//!  │  keyring-confirm ... │                    │  ...                 │
//!  └──────────┬───────────┘                    └──────────▲───────────┘
//!             ▼                                           │
//! ┌───────────────────────────────────────────────────────┴───────────┐
//! │  LifecycleManager                                                 │
//! │   ├─ 15 EventReceivers  (per-channel state machines, coalescing)  │
//! │   ├─ CallbackRegistry   (per-kind LIFO stacks of HandlerBinding)  │
//! │   └─ HandlerResolver    (module lookup + per-dispatch symbols)    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Dispatch
//! ```text
//! engine event ──► EventReceiver
//!   ├─► registry.active(kind)?           no binding ─► engine default
//!   ├─► resolver.create_call(binding)?   stale symbol ─► engine default
//!   ├─► push args as Value (fixed order per kind)
//!   ├─► invoke (blocking, may re-enter set_handler/clear_handler)
//!   └─► decode answer
//!         ├─ expected type ─► engine decision
//!         ├─ wrong type    ─► warn + engine default
//!         └─ sink fault    ─► warn + engine default
//! ```
//!
//! ## Features
//! | Area            | Description                                             | Key types / traits                          |
//! |-----------------|---------------------------------------------------------|---------------------------------------------|
//! | **Registry**    | Per-kind handler stacks: set, clear, scoped override.   | [`CallbackRegistry`], [`HandlerGuard`]      |
//! | **Sink API**    | Pluggable handler environment and dispatch plumbing.    | [`SinkEnv`], [`Namespace`], [`Invocable`]   |
//! | **Receivers**   | One adapter per engine report channel, with coalescing. | [`receivers`]                               |
//! | **Decisions**   | Answer decoding with engine defaults.                   | [`ProblemResponse`], [`MediaChangeDecision`]|
//! | **Engine API**  | Report traits whose defaults are the engine defaults.   | [`EngineHooks`], [`ReportChannel`]          |
//! | **Errors**      | Typed non-fatal errors for registration and dispatch.   | [`RegistrationError`], [`DispatchError`]    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use callvisor::{
//!     CallbackKind, FnNamespace, LifecycleManager, MapSinkEnv, Namespace, Value,
//! };
//!
//! // A sink namespace with one handler function.
//! let ns = Arc::new(FnNamespace::new().with("DonePackage", |args: &[Value]| {
//!     println!("installed {}", args[0].as_str().unwrap_or("?"));
//!     Ok(Value::None)
//! }));
//! let env = MapSinkEnv::new().with("Pkg", ns as Arc<dyn Namespace>);
//!
//! // The bridge: handler registration is dynamic and non-fatal.
//! let manager = LifecycleManager::new(Arc::new(env));
//! manager.set_handler(CallbackKind::DonePackage, "Pkg::DonePackage")?;
//!
//! // manager.connect(&mut engine) attaches all report channels;
//! // engine events now flow through the registered handlers.
//! # Ok::<(), callvisor::RegistrationError>(())
//! ```

mod decision;
mod engine;
mod error;
mod kind;
mod manager;
mod value;

pub mod receivers;

mod registry;
mod sink;

// ---- Public re-exports ----

pub use decision::{AuthAnswer, MediaChangeDecision, ProblemResponse};
pub use engine::{
    AuthenticationReport, ConvertDbReport, DigestReport, DownloadProgressReport,
    DownloadResolvableReport, EngineHooks, InstallReport, KeyringConfirmReport,
    KeyringSignalReport, MediaChangeReport, MessageReport, ProgressReport, RebuildDbReport,
    RemoveReport, ReportChannel, ScanDbReport, ScriptExecReport,
};
pub use error::{DispatchError, RegistrationError};
pub use kind::{CallbackFamily, CallbackKind};
pub use manager::LifecycleManager;
pub use registry::{CallbackRegistry, HandlerBinding, HandlerGuard};
pub use sink::{
    CallbackInvoker, FnNamespace, HandlerFn, HandlerResolver, Invocable, MapSinkEnv, Namespace,
    SinkEnv,
};
pub use value::Value;
