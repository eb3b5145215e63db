//! RPC module lifecycle controller.
//!
//! # Responsibilities
//! - Resolve configuration once at construction
//! - Own the lifecycle state machine and the serve task handle
//! - Invoke the registration callback exactly once, before serving
//! - Emit the readiness signal and the at-most-once serve error

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::config::{resolver, ConfigError, ConfigSource, ModuleOption};
use crate::config::schema::RpcConfig;
use crate::dispatcher::{Dispatcher, ServiceRegistry};
use crate::module::contract::{Module, RPC_MODULE_KIND};
use crate::module::error::{ServeError, StartError, StopError};
use crate::module::host::HostInfo;
use crate::module::lifecycle::{LifecycleState, Shutdown};
use crate::net::listener;
use crate::net::listener::ListenerError;
use crate::observability::metrics::TrafficReporter;

/// Default instance name when the creator supplies none.
pub const DEFAULT_MODULE_NAME: &str = "rpc";

/// Registration callback: attaches procedure handlers through the
/// [`ServiceRegistry`] capability.
///
/// Invoked exactly once during start, after the dispatcher exists and
/// strictly before serving begins. It runs on the startup path and blocks
/// readiness, so it must not block indefinitely.
pub type RegisterFn = Box<dyn FnOnce(&ServiceRegistry) + Send>;

/// Construction inputs for an RPC module.
pub struct ModuleCreateInfo {
    /// Instance name; [`DEFAULT_MODULE_NAME`] when `None` or empty.
    pub name: Option<String>,

    /// Identity of the embedding host.
    pub host: HostInfo,

    /// External override source consulted during resolution.
    pub config_source: Option<Arc<dyn ConfigSource>>,
}

/// Channels returned by a successful start.
#[derive(Debug)]
pub struct Started {
    /// Resolves once the serve loop has been entered, carrying the bound
    /// address. Readiness means "serving has begun", not "serving will never
    /// fail".
    pub ready: oneshot::Receiver<SocketAddr>,

    /// Delivers at most one terminal serve error for this start. Closes
    /// without a value when serving ends cleanly.
    pub serve_error: oneshot::Receiver<ServeError>,
}

/// Handle on the live serve task.
struct ServeHandle {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

/// State guarded by the lifecycle lock.
struct Inner {
    state: LifecycleState,
    register: Option<RegisterFn>,
    server: Option<ServeHandle>,
}

/// A pluggable RPC-serving module.
///
/// Owns its dispatcher and transport; the supervisor drives it through
/// initialize / start / stop and polls `is_running`.
pub struct RpcModule {
    name: String,
    config: RpcConfig,
    host: HostInfo,
    registry: ServiceRegistry,
    inner: Mutex<Inner>,
    // Mirror of `inner.server.is_some()`, written only under the lock.
    running: AtomicBool,
}

impl std::fmt::Debug for RpcModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcModule")
            .field("name", &self.name)
            .field("running", &self.running.load(std::sync::atomic::Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RpcModule {
    /// Construct a module.
    ///
    /// Resolves the effective configuration (seeds, then `options` in order,
    /// then any override fragment from `info.config_source`) and retains the
    /// registration callback until start. A failing option surfaces here and
    /// leaves no usable module.
    pub fn new(
        info: ModuleCreateInfo,
        register: RegisterFn,
        options: Vec<ModuleOption>,
    ) -> Result<Self, ConfigError> {
        let name = match info.name {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_MODULE_NAME.to_string(),
        };

        let config = resolver::resolve(
            info.host.name(),
            &name,
            options,
            info.config_source.as_deref(),
        )?;

        Ok(Self {
            name,
            config,
            host: info.host,
            registry: ServiceRegistry::new(),
            inner: Mutex::new(Inner {
                state: LifecycleState::Created,
                register: Some(register),
                server: None,
            }),
            running: AtomicBool::new(false),
        })
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective configuration, immutable after construction.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Prepare the module to start. No transport work happens here; this is
    /// an extension point for future setup. Always succeeds.
    pub async fn initialize(&self, _host: &HostInfo) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state == LifecycleState::Created {
            inner.state = LifecycleState::Initialized;
        }
        tracing::debug!(module = %self.name, "Module initialized");
        Ok(())
    }

    /// Construct the transport and dispatcher, attach handlers, and begin
    /// serving.
    ///
    /// Returns immediately after the serve loop has been initiated. Failure
    /// to construct the transport is fatal to process startup by contract and
    /// surfaces synchronously; serve-time failures arrive asynchronously on
    /// the returned error channel. Calling start twice, or after stop, is
    /// rejected with [`StartError::AlreadyStarted`].
    pub async fn start(&self) -> Result<Started, StartError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            LifecycleState::Created => return Err(StartError::NotInitialized),
            LifecycleState::Initialized => {}
            LifecycleState::Running | LifecycleState::Stopped => {
                return Err(StartError::AlreadyStarted)
            }
        }

        let (listener, local_addr) = match listener::bind(&self.config.bind).await {
            Ok(bound) => bound,
            Err(err) => {
                // Abort loudly: the module must never half-start.
                inner.state = LifecycleState::Stopped;
                if matches!(err, ListenerError::AddrInUse { .. }) {
                    tracing::error!(
                        bind = %self.config.bind,
                        service = %self.config.advertise_name,
                        "RPC listen address already in use"
                    );
                }
                tracing::error!(
                    error = %err,
                    bind = %self.config.bind,
                    service = %self.config.advertise_name,
                    "Fatal: failed to construct RPC transport, module startup aborted"
                );
                return Err(StartError::Transport(err));
            }
        };

        let reporter = TrafficReporter::new(self.host.name());
        let dispatcher = Dispatcher::new(
            self.config.advertise_name.clone(),
            self.registry.clone(),
            reporter,
        );

        let Some(register) = inner.register.take() else {
            return Err(StartError::AlreadyStarted);
        };
        register(&self.registry);
        tracing::debug!(
            module = %self.name,
            procedures = self.registry.len(),
            "Service registration complete"
        );

        let (ready_tx, ready_rx) = oneshot::channel();
        let (err_tx, err_rx) = oneshot::channel();
        let shutdown = Shutdown::new();
        let mut shutdown_rx = shutdown.subscribe();

        let service = self.config.advertise_name.clone();
        let task = tokio::spawn(async move {
            let serve = dispatcher.serve(listener, async move {
                let _ = shutdown_rx.recv().await;
            });
            if let Err(err) = serve.await {
                tracing::error!(service = %service, error = %err, "RPC serving failed");
                let _ = err_tx.send(ServeError(err));
            }
        });

        inner.server = Some(ServeHandle { shutdown, task });
        inner.state = LifecycleState::Running;
        self.running.store(true, Ordering::SeqCst);

        tracing::info!(
            service = %self.config.advertise_name,
            address = %local_addr,
            "RPC server listening"
        );

        // Serving has been initiated; readiness does not wait on its outcome.
        let _ = ready_tx.send(local_addr);

        Ok(Started {
            ready: ready_rx,
            serve_error: err_rx,
        })
    }

    /// Tear down the serve loop, if one is active.
    ///
    /// Blocks until the serve task acknowledges shutdown. The serve handle is
    /// cleared regardless of the outcome, so the module can never be stuck
    /// "running". A no-op success when the module never started or already
    /// stopped.
    pub async fn stop(&self) -> Result<(), StopError> {
        let server = {
            let mut inner = self.inner.lock().await;
            let Some(server) = inner.server.take() else {
                tracing::debug!(module = %self.name, "Stop with no active server");
                return Ok(());
            };
            inner.state = LifecycleState::Stopped;
            self.running.store(false, Ordering::SeqCst);
            server
        };

        server.shutdown.trigger();
        server.task.await?;

        tracing::info!(service = %self.config.advertise_name, "RPC server stopped");
        Ok(())
    }

    /// Whether a serve handle is currently held.
    ///
    /// May be called concurrently with start and stop; reads an atomic mirror
    /// of the guarded state.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Module for RpcModule {
    fn kind(&self) -> &'static str {
        RPC_MODULE_KIND
    }

    fn name(&self) -> &str {
        RpcModule::name(self)
    }

    async fn initialize(&self, host: &HostInfo) -> anyhow::Result<()> {
        RpcModule::initialize(self, host).await
    }

    async fn start(&self) -> anyhow::Result<Started> {
        Ok(RpcModule::start(self).await?)
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(RpcModule::stop(self).await?)
    }

    fn is_running(&self) -> bool {
        RpcModule::is_running(self)
    }
}
