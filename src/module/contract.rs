//! Supervisor-facing module contract.

use async_trait::async_trait;

use crate::module::host::HostInfo;
use crate::module::rpc::Started;

/// Module kind for RPC-serving modules, used for supervisor bookkeeping.
pub const RPC_MODULE_KIND: &str = "rpc";

/// Contract a pluggable module exposes to the host's module supervisor.
///
/// The supervisor drives the lifecycle in order: `initialize`, `start`
/// (consuming the readiness signal to sequence dependent modules), and
/// eventually `stop`. `is_running` may be polled concurrently, e.g. from a
/// health check.
#[async_trait]
pub trait Module: Send + Sync {
    /// Fixed constant identifying the module kind.
    fn kind(&self) -> &'static str;

    /// Instance name of this module.
    fn name(&self) -> &str;

    /// Prepare the module to start. No transport work happens here; this is
    /// an extension point for future setup.
    async fn initialize(&self, host: &HostInfo) -> anyhow::Result<()>;

    /// Construct the transport and dispatcher, attach handlers, begin
    /// serving.
    async fn start(&self) -> anyhow::Result<Started>;

    /// Tear down the serve loop, if one is active. A no-op success when the
    /// module never started or already stopped.
    async fn stop(&self) -> anyhow::Result<()>;

    /// Whether a dispatcher reference is currently held.
    fn is_running(&self) -> bool;
}
