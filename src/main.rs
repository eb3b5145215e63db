//! Demo host: runs a single RPC module with a couple of procedures.
//!
//! The module supervisor of a real host process would drive many modules;
//! this binary drives exactly one, wiring the same lifecycle calls a
//! supervisor would issue.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;

use rpc_module::observability::{logging, metrics};
use rpc_module::{
    ConfigSource, FileSource, HostInfo, ModuleCreateInfo, RpcModule, RpcRequest, ServiceRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "rpc-module", about = "Demo host for the RPC serving module")]
struct Args {
    /// Path to a TOML override source with [modules.<name>] tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Module instance name.
    #[arg(long)]
    name: Option<String>,

    /// Host identity: default advertise name and metrics tag.
    #[arg(long, default_value = "rpc-host")]
    host_name: String,

    /// Metrics exporter bind address.
    #[arg(long, default_value = "127.0.0.1:9090")]
    metrics_address: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init("rpc_module=debug,tower_http=debug");
    tracing::info!("rpc-module demo host starting");

    match args.metrics_address.parse() {
        Ok(addr) => metrics::init_metrics(addr),
        Err(_) => {
            tracing::error!(
                metrics_address = %args.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let source: Option<Arc<dyn ConfigSource>> = match &args.config {
        Some(path) => Some(Arc::new(FileSource::load(path)?)),
        None => None,
    };

    let host = HostInfo::new(&args.host_name);
    let info = ModuleCreateInfo {
        name: args.name,
        host: host.clone(),
        config_source: source,
    };

    let module = RpcModule::new(info, Box::new(register_procedures), Vec::new())?;
    module.initialize(&host).await?;

    let mut started = match module.start().await {
        Ok(started) => started,
        Err(err) => {
            // Transport construction failure is fatal to the whole process,
            // not just this module.
            tracing::error!(error = %err, "Module startup failed");
            std::process::exit(1);
        }
    };

    let addr = started.ready.await?;
    tracing::info!(address = %addr, "Module ready");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
        err = &mut started.serve_error => {
            if let Ok(err) = err {
                tracing::error!(error = %err, "Serving terminated");
            }
        }
    }

    module.stop().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn register_procedures(registry: &ServiceRegistry) {
    registry.register("ping", |_req| async move { Ok(json!("pong")) });
    registry.register("echo", |req: RpcRequest| async move { Ok(req.body) });
}
