//! Shared utilities for lifecycle and dispatch integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;

use rpc_module::config::ModuleOption;
use rpc_module::{ConfigSource, HostInfo, ModuleCreateInfo, RegisterFn, RpcModule, StaticSource};

pub const TEST_HOST: &str = "test-host";

/// Build a module bound to a loopback ephemeral port.
pub fn test_module(
    name: Option<&str>,
    source: Option<StaticSource>,
    mut options: Vec<ModuleOption>,
    register: RegisterFn,
) -> RpcModule {
    // Loopback binds keep the tests off shared interfaces.
    options.insert(0, rpc_module::config::options::bind("127.0.0.1:0"));

    let info = ModuleCreateInfo {
        name: name.map(str::to_string),
        host: HostInfo::new(TEST_HOST),
        config_source: source.map(|s| Arc::new(s) as Arc<dyn ConfigSource>),
    };
    RpcModule::new(info, register, options).unwrap()
}

/// POST a JSON body to a procedure on a live module.
pub async fn call(addr: SocketAddr, procedure: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/rpc/{procedure}"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let value = response.json().await.unwrap_or(Value::Null);
    (status, value)
}

/// POST with an empty body.
#[allow(dead_code)]
pub async fn call_empty(addr: SocketAddr, procedure: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/rpc/{procedure}"))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let value = response.json().await.unwrap_or(Value::Null);
    (status, value)
}
