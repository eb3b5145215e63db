//! Supervisor-visible lifecycle scenarios: initialize, start, readiness,
//! stop, and the guarded edges between them.

mod common;

use serde_json::json;

use rpc_module::{
    ConfigFragment, HostInfo, ModuleCreateInfo, RpcModule, StartError, StaticSource,
    RPC_MODULE_KIND,
};

fn echo_register(registry: &rpc_module::ServiceRegistry) {
    registry.register("echo", |req: rpc_module::RpcRequest| async move { Ok(req.body) });
}

#[tokio::test]
async fn full_lifecycle_round_trip() {
    let module = common::test_module(None, None, Vec::new(), Box::new(echo_register));
    let host = HostInfo::new(common::TEST_HOST);

    assert_eq!(module.name(), "rpc");
    assert_eq!(module.config().advertise_name, common::TEST_HOST);
    assert!(!module.is_running());

    module.initialize(&host).await.unwrap();
    assert!(!module.is_running());

    let mut started = module.start().await.unwrap();
    let addr = started.ready.await.expect("readiness signal");
    assert!(module.is_running());

    let (status, body) = common::call(addr, "echo", &json!({"hello": "world"})).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"hello": "world"}));

    module.stop().await.unwrap();
    assert!(!module.is_running());

    // Serving ended cleanly; the error channel closes without a value.
    assert!(started.serve_error.try_recv().is_err());
}

#[tokio::test]
async fn default_configuration_without_overrides() {
    let info = ModuleCreateInfo {
        name: None,
        host: HostInfo::new(common::TEST_HOST),
        config_source: None,
    };
    let module = RpcModule::new(info, Box::new(|_| {}), Vec::new()).unwrap();

    assert_eq!(module.config().bind, ":0");
    assert_eq!(module.config().advertise_name, common::TEST_HOST);
    assert_eq!(rpc_module::Module::kind(&module), RPC_MODULE_KIND);
}

#[tokio::test]
async fn stop_before_start_is_noop_success() {
    let module = common::test_module(None, None, Vec::new(), Box::new(|_| {}));
    let host = HostInfo::new(common::TEST_HOST);

    // Never initialized.
    module.stop().await.unwrap();
    assert!(!module.is_running());

    // Initialized but never started.
    module.initialize(&host).await.unwrap();
    module.stop().await.unwrap();
    assert!(!module.is_running());
}

#[tokio::test]
async fn stop_twice_is_noop_success() {
    let module = common::test_module(None, None, Vec::new(), Box::new(echo_register));
    let host = HostInfo::new(common::TEST_HOST);

    module.initialize(&host).await.unwrap();
    let started = module.start().await.unwrap();
    started.ready.await.unwrap();

    module.stop().await.unwrap();
    module.stop().await.unwrap();
    assert!(!module.is_running());
}

#[tokio::test]
async fn double_start_is_rejected() {
    let module = common::test_module(None, None, Vec::new(), Box::new(echo_register));
    let host = HostInfo::new(common::TEST_HOST);

    module.initialize(&host).await.unwrap();
    let started = module.start().await.unwrap();
    started.ready.await.unwrap();

    let err = module.start().await.unwrap_err();
    assert!(matches!(err, StartError::AlreadyStarted));
    assert!(module.is_running());

    module.stop().await.unwrap();

    // A stopped module is terminal; restart is also rejected.
    let err = module.start().await.unwrap_err();
    assert!(matches!(err, StartError::AlreadyStarted));
}

#[tokio::test]
async fn start_without_initialize_is_rejected() {
    let module = common::test_module(None, None, Vec::new(), Box::new(|_| {}));
    let err = module.start().await.unwrap_err();
    assert!(matches!(err, StartError::NotInitialized));
    assert!(!module.is_running());
}

#[tokio::test]
async fn transport_failure_is_synchronous_and_fatal() {
    // Occupy a loopback port, then point a module at it.
    let blocker = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let taken = blocker.local_addr().unwrap();

    let info = ModuleCreateInfo {
        name: None,
        host: HostInfo::new(common::TEST_HOST),
        config_source: None,
    };
    let module = RpcModule::new(
        info,
        Box::new(|_| {}),
        vec![rpc_module::config::options::bind(taken.to_string())],
    )
    .unwrap();
    let host = HostInfo::new(common::TEST_HOST);

    module.initialize(&host).await.unwrap();
    let err = module.start().await.unwrap_err();
    assert!(matches!(err, StartError::Transport(_)));
    assert!(!module.is_running());

    // Stop after an aborted start is still a no-op success.
    module.stop().await.unwrap();
}

#[tokio::test]
async fn readiness_fires_exactly_once_per_start() {
    let module = common::test_module(None, None, Vec::new(), Box::new(echo_register));
    let host = HostInfo::new(common::TEST_HOST);

    module.initialize(&host).await.unwrap();
    let mut started = module.start().await.unwrap();

    let addr = (&mut started.ready).await.expect("readiness signal");
    assert_ne!(addr.port(), 0);

    // One-shot: the channel is consumed, no second notification can arrive.
    assert!(started.ready.try_recv().is_err());

    module.stop().await.unwrap();
}

#[tokio::test]
async fn override_fragment_supersedes_programmatic_options() {
    let source = StaticSource::new().with_fragment(
        "rpc",
        ConfigFragment {
            bind: Some("127.0.0.1:0".to_string()),
            advertise_name: Some("from-override".to_string()),
        },
    );

    let module = common::test_module(
        None,
        Some(source),
        vec![rpc_module::config::options::advertise_name("from-option")],
        Box::new(echo_register),
    );
    let host = HostInfo::new(common::TEST_HOST);

    assert_eq!(module.config().advertise_name, "from-override");

    module.initialize(&host).await.unwrap();
    let started = module.start().await.unwrap();
    let addr = started.ready.await.unwrap();

    // The advertised identity reaches peers on the wire.
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/rpc/echo"))
        .json(&json!(1))
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-rpc-service").unwrap(),
        "from-override"
    );

    module.stop().await.unwrap();
}

#[tokio::test]
async fn concurrent_is_running_during_stop() {
    let module = std::sync::Arc::new(common::test_module(
        None,
        None,
        Vec::new(),
        Box::new(echo_register),
    ));
    let host = HostInfo::new(common::TEST_HOST);

    module.initialize(&host).await.unwrap();
    let started = module.start().await.unwrap();
    started.ready.await.unwrap();

    // Hammer is_running from another task while stop runs; must not race or
    // report running after stop completed.
    let probe = {
        let module = module.clone();
        tokio::spawn(async move {
            while module.is_running() {
                tokio::task::yield_now().await;
            }
        })
    };

    module.stop().await.unwrap();
    probe.await.unwrap();
    assert!(!module.is_running());
}
