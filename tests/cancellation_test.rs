//! Timeout and caller-signal reconciliation during dispatch.

mod support;

use std::time::Duration;

use fetch_adapter::prelude::*;
use serde_json::json;
use support::{RecordingTransport, adapter, host_config};
use tokio_util::sync::CancellationToken;

fn slow(delay_secs: u64) -> RecordingTransport {
    RecordingTransport::json(200, json!({"done": true})).with_delay(Duration::from_secs(delay_secs))
}

#[tokio::test(start_paused = true)]
async fn params_timeout_aborts_slow_request() {
    let transport = slow(10);
    let adapter = adapter(host_config(), &transport);

    let err = adapter
        .url("slow")
        .timeout(Duration::from_secs(1))
        .get()
        .json()
        .await
        .unwrap_err();

    assert!(err.is_cancellation(), "{err}");
    assert_eq!(transport.cancelled_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn adapter_default_timeout_applies_when_call_sets_none() {
    let transport = slow(10);
    let adapter = adapter(
        AdapterConfig::builder()
            .host("https://example.com")
            .timeout(Duration::from_secs(2))
            .build(),
        &transport,
    );

    let err = adapter.url("slow").get().wait().await.unwrap_err();
    assert!(err.is_cancellation());
}

#[tokio::test(start_paused = true)]
async fn call_timeout_overrides_params_and_default() {
    let transport = slow(5);
    let adapter = adapter(
        AdapterConfig::builder()
            .host("https://example.com")
            .timeout(Duration::from_secs(1))
            .build(),
        &transport,
    );

    let params = Params::new("slow").with_timeout(Duration::from_secs(2));
    let body = adapter
        .fetch(params, DispatchOptions::new().with_timeout(Duration::from_secs(30)))
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"done": true}));
}

#[tokio::test]
async fn pre_cancelled_signal_never_reaches_transport() {
    let transport = RecordingTransport::default();
    let adapter = adapter(host_config(), &transport);
    let signal = CancellationToken::new();
    signal.cancel();

    let err = adapter
        .url("posts")
        .signal(signal)
        .timeout(Duration::from_secs(5))
        .get()
        .wait()
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn external_cancel_wins_before_timeout() {
    let transport = slow(10);
    let adapter = adapter(host_config(), &transport);
    let signal = CancellationToken::new();

    let proxy = adapter
        .url("slow")
        .signal(signal.clone())
        .timeout(Duration::from_secs(5))
        .get();
    let pending = tokio::spawn(proxy.wait());

    tokio::time::sleep(Duration::from_secs(1)).await;
    signal.cancel();

    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_cancellation());
    assert_eq!(transport.cancelled_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn external_signal_without_timeout_is_passed_through() {
    let transport = slow(10);
    let adapter = adapter(host_config(), &transport);
    let signal = CancellationToken::new();

    let pending = tokio::spawn(adapter.url("slow").signal(signal.clone()).get().wait());
    tokio::time::sleep(Duration::from_millis(100)).await;
    signal.cancel();

    assert!(pending.await.unwrap().unwrap_err().is_cancellation());
}

#[tokio::test(start_paused = true)]
async fn dispatch_signal_overrides_params_signal() {
    let transport = slow(10);
    let adapter = adapter(host_config(), &transport);
    let params_signal = CancellationToken::new();
    let call_signal = CancellationToken::new();

    let pending = tokio::spawn(
        adapter
            .fetch(
                Params::new("slow").with_signal(params_signal.clone()),
                DispatchOptions::new().with_signal(call_signal.clone()),
            )
            .wait(),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    params_signal.cancel();
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert!(pending.await.unwrap().is_ok());
    assert!(!call_signal.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn completed_request_is_not_cancelled_afterwards() {
    let transport = slow(1);
    let adapter = adapter(host_config(), &transport);
    let signal = CancellationToken::new();

    adapter
        .url("quick")
        .signal(signal.clone())
        .timeout(Duration::from_secs(5))
        .get()
        .wait()
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    let sent = &transport.calls()[0];
    let derived = sent.signal.as_ref().expect("derived signal");
    assert!(!derived.is_cancelled());
    assert!(!signal.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_in_config_means_no_timeout() {
    let transport = RecordingTransport::json(200, json!({"done": true}))
        .with_delay(Duration::from_millis(50));
    let config: AdapterConfig =
        serde_json::from_str(r#"{"host":"https://example.com","timeout":0}"#).unwrap();
    assert_eq!(config.timeout, Some(Duration::ZERO));
    let adapter = adapter(config, &transport);

    let body = adapter.url("x").get().json().await.unwrap();
    assert_eq!(body, json!({"done": true}));
    assert_eq!(transport.cancelled_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_call_timeout_still_completes() {
    let transport = slow(1);
    let adapter = adapter(host_config(), &transport);

    let body = adapter
        .url("slow")
        .timeout(Duration::ZERO)
        .get()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"done": true}));
}
