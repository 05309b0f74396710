//! Background and foreground cycles end to end.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;
use chrono::{DateTime, Local, TimeZone, Utc};
use tokio::sync::watch;

use health_relay::acquisition::reader::start_of_day;
use health_relay::acquisition::{AcquisitionCoordinator, HeartRateReader, StepCountReader};
use health_relay::config::{RelayAppConfig, RelayConfig, SchedulerConfig};
use health_relay::health::{MetricKind, Quantity, QuantitySample, SampleStore, Unit};
use health_relay::lifecycle::{App, Shutdown};
use health_relay::relay::HttpRelay;
use health_relay::scheduler::{BackgroundGrant, GrantOutcome, LocalScheduler};
use health_relay::trigger::{Cycle, CycleTrigger};

mod common;

const TASK: &str = "test.fetchHealthData";

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn samples(at: DateTime<Utc>) -> Vec<QuantitySample> {
    vec![
        QuantitySample::new(MetricKind::HeartRate, Quantity::new(68.0, Unit::CountPerMinute), at, at),
        QuantitySample::new(MetricKind::StepCount, Quantity::new(9000.0, Unit::Count), at, at),
        QuantitySample::new(MetricKind::StepCount, Quantity::new(120.0, Unit::Count), at, at),
    ]
}

fn trigger(endpoint: String, scheduler: Arc<LocalScheduler>) -> Arc<CycleTrigger> {
    let at = noon().with_timezone(&Utc) - chrono::Duration::hours(1);
    let store = Arc::new(SampleStore::authorized(samples(at)));
    let coordinator = AcquisitionCoordinator::new(
        Arc::new(HeartRateReader::new(store.clone())),
        Arc::new(StepCountReader::with_clock(store, noon)),
    );
    let relay = HttpRelay::new(&RelayConfig {
        endpoint,
        timeout_secs: 0,
    })
    .unwrap();
    Arc::new(CycleTrigger::new(
        Cycle::new(Arc::new(coordinator), Arc::new(relay)),
        scheduler,
        TASK,
    ))
}

fn scheduler(min_interval_secs: u64) -> Arc<LocalScheduler> {
    Arc::new(LocalScheduler::new(&SchedulerConfig {
        task_id: TASK.into(),
        min_interval_secs,
        grant_window_secs: 30,
    }))
}

#[tokio::test]
async fn test_background_grant_relays_and_completes_true() {
    let (endpoint, captures) = common::start_capture_server(StatusCode::OK, "saved").await;
    let scheduler = scheduler(900);
    let trigger = trigger(endpoint, scheduler.clone());
    trigger.install().unwrap();

    let (_revoke, revoked) = watch::channel(false);
    let (grant, completion) = BackgroundGrant::new(TASK, Duration::from_secs(30), revoked);
    trigger.background(grant).await;

    assert_eq!(completion.await, Ok(true));
    let captures = captures.lock().unwrap();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].body, r#"{"heartRate":68.0,"steps":9120.0}"#);
    assert_eq!(scheduler.pending_count(), 1, "next grant should be armed");
}

#[tokio::test]
async fn test_network_failure_completes_false() {
    let addr = common::start_raw_backend("", Duration::ZERO).await;
    let scheduler = scheduler(900);
    let trigger = trigger(common::endpoint(addr), scheduler.clone());
    trigger.install().unwrap();

    let (_revoke, revoked) = watch::channel(false);
    let (grant, completion) = BackgroundGrant::new(TASK, Duration::from_secs(30), revoked);
    trigger.background(grant).await;

    assert_eq!(completion.await, Ok(false));
    assert_eq!(scheduler.pending_count(), 1);
}

#[tokio::test]
async fn test_slow_endpoint_is_abandoned_at_grant_expiry() {
    let addr = common::start_raw_backend("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok", Duration::from_secs(10)).await;
    let scheduler = scheduler(900);
    let trigger = trigger(common::endpoint(addr), scheduler.clone());
    trigger.install().unwrap();

    let (_revoke, revoked) = watch::channel(false);
    let (grant, completion) = BackgroundGrant::new(TASK, Duration::from_millis(300), revoked);

    let started = Instant::now();
    trigger.background(grant).await;

    assert_eq!(completion.await, Ok(false));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_foreground_cycle_relays() {
    let (endpoint, captures) = common::start_capture_server(StatusCode::OK, "saved").await;
    let trigger = trigger(endpoint, scheduler(900));

    assert!(trigger.foreground().await.unwrap());
    assert_eq!(captures.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_scheduler_keeps_relaying_until_shutdown() {
    let (endpoint, captures) = common::start_capture_server(StatusCode::OK, "saved").await;
    let scheduler = scheduler(1);
    let trigger = trigger(endpoint, scheduler.clone());
    trigger.install().unwrap();

    let shutdown = Shutdown::new();
    let runner = tokio::spawn(scheduler.clone().run(shutdown.subscribe()));

    let deadline = Instant::now() + Duration::from_secs(10);
    while captures.lock().unwrap().len() < 2 {
        assert!(Instant::now() < deadline, "expected two background relays");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    shutdown.trigger();
    runner.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_abandons_running_background_cycle() {
    let addr = common::start_raw_backend("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok", Duration::from_secs(10)).await;
    let scheduler = scheduler(900);
    let trigger = trigger(common::endpoint(addr), scheduler.clone());
    trigger.install().unwrap();

    let shutdown = Shutdown::new();
    let runner = tokio::spawn(scheduler.clone().run(shutdown.subscribe()));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(scheduler.last_outcome(TASK), None, "cycle should be waiting on the endpoint");

    let started = Instant::now();
    shutdown.trigger();
    runner.await.unwrap();

    while scheduler.last_outcome(TASK).is_none() {
        assert!(started.elapsed() < Duration::from_secs(5), "grant was not released on shutdown");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(scheduler.last_outcome(TASK), Some(GrantOutcome::Failure));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_daemon_start_consents_before_first_grant() {
    for _ in 0..10 {
        let (endpoint, captures) = common::start_capture_server(StatusCode::OK, "saved").await;
        let export = tempfile::NamedTempFile::new().unwrap();
        let at = start_of_day(&Local::now()).with_timezone(&Utc);
        std::fs::write(export.path(), serde_json::to_string(&samples(at)).unwrap()).unwrap();

        let mut config = RelayAppConfig::default();
        config.relay.endpoint = endpoint;
        config.source.path = export.path().display().to_string();
        config.source.grant_access = true;
        config.scheduler.task_id = TASK.into();

        let app = App::build(&config).unwrap();
        let shutdown = Shutdown::new();
        let runner = app.start(shutdown.subscribe()).await.unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while app.scheduler.last_outcome(TASK).is_none() {
            assert!(Instant::now() < deadline, "first background grant never completed");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(app.scheduler.last_outcome(TASK), Some(GrantOutcome::Success));

        while captures.lock().unwrap().len() < 2 {
            assert!(Instant::now() < deadline, "expected foreground and background relays");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        shutdown.trigger();
        runner.await.unwrap();
    }
}
