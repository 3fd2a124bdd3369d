//! Failure injection tests for the remote config observer.

use std::sync::Arc;
use std::time::Duration;

use config_observer::observer::Fingerprint;
use config_observer::source::StaticSource;
use config_observer::{ObserverError, ReloadEvent, ReloadOutcome};

mod common;

#[tokio::test]
async fn test_empty_remote_document_is_an_error() {
    let source = StaticSource::new();
    source.set("app.yaml", "");
    let observer = common::observer(&source, 3600);

    let registration = observer.register("app.yaml").await.unwrap();
    assert!(matches!(
        registration.initial_load,
        Err(ObserverError::EmptyContent(_))
    ));
    assert_eq!(observer.fingerprint("app.yaml").unwrap(), None);

    source.set("app.yaml", "k: 1");
    observer.reconcile("app.yaml").await.unwrap();
    let good = observer.fingerprint("app.yaml").unwrap();

    // An empty document after a good one keeps the old state.
    source.set("app.yaml", "");
    for _ in 0..2 {
        assert!(matches!(
            observer.reconcile("app.yaml").await,
            Err(ObserverError::EmptyContent(_))
        ));
    }
    assert_eq!(observer.fingerprint("app.yaml").unwrap(), good);
    assert_eq!(registration.store.get_i64("k"), Some(1));
}

#[tokio::test]
async fn test_malformed_document_is_parsed_once() {
    let source = StaticSource::new();
    source.set("app.json", r#"{"k": 1}"#);
    let observer = common::observer(&source, 3600);
    let store = observer.register("app.json").await.unwrap().store;

    source.set("app.json", r#"{"k": "#);
    let err = observer.reconcile("app.json").await.unwrap_err();
    assert!(matches!(
        err,
        ObserverError::Ingest { fingerprint, .. } if fingerprint == Fingerprint::of(br#"{"k": "#)
    ));

    // Previous document survives, and the broken bytes are not retried.
    assert_eq!(store.get_i64("k"), Some(1));
    assert_eq!(
        observer.reconcile("app.json").await.unwrap(),
        ReloadOutcome::Unchanged
    );

    source.set("app.json", r#"{"k": 3}"#);
    assert!(observer.reconcile("app.json").await.unwrap().is_changed());
    assert_eq!(store.get_i64("k"), Some(3));
    assert_eq!(store.revision(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_background_failures_are_published_and_loop_survives() {
    let source = StaticSource::new();
    source.set("app.yaml", "k: 1");
    let observer = common::observer(&source, 5);
    let store = observer.register("app.yaml").await.unwrap().store;
    let mut events = observer.subscribe();

    source.remove("app.yaml");
    match common::next_event(&mut events).await {
        ReloadEvent::Failed { filename, error } => {
            assert_eq!(filename, "app.yaml");
            assert!(error.contains("not found"), "unexpected error: {error}");
        }
        other => panic!("Expected Failed event, got {:?}", other),
    }

    // Outage over: the next pass recovers without intervention.
    source.set("app.yaml", "k: 2");
    let event = common::next_event(&mut events).await;
    assert!(matches!(event, ReloadEvent::Reloaded { .. }));
    assert_eq!(event.filename(), "app.yaml");
    assert_eq!(store.get_i64("k"), Some(2));
    observer.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_one_failing_file_does_not_block_others() {
    let source = StaticSource::new();
    source.set("good.yaml", "k: 1");
    let observer = common::observer(&source, 5);
    observer.register("bad.yaml").await.unwrap();
    let good = observer.register("good.yaml").await.unwrap().store;
    let mut events = observer.subscribe();

    source.set("good.yaml", "k: 2");

    let mut reloaded = false;
    for _ in 0..2 {
        match common::next_event(&mut events).await {
            ReloadEvent::Failed { filename, .. } => assert_eq!(filename, "bad.yaml"),
            ReloadEvent::Reloaded { filename, .. } => {
                assert_eq!(filename, "good.yaml");
                reloaded = true;
            }
        }
    }
    assert!(reloaded);
    assert_eq!(good.get_i64("k"), Some(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_during_passes() {
    let source = StaticSource::new();
    let files: Vec<String> = (0..20).map(|i| format!("svc{i}.yaml")).collect();
    for (i, file) in files.iter().enumerate() {
        source.set(file.clone(), format!("id: {i}"));
    }
    let observer = Arc::new(common::observer(&source, 3600));

    let mut passes = Vec::new();
    for _ in 0..4 {
        let observer = observer.clone();
        passes.push(tokio::spawn(async move {
            for _ in 0..10 {
                observer.reconcile_all().await;
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }));
    }

    let mut registrations = Vec::new();
    for file in files.clone() {
        let observer = observer.clone();
        registrations.push(tokio::spawn(async move { observer.register(&file).await }));
    }

    for handle in registrations {
        let registration = handle.await.unwrap().unwrap();
        assert!(registration.initial_load.is_ok());
    }
    for handle in passes {
        handle.await.unwrap();
    }

    assert_eq!(observer.filenames().len(), files.len());
    for (i, file) in files.iter().enumerate() {
        let store = observer.store(file).unwrap();
        assert_eq!(store.get_i64("id"), Some(i as i64));
        assert_eq!(store.revision(), 1);
        assert_eq!(
            observer.fingerprint(file).unwrap(),
            Some(Fingerprint::of(format!("id: {i}").as_bytes()))
        );
    }
    observer.shutdown().await;
}
