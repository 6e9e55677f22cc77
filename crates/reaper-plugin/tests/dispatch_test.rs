//! Integration tests for hook dispatch: ordering, aggregation, and lookup.

mod helpers;

use std::sync::Arc;

use reaper_core::config::DispatchMode;
use reaper_core::error::ErrorKind;
use reaper_plugin::prelude::*;
use reaper_plugin::{HOOK_SPECS, HookDispatcher, PluginRegistry};

use helpers::{counting_detector, fixed_scorer, plugin_label};

#[tokio::test]
async fn test_no_plugins_yields_empty_for_every_hook() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let signal = Signal::new(Sense::Sight, "s");
    let scored = ScoredSignal::new(signal.clone(), 0.1).unwrap();

    for spec in HOOK_SPECS.iter() {
        let args = match spec.point {
            HookPoint::Detect(_) => HookArgs::from("s"),
            HookPoint::Score => HookArgs::from(signal.clone()),
            HookPoint::Act => HookArgs::from(scored.clone()),
        };
        let outcome = dispatcher.dispatch(spec.name, args).await.unwrap();
        assert!(outcome.is_empty(), "{} should be empty", spec.name);
        assert!(outcome.is_clean());
    }
}

#[tokio::test]
async fn test_single_detector_returns_its_signal() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let expected = Signal::new(Sense::Sight, "s1");
    let returned = expected.clone();
    dispatcher
        .registry()
        .register(
            Plugin::detection(
                Sense::Sight,
                FnDetector::new("one", move |_| Ok(vec![returned.clone()])),
            ),
            None,
        )
        .unwrap();

    let outcome = dispatcher.dispatch("detect_sight", "s1").await.unwrap();
    assert_eq!(outcome.results, vec![HookValue::Signal(expected)]);
    assert!(outcome.is_clean());
}

#[tokio::test]
async fn test_two_detectors_flatten_in_plugin_order() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let registry = dispatcher.registry();
    registry
        .register(counting_detector(Sense::Hearing, "pair", 2), None)
        .unwrap();
    registry
        .register(counting_detector(Sense::Hearing, "none", 0), None)
        .unwrap();

    let signals = dispatcher.detect(Sense::Hearing, "mic").await.into_results();
    assert_eq!(signals.len(), 2);
    assert!(signals.iter().all(|s| plugin_label(s) == "pair"));
    let indexes: Vec<_> = signals.iter().map(|s| s.payload()["index"].clone()).collect();
    assert_eq!(indexes, vec![serde_json::json!(0), serde_json::json!(1)]);
}

#[tokio::test]
async fn test_result_length_is_sum_in_registration_order() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let sizes = [("a", 3), ("b", 1), ("c", 0), ("d", 2)];
    for (label, count) in sizes {
        dispatcher
            .registry()
            .register(counting_detector(Sense::Touch, label, count), Some(label))
            .unwrap();
    }

    let signals = dispatcher.detect(Sense::Touch, "pad").await.into_results();
    assert_eq!(signals.len(), 6);
    let labels: Vec<_> = signals.iter().map(plugin_label).collect();
    assert_eq!(labels, vec!["a", "a", "a", "b", "d", "d"]);
}

#[tokio::test]
async fn test_partial_plugins_are_skipped() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    dispatcher
        .registry()
        .register(counting_detector(Sense::Smell, "smell", 1), None)
        .unwrap();
    dispatcher.registry().register(fixed_scorer(0.4), None).unwrap();

    assert_eq!(dispatcher.detect(Sense::Smell, "x").await.len(), 1);
    assert!(dispatcher.detect(Sense::Taste, "x").await.is_empty());
    let scored = dispatcher.score(&Signal::new(Sense::Smell, "x")).await;
    assert_eq!(scored.len(), 1);
    assert_eq!(scored.results[0].score(), 0.4);
}

#[tokio::test]
async fn test_unknown_hook_regardless_of_plugins() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let err = dispatcher.dispatch("unknown_hook", "s").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownHook);

    dispatcher
        .registry()
        .register(counting_detector(Sense::Sight, "sight", 1), None)
        .unwrap();
    dispatcher.registry().register(fixed_scorer(0.5), None).unwrap();
    let err = dispatcher.dispatch("unknown_hook", "s").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownHook);
}

#[tokio::test]
async fn test_wrong_argument_shape_is_rejected() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let err = dispatcher
        .dispatch("detect_sight", Signal::new(Sense::Sight, "s"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);
    assert!(err.to_string().contains("detect_sight"));
}

#[tokio::test]
async fn test_unregister_then_reregister() {
    let dispatcher = helpers::dispatcher(DispatchMode::Sequential, None);
    let keep = counting_detector(Sense::Sight, "keep", 1);
    let toggled = counting_detector(Sense::Sight, "toggled", 2);
    dispatcher.registry().register(keep, None).unwrap();
    dispatcher.registry().register(toggled.clone(), None).unwrap();
    assert_eq!(dispatcher.detect(Sense::Sight, "s").await.len(), 3);

    dispatcher.registry().unregister(&toggled).unwrap();
    let after = dispatcher.detect(Sense::Sight, "s").await.into_results();
    assert_eq!(after.len(), 1);
    assert!(after.iter().all(|s| plugin_label(s) == "keep"));

    dispatcher.registry().register(toggled.clone(), None).unwrap();
    assert_eq!(dispatcher.detect(Sense::Sight, "s").await.len(), 3);

    let err = dispatcher
        .registry()
        .unregister(&counting_detector(Sense::Sight, "never", 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PluginNotFound);
}

#[tokio::test]
async fn test_shared_registry_across_dispatchers() {
    let registry = Arc::new(PluginRegistry::new());
    let first = HookDispatcher::new(registry.clone());
    let second = HookDispatcher::new(registry.clone());
    registry
        .register(counting_detector(Sense::Taste, "t", 1), None)
        .unwrap();

    assert_eq!(first.detect(Sense::Taste, "x").await.len(), 1);
    assert_eq!(second.detect(Sense::Taste, "x").await.len(), 1);
}
