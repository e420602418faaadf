use atrium_core::models::{AccessContext, AccessEvent, CacheKey};
use atrium_prediction::{AccessRecorder, Predictor};
use chrono::Utc;
use proptest::prelude::*;

fn to_events(ids: &[u8]) -> Vec<AccessEvent> {
    let now = Utc::now();
    ids.iter()
        .map(|i| {
            AccessEvent::new(
                CacheKey::new(format!("p{i}")).unwrap(),
                now,
                AccessContext::Navigation,
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn predictions_are_ranked_and_bounded(
        ids in prop::collection::vec(0u8..6, 0..60),
        from in 0u8..6,
        top_n in 0usize..5,
        min_confidence in 0.0f64..1.0,
    ) {
        let predictor = Predictor::new();
        predictor.learn(&to_events(&ids));
        let from = CacheKey::new(format!("p{from}")).unwrap();
        let predictions = predictor.predict(&from, top_n, min_confidence);

        prop_assert!(predictions.len() <= top_n);
        for p in &predictions {
            prop_assert!(p.confidence >= min_confidence);
            prop_assert!(p.confidence > 0.0 && p.confidence <= 1.0);
        }
        for pair in predictions.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn unfiltered_confidences_sum_to_one(ids in prop::collection::vec(0u8..4, 2..60)) {
        let predictor = Predictor::new();
        let events = to_events(&ids);
        predictor.learn(&events);
        let from = &events[0].key;
        let total: f64 = predictor
            .predict(from, usize::MAX, 0.0)
            .iter()
            .map(|p| p.confidence)
            .sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recorder_never_exceeds_capacity(n in 0usize..300, capacity in 1usize..50, retain in 0usize..60) {
        let recorder = AccessRecorder::new(capacity, retain);
        for e in to_events(&vec![1u8; n]) {
            recorder.record(e);
            prop_assert!(recorder.len() <= capacity);
        }
        prop_assert_eq!(recorder.total_recorded(), n as u64);
    }
}
