use cargotrack::{
    DeliveryStore, EngineConfig, InMemoryDeliveryStore, MergeStrategy, Position, TrackingEngine,
    UnitId, WarehouseArrivalNotice, WarehouseId,
};
use std::sync::Arc;
use std::thread;
use tokio_util::sync::CancellationToken;

const WORKERS: u32 = 16;

fn engine_with_store(strategy: MergeStrategy) -> (TrackingEngine, Arc<InMemoryDeliveryStore>) {
    let store = Arc::new(InMemoryDeliveryStore::new());
    let engine = TrackingEngine::with_config(
        store.clone(),
        EngineConfig {
            merge_strategy: strategy,
            ..EngineConfig::default()
        },
    );
    (engine, store)
}

#[test]
fn distinct_units_each_get_one_entry() {
    for strategy in [MergeStrategy::Atomic, MergeStrategy::CreateThenMerge] {
        let (engine, store) = engine_with_store(strategy);
        let cancel = CancellationToken::new();

        thread::scope(|s| {
            for i in 0..WORKERS {
                let engine = &engine;
                let cancel = &cancel;
                s.spawn(move || {
                    let outcome = engine.record_position(cancel, UnitId::new(i64::from(i)), Position::new(i, i));
                    assert!(outcome.is_applied());
                });
            }
        });

        assert_eq!(store.len().unwrap(), WORKERS as usize);
        for i in 0..WORKERS {
            let record = store.get_by_id(UnitId::new(i64::from(i))).unwrap();
            assert_eq!(record.trail.positions(), &[Position::new(i, i)], "{strategy:?}");
        }
    }
}

#[test]
fn atomic_merge_keeps_every_update_for_one_unit() {
    let (engine, store) = engine_with_store(MergeStrategy::Atomic);
    let cancel = CancellationToken::new();
    let unit = UnitId::new(1);

    thread::scope(|s| {
        for i in 0..WORKERS {
            let engine = &engine;
            let cancel = &cancel;
            s.spawn(move || engine.record_position(cancel, unit, Position::new(i, 0)));
        }
    });

    let record = store.get_by_id(unit).unwrap();
    assert_eq!(record.trail.len(), WORKERS as usize);

    let mut latitudes: Vec<u32> = record.trail.positions().iter().map(|p| p.latitude).collect();
    latitudes.sort_unstable();
    assert_eq!(latitudes, (0..WORKERS).collect::<Vec<_>>());
}

#[test]
fn create_then_merge_survives_contention_on_one_unit() {
    let (engine, store) = engine_with_store(MergeStrategy::CreateThenMerge);
    let cancel = CancellationToken::new();
    let unit = UnitId::new(1);

    thread::scope(|s| {
        for i in 0..WORKERS {
            let engine = &engine;
            let cancel = &cancel;
            s.spawn(move || engine.record_position(cancel, unit, Position::new(i, 0)));
        }
    });

    // Lost updates are possible here, never a missing record.
    assert_eq!(store.len().unwrap(), 1);
    let len = store.get_by_id(unit).unwrap().trail.len();
    assert!((1..=WORKERS as usize).contains(&len), "trail length {len}");
}

#[test]
fn reports_run_alongside_ingestion() {
    let (engine, _) = engine_with_store(MergeStrategy::Atomic);
    let cancel = CancellationToken::new();

    thread::scope(|s| {
        for i in 0..WORKERS {
            let engine = &engine;
            let cancel = &cancel;
            s.spawn(move || {
                let id = i64::from(i);
                engine.record_position(cancel, UnitId::new(id), Position::new(i, i));
                engine.record_arrival(
                    cancel,
                    Position::new(i, i),
                    WarehouseArrivalNotice::new(UnitId::new(id), WarehouseId::new(id % 4), "in"),
                );
            });
        }
        s.spawn(|| {
            for _ in 0..WORKERS {
                let report = engine.compute_report(&cancel).unwrap();
                assert!(report.delivery_units_total_number <= u64::from(WORKERS));
            }
        });
    });

    let report = engine.compute_report(&cancel).unwrap();
    assert_eq!(report.delivery_units_total_number, u64::from(WORKERS));
    assert_eq!(report.warehouses_received_supplies.len(), 4);
    let counted: u64 = report.warehouse_deliveries.iter().map(|c| c.delivery_units_number).sum();
    assert_eq!(counted, u64::from(WORKERS));
}

#[test]
fn shutdown_mid_stream_drops_remaining_events() {
    let (engine, store) = engine_with_store(MergeStrategy::Atomic);
    let cancel = CancellationToken::new();

    engine.record_position(&cancel, UnitId::new(1), Position::new(1, 1));
    cancel.cancel();

    thread::scope(|s| {
        for i in 0..WORKERS {
            let engine = &engine;
            let cancel = &cancel;
            s.spawn(move || {
                assert!(engine
                    .record_position(cancel, UnitId::new(1), Position::new(i, i))
                    .is_dropped());
            });
        }
    });

    assert_eq!(store.get_by_id(UnitId::new(1)).unwrap().trail.len(), 1);
}
