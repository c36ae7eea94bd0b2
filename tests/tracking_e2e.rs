use cargotrack::{
    ArrivalAccounting, DeliveryStore, EngineConfig, InMemoryDeliveryStore, IngestOutcome,
    MergeStrategy, Position, TrackingEngine, UnitId, WarehouseArrivalNotice, WarehouseId,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn engine_with_store(config: EngineConfig) -> (TrackingEngine, Arc<InMemoryDeliveryStore>) {
    let store = Arc::new(InMemoryDeliveryStore::new());
    let engine = TrackingEngine::with_config(store.clone(), config);
    (engine, store)
}

fn notice(unit: i64, warehouse: i64, message: &str) -> WarehouseArrivalNotice {
    WarehouseArrivalNotice::new(UnitId::new(unit), WarehouseId::new(warehouse), message)
}

#[test]
fn sequential_updates_build_trail_in_order() {
    let (engine, store) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();
    let unit = UnitId::new(42);

    let positions: Vec<Position> = (0..10).map(|i| Position::new(i, i * 2)).collect();
    for (i, p) in positions.iter().enumerate() {
        let outcome = engine.record_position(&cancel, unit, *p);
        let expected = if i == 0 { IngestOutcome::Created } else { IngestOutcome::Merged };
        assert_eq!(outcome, expected);
    }

    let record = store.get_by_id(unit).unwrap();
    assert_eq!(record.trail.positions(), positions.as_slice());
    assert_eq!(record.trail.unit_id, unit);
    assert!(record.arrival.is_none());
}

#[test]
fn position_and_arrival_merge_in_either_order() {
    for strategy in [MergeStrategy::Atomic, MergeStrategy::CreateThenMerge] {
        let config = EngineConfig {
            merge_strategy: strategy,
            ..EngineConfig::default()
        };
        let cancel = CancellationToken::new();

        let (moved_first, a) = engine_with_store(config);
        moved_first.record_position(&cancel, UnitId::new(1), Position::new(3, 4));
        moved_first.record_arrival(&cancel, Position::new(5, 6), notice(1, 9, "in"));

        let (arrived_first, b) = engine_with_store(config);
        arrived_first.record_arrival(&cancel, Position::new(5, 6), notice(1, 9, "in"));
        arrived_first.record_position(&cancel, UnitId::new(1), Position::new(3, 4));

        for store in [&a, &b] {
            assert_eq!(store.len().unwrap(), 1);
            let record = store.get_by_id(UnitId::new(1)).unwrap();
            assert_eq!(record.trail.positions(), &[Position::new(3, 4)], "{strategy:?}");
            let arrival = record.arrival.expect("arrival recorded");
            assert_eq!(arrival.position, Position::new(5, 6));
            assert_eq!(arrival.warehouse_id(), WarehouseId::new(9));
        }
    }
}

#[test]
fn arrival_only_record_has_empty_trail() {
    let (engine, store) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();

    engine.record_arrival(&cancel, Position::new(1, 2), notice(8, 3, "hello"));

    let record = store.get_by_id(UnitId::new(8)).unwrap();
    assert!(record.trail.is_empty());
    assert_eq!(record.trail.unit_id, UnitId::new(8));
    assert!(record.has_arrived());
}

#[test]
fn second_arrival_overwrites_first() {
    let (engine, store) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();

    engine.record_arrival(&cancel, Position::new(1, 1), notice(2, 10, "first"));
    engine.record_arrival(&cancel, Position::new(2, 2), notice(2, 20, "second"));

    let arrival = store.get_by_id(UnitId::new(2)).unwrap().arrival.unwrap();
    assert_eq!(arrival.position, Position::new(2, 2));
    assert_eq!(arrival.notice.warehouse_id, WarehouseId::new(20));
    assert_eq!(arrival.notice.message, "second");
}

#[test]
fn empty_store_reports_nothing() {
    let (engine, _) = engine_with_store(EngineConfig::default());
    let report = engine.compute_report(&CancellationToken::new()).unwrap();

    assert_eq!(report.delivery_units_total_number, 0);
    assert!(report.warehouses_received_supplies.is_empty());
    assert!(report.delivery_units_reached_destination.is_empty());
    assert!(report.warehouse_deliveries.is_empty());
}

#[test]
fn report_counts_units_per_warehouse() {
    let (engine, _) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();

    engine.record_arrival(&cancel, Position::origin(), notice(1, 5, ""));
    engine.record_arrival(&cancel, Position::origin(), notice(2, 5, ""));
    engine.record_arrival(&cancel, Position::origin(), notice(3, 6, ""));

    let report = engine.compute_report(&cancel).unwrap();
    assert_eq!(report.delivery_units_total_number, 3);
    assert_eq!(
        report.warehouses_received_supplies,
        vec![WarehouseId::new(5), WarehouseId::new(6)]
    );
    assert_eq!(report.deliveries_to(WarehouseId::new(5)), 2);
    assert_eq!(report.deliveries_to(WarehouseId::new(6)), 1);
    assert_eq!(
        report.delivery_units_reached_destination,
        vec![UnitId::new(1), UnitId::new(2), UnitId::new(3)]
    );
}

#[test]
fn position_only_unit_counts_as_warehouse_zero_by_default() {
    let (engine, _) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();

    engine.record_position(&cancel, UnitId::new(77), Position::new(1, 1));
    engine.record_arrival(&cancel, Position::origin(), notice(78, 4, ""));

    let report = engine.compute_report(&cancel).unwrap();
    assert_eq!(report.delivery_units_total_number, 2);
    assert_eq!(
        report.warehouses_received_supplies,
        vec![WarehouseId::new(0), WarehouseId::new(4)]
    );
    assert_eq!(
        report.delivery_units_reached_destination,
        vec![UnitId::new(0), UnitId::new(78)]
    );
    assert_eq!(report.deliveries_to(WarehouseId::new(0)), 1);
}

#[test]
fn position_only_unit_is_excluded_when_configured() {
    let (engine, _) = engine_with_store(EngineConfig {
        arrival_accounting: ArrivalAccounting::ExcludeAbsent,
        ..EngineConfig::default()
    });
    let cancel = CancellationToken::new();

    engine.record_position(&cancel, UnitId::new(77), Position::new(1, 1));
    engine.record_arrival(&cancel, Position::origin(), notice(78, 4, ""));

    let report = engine.compute_report(&cancel).unwrap();
    assert_eq!(report.delivery_units_total_number, 2);
    assert_eq!(report.warehouses_received_supplies, vec![WarehouseId::new(4)]);
    assert_eq!(report.delivery_units_reached_destination, vec![UnitId::new(78)]);
}

#[test]
fn report_uses_the_announced_unit_id() {
    // The arrival's unit id is reported, not the record key.
    let (engine, _) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();

    engine.record_arrival(&cancel, Position::origin(), notice(-3, 1, "negative ids are accepted"));

    let report = engine.compute_report(&cancel).unwrap();
    assert_eq!(report.delivery_units_reached_destination, vec![UnitId::new(-3)]);
}

#[test]
fn report_serializes_to_wire_names() {
    let (engine, _) = engine_with_store(EngineConfig::default());
    let cancel = CancellationToken::new();
    engine.record_arrival(&cancel, Position::origin(), notice(1, 2, ""));

    let report = engine.compute_report(&cancel).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["delivery_units_total_number"], 1);
    assert_eq!(json["warehouses_received_supplies_list"], serde_json::json!([2]));
    assert_eq!(json["delivery_units_reached_destination"], serde_json::json!([1]));
    assert!(json["generated_at"].is_string());
}
