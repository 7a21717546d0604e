//! End-to-end simulation scenarios, exercised against the public
//! `hexautomata_core` API the way a host application would drive it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hexautomata_core::{CoreConfig, EntityManager, HexCoord, HexGrid, Role, TickRunner};

fn runner(grid: HexGrid, entities: EntityManager) -> TickRunner {
    TickRunner::new(CoreConfig::default(), grid, entities).expect("vm construction")
}

/// A minimal `tracing::Subscriber` that only counts events, so the error
/// isolation scenario can assert on how many reached the logging sink
/// without pulling in `tracing-subscriber`.
struct EventCounter {
    count: Arc<AtomicUsize>,
}

impl tracing::Subscriber for EventCounter {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, _event: &tracing::Event<'_>) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}

#[test]
fn memory_persists_across_ticks() {
    let grid = HexGrid::new();
    let mut entities = EntityManager::new();
    let id = entities.spawn(HexCoord::origin(), Role::Worker);
    entities
        .get_mut(id)
        .unwrap()
        .set_script("if memory.n == nil then memory.n = 0 end; memory.n = memory.n + 1");

    let mut runner = runner(grid, entities);
    for _ in 0..3 {
        runner.run_ticks(0.05);
    }

    let view = runner.debug_view();
    assert_eq!(view.current_tick(), 3);
    assert_eq!(view.memory_field::<f64>(id, "n"), Some(3.0));
}

#[test]
fn move_spends_energy_and_teleports() {
    let grid = HexGrid::new();
    let mut entities = EntityManager::new();
    let id = entities.spawn(HexCoord::origin(), Role::Combat);
    entities
        .get_mut(id)
        .unwrap()
        .set_script("entity.moveTo({q=7, r=7})");

    let mut runner = runner(grid, entities);
    runner.run_ticks(0.05);

    let view = runner.debug_view();
    let entity = view.entity(id).unwrap();
    assert_eq!(entity.position(), HexCoord::new(7, 7));
    assert_eq!(entity.energy(), 145.0);
}

#[test]
fn a_failing_script_does_not_affect_other_entities() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = EventCounter {
        count: count.clone(),
    };
    let _guard = tracing::subscriber::set_default(subscriber);

    let grid = HexGrid::new();
    let mut entities = EntityManager::new();
    let failing = entities.spawn(HexCoord::origin(), Role::Worker);
    entities.get_mut(failing).unwrap().set_script("error(\"boom\")");
    let moving = entities.spawn(HexCoord::new(1, 0), Role::Worker);
    entities
        .get_mut(moving)
        .unwrap()
        .set_script("entity.moveTo({q=2, r=0})");

    let mut runner = runner(grid, entities);
    runner.run_ticks(0.05);

    let view = runner.debug_view();
    let failing_entity = view.entity(failing).unwrap();
    assert_eq!(failing_entity.position(), HexCoord::origin());
    assert_eq!(failing_entity.energy(), Role::Worker.max_energy());

    let moving_entity = view.entity(moving).unwrap();
    assert_eq!(moving_entity.position(), HexCoord::new(2, 0));
    assert_eq!(
        moving_entity.energy(),
        Role::Worker.max_energy() - hexautomata_core::runner::MOVE_COST
    );

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn nearby_query_counts_self_and_in_range_neighbor_only() {
    let mut entities = EntityManager::new();
    entities.spawn(HexCoord::origin(), Role::Worker);
    entities.spawn(HexCoord::new(1, 0), Role::Worker);
    entities.spawn(HexCoord::new(5, 0), Role::Worker);

    let mut out = [0u64; 8];
    let n = entities.nearby(HexCoord::origin(), 2, Some(Role::Worker), &mut out);
    assert_eq!(n, 2);
}

#[test]
fn world_find_nearby_entities_runs_through_the_vm() {
    let grid = HexGrid::new();
    let mut entities = EntityManager::new();
    let origin = entities.spawn(HexCoord::origin(), Role::Worker);
    entities.spawn(HexCoord::new(1, 0), Role::Worker);
    entities.spawn(HexCoord::new(5, 0), Role::Worker);
    entities
        .get_mut(origin)
        .unwrap()
        .set_script(
            "memory.result = #world.findNearbyEntities({q=0, r=0}, 2, \"worker\")",
        );

    let mut runner = runner(grid, entities);
    runner.run_ticks(0.05);

    let view = runner.debug_view();
    assert_eq!(view.memory_field::<i64>(origin, "result"), Some(2));
}

#[test]
fn world_grid_and_role_queries_run_through_the_vm() {
    let grid = HexGrid::create_rect(3, 3);
    let mut entities = EntityManager::new();
    let watcher = entities.spawn(HexCoord::origin(), Role::Scout);
    entities.spawn(HexCoord::new(1, 0), Role::Combat);
    entities
        .get_mut(watcher)
        .unwrap()
        .set_script(
            "local tile = world.getTileAt({q=1, r=0}); \
             memory.has_tile = tile ~= nil; \
             memory.dist = world.distance({q=0, r=0}, {q=1, r=0}); \
             memory.n_neighbors = #world.neighbors({q=0, r=0}); \
             memory.combat_nearby = #world.findNearbyEntities({q=0, r=0}, 1, \"combat\"); \
             memory.any_here = #world.findEntitiesAt({q=1, r=0})",
        );

    let mut runner = runner(grid, entities);
    runner.run_ticks(0.05);

    let view = runner.debug_view();
    assert_eq!(view.memory_field::<bool>(watcher, "has_tile"), Some(true));
    assert_eq!(view.memory_field::<i64>(watcher, "dist"), Some(1));
    assert_eq!(view.memory_field::<i64>(watcher, "n_neighbors"), Some(6));
    assert_eq!(view.memory_field::<i64>(watcher, "combat_nearby"), Some(1));
    assert_eq!(view.memory_field::<i64>(watcher, "any_here"), Some(1));
}

#[test]
fn scheduler_clamps_to_max_ticks_per_frame() {
    let grid = HexGrid::new();
    let entities = EntityManager::new();
    let config = CoreConfig {
        tick_rate: 10.0,
        ..CoreConfig::default()
    };
    let mut runner = TickRunner::new(config, grid, entities).unwrap();
    let n = runner.run_ticks(1.0);
    assert_eq!(n, 5);
    assert_eq!(runner.debug_view().alpha(), 0.0);
}

#[test]
fn invalid_move_argument_is_rejected_without_side_effects() {
    let grid = HexGrid::new();
    let mut entities = EntityManager::new();
    let id = entities.spawn(HexCoord::origin(), Role::Worker);
    entities
        .get_mut(id)
        .unwrap()
        .set_script("ok = entity.moveTo(123)");

    let mut runner = runner(grid, entities);
    runner.run_ticks(0.05);

    let view = runner.debug_view();
    let entity = view.entity(id).unwrap();
    assert_eq!(entity.position(), HexCoord::origin());
    assert_eq!(entity.energy(), Role::Worker.max_energy());
}
