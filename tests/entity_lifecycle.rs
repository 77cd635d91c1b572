use sparse_ecs::engine::entity::EntityStore;
use sparse_ecs::{ConfigError, EntityConfig, EntityError, HandleKind, HandleLayout};

fn store_with(config: EntityConfig) -> EntityStore {
    EntityStore::new(config).unwrap()
}

#[test]
fn handle_roundtrip_within_bit_widths() {
    for layout in [HandleLayout::SMALL, HandleLayout::MEDIUM, HandleLayout::LARGE] {
        for index in [0u64, 1, 2, layout.invalid_index() - 1] {
            for version in [0u64, 1, layout.max_version()] {
                let handle = layout.make(index, version);
                assert_eq!(layout.index_of(handle), index);
                assert_eq!(layout.version_of(handle), version);
            }
        }
    }
}

#[test]
fn handle_out_of_range_inputs_are_masked() {
    let layout = HandleLayout::SMALL;
    let handle = layout.make(u64::MAX, u64::MAX);
    assert_eq!(layout.index_of(handle), layout.invalid_index());
    assert_eq!(layout.version_of(handle), layout.max_version());
}

#[test]
fn handle_layout_reports_kind_and_widths() {
    assert_eq!(HandleLayout::SMALL.total_bits(), 16);
    assert_eq!(HandleLayout::SMALL.kind(), HandleKind::Small);
    assert_eq!(HandleLayout::MEDIUM.total_bits(), 32);
    assert_eq!(HandleLayout::MEDIUM.kind(), HandleKind::Small);
    assert_eq!(HandleLayout::LARGE.total_bits(), 64);
    assert_eq!(HandleLayout::LARGE.kind(), HandleKind::Big);
}

#[test]
fn handle_layout_rejects_bad_widths() {
    assert!(matches!(
        HandleLayout::new(0, 4),
        Err(ConfigError::HandleBits { .. })
    ));
    assert!(matches!(
        HandleLayout::new(12, 0),
        Err(ConfigError::HandleBits { .. })
    ));
    assert!(matches!(
        HandleLayout::new(40, 30),
        Err(ConfigError::HandleBits { .. })
    ));
    assert!(HandleLayout::new(32, 32).is_ok());
}

#[test]
fn generational_safety_on_slot_reuse() {
    // Medium layout: first handle is slot 0 at version 0; recycling the
    // slot must issue version 1 and invalidate the old handle.
    let layout = HandleLayout::MEDIUM;
    let mut store = store_with(EntityConfig::default());

    let e1 = store.create().unwrap();
    assert_eq!(layout.index_of(e1), 0);
    assert_eq!(layout.version_of(e1), 0);

    store.remove(e1).unwrap();
    assert!(!store.is_alive(e1));

    let e2 = store.create().unwrap();
    assert_eq!(layout.index_of(e2), 0);
    assert_eq!(layout.version_of(e2), 1);
    assert!(!store.is_alive(e1));
    assert!(store.is_alive(e2));
}

#[test]
fn recycling_reuses_every_slot_with_bumped_version() {
    let layout = HandleLayout::MEDIUM;
    let mut store = store_with(EntityConfig::default());

    let first: Vec<_> = (0..100).map(|_| store.create().unwrap()).collect();
    for &entity in &first {
        store.remove(entity).unwrap();
    }
    assert_eq!(store.len(), 0);

    let second: Vec<_> = (0..100).map(|_| store.create().unwrap()).collect();
    assert_eq!(store.len(), 100);

    let mut old_slots: Vec<_> = first.iter().map(|&e| layout.index_of(e)).collect();
    let mut new_slots: Vec<_> = second.iter().map(|&e| layout.index_of(e)).collect();
    old_slots.sort_unstable();
    new_slots.sort_unstable();
    assert_eq!(old_slots, new_slots, "every slot must be reused");

    for &entity in &second {
        assert_eq!(layout.version_of(entity), 1);
    }
    for &entity in &first {
        assert!(!store.is_alive(entity));
    }
}

#[test]
fn non_resizable_table_reports_capacity() {
    let mut store = store_with(EntityConfig {
        capacity: 2,
        resizable: false,
        ..EntityConfig::default()
    });

    store.create().unwrap();
    store.create().unwrap();
    match store.create() {
        Err(EntityError::Capacity(e)) => {
            assert_eq!(e.capacity, 2);
            assert_eq!(e.needed, 3);
        }
        other => panic!("expected capacity error, got {:?}", other),
    }
    assert_eq!(store.len(), 2);
}

#[test]
fn resizable_table_doubles_past_initial_capacity() {
    let mut store = store_with(EntityConfig {
        capacity: 2,
        ..EntityConfig::default()
    });

    let entities: Vec<_> = (0..10).map(|_| store.create().unwrap()).collect();
    assert!(store.capacity() >= 10);
    for entity in entities {
        assert!(store.is_alive(entity));
    }
}

#[test]
fn exhausting_the_index_space_fails_with_out_of_handles() {
    // 2 index bits: invalid index is 3, so exactly 3 slots exist.
    let layout = HandleLayout::new(2, 4).unwrap();
    let mut store = store_with(EntityConfig {
        layout,
        capacity: 8,
        ..EntityConfig::default()
    });

    for _ in 0..3 {
        store.create().unwrap();
    }
    assert!(matches!(
        store.create(),
        Err(EntityError::OutOfHandles { capacity: 3 })
    ));
}

#[test]
fn saturated_version_retires_the_slot() {
    // Small layout has 4 version bits; after version 15 the slot must be
    // retired instead of recycled, so no fresh handle can alias an old one.
    let layout = HandleLayout::SMALL;
    let mut store = store_with(EntityConfig {
        layout,
        ..EntityConfig::default()
    });

    let mut handle = store.create().unwrap();
    for expected in 1..=15u64 {
        store.remove(handle).unwrap();
        handle = store.create().unwrap();
        assert_eq!(layout.index_of(handle), 0);
        assert_eq!(layout.version_of(handle), expected);
    }

    store.remove(handle).unwrap();
    assert!(!store.is_alive(handle));

    let fresh = store.create().unwrap();
    assert_eq!(layout.index_of(fresh), 1, "retired slot must not be reused");
    assert_eq!(layout.version_of(fresh), 0);
}

#[test]
fn removing_a_stale_handle_fails() {
    let mut store = store_with(EntityConfig::default());
    let entity = store.create().unwrap();
    store.remove(entity).unwrap();
    assert!(matches!(store.remove(entity), Err(EntityError::Stale(_))));
}

#[test]
fn iterator_yields_live_entities_in_slot_order() {
    let layout = HandleLayout::MEDIUM;
    let mut store = store_with(EntityConfig::default());

    let entities: Vec<_> = (0..5).map(|_| store.create().unwrap()).collect();
    store.remove(entities[2]).unwrap();

    let visited: Vec<_> = store.iter().collect();
    assert_eq!(visited.len(), 4);
    let slots: Vec<_> = visited.iter().map(|&e| layout.index_of(e)).collect();
    assert_eq!(slots, vec![0, 1, 3, 4]);

    let mut iter = store.iter();
    let first = iter.next().unwrap();
    iter.reset();
    assert_eq!(iter.next().unwrap(), first);
}

#[test]
fn growable_table_behaves_like_typed() {
    let mut store = store_with(EntityConfig {
        capacity: 2,
        typed: false,
        ..EntityConfig::default()
    });

    let entities: Vec<_> = (0..50).map(|_| store.create().unwrap()).collect();
    for &entity in &entities {
        assert!(store.is_alive(entity));
    }
    store.remove(entities[10]).unwrap();
    assert!(!store.is_alive(entities[10]));
    assert_eq!(store.len(), 49);
}

#[test]
fn zero_capacity_is_rejected() {
    let result = EntityStore::new(EntityConfig {
        capacity: 0,
        ..EntityConfig::default()
    });
    assert!(matches!(result, Err(ConfigError::Capacity { capacity: 0 })));
}
