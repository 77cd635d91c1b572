use sparse_ecs::{ConfigError, Entity, HandleLayout, SparseConfig, SparseSet};

const LAYOUT: HandleLayout = HandleLayout::MEDIUM;

fn entity(index: u64) -> Entity {
    LAYOUT.make(index, 0)
}

fn set_with(config: SparseConfig) -> SparseSet {
    SparseSet::new(config).unwrap()
}

fn default_set() -> SparseSet {
    set_with(SparseConfig::default())
}

/// Checks the sparse/dense correspondence over the whole dense prefix.
fn assert_coherent(set: &SparseSet) {
    for (position, entity) in set.data().into_iter().enumerate() {
        assert_eq!(
            set.index_of(entity),
            Some(position),
            "sparse cell of dense[{position}] must point back at it"
        );
    }
}

#[test]
fn add_assigns_consecutive_dense_positions() {
    let mut set = default_set();
    for index in 0..10 {
        assert_eq!(set.add(entity(index), true), Some(index as usize));
    }
    assert_eq!(set.len(), 10);
    assert_coherent(&set);
}

#[test]
fn add_is_idempotent_in_membership() {
    let mut set = default_set();
    let a = entity(7);
    assert_eq!(set.add(a, true), Some(0));
    assert_eq!(set.add(a, true), Some(0));
    assert_eq!(set.len(), 1);
}

#[test]
fn full_set_with_growth_declined_rejects_the_insert() {
    let mut set = set_with(SparseConfig {
        pool_size: 2,
        ..SparseConfig::default()
    });

    assert_eq!(set.add(entity(0), false), Some(0));
    assert_eq!(set.add(entity(1), false), Some(1));
    assert_eq!(set.add(entity(2), false), None);
    assert_eq!(set.len(), 2);
    assert!(!set.contains(entity(2)));
}

#[test]
fn growth_doubles_from_the_pool_floor() {
    let mut set = set_with(SparseConfig {
        pool_size: 2,
        ..SparseConfig::default()
    });

    for index in 0..20 {
        assert!(set.add(entity(index), true).is_some());
    }
    assert_eq!(set.len(), 20);
    assert!(set.capacity() >= 20);
    assert_coherent(&set);
}

#[test]
fn pages_allocate_lazily_per_region_touched() {
    let mut set = default_set();
    let page_size = SparseConfig::default().page_size as u64;

    set.add(entity(0), true);
    assert_eq!(set.page_count(), 1);

    // An index several pages away must allocate exactly one more page.
    set.add(entity(page_size * 4 + 1), true);
    assert_eq!(set.page_count(), 2);
    assert!(set.contains(entity(0)));
    assert!(set.contains(entity(page_size * 4 + 1)));
}

#[test]
fn swap_remove_moves_only_the_last_entry() {
    let mut set = default_set();
    let (a, b, c, d) = (entity(0), entity(1), entity(2), entity(3));
    for e in [a, b, c, d] {
        set.add(e, true);
    }

    assert!(set.remove(b));
    assert!(!set.contains(b));
    assert_eq!(set.index_of(a), Some(0));
    assert_eq!(set.index_of(d), Some(1), "last entry fills the hole");
    assert_eq!(set.index_of(c), Some(2));
    assert_eq!(set.data(), vec![a, d, c]);
    assert_coherent(&set);
}

#[test]
fn remove_of_absent_entity_reports_false() {
    let mut set = default_set();
    assert!(!set.remove(entity(0)));
    set.add(entity(0), true);
    assert!(!set.remove(entity(1)));
}

#[test]
fn swap_exchanges_two_positions_and_keeps_the_rest() {
    let mut set = default_set();
    let entities: Vec<_> = (0..4).map(entity).collect();
    for &e in &entities {
        set.add(e, true);
    }

    assert!(set.swap(entities[1], entities[3]));
    assert_eq!(set.index_of(entities[1]), Some(3));
    assert_eq!(set.index_of(entities[3]), Some(1));
    assert_eq!(set.index_of(entities[0]), Some(0));
    assert_eq!(set.index_of(entities[2]), Some(2));
    assert_coherent(&set);

    assert!(!set.swap(entities[0], entities[0]), "identical arguments");
    assert!(!set.swap(entities[0], entity(99)), "absent argument");
}

#[test]
fn sort_orders_dense_and_rebuilds_sparse() {
    let mut set = default_set();
    for index in [5u64, 3, 9, 1, 7] {
        set.add(entity(index), true);
    }

    assert!(set.sort_by(|a, b| LAYOUT.index_of(a).cmp(&LAYOUT.index_of(b))));
    let order: Vec<_> = set.data().iter().map(|&e| LAYOUT.index_of(e)).collect();
    assert_eq!(order, vec![1, 3, 5, 7, 9]);
    assert_coherent(&set);
}

#[test]
fn sort_of_single_element_reports_false() {
    let mut set = default_set();
    assert!(!set.sort_by(|a, b| a.0.cmp(&b.0)));
    set.add(entity(0), true);
    assert!(!set.sort_by(|a, b| a.0.cmp(&b.0)));
}

#[test]
fn resize_only_grows() {
    let mut set = default_set();
    let capacity = set.capacity();
    assert!(!set.resize(capacity));
    assert!(set.resize(capacity * 2));
    assert_eq!(set.capacity(), capacity * 2);
}

#[test]
fn reset_keeps_pages_and_clear_drops_them() {
    let mut set = default_set();
    for index in 0..3 {
        set.add(entity(index), true);
    }
    let pages = set.page_count();

    set.reset();
    assert_eq!(set.len(), 0);
    assert!(!set.contains(entity(0)), "stale cells read as absent");
    assert_eq!(set.page_count(), pages, "reset keeps pages for reuse");

    set.add(entity(1), true);
    assert_eq!(set.index_of(entity(1)), Some(0));

    set.clear();
    assert_eq!(set.len(), 0);
    assert_eq!(set.page_count(), 0);
}

#[test]
fn iterator_walks_dense_order_and_resets() {
    let mut set = default_set();
    for index in 0..5 {
        set.add(entity(index), true);
    }

    let collected: Vec<_> = set.iter().collect();
    assert_eq!(collected, set.data());

    let mut iter = set.iter();
    iter.next();
    iter.next();
    iter.reset();
    assert_eq!(iter.next(), Some(entity(0)));
}

#[test]
fn page_size_must_be_a_large_power_of_two() {
    for page_size in [0usize, 100, 127, 129, 1000] {
        let result = SparseSet::new(SparseConfig {
            page_size,
            ..SparseConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::PageSize { .. })), "page size {page_size}");
    }
    assert!(SparseSet::new(SparseConfig {
        page_size: 128,
        ..SparseConfig::default()
    })
    .is_ok());
}
