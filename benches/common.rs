#![allow(dead_code)]

use sparse_ecs::{ECSResult, Entity, Registry, StoreKind};

pub const ENTITIES_SMALL: usize = 10_000;
pub const ENTITIES_MED: usize = 100_000;

#[derive(Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy)]
pub struct Wealth {
    pub value: f32,
}

#[derive(Clone, Copy)]
pub struct Settled;

pub fn make_registry() -> Registry {
    Registry::new().unwrap()
}

pub fn populate(registry: &mut Registry, count: usize) -> ECSResult<Vec<Entity>> {
    let mut entities = Vec::with_capacity(count);
    for i in 0..count {
        let entity = registry.create()?;
        registry.add(
            entity,
            StoreKind::Standard,
            Position { x: i as f32, y: 0.0 },
        )?;
        registry.add(entity, StoreKind::Standard, Wealth { value: 100.0 })?;
        registry.add(entity, StoreKind::Empty, Settled)?;
        entities.push(entity);
    }
    Ok(entities)
}
