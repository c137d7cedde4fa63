use crate::scene::components::{Children, Name, TransformComponent, WorldTransform};
use hecs::{Entity, World};

pub(crate) fn debug_print_hierarchy(world: &World, roots: &[Entity]) {
    log::info!("=== Scene Hierarchy ===");
    let mut stack: Vec<(Entity, usize)> = roots.iter().rev().map(|&r| (r, 0)).collect();

    while let Some((entity, depth)) = stack.pop() {
        let name = world
            .get::<&Name>(entity)
            .map(|n| n.0.clone())
            .unwrap_or_else(|_| format!("{:?}", entity));
        let local = world.get::<&TransformComponent>(entity).ok().map(|t| t.0);
        let world_pos = world.get::<&WorldTransform>(entity).ok().map(|w| w.position());

        match (local, world_pos) {
            (Some(local), Some(world_pos)) => log::info!(
                "{:indent$}{}: local P:{:?} world P:{:?}",
                "",
                name,
                local.position,
                world_pos,
                indent = depth * 2
            ),
            (Some(local), None) => log::info!(
                "{:indent$}{}: local P:{:?} (not yet updated)",
                "",
                name,
                local.position,
                indent = depth * 2
            ),
            _ => log::info!("{:indent$}{}: no transform", "", name, indent = depth * 2),
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            for &child in children.0.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    log::info!("=======================");
}
