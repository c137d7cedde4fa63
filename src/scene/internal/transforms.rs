use glam::{Mat4, Vec3};
use hecs::{Entity, World};

use crate::agent::Agent;
use crate::behaviours::{Enemy, Spin, Sway};
use crate::scene::components::{Children, TransformComponent, WorldTransform};
use crate::terrain::TerrainSampler;

/// Updates every node reachable from `roots`, depth first in insertion
/// order. A node's behaviours run before its world pose is composed, and
/// its children are visited afterwards, so children always see the
/// parent's pose from this same frame.
pub(crate) fn update_hierarchy(
    world: &mut World,
    roots: &[Entity],
    terrain: &dyn TerrainSampler,
    dt: f32,
) {
    log::trace!("Updating hierarchy from {} root nodes", roots.len());

    let mut stack: Vec<(Entity, Mat4)> = Vec::new();

    for &root in roots {
        stack.push((root, Mat4::IDENTITY));

        while let Some((entity, parent_pose)) = stack.pop() {
            run_behaviours(world, entity, terrain, dt);
            let Some(world_transform) = refresh_world_transform(world, entity, &parent_pose)
            else {
                continue;
            };

            if let Ok(children) = world.get::<&Children>(entity) {
                for &child in children.0.iter().rev() {
                    stack.push((child, world_transform.pose));
                }
            }
        }
    }
}

/// Recomposes world poses without running any behaviour.
pub(crate) fn propagate_transforms(world: &mut World, roots: &[Entity]) {
    let mut stack: Vec<(Entity, Mat4)> = roots.iter().rev().map(|&r| (r, Mat4::IDENTITY)).collect();

    while let Some((entity, parent_pose)) = stack.pop() {
        let Some(world_transform) = refresh_world_transform(world, entity, &parent_pose) else {
            continue;
        };
        if let Ok(children) = world.get::<&Children>(entity) {
            for &child in children.0.iter().rev() {
                stack.push((child, world_transform.pose));
            }
        }
    }
}

fn refresh_world_transform(
    world: &mut World,
    entity: Entity,
    parent_pose: &Mat4,
) -> Option<WorldTransform> {
    let local = match world.get::<&TransformComponent>(entity) {
        Ok(t) => t.0,
        Err(_) => {
            log::trace!("Entity {:?} has no TransformComponent, skipping", entity);
            return None;
        }
    };

    let world_transform = WorldTransform::compose(parent_pose, &local);

    if let Ok(wt) = world.query_one_mut::<&mut WorldTransform>(entity) {
        *wt = world_transform;
    } else if let Err(e) = world.insert_one(entity, world_transform) {
        log::error!(
            "Failed to insert WorldTransform for entity {:?}: {:?}",
            entity,
            e
        );
        return None;
    }

    Some(world_transform)
}

/// World position of a node, falling back to its local position before
/// its first update.
pub(crate) fn world_position(world: &World, entity: Entity) -> Option<Vec3> {
    if let Ok(wt) = world.get::<&WorldTransform>(entity) {
        return Some(wt.position());
    }
    world
        .get::<&TransformComponent>(entity)
        .ok()
        .map(|t| t.0.position)
}

fn run_behaviours(world: &mut World, entity: Entity, terrain: &dyn TerrainSampler, dt: f32) {
    if let Ok((transform, agent)) =
        world.query_one_mut::<(&mut TransformComponent, &mut Agent)>(entity)
    {
        agent.update(&mut transform.0, terrain, dt);
    }

    let target = world
        .get::<&Enemy>(entity)
        .ok()
        .and_then(|enemy| enemy.target);
    let target_position = target.and_then(|t| world_position(world, t));
    if let Ok((transform, enemy)) =
        world.query_one_mut::<(&mut TransformComponent, &mut Enemy)>(entity)
    {
        enemy.update(&mut transform.0, target_position, dt);
    }

    if let Ok((transform, spin)) = world.query_one_mut::<(&mut TransformComponent, &Spin)>(entity) {
        spin.update(&mut transform.0);
    }

    if let Ok((transform, sway)) =
        world.query_one_mut::<(&mut TransformComponent, &mut Sway)>(entity)
    {
        sway.update(&mut transform.0, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::components::{Name, Parent};
    use crate::scene::Transform;
    use crate::terrain::FlatTerrain;
    use glam::Quat;

    fn spawn_pair(world: &mut World, parent_at: Vec3, child_at: Vec3) -> (Entity, Entity) {
        let parent = world.spawn((
            Name::new("Parent"),
            TransformComponent(Transform::from_position(parent_at)),
        ));
        let child = world.spawn((
            Name::new("Child"),
            TransformComponent(Transform::from_position(child_at)),
            Parent(parent),
        ));
        world.insert_one(parent, Children(vec![child])).ok();
        (parent, child)
    }

    #[test]
    fn test_transform_propagation_simple() {
        let mut world = World::new();
        let (parent, child) = spawn_pair(&mut world, Vec3::new(5.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));

        propagate_transforms(&mut world, &[parent]);

        let parent_world = world.get::<&WorldTransform>(parent).unwrap();
        assert_eq!(parent_world.position(), Vec3::new(5.0, 0.0, 0.0));

        let child_world = world.get::<&WorldTransform>(child).unwrap();
        assert_eq!(child_world.position(), Vec3::new(7.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_propagation_ignores_parent_scale() {
        let mut world = World::new();
        let (parent, child) = spawn_pair(&mut world, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        world
            .get::<&mut TransformComponent>(parent)
            .unwrap()
            .0
            .scale = Vec3::splat(2.0);

        propagate_transforms(&mut world, &[parent]);

        let child_world = world.get::<&WorldTransform>(child).unwrap();
        assert_eq!(child_world.position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_propagation_rotation() {
        let mut world = World::new();
        let (parent, child) = spawn_pair(&mut world, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        world
            .get::<&mut TransformComponent>(parent)
            .unwrap()
            .0
            .orientation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        propagate_transforms(&mut world, &[parent]);

        let child_world = world.get::<&WorldTransform>(child).unwrap();
        assert!(child_world
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn moving_parent_moves_child_in_same_update() {
        let mut world = World::new();
        let (parent, child) = spawn_pair(&mut world, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        world.insert_one(parent, Enemy::new(None, 0.0)).ok();
        let terrain = FlatTerrain::default();

        update_hierarchy(&mut world, &[parent], &terrain, 0.1);
        world
            .get::<&mut TransformComponent>(parent)
            .unwrap()
            .0
            .position = Vec3::new(1.0, 0.0, 0.0);
        update_hierarchy(&mut world, &[parent], &terrain, 0.1);

        let child_world = world.get::<&WorldTransform>(child).unwrap();
        assert_eq!(child_world.position(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn enemy_chases_world_position_of_target() {
        let mut world = World::new();
        let target = world.spawn((TransformComponent(Transform::from_position(Vec3::new(
            0.0, 0.0, -10.0,
        ))),));
        let enemy = world.spawn((
            TransformComponent(Transform::default()),
            Enemy::new(Some(target), 1.0),
        ));

        update_hierarchy(&mut world, &[target, enemy], &FlatTerrain::default(), 1.0);

        assert_eq!(
            world_position(&world, enemy),
            Some(Vec3::new(0.0, 0.0, -1.0))
        );
    }
}
