use std::sync::Arc;

use glam::Vec3;
use hecs::{Entity, World};

use super::components::*;
use super::internal::{debug, transforms};
use super::NodeBuilder;
use crate::agent::Agent;
use crate::environment::Environment;
use crate::error::SceneError;
use crate::scene::Transform;
use crate::terrain::{FlatTerrain, TerrainSampler};

/// Owns every node of one scene and drives its per-frame update.
///
/// Nodes live in a `hecs::World`. Root nodes are kept in insertion order,
/// children in their parent's `Children` list; that order is the update
/// order. Removing a node removes its whole subtree. Nodes must not be added
/// or removed while [`SceneGraph::update`] runs.
pub struct SceneGraph {
    pub world: World,
    roots: Vec<Entity>,
    terrain: Arc<dyn TerrainSampler>,
    environment: Environment,
    time: f64,
}

impl SceneGraph {
    pub fn new(terrain: Arc<dyn TerrainSampler>) -> Self {
        Self {
            world: World::new(),
            roots: Vec::new(),
            terrain,
            environment: Environment::default(),
            time: 0.0,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn terrain(&self) -> &dyn TerrainSampler {
        self.terrain.as_ref()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn background(&self) -> Vec3 {
        self.environment.background()
    }

    pub fn set_background(&mut self, color: Vec3) {
        self.environment.set_background(color);
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Adds a root node; it is updated after all previously added roots.
    pub fn add_node(&mut self, node: NodeBuilder) -> Entity {
        let entity = node.spawn(&mut self.world);
        self.roots.push(entity);
        entity
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: Entity, node: NodeBuilder) -> Result<Entity, SceneError> {
        if !self.world.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }

        let child = node.spawn(&mut self.world);
        self.world
            .insert_one(child, Parent(parent))
            .map_err(|_| SceneError::MissingNode(child))?;

        if let Ok(children) = self.world.query_one_mut::<&mut Children>(parent) {
            children.0.push(child);
        } else {
            self.world
                .insert_one(parent, Children(vec![child]))
                .map_err(|_| SceneError::MissingNode(parent))?;
        }

        Ok(child)
    }

    /// Despawns `entity` and all of its descendants.
    pub fn remove_node(&mut self, entity: Entity) -> Result<(), SceneError> {
        if !self.world.contains(entity) {
            return Err(SceneError::MissingNode(entity));
        }

        let parent = self.world.get::<&Parent>(entity).ok().map(|p| p.0);
        match parent {
            Some(parent) => {
                if let Ok(children) = self.world.query_one_mut::<&mut Children>(parent) {
                    children.0.retain(|&c| c != entity);
                }
            }
            None => self.roots.retain(|&r| r != entity),
        }

        let mut stack = vec![entity];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            if let Ok(children) = self.world.get::<&Children>(current) {
                stack.extend(children.0.iter().copied());
            }
            if self.world.despawn(current).is_ok() {
                removed += 1;
            }
        }

        log::debug!("Removed {} scene nodes", removed);
        Ok(())
    }

    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<&Children>(entity)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).ok().map(|p| p.0)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn node_count(&self) -> usize {
        self.world.len() as usize
    }

    /// First node with the given name, in no particular order.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world
            .get::<&TransformComponent>(entity)
            .ok()
            .map(|t| t.0)
    }

    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.world
            .query_one_mut::<&mut TransformComponent>(entity)
            .ok()
            .map(|t| &mut t.0)
    }

    pub fn world_transform(&self, entity: Entity) -> Option<WorldTransform> {
        self.world.get::<&WorldTransform>(entity).ok().map(|w| *w)
    }

    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        transforms::world_position(&self.world, entity)
    }

    pub fn flags(&self, entity: Entity) -> Option<NodeFlags> {
        self.world.get::<&NodeFlags>(entity).ok().map(|f| *f)
    }

    pub fn flags_mut(&mut self, entity: Entity) -> Option<&mut NodeFlags> {
        self.world.query_one_mut::<&mut NodeFlags>(entity).ok()
    }

    pub fn agent(&self, entity: Entity) -> Option<Agent> {
        self.world.get::<&Agent>(entity).ok().map(|a| (*a).clone())
    }

    /// Mutable access to an agent together with the transform it drives.
    pub fn agent_mut(&mut self, entity: Entity) -> Option<(&mut Agent, &mut Transform)> {
        self.world
            .query_one_mut::<(&mut Agent, &mut TransformComponent)>(entity)
            .ok()
            .map(|(agent, transform)| (agent, &mut transform.0))
    }

    pub fn set_visible(&mut self, entity: Entity, visible: bool) {
        if let Ok(v) = self.world.query_one_mut::<&mut Visible>(entity) {
            v.0 = visible;
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advances every node by `dt` seconds: each node updates itself, then
    /// its world pose is recomposed, then its children follow.
    pub fn update(&mut self, dt: f64) {
        self.time += dt;
        transforms::update_hierarchy(&mut self.world, &self.roots, self.terrain.as_ref(), dt as f32);
    }

    /// Recomposes world poses without advancing any behaviour, e.g. after
    /// scene setup so positions are queryable before the first frame.
    pub fn refresh_world_transforms(&mut self) {
        transforms::propagate_transforms(&mut self.world, &self.roots);
    }

    pub fn debug_print_hierarchy(&self) {
        debug::debug_print_hierarchy(&self.world, &self.roots);
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Arc::new(FlatTerrain::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_update_in_insertion_order() {
        let mut scene = SceneGraph::default();
        let a = scene.add_node(NodeBuilder::new("A"));
        let b = scene.add_node(NodeBuilder::new("B"));
        let c = scene.add_node(NodeBuilder::new("C"));
        assert_eq!(scene.roots(), &[a, b, c]);
    }

    #[test]
    fn add_child_keeps_order_and_parent_link() {
        let mut scene = SceneGraph::default();
        let root = scene.add_node(NodeBuilder::new("Tree"));
        let first = scene.add_child(root, NodeBuilder::new("Branch")).unwrap();
        let second = scene.add_child(root, NodeBuilder::new("Branch")).unwrap();

        assert_eq!(scene.children(root), vec![first, second]);
        assert_eq!(scene.parent(second), Some(root));
        assert_eq!(scene.roots(), &[root]);
    }

    #[test]
    fn add_child_to_missing_parent_fails() {
        let mut scene = SceneGraph::default();
        let root = scene.add_node(NodeBuilder::new("Gone"));
        scene.remove_node(root).unwrap();

        let result = scene.add_child(root, NodeBuilder::new("Orphan"));
        assert!(matches!(result, Err(SceneError::MissingNode(e)) if e == root));
    }

    #[test]
    fn removing_a_node_removes_its_subtree() {
        let mut scene = SceneGraph::default();
        let root = scene.add_node(NodeBuilder::new("Tree"));
        let branch = scene.add_child(root, NodeBuilder::new("Branch")).unwrap();
        let leaf = scene.add_child(branch, NodeBuilder::new("Leaf")).unwrap();
        let other = scene.add_node(NodeBuilder::new("Rock"));

        scene.remove_node(branch).unwrap();

        assert!(!scene.contains(branch));
        assert!(!scene.contains(leaf));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.roots(), &[root, other]);
    }

    #[test]
    fn child_world_pose_tracks_parent_in_same_frame() {
        let mut scene = SceneGraph::default();
        let parent = scene.add_node(NodeBuilder::new("Parent"));
        let child = scene
            .add_child(parent, NodeBuilder::new("Child").with_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        scene.update(0.016);

        let delta = Vec3::new(3.0, 0.0, -2.0);
        scene.transform_mut(parent).unwrap().position += delta;
        let before = scene.world_position(child).unwrap();
        scene.update(0.016);

        assert_eq!(scene.world_position(child).unwrap(), before + delta);
    }

    #[test]
    fn find_by_name_and_flags() {
        let mut scene = SceneGraph::default();
        let beacon = scene.add_node(NodeBuilder::new("Beacon0"));
        assert_eq!(scene.find_by_name("Beacon0"), Some(beacon));
        assert_eq!(scene.find_by_name("Beacon1"), None);

        scene.flags_mut(beacon).unwrap().inverted = true;
        assert!(scene.flags(beacon).unwrap().inverted);
    }
}
