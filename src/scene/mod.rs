// scene/mod.rs

pub mod builder;
pub mod camera;
pub mod components;
mod internal;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use builder::NodeBuilder;
pub use camera::Camera;
pub use scene::SceneGraph;
pub use transform::Transform;

// Re-export all components
pub use components::{
    Children, Name, NodeFlags, Parent, Renderable, TransformComponent, Visible, WorldTransform,
};
