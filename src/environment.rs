use glam::Vec3;

/// Describes scene-wide state that is not attached to any node.
///
/// Currently this is only the background colour, which the game also uses
/// to signal a win (green) or a loss (red).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    background: Vec3,
}

impl Environment {
    pub const WIN_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const LOSE_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    /// Creates a new environment with the provided background colour.
    pub fn new(background: Vec3) -> Self {
        Self { background }
    }

    /// Returns the colour used when clearing a frame.
    pub fn background(&self) -> Vec3 {
        self.background
    }

    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
