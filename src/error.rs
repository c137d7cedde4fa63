use thiserror::Error;

/// Errors raised while building or reconfiguring a scene.
///
/// Per-frame simulation never produces these: blocked moves and
/// out-of-range terrain queries are ordinary outcomes, not failures.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not find {kind} resource \"{name}\"")]
    MissingResource { kind: &'static str, name: String },

    #[error("scene node {0:?} does not exist")]
    MissingNode(hecs::Entity),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_names_the_resource() {
        let err = SceneError::MissingResource {
            kind: "mesh",
            name: "Beacon".into(),
        };
        assert_eq!(err.to_string(), "could not find mesh resource \"Beacon\"");
    }
}
