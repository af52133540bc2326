//! # tableau-scenes
//!
//! The built-in scene library. Every scene is a JSON scene description
//! compiled into the binary; none of them has scene-specific code.

use tableau_core::{TableauError, TableauResult};
use tableau_ir::SceneSpec;

#[derive(Debug, Clone, Copy)]
pub struct SceneInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

const FLASH_ATTENTION: &str = include_str!("../scenes/flash_attention.json");
const LLM_EXPLANATION: &str = include_str!("../scenes/llm_explanation.json");
const CHARGE_INTERACTION: &str = include_str!("../scenes/charge_interaction.json");

const SCENES: &[SceneInfo] = &[
    SceneInfo {
        name: "flash_attention",
        description: "Query, key and value matrices flowing into attention scores and output",
        source: FLASH_ATTENTION,
    },
    SceneInfo {
        name: "llm_explanation",
        description: "Predict/sample/repeat, transformer internals, embeddings and softmax",
        source: LLM_EXPLANATION,
    },
    SceneInfo {
        name: "charge_interaction",
        description: "Two point charges in 3D with a sampled field; the negative charge moves",
        source: CHARGE_INTERACTION,
    },
];

pub fn available_scenes() -> &'static [SceneInfo] {
    SCENES
}

pub fn names() -> impl Iterator<Item = &'static str> {
    SCENES.iter().map(|s| s.name)
}

/// Look up a built-in scene. Names are matched case-insensitively and `-`
/// is accepted in place of `_`.
pub fn builtin(name: &str) -> Option<&'static SceneInfo> {
    let wanted = name.to_lowercase().replace('-', "_");
    SCENES.iter().find(|s| s.name == wanted)
}

/// Parse a built-in scene.
pub fn load(name: &str) -> TableauResult<SceneSpec> {
    let info = builtin(name).ok_or_else(|| {
        TableauError::Validation(format!(
            "unknown scene '{}' (available: {})",
            name,
            names().collect::<Vec<_>>().join(", ")
        ))
    })?;
    SceneSpec::from_json(info.source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(builtin("flash_attention").is_some());
        assert!(builtin("Flash-Attention").is_some());
        assert!(builtin("nope").is_none());
        assert_eq!(names().count(), 3);
    }

    #[test]
    fn test_every_scene_parses_under_its_own_name() {
        for info in available_scenes() {
            let spec = load(info.name).unwrap();
            assert_eq!(spec.id.0, info.name);
        }
    }

    #[test]
    fn test_unknown_scene_lists_available() {
        let err = load("missing").unwrap_err();
        assert!(err.to_string().contains("charge_interaction"));
    }
}
