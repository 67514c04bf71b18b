//! Top-level generation options.

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::pipeline::settings::OutputTarget;

/// Options for a full generation run.
///
/// Deserializes from the project configuration file; `output` accepts either
/// a single target object or an array of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Source root the entry directory and tsconfig.json live under.
    ///
    /// Default: empty, filled in from the command line.
    #[serde(default)]
    pub root_dir: PathBuf,
    /// Output targets, processed in order
    #[serde(deserialize_with = "deserialize_one_or_many")]
    pub output: Vec<OutputTarget>,
}

impl GenerateOptions {
    /// Creates options for a single output target.
    pub fn single(root_dir: impl Into<PathBuf>, target: OutputTarget) -> Self {
        Self {
            root_dir: root_dir.into(),
            output: vec![target],
        }
    }
}

fn deserialize_one_or_many<'de, D>(deserializer: D) -> Result<Vec<OutputTarget>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(OutputTarget),
        Many(Vec<OutputTarget>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(target) => vec![target],
        OneOrMany::Many(targets) => targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_single_output_object() {
        let options: GenerateOptions = serde_json::from_str(
            r#"{
                "rootDir": "pkg",
                "output": { "outDir": "dist", "rootModuleName": "myLib" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.root_dir, PathBuf::from("pkg"));
        assert_eq!(options.output.len(), 1);
        assert_eq!(options.output[0].root_module_name, "myLib");
    }

    #[test]
    fn test_deserialize_output_array() {
        let options: GenerateOptions = serde_json::from_str(
            r#"{
                "output": [
                    { "outDir": "dist", "rootModuleName": "myLib" },
                    { "outDir": "dist-es", "rootModuleName": "myLibEs" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(options.root_dir, PathBuf::new());
        assert_eq!(options.output.len(), 2);
        assert_eq!(options.output[1].root_module_name, "myLibEs");
    }
}
