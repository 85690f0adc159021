// imgforge/src/core/mod.rs
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A single declared image transformation. Deserialized from the
/// operations file, where each entry carries a `"type"` tag plus the
/// variant's parameters. Order within the operations array defines
/// application order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Resize {
        width: u32,
        height: u32,
    },
    /// Counter-clockwise rotation in degrees. With `expand` the canvas
    /// grows to the rotated bounding box; without it the original
    /// canvas is kept and corners clip.
    Rotate {
        angle: f32,
        #[serde(default)]
        expand: bool,
    },
    Convert {
        mode: String,
    },
    Filter {
        kind: FilterKind,
    },
    Enhance {
        kind: EnhanceKind,
        factor: f32,
    },
    Watermark {
        text: String,
        #[serde(default)]
        position: Option<(u32, u32)>,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
}

fn default_opacity() -> f32 {
    0.5
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::Rotate { .. } => "rotate",
            Operation::Convert { .. } => "convert",
            Operation::Filter { .. } => "filter",
            Operation::Enhance { .. } => "enhance",
            Operation::Watermark { .. } => "watermark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Blur,
    Sharpen,
    EdgeEnhance,
    Emboss,
    Contour,
    FindEdges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceKind {
    Brightness,
    Contrast,
    Sharpness,
    Color,
}

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: std::path::PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: std::path::PathBuf,
        source: image::ImageError,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported color mode: {0}")]
    UnsupportedMode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;

/// Reads an operations file: a JSON array of tagged operation objects.
/// Unknown `type` values and unknown filter/enhancement kinds are
/// rejected here, before any image is touched.
pub fn load_operations(path: &Path) -> Result<Vec<Operation>> {
    let data = std::fs::read_to_string(path)?;
    let ops: Vec<Operation> = serde_json::from_str(&data)?;
    Ok(ops)
}

pub mod processor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operation_sequence() {
        let json = r#"[
            {"type": "resize", "width": 800, "height": 600},
            {"type": "rotate", "angle": 90},
            {"type": "convert", "mode": "L"},
            {"type": "filter", "kind": "edge_enhance"},
            {"type": "enhance", "kind": "contrast", "factor": 1.2},
            {"type": "watermark", "text": "draft"}
        ]"#;
        let ops: Vec<Operation> = serde_json::from_str(json).unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(
            ops[0],
            Operation::Resize {
                width: 800,
                height: 600
            }
        );
        // expand defaults off
        assert_eq!(
            ops[1],
            Operation::Rotate {
                angle: 90.0,
                expand: false
            }
        );
        assert_eq!(
            ops[3],
            Operation::Filter {
                kind: FilterKind::EdgeEnhance
            }
        );
        match &ops[5] {
            Operation::Watermark {
                position, opacity, ..
            } => {
                assert!(position.is_none());
                assert_eq!(*opacity, 0.5);
            }
            other => panic!("expected watermark, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_operation_type() {
        let json = r#"[{"type": "sepia"}]"#;
        assert!(serde_json::from_str::<Vec<Operation>>(json).is_err());
    }

    #[test]
    fn rejects_unknown_filter_kind() {
        let json = r#"[{"type": "filter", "kind": "motion_blur"}]"#;
        assert!(serde_json::from_str::<Vec<Operation>>(json).is_err());
    }

    #[test]
    fn rejects_unknown_enhancement_kind() {
        let json = r#"[{"type": "enhance", "kind": "gamma", "factor": 2.0}]"#;
        assert!(serde_json::from_str::<Vec<Operation>>(json).is_err());
    }

    #[test]
    fn load_operations_missing_file_is_an_error() {
        let result = load_operations(Path::new("no/such/operations.json"));
        assert!(matches!(result, Err(ForgeError::Io(_))));
    }

    #[test]
    fn operation_names_match_wire_tags() {
        let op = Operation::Enhance {
            kind: EnhanceKind::Brightness,
            factor: 1.5,
        };
        assert_eq!(op.name(), "enhance");
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["type"], "enhance");
        assert_eq!(value["kind"], "brightness");
    }
}
