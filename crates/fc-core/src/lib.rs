pub mod cmath;
pub mod config;
pub mod css;
pub mod document;
pub mod error;
pub mod id;
pub mod lint;
pub mod model;
pub mod props;
pub mod query;
pub mod resolve;
pub mod snapshot;
pub mod template;
pub mod transform;

pub use config::{EditorConfig, RaycastTargeting};
pub use document::Document;
pub use error::{DocumentError, Result};
pub use id::{NodeId, TemplateId};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use props::{Change, NodeChange, apply_change};
pub use query::{get_ancestors, get_depth, get_node_by_id, get_parent_id};
pub use resolve::{resolve, resolve_in_instance};
pub use template::{TemplateDefinition, TemplateRegistry};
pub use transform::{ResizeAnchor, TransformOp, apply_transform};

// Re-export kurbo geometry so downstream crates share one set of primitives
pub use kurbo::{Point, Rect, Vec2};
