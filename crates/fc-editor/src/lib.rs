pub mod action;
pub mod clipboard;
pub mod geometry;
pub mod input;
pub mod insert;
pub mod reducer;
pub mod schema;
pub mod shortcuts;
pub mod state;
pub mod surface;
pub mod throttle;

pub use action::{Action, NodeAction, Order, SchemaAction, Target};
pub use clipboard::ClipboardEntry;
pub use geometry::{DeclaredLayout, GeometryOracle, StaticGeometry};
pub use input::{Modifiers, SurfaceEvent};
pub use insert::{NodePrototype, insert_prototype, instantiate};
pub use reducer::{Editor, reduce};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::{ContentEditMode, CursorMode, EditorState, Gesture, Selection, SurfaceState};
pub use throttle::RaycastThrottle;
