pub mod axis;
pub mod controller;
pub mod state;
pub mod surface;

pub use axis::{Axis, PointerPosition, SurfaceGeometry, SurfaceLayout};
pub use controller::{GestureContext, InteractionConfig, InteractionController};
pub use state::{GestureOutcome, GestureState, PointerEvent, PointerKind};
pub use surface::{HitTarget, PreviewBlock, RenderedBlock, SurfaceId, TimelineSurface};
