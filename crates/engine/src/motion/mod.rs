mod fade;
mod shake;
mod state;

pub use fade::{FadeDirection, FadeState};
pub use shake::{ShakeAxis, ShakeState};
pub use state::{MotionState, RouteContinuation, RouteStep};
