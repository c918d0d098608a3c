//! Move-route scripting extensions for tile-grid characters: a compiler that
//! turns script mnemonics into typed invocations, and the per-tick shake, fade
//! and route-continuation state machine that executes them.

mod character;
mod config;
pub mod host;
pub mod motion;
pub mod route;

pub use character::Character;
pub use config::{MotionConfig, DEFAULT_OPACITY_SPAN, DEFAULT_TILE_SIZE_PX};
pub use host::{
    ActorDirectory, ActorRoster, CharacterBody, GridBody, GridError, GridMap, HostServices,
    Portrait, ScriptEvaluator, ScriptLog, DEFAULT_SEARCH_LIMIT,
};
pub use motion::{
    FadeDirection, FadeState, MotionState, RouteContinuation, RouteStep, ShakeAxis, ShakeState,
};
pub use route::{
    Direction, Invocation, InvocationError, InvocationTarget, Literal, MnemonicRegistry,
    MnemonicSpec, MoveRoute, RegistryError, RouteCommand, RouteCompiler, TilePos,
};
