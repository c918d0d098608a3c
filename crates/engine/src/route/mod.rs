mod compiler;
mod invocation;
mod model;
mod registry;

pub use compiler::RouteCompiler;
pub use invocation::{Invocation, InvocationError, InvocationTarget, Literal};
pub use model::{Direction, MoveRoute, RouteCommand, TilePos};
pub use registry::{MnemonicRegistry, MnemonicSpec, RegistryError};
