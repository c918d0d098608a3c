use tracing::debug;

use super::invocation::{Invocation, Literal};
use super::model::{MoveRoute, RouteCommand};
use super::registry::MnemonicRegistry;

/// Rewrites recognized script mnemonics in a route into invocations.
#[derive(Debug, Clone)]
pub struct RouteCompiler {
    registry: MnemonicRegistry,
}

impl Default for RouteCompiler {
    fn default() -> Self {
        Self::new(MnemonicRegistry::with_builtins())
    }
}

impl RouteCompiler {
    pub fn new(registry: MnemonicRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MnemonicRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MnemonicRegistry {
        &mut self.registry
    }

    /// Compiles a single script line. `None` means the line is not a known
    /// mnemonic and must reach the script evaluator untouched.
    pub fn compile_script(&self, text: &str) -> Option<Invocation> {
        let mut tokens = text.split_whitespace();
        let spec = self.registry.lookup(tokens.next()?)?;
        // Arity is not enforced: surplus tokens are dropped, missing ones are
        // reported when the invocation runs.
        let args = tokens
            .take(spec.arity())
            .map(Literal::parse)
            .collect::<Vec<_>>();
        Some(Invocation::new(spec.target(), args))
    }

    /// Returns a compiled copy of `route`. Flags and non-script commands are
    /// carried over unchanged; an already compiled route is returned as is.
    pub fn compile(&self, route: &MoveRoute) -> MoveRoute {
        let mut compiled = route.clone();
        if route.is_compiled() {
            return compiled;
        }

        let mut rewritten = 0usize;
        for (index, command) in compiled.commands.iter_mut().enumerate() {
            let RouteCommand::Script { text } = command else {
                continue;
            };
            let Some(invocation) = self.compile_script(text) else {
                continue;
            };
            debug!(index, script = %text, invocation = %invocation, "script_rewritten");
            *command = RouteCommand::Invocation(invocation);
            rewritten += 1;
        }
        compiled.mark_compiled();

        debug!(commands = compiled.len(), rewritten, "route_compiled");
        compiled
    }
}
