use std::collections::HashMap;

use thiserror::Error;

use super::invocation::InvocationTarget;
use super::model::Direction;
use crate::motion::{FadeDirection, ShakeAxis};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("mnemonic name cannot be empty")]
    EmptyName,
    #[error("mnemonic name '{name}' must be a single token")]
    ContainsWhitespace { name: String },
    #[error("duplicate mnemonic registration: {name}")]
    Duplicate { name: String },
}

#[derive(Debug, Clone)]
pub struct MnemonicSpec {
    name: String,
    summary: String,
    target: InvocationTarget,
}

impl MnemonicSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn target(&self) -> InvocationTarget {
        self.target
    }

    pub fn arity(&self) -> usize {
        self.target.arity()
    }

    pub fn arg_schema(&self) -> String {
        self.target
            .param_names()
            .iter()
            .map(|param| format!("<{param}>"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Table of script mnemonics recognized by the route compiler.
///
/// Lookup is case-insensitive; names are stored as registered and indexed
/// upper-cased.
#[derive(Debug, Clone, Default)]
pub struct MnemonicRegistry {
    specs: Vec<MnemonicSpec>,
    lookup_by_upper_name: HashMap<String, usize>,
}

impl MnemonicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let builtins = [
            (
                "MOVE_U",
                "Step up repeatedly",
                InvocationTarget::MoveStraightRepeat {
                    direction: Direction::Up,
                },
            ),
            (
                "MOVE_D",
                "Step down repeatedly",
                InvocationTarget::MoveStraightRepeat {
                    direction: Direction::Down,
                },
            ),
            (
                "MOVE_L",
                "Step left repeatedly",
                InvocationTarget::MoveStraightRepeat {
                    direction: Direction::Left,
                },
            ),
            (
                "MOVE_R",
                "Step right repeatedly",
                InvocationTarget::MoveStraightRepeat {
                    direction: Direction::Right,
                },
            ),
            (
                "SHAKE_V",
                "Shake along the vertical axis",
                InvocationTarget::StartShake {
                    axis: ShakeAxis::Vertical,
                },
            ),
            (
                "SHAKE_H",
                "Shake along the horizontal axis",
                InvocationTarget::StartShake {
                    axis: ShakeAxis::Horizontal,
                },
            ),
            (
                "FADE_IN",
                "Fade opacity in",
                InvocationTarget::StartFade {
                    direction: FadeDirection::In,
                },
            ),
            (
                "FADE_OUT",
                "Fade opacity out",
                InvocationTarget::StartFade {
                    direction: FadeDirection::Out,
                },
            ),
            (
                "ACTOR_IMG",
                "Use an actor's character image",
                InvocationTarget::SetActorImage,
            ),
            (
                "MEMBER_IMG",
                "Use a party member's character image",
                InvocationTarget::SetMemberImage,
            ),
            (
                "TOWARD_TARGET",
                "Walk toward a map tile",
                InvocationTarget::MoveTowardTarget,
            ),
            (
                "RANDOM_WAIT",
                "Wait a random number of frames in [min, max)",
                InvocationTarget::RandomWait,
            ),
        ];

        let mut registry = Self::new();
        for (name, summary, target) in builtins {
            registry
                .register(name, summary, target)
                .expect("built-in mnemonic registration should not fail");
        }
        registry
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        summary: impl Into<String>,
        target: InvocationTarget,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(RegistryError::ContainsWhitespace { name });
        }
        let upper = name.to_ascii_uppercase();
        if self.lookup_by_upper_name.contains_key(&upper) {
            return Err(RegistryError::Duplicate { name });
        }

        self.specs.push(MnemonicSpec {
            name,
            summary: summary.into(),
            target,
        });
        self.lookup_by_upper_name.insert(upper, self.specs.len() - 1);
        Ok(())
    }

    pub fn lookup(&self, input_name: &str) -> Option<&MnemonicSpec> {
        let upper = input_name.to_ascii_uppercase();
        let index = self.lookup_by_upper_name.get(&upper)?;
        self.specs.get(*index)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter_specs_in_order(&self) -> impl Iterator<Item = &MnemonicSpec> {
        self.specs.iter()
    }

    pub fn usage_lines(&self) -> Vec<String> {
        self.iter_specs_in_order()
            .map(|spec| format!("{} {} - {}", spec.name, spec.arg_schema(), spec.summary))
            .collect()
    }
}
