use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::Direction;
use crate::motion::{FadeDirection, ShakeAxis};

/// Argument token as written in a script command.
///
/// Tokens that are neither a boolean nor a finite decimal number are kept
/// verbatim so the failure surfaces when the invocation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    Raw(String),
}

impl Literal {
    pub fn parse(token: &str) -> Self {
        match token {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => match token.parse::<f64>() {
                Ok(value) if value.is_finite() => Self::Number(value),
                _ => Self::Raw(token.to_string()),
            },
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationTarget {
    MoveStraightRepeat { direction: Direction },
    StartShake { axis: ShakeAxis },
    StartFade { direction: FadeDirection },
    SetActorImage,
    SetMemberImage,
    MoveTowardTarget,
    RandomWait,
}

impl InvocationTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::MoveStraightRepeat { .. } => "move_straight_repeat",
            Self::StartShake { .. } => "start_shake",
            Self::StartFade { .. } => "start_fade",
            Self::SetActorImage => "set_actor_image",
            Self::SetMemberImage => "set_member_image",
            Self::MoveTowardTarget => "move_toward_target",
            Self::RandomWait => "random_wait",
        }
    }

    /// Names of the authored arguments, in order. Their count is the arity.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::MoveStraightRepeat { .. } => &["repeat_count"],
            Self::StartShake { .. } => &["power", "speed", "duration"],
            Self::StartFade { .. } => &["duration", "wait"],
            Self::SetActorImage => &["actor_id"],
            Self::SetMemberImage => &["slot"],
            Self::MoveTowardTarget => &["x", "y"],
            Self::RandomWait => &["min_frames", "max_frames"],
        }
    }

    pub fn arity(self) -> usize {
        self.param_names().len()
    }

    fn fixed_arg_token(self) -> Option<&'static str> {
        match self {
            Self::MoveStraightRepeat { direction } => Some(direction.as_token()),
            Self::StartShake { axis } => Some(axis.as_token()),
            Self::StartFade { direction } => Some(direction.as_token()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    #[error("{invocation}: missing argument #{index} <{param}>")]
    MissingArgument {
        invocation: &'static str,
        index: usize,
        param: &'static str,
    },
    #[error("{invocation}: argument <{param}> expected {expected}, got '{found}'")]
    WrongType {
        invocation: &'static str,
        param: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("{invocation}: argument <{param}> must not be negative, got {value}")]
    Negative {
        invocation: &'static str,
        param: &'static str,
        value: f64,
    },
    #[error("start_fade: duration must be positive, got {duration}")]
    NonPositiveFadeDuration { duration: f64 },
    #[error("random_wait: max_frames {max} must exceed min_frames {min}")]
    EmptyWaitRange { min: i64, max: i64 },
}

/// Compiled form of a recognized script mnemonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub target: InvocationTarget,
    pub args: Vec<Literal>,
}

impl Invocation {
    pub fn new(target: InvocationTarget, args: Vec<Literal>) -> Self {
        Self { target, args }
    }

    pub fn name(&self) -> &'static str {
        self.target.name()
    }

    fn param(&self, index: usize) -> &'static str {
        self.target
            .param_names()
            .get(index)
            .copied()
            .unwrap_or("extra")
    }

    fn literal(&self, index: usize) -> Result<&Literal, InvocationError> {
        self.args
            .get(index)
            .ok_or(InvocationError::MissingArgument {
                invocation: self.name(),
                index,
                param: self.param(index),
            })
    }

    pub(crate) fn number(&self, index: usize) -> Result<f64, InvocationError> {
        match self.literal(index)? {
            Literal::Number(value) => Ok(*value),
            other => Err(InvocationError::WrongType {
                invocation: self.name(),
                param: self.param(index),
                expected: "number",
                found: other.to_string(),
            }),
        }
    }

    /// Numeric argument truncated toward zero.
    pub(crate) fn integer(&self, index: usize) -> Result<i64, InvocationError> {
        self.number(index).map(|value| value.trunc() as i64)
    }

    pub(crate) fn non_negative(&self, index: usize) -> Result<f64, InvocationError> {
        let value = self.number(index)?;
        if value < 0.0 {
            return Err(InvocationError::Negative {
                invocation: self.name(),
                param: self.param(index),
                value,
            });
        }
        Ok(value)
    }

    /// Numeric argument that may be left off the end of the script line.
    pub(crate) fn optional_number(&self, index: usize) -> Result<Option<f64>, InvocationError> {
        if index >= self.args.len() {
            return Ok(None);
        }
        self.number(index).map(Some)
    }

    /// Script truthiness: a missing flag, `false` and `0` are false, any other
    /// boolean or number is true. Bare words have no value and are rejected.
    pub(crate) fn truthy(&self, index: usize) -> Result<bool, InvocationError> {
        match self.args.get(index) {
            None => Ok(false),
            Some(Literal::Bool(value)) => Ok(*value),
            Some(Literal::Number(value)) => Ok(*value != 0.0),
            Some(other) => Err(InvocationError::WrongType {
                invocation: self.name(),
                param: self.param(index),
                expected: "true|false|number",
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        let mut first = true;
        if let Some(token) = self.target.fixed_arg_token() {
            write!(f, "{token}")?;
            first = false;
        }
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
            first = false;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_parse_recognizes_booleans_numbers_and_raw_tokens() {
        assert_eq!(Literal::parse("true"), Literal::Bool(true));
        assert_eq!(Literal::parse("false"), Literal::Bool(false));
        assert_eq!(Literal::parse("-2.5"), Literal::Number(-2.5));
        assert_eq!(Literal::parse("30"), Literal::Number(30.0));
        assert_eq!(Literal::parse("TRUE"), Literal::Raw("TRUE".to_string()));
        assert_eq!(Literal::parse("inf"), Literal::Raw("inf".to_string()));
        assert_eq!(Literal::parse("abc"), Literal::Raw("abc".to_string()));
    }

    #[test]
    fn display_includes_fixed_direction_before_authored_args() {
        let invocation = Invocation::new(
            InvocationTarget::MoveStraightRepeat {
                direction: Direction::Up,
            },
            vec![Literal::Number(4.0)],
        );
        assert_eq!(invocation.to_string(), "move_straight_repeat(up, 4)");

        let wait = Invocation::new(
            InvocationTarget::RandomWait,
            vec![Literal::Number(30.0), Literal::Number(60.0)],
        );
        assert_eq!(wait.to_string(), "random_wait(30, 60)");
    }

    #[test]
    fn accessors_report_missing_and_mistyped_arguments() {
        let invocation = Invocation::new(
            InvocationTarget::StartFade {
                direction: FadeDirection::In,
            },
            vec![Literal::Raw("soon".to_string())],
        );

        assert_eq!(
            invocation.number(0),
            Err(InvocationError::WrongType {
                invocation: "start_fade",
                param: "duration",
                expected: "number",
                found: "soon".to_string(),
            })
        );
        assert_eq!(
            invocation.number(1),
            Err(InvocationError::MissingArgument {
                invocation: "start_fade",
                index: 1,
                param: "wait",
            })
        );
        assert_eq!(invocation.optional_number(1), Ok(None));
        assert!(invocation.optional_number(0).is_err());
    }

    #[test]
    fn wait_flag_follows_script_truthiness() {
        let fade = |args: Vec<Literal>| {
            Invocation::new(
                InvocationTarget::StartFade {
                    direction: FadeDirection::Out,
                },
                args,
            )
        };
        let duration = Literal::Number(30.0);

        assert_eq!(fade(vec![duration.clone()]).truthy(1), Ok(false));
        assert_eq!(fade(vec![duration.clone(), Literal::Bool(true)]).truthy(1), Ok(true));
        assert_eq!(fade(vec![duration.clone(), Literal::Number(0.0)]).truthy(1), Ok(false));
        assert_eq!(fade(vec![duration.clone(), Literal::Number(1.0)]).truthy(1), Ok(true));
        assert!(matches!(
            fade(vec![duration, Literal::Raw("later".to_string())]).truthy(1),
            Err(InvocationError::WrongType { param: "wait", .. })
        ));
    }

    #[test]
    fn integer_truncates_toward_zero() {
        let invocation = Invocation::new(
            InvocationTarget::MoveTowardTarget,
            vec![Literal::Number(2.9), Literal::Number(-1.7)],
        );
        assert_eq!(invocation.integer(0), Ok(2));
        assert_eq!(invocation.integer(1), Ok(-1));
    }
}
