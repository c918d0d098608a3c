use serde::{Deserialize, Serialize};

use super::invocation::Invocation;

/// Four-way facing used by the grid movement primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Down, Self::Left, Self::Right, Self::Up];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteCommand {
    End,
    Move { direction: Direction },
    Turn { direction: Direction },
    Wait { frames: u32 },
    Script { text: String },
    Invocation(Invocation),
}

impl RouteCommand {
    pub fn script(text: impl Into<String>) -> Self {
        Self::Script { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveRoute {
    pub commands: Vec<RouteCommand>,
    #[serde(default)]
    pub repeats_when_done: bool,
    #[serde(default)]
    pub skippable_on_block: bool,
    #[serde(default)]
    pub waits_for_completion: bool,
    #[serde(skip)]
    compiled: bool,
}

impl MoveRoute {
    pub fn new(commands: Vec<RouteCommand>) -> Self {
        Self {
            commands,
            ..Self::default()
        }
    }

    pub fn repeating(mut self, value: bool) -> Self {
        self.repeats_when_done = value;
        self
    }

    pub fn skippable(mut self, value: bool) -> Self {
        self.skippable_on_block = value;
        self
    }

    pub fn waiting(mut self, value: bool) -> Self {
        self.waits_for_completion = value;
        self
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    pub(crate) fn mark_compiled(&mut self) {
        self.compiled = true;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn command_at(&self, index: usize) -> Option<&RouteCommand> {
        self.commands.get(index)
    }
}
