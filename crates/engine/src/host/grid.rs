use std::rc::Rc;

use thiserror::Error;

use super::{CharacterBody, Portrait};
use crate::route::{Direction, TilePos};

/// Path search depth used when no other limit is configured.
pub const DEFAULT_SEARCH_LIMIT: u32 = 12;

const OPACITY_MAX: f64 = 255.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
}

impl GridMap {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            walkable: vec![true; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn block(&mut self, tile: TilePos) -> Result<(), GridError> {
        let index = self.index_of(tile).ok_or(GridError::OutOfBounds {
            x: tile.x,
            y: tile.y,
            width: self.width,
            height: self.height,
        })?;
        self.walkable[index] = false;
        Ok(())
    }

    pub fn contains(&self, tile: TilePos) -> bool {
        self.index_of(tile).is_some()
    }

    pub fn is_passable(&self, tile: TilePos) -> bool {
        self.index_of(tile)
            .and_then(|index| self.walkable.get(index))
            .copied()
            .unwrap_or(false)
    }

    fn index_of(&self, tile: TilePos) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as u32, tile.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn tile_of(&self, index: usize) -> TilePos {
        TilePos {
            x: (index % self.width as usize) as i32,
            y: (index / self.width as usize) as i32,
        }
    }

    /// First step toward `goal` using an A* search that stops expanding nodes
    /// `search_limit` steps from `start`.
    ///
    /// When the goal is not reached the step leads toward the explored tile
    /// closest to it. When no tile is closer than `start`, the raw direction
    /// to the goal is returned even if that step is blocked.
    pub fn find_direction(
        &self,
        start: TilePos,
        goal: TilePos,
        search_limit: u32,
    ) -> Option<Direction> {
        if start == goal {
            return None;
        }
        let Some(start_index) = self.index_of(start) else {
            return raw_direction(start, goal);
        };

        let node_count = self.walkable.len();
        let mut closed = vec![false; node_count];
        let mut best_g = vec![u32::MAX; node_count];
        let mut parent = vec![None::<usize>; node_count];
        let mut open = Vec::new();
        let mut next_insertion = 0u64;

        let start_h = manhattan_distance(start, goal);
        open.push(OpenNode {
            coord: start,
            h_cost: start_h,
            f_cost: start_h,
            insertion_order: next_insertion,
        });
        next_insertion = next_insertion.saturating_add(1);
        best_g[start_index] = 0;

        let mut best_index = start_index;
        let mut best_h = start_h;

        while !open.is_empty() {
            let current = open.swap_remove(pick_best_open_node_index(&open));
            let Some(current_index) = self.index_of(current.coord) else {
                continue;
            };
            if closed[current_index] {
                continue;
            }
            closed[current_index] = true;

            if current.h_cost < best_h {
                best_h = current.h_cost;
                best_index = current_index;
            }
            if current.coord == goal {
                break;
            }

            let current_g = best_g[current_index];
            if current_g >= search_limit {
                continue;
            }
            for direction in Direction::ALL {
                let neighbor = current.coord.offset(direction);
                let Some(neighbor_index) = self.index_of(neighbor) else {
                    continue;
                };
                if closed[neighbor_index] || !self.walkable[neighbor_index] {
                    continue;
                }

                let tentative_g = current_g.saturating_add(1);
                if tentative_g >= best_g[neighbor_index] {
                    continue;
                }

                best_g[neighbor_index] = tentative_g;
                parent[neighbor_index] = Some(current_index);
                let h_cost = manhattan_distance(neighbor, goal);
                open.push(OpenNode {
                    coord: neighbor,
                    h_cost,
                    f_cost: tentative_g.saturating_add(h_cost),
                    insertion_order: next_insertion,
                });
                next_insertion = next_insertion.saturating_add(1);
            }
        }

        if best_index == start_index {
            return raw_direction(start, goal);
        }

        let mut cursor = best_index;
        while let Some(previous) = parent[cursor] {
            if previous == start_index {
                break;
            }
            cursor = previous;
        }
        let first_step = self.tile_of(cursor);
        Direction::ALL
            .into_iter()
            .find(|direction| start.offset(*direction) == first_step)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    coord: TilePos,
    h_cost: u32,
    f_cost: u32,
    insertion_order: u64,
}

fn pick_best_open_node_index(open: &[OpenNode]) -> usize {
    let mut best_index = 0usize;
    for index in 1..open.len() {
        if open_node_order_key(open[index]) < open_node_order_key(open[best_index]) {
            best_index = index;
        }
    }
    best_index
}

fn open_node_order_key(node: OpenNode) -> (u32, u32, i32, i32, u64) {
    (
        node.f_cost,
        node.h_cost,
        node.coord.y,
        node.coord.x,
        node.insertion_order,
    )
}

fn manhattan_distance(a: TilePos, b: TilePos) -> u32 {
    a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y))
}

fn raw_direction(start: TilePos, goal: TilePos) -> Option<Direction> {
    let dx = goal.x - start.x;
    let dy = goal.y - start.y;
    if dx.abs() > dy.abs() {
        Some(if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if dy != 0 {
        Some(if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        None
    }
}

/// Reference body on a [`GridMap`]. Steps land immediately on the grid; with
/// `frames_per_step > 0` the rendered position trails behind for that many
/// ticks and the body reports itself as moving.
#[derive(Debug, Clone)]
pub struct GridBody {
    map: Rc<GridMap>,
    position: TilePos,
    previous: TilePos,
    facing: Direction,
    frames_per_step: u32,
    move_frames_left: u32,
    jump_frames_left: u32,
    animation_count: u32,
    search_limit: u32,
    opacity: f64,
    image: Option<Portrait>,
}

impl GridBody {
    pub fn new(map: Rc<GridMap>, position: TilePos) -> Self {
        Self {
            map,
            position,
            previous: position,
            facing: Direction::Down,
            frames_per_step: 0,
            move_frames_left: 0,
            jump_frames_left: 0,
            animation_count: 0,
            search_limit: DEFAULT_SEARCH_LIMIT,
            opacity: OPACITY_MAX,
            image: None,
        }
    }

    pub fn with_frames_per_step(mut self, frames: u32) -> Self {
        self.frames_per_step = frames;
        self
    }

    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn start_jump(&mut self, frames: u32) {
        self.jump_frames_left = frames;
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn image(&self) -> Option<&Portrait> {
        self.image.as_ref()
    }

    pub fn animation_count(&self) -> u32 {
        self.animation_count
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }
}

impl CharacterBody for GridBody {
    fn position(&self) -> TilePos {
        self.position
    }

    fn step_in_direction(&mut self, direction: Direction) -> bool {
        self.facing = direction;
        let next = self.position.offset(direction);
        if !self.map.is_passable(next) {
            return false;
        }
        self.previous = self.position;
        self.position = next;
        self.move_frames_left = self.frames_per_step;
        true
    }

    fn direction_toward(&self, target: TilePos) -> Option<Direction> {
        self.map
            .find_direction(self.position, target, self.search_limit)
    }

    fn set_facing(&mut self, direction: Direction) {
        self.facing = direction;
    }

    fn is_moving(&self) -> bool {
        self.move_frames_left > 0
    }

    fn is_jumping(&self) -> bool {
        self.jump_frames_left > 0
    }

    fn update_move(&mut self) {
        self.move_frames_left = self.move_frames_left.saturating_sub(1);
    }

    fn update_jump(&mut self) {
        self.jump_frames_left = self.jump_frames_left.saturating_sub(1);
    }

    fn update_animation(&mut self) {
        self.animation_count = self.animation_count.wrapping_add(1);
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, OPACITY_MAX);
    }

    fn set_image(&mut self, portrait: &Portrait) {
        self.image = Some(portrait.clone());
    }

    fn base_scroll_position(&self) -> (f64, f64) {
        if self.move_frames_left == 0 || self.frames_per_step == 0 {
            return (f64::from(self.position.x), f64::from(self.position.y));
        }
        let lag = f64::from(self.move_frames_left) / f64::from(self.frames_per_step);
        let lerp = |from: i32, to: i32| f64::from(to) - f64::from(to - from) * lag;
        (
            lerp(self.previous.x, self.position.x),
            lerp(self.previous.y, self.position.y),
        )
    }
}
