use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::TileWeights;
use super::tiles::TileKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn chebyshev_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn orthogonal_neighbors(self) -> [Position; 4] {
        [
            self.offset(0, 1),
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(-1, 0),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Ok(Direction::Left),
            "right" | "arrowright" => Ok(Direction::Right),
            "up" | "arrowup" => Ok(Direction::Up),
            "down" | "arrowdown" => Ok(Direction::Down),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Board {
    rows: Vec<Vec<TileKind>>,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        Self {
            rows: vec![vec![TileKind::Empty; size]; size],
        }
    }

    /// 从紧凑的文本布局构建棋盘，每个字符串一行，行列数必须相等。
    ///
    /// `.` 空地 `q` 流沙 `w` 狼 `#` 岩石 `c` 洞穴 `+` 治疗蘑菇 `-` 毒蘑菇 `b` 灌木 `~` 河流
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut parsed = Vec::with_capacity(size);
        for row in rows {
            let tiles: Option<Vec<TileKind>> = row
                .chars()
                .map(|ch| match ch {
                    '.' => Some(TileKind::Empty),
                    'q' => Some(TileKind::Quicksand),
                    'w' => Some(TileKind::Wolf),
                    '#' => Some(TileKind::Rock),
                    'c' => Some(TileKind::Cave),
                    '+' => Some(TileKind::HealMushroom),
                    '-' => Some(TileKind::DamageMushroom),
                    'b' => Some(TileKind::Bush),
                    '~' => Some(TileKind::River),
                    _ => None,
                })
                .collect();
            let tiles = tiles?;
            if tiles.len() != size {
                return None;
            }
            parsed.push(tiles);
        }
        Some(Self { rows: parsed })
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_square(&self) -> bool {
        let size = self.rows.len();
        self.rows.iter().all(|row| row.len() == size)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        let size = self.size() as i32;
        pos.x >= 0 && pos.y >= 0 && pos.x < size && pos.y < size
    }

    pub fn get(&self, pos: Position) -> Option<TileKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.rows
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
            .copied()
    }

    pub fn set(&mut self, pos: Position, kind: TileKind) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        match self
            .rows
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            Some(tile) => {
                *tile = kind;
                true
            }
            None => false,
        }
    }

    pub fn is_rock(&self, pos: Position) -> bool {
        self.get(pos).map_or(false, |tile| !tile.is_passable())
    }

    pub fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, tile)| **tile == kind)
                .map(move |(x, _)| Position::new(x as i32, y as i32))
        })
    }

    /// 每一行丢弃最左侧的格子，并在右侧追加 `column` 中对应行的新格子。
    pub fn shift_left(&mut self, column: Vec<TileKind>) {
        for (row, fresh) in self.rows.iter_mut().zip(column) {
            if !row.is_empty() {
                row.remove(0);
            }
            row.push(fresh);
        }
    }
}

pub fn generate_tile<R: Rng + ?Sized>(rng: &mut R, weights: &TileWeights) -> TileKind {
    const ORDER: [TileKind; 8] = [
        TileKind::Quicksand,
        TileKind::Wolf,
        TileKind::Rock,
        TileKind::Cave,
        TileKind::HealMushroom,
        TileKind::DamageMushroom,
        TileKind::Bush,
        TileKind::River,
    ];

    let roll: f64 = rng.gen();
    let mut threshold = 0.0;
    for (kind, weight) in ORDER.iter().zip(weights.as_array()) {
        threshold += weight;
        if roll < threshold {
            return *kind;
        }
    }
    TileKind::Empty
}

pub fn generate_board<R: Rng + ?Sized>(size: usize, rng: &mut R, weights: &TileWeights) -> Board {
    let rows = (0..size)
        .map(|_| (0..size).map(|_| generate_tile(rng, weights)).collect())
        .collect();
    Board { rows }
}

pub fn generate_column<R: Rng + ?Sized>(
    size: usize,
    rng: &mut R,
    weights: &TileWeights,
) -> Vec<TileKind> {
    (0..size).map(|_| generate_tile(rng, weights)).collect()
}
