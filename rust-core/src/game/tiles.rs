use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    None,
    Capture,
    Immobilize,
    AttackAdjacent,
    BlockMovement,
    Teleport,
    Heal,
    Damage,
    Conceal,
    Flow,
}

/// 棋盘格子的地形种类。
///
/// `Player` 与 `Guard` 只作为目录条目存在，玩家与守卫的位置单独记录，
/// 生成器不会产生这两种格子。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    Empty,
    Player,
    Guard,
    Quicksand,
    Wolf,
    Rock,
    Cave,
    HealMushroom,
    DamageMushroom,
    Bush,
    River,
}

impl Default for TileKind {
    fn default() -> Self {
        TileKind::Empty
    }
}

impl TileKind {
    pub const ALL: [TileKind; 11] = [
        TileKind::Empty,
        TileKind::Player,
        TileKind::Guard,
        TileKind::Quicksand,
        TileKind::Wolf,
        TileKind::Rock,
        TileKind::Cave,
        TileKind::HealMushroom,
        TileKind::DamageMushroom,
        TileKind::Bush,
        TileKind::River,
    ];

    pub const fn effect(self) -> EffectCategory {
        match self {
            TileKind::Empty | TileKind::Player => EffectCategory::None,
            TileKind::Guard => EffectCategory::Capture,
            TileKind::Quicksand => EffectCategory::Immobilize,
            TileKind::Wolf => EffectCategory::AttackAdjacent,
            TileKind::Rock => EffectCategory::BlockMovement,
            TileKind::Cave => EffectCategory::Teleport,
            TileKind::HealMushroom => EffectCategory::Heal,
            TileKind::DamageMushroom => EffectCategory::Damage,
            TileKind::Bush => EffectCategory::Conceal,
            TileKind::River => EffectCategory::Flow,
        }
    }

    pub const fn is_passable(self) -> bool {
        !matches!(self.effect(), EffectCategory::BlockMovement)
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            TileKind::Empty => "",
            TileKind::Player => "🏃",
            TileKind::Guard => "💂",
            TileKind::Quicksand => "🕸️",
            TileKind::Wolf => "🐺",
            TileKind::Rock => "🪨",
            TileKind::Cave => "🕳️",
            TileKind::HealMushroom => "🍄",
            TileKind::DamageMushroom => "🔴",
            TileKind::Bush => "🌳",
            TileKind::River => "💧",
        }
    }
}

impl std::str::FromStr for TileKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EMPTY" => Ok(TileKind::Empty),
            "PLAYER" => Ok(TileKind::Player),
            "GUARD" => Ok(TileKind::Guard),
            "QUICKSAND" => Ok(TileKind::Quicksand),
            "WOLF" => Ok(TileKind::Wolf),
            "ROCK" => Ok(TileKind::Rock),
            "CAVE" => Ok(TileKind::Cave),
            "HEAL_MUSHROOM" | "BROWN_MUSHROOM" => Ok(TileKind::HealMushroom),
            "DAMAGE_MUSHROOM" | "RED_MUSHROOM" => Ok(TileKind::DamageMushroom),
            "BUSH" => Ok(TileKind::Bush),
            "RIVER" => Ok(TileKind::River),
            _ => Err(()),
        }
    }
}
