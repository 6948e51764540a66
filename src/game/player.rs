use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::One => Cell::One,
            Player::Two => Cell::Two,
        }
    }

    /// Turn number as stored and displayed (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Player> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Position of this player's entry in [`PlayerNames`].
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Display names for both players, in turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerNames([String; 2]);

impl PlayerNames {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        PlayerNames([first.into(), second.into()])
    }

    /// Build names from lobby input. Blank entries fall back to `defaults`.
    pub fn from_input(first: &str, second: &str, defaults: &PlayerNames) -> Self {
        let pick = |input: &str, fallback: &str| {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        };
        PlayerNames([
            pick(first, defaults.get(Player::One)),
            pick(second, defaults.get(Player::Two)),
        ])
    }

    pub fn get(&self, player: Player) -> &str {
        &self.0[player.index()]
    }

    pub fn as_array(&self) -> &[String; 2] {
        &self.0
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        PlayerNames::new("Player 1", "Player 2")
    }
}

impl From<[String; 2]> for PlayerNames {
    fn from(names: [String; 2]) -> Self {
        PlayerNames(names)
    }
}
