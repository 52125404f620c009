use std::collections::BTreeSet;
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_COLS, FIELD_ROWS, SCORE_DIGITS};
use crate::error::{Result, ScanError};
use crate::geometry::{subdivide_grid, FractionalRect, Rect};

/// Player slot on screen, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player(pub u8);

impl Player {
    pub const ONE: Player = Player(1);
    pub const TWO: Player = Player(2);
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Where one player's field and score area sit, as fractions of the screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerLayout {
    pub player: Player,
    pub field: FractionalRect,
    pub score: FractionalRect,
}

/// Screen layout for every player slot.
///
/// Player two mirrors player one about the vertical center line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutTable {
    pub players: Vec<PlayerLayout>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self {
            players: vec![
                PlayerLayout {
                    player: Player::ONE,
                    field: FractionalRect::new(0.146, 0.148, 0.2, 0.665),
                    score: FractionalRect::new(0.183, 0.817, 0.169, 0.056),
                },
                PlayerLayout {
                    player: Player::TWO,
                    field: FractionalRect::new(0.654, 0.148, 0.2, 0.665),
                    score: FractionalRect::new(0.648, 0.817, 0.169, 0.056),
                },
            ],
        }
    }
}

impl LayoutTable {
    /// The single slot configured for `player`.
    pub fn get(&self, player: Player) -> Result<&PlayerLayout> {
        let mut slots = self.players.iter().filter(|slot| slot.player == player);
        let slot = slots
            .next()
            .ok_or_else(|| ScanError::InvalidGeometry(format!("no layout for player {player}")))?;
        if slots.next().is_some() {
            return Err(duplicate_player(player));
        }
        Ok(slot)
    }

    /// Reject an empty table, repeated players and fractions that do not fit
    /// inside the screen.
    pub fn validate(&self) -> Result<()> {
        if self.players.is_empty() {
            return Err(ScanError::InvalidGeometry("layout has no players".into()));
        }
        let unit = Rect::full(1, 1);
        let mut seen = BTreeSet::new();
        for slot in &self.players {
            if !seen.insert(slot.player) {
                return Err(duplicate_player(slot.player));
            }
            slot.field.resolve(&unit)?;
            slot.score.resolve(&unit)?;
        }
        Ok(())
    }
}

fn duplicate_player(player: Player) -> ScanError {
    ScanError::InvalidGeometry(format!("duplicate layout for player {player}"))
}

/// Geometry of one player's regions in frame coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerFields {
    pub player: Player,
    pub field: Rect,
    /// Shape `(FIELD_COLS, FIELD_ROWS)`, indexed `[[x, y]]` with y = 0 at the top.
    pub cells: Array2<Rect>,
    pub score_area: Rect,
    pub score_digits: Vec<Rect>,
}

/// Resolve a player's field, cell grid, score area and digit slots against `screen`.
pub fn player_fields(screen: &Rect, layout: &LayoutTable, player: Player) -> Result<PlayerFields> {
    let slot = layout.get(player)?;

    let field = slot.field.resolve(screen)?;
    let cells = subdivide_grid(&field, FIELD_COLS, FIELD_ROWS)?;
    if let Some(((x, y), _)) = cells.indexed_iter().find(|(_, c)| !c.contained_in(&field)) {
        return Err(ScanError::InvalidGeometry(format!(
            "cell ({x},{y}) escapes the {player} field"
        )));
    }

    let score_area = slot.score.resolve(screen)?;
    let score_digits: Vec<Rect> = subdivide_grid(&score_area, SCORE_DIGITS, 1)?
        .iter()
        .copied()
        .collect();

    Ok(PlayerFields {
        player,
        field,
        cells,
        score_area,
        score_digits,
    })
}
