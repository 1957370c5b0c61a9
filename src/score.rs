//! Scoring: one point per placed cell plus a streak-scaled line bonus

/// Bonus per cleared line before the combo multiplier
pub const LINE_BONUS: u64 = 10;

/// Result of scoring one resolved placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveScore {
    pub cells_placed: usize,
    pub lines_cleared: usize,
    /// Multiplier used for this move, 0 when nothing was cleared
    pub multiplier: u32,
    pub points: u64,
}

impl MoveScore {
    /// Short description for the stats panel
    pub fn describe(&self) -> Option<String> {
        match (self.lines_cleared, self.multiplier) {
            (0, _) => None,
            (1, 1) => Some("Clear".to_string()),
            (lines, 1) => Some(format!("{} Lines", lines)),
            (1, combo) => Some(format!("Clear Combo x{}", combo)),
            (lines, combo) => Some(format!("{} Lines Combo x{}", lines, combo)),
        }
    }
}

/// Session score and clearing streak
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboScorer {
    /// Cumulative score
    pub points: u64,
    /// Current streak; 0 when the last move cleared nothing
    pub combo: u32,
    /// Highest multiplier reached this session
    pub best_combo: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl ComboScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a resolved placement and advance the streak
    pub fn score_move(&mut self, cells_placed: usize, lines_cleared: usize) -> MoveScore {
        let bonus = if lines_cleared > 0 {
            self.combo += 1;
            self.best_combo = self.best_combo.max(self.combo);
            self.lines += lines_cleared as u32;
            lines_cleared as u64 * LINE_BONUS * self.combo as u64
        } else {
            self.combo = 0;
            0
        };

        let points = cells_placed as u64 + bonus;
        self.points += points;

        MoveScore {
            cells_placed,
            lines_cleared,
            multiplier: self.combo,
            points,
        }
    }
}
