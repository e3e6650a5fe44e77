//! Discrete scroll-speed table.
//!
//! Speeds are never free-form: the user steps through a short ordered list of
//! pixel-per-second levels, and the active index is always kept in range.

/// Built-in levels: slow, slower, normal, faster, fast.
pub const DEFAULT_LEVELS: &[f64] = &[10.0, 25.0, 50.0, 75.0, 100.0];

/// Index of the "normal" level in [`DEFAULT_LEVELS`].
pub const DEFAULT_INDEX: usize = 2;

/// Ordered speed levels (px/s) with a clamped active index.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedLevels {
    levels: Vec<f64>,
    index: usize,
}

impl Default for SpeedLevels {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
            index: DEFAULT_INDEX,
        }
    }
}

impl SpeedLevels {
    /// Build a table from `levels`.  Returns `None` unless the list is
    /// non-empty, finite, positive and strictly increasing.
    pub fn new(levels: Vec<f64>) -> Option<Self> {
        if levels.is_empty() {
            return None;
        }
        if levels.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return None;
        }
        if levels.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        let index = (levels.len() / 2).min(levels.len() - 1);
        Some(Self { levels, index })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Speed of the active level in px/s.
    pub fn current(&self) -> f64 {
        self.levels[self.index]
    }

    /// Select `index`.  Out-of-range indices are ignored.  Returns `true`
    /// when the active level actually changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.levels.len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// Step one level faster; no-op at the fastest level.
    pub fn increment(&mut self) -> bool {
        self.select(self.index + 1)
    }

    /// Step one level slower; no-op at the slowest level.
    pub fn decrement(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.select(i),
            None => false,
        }
    }

    /// Index of the level nearest to `speed`.  Ties go to the slower level.
    pub fn closest_index(&self, speed: f64) -> usize {
        let mut best = 0;
        for (i, level) in self.levels.iter().enumerate() {
            if (level - speed).abs() < (self.levels[best] - speed).abs() {
                best = i;
            }
        }
        best
    }

    /// Select the level nearest to `speed` (used for the initial speed).
    pub fn select_closest(&mut self, speed: f64) {
        if speed.is_finite() {
            self.index = self.closest_index(speed);
        }
    }
}
