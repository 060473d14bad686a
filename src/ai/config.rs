//! AI strength settings.

use serde::{Deserialize, Serialize};

/// Strength tier. Each tier has a fixed decision pipeline and search budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    /// Search budget for this tier's fallback search.
    #[must_use]
    pub const fn search_config(self) -> SearchConfig {
        match self {
            Difficulty::Beginner | Difficulty::Easy => SearchConfig::new(1, 8, 4),
            Difficulty::Medium => SearchConfig::new(1, 12, 6),
            Difficulty::Hard => SearchConfig::new(4, 15, 5),
            Difficulty::Expert => SearchConfig::new(5, 18, 4),
            Difficulty::Master => SearchConfig::new(6, 20, 4),
        }
    }

    /// Tiers from Hard up use the strict tactical pipeline.
    #[must_use]
    pub fn is_tactical(self) -> bool {
        self >= Difficulty::Hard
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        };
        f.write_str(name)
    }
}

/// Alpha-beta search parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies searched, counting the root move.
    pub depth: u8,

    /// Candidates searched at the root, best-ordered first.
    pub root_breadth: usize,

    /// Candidates searched at every inner node.
    /// Keeps deep searches bounded; the root gets the wider beam.
    pub inner_breadth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Difficulty::Hard.search_config()
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn new(depth: u8, root_breadth: usize, inner_breadth: usize) -> Self {
        Self {
            depth,
            root_breadth,
            inner_breadth,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_root_breadth(mut self, breadth: usize) -> Self {
        self.root_breadth = breadth;
        self
    }

    #[must_use]
    pub fn with_inner_breadth(mut self, breadth: usize) -> Self {
        self.inner_breadth = breadth;
        self
    }
}
