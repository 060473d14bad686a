//! Named opponent personalities.
//!
//! A personality does not bring its own algorithms. It re-weights and
//! re-orders the tactical blocks the difficulty tiers use:
//!
//! | Field              | Effect                                                  |
//! |--------------------|---------------------------------------------------------|
//! | `aggression`       | Chance captures are tried before defence and building   |
//! | `threat_awareness` | Chance opponent wins and near-wins are noticed at all   |
//! | `adaptiveness`     | Extra aggression while behind on material               |
//! | `chaos`            | Chance of a weighted random move                        |
//! | `mirror`           | Chance of reflecting the opponent's last placement      |
//! | `hesitation`       | Once per game, chance of letting a win slip by          |
//!
//! Presets are looked up by name with [`preset`].

use serde::{Deserialize, Serialize};

use crate::core::{PatternKind, VictorySet};

use super::config::{Difficulty, SearchConfig};
use super::locks::LockPreference;

/// Lock-score bonus for a personality's preferred pattern.
pub const PREFERENCE_BONUS: i32 = 300;

/// Optional behaviours a personality can switch on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggles {
    /// Break near-complete opponent locks.
    pub breaks: bool,
    /// Set up double threats.
    pub traps: bool,
    /// Reclaim the river early.
    pub river_denial: bool,
    /// Squeeze the opponent's move count.
    pub suffocation: bool,
    /// Only build in and around the centre.
    pub center_obsession: bool,
}

impl Toggles {
    /// Everything on.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            breaks: true,
            traps: true,
            river_denial: true,
            suffocation: true,
            center_obsession: false,
        }
    }
}

/// A personality profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    pub aggression: f64,
    pub threat_awareness: f64,
    pub adaptiveness: f64,
    pub chaos: f64,
    pub mirror: f64,
    pub preferred_pattern: Option<PatternKind>,
    pub signature_set: Option<VictorySet>,
    pub toggles: Toggles,
    pub hesitation: f64,
    pub search: SearchConfig,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            name: "balanced".to_string(),
            aggression: 0.5,
            threat_awareness: 0.9,
            adaptiveness: 0.3,
            chaos: 0.0,
            mirror: 0.0,
            preferred_pattern: None,
            signature_set: None,
            toggles: Toggles::default(),
            hesitation: 0.0,
            search: Difficulty::Medium.search_config(),
        }
    }
}

impl Personality {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_aggression(mut self, aggression: f64) -> Self {
        self.aggression = aggression;
        self
    }

    #[must_use]
    pub fn with_threat_awareness(mut self, awareness: f64) -> Self {
        self.threat_awareness = awareness;
        self
    }

    #[must_use]
    pub fn with_adaptiveness(mut self, adaptiveness: f64) -> Self {
        self.adaptiveness = adaptiveness;
        self
    }

    #[must_use]
    pub fn with_chaos(mut self, chaos: f64) -> Self {
        self.chaos = chaos;
        self
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: f64) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn with_preferred_pattern(mut self, kind: PatternKind) -> Self {
        self.preferred_pattern = Some(kind);
        self
    }

    #[must_use]
    pub fn with_signature_set(mut self, set: VictorySet) -> Self {
        self.signature_set = Some(set);
        self
    }

    #[must_use]
    pub fn with_toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = toggles;
        self
    }

    #[must_use]
    pub fn with_hesitation(mut self, hesitation: f64) -> Self {
        self.hesitation = hesitation;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Lock taste derived from the preferred pattern and signature set.
    #[must_use]
    pub fn lock_preference(&self) -> LockPreference {
        LockPreference::new(self.preferred_pattern, self.signature_set, PREFERENCE_BONUS)
    }

    /// Aggression after adapting to a material deficit of `behind` stones.
    #[must_use]
    pub fn effective_aggression(&self, behind: usize) -> f64 {
        let boost = self.adaptiveness * 0.1 * behind as f64;
        (self.aggression + boost).clamp(0.0, 1.0)
    }

    // === Presets ===

    /// Patient defender: sees everything coming, builds gates.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::new("sentinel")
            .with_aggression(0.2)
            .with_threat_awareness(1.0)
            .with_adaptiveness(0.2)
            .with_preferred_pattern(PatternKind::Gate)
            .with_signature_set(VictorySet::Fortress)
            .with_toggles(Toggles {
                breaks: true,
                ..Toggles::default()
            })
            .with_search(Difficulty::Hard.search_config())
    }

    /// Captures first, asks later.
    #[must_use]
    pub fn raider() -> Self {
        Self::new("raider")
            .with_aggression(0.9)
            .with_threat_awareness(0.6)
            .with_adaptiveness(0.5)
            .with_preferred_pattern(PatternKind::Line)
            .with_signature_set(VictorySet::TwinRivers)
            .with_toggles(Toggles {
                suffocation: true,
                river_denial: true,
                ..Toggles::default()
            })
            .with_search(SearchConfig::new(2, 12, 6))
    }

    /// Builds bends from the centre out.
    #[must_use]
    pub fn architect() -> Self {
        Self::new("architect")
            .with_aggression(0.3)
            .with_threat_awareness(0.8)
            .with_preferred_pattern(PatternKind::Bend)
            .with_signature_set(VictorySet::ThreeBends)
            .with_toggles(Toggles {
                center_obsession: true,
                ..Toggles::default()
            })
            .with_search(SearchConfig::new(2, 12, 6))
    }

    /// Unpredictable, fond of traps and hooks.
    #[must_use]
    pub fn trickster() -> Self {
        Self::new("trickster")
            .with_aggression(0.5)
            .with_threat_awareness(0.7)
            .with_chaos(0.25)
            .with_mirror(0.1)
            .with_preferred_pattern(PatternKind::Hook)
            .with_signature_set(VictorySet::Pincer)
            .with_toggles(Toggles {
                traps: true,
                ..Toggles::default()
            })
            .with_hesitation(0.3)
            .with_search(SearchConfig::new(2, 10, 5))
    }

    /// Copies what it sees.
    #[must_use]
    pub fn echo() -> Self {
        Self::new("echo")
            .with_aggression(0.4)
            .with_threat_awareness(0.8)
            .with_mirror(0.6)
            .with_hesitation(0.5)
            .with_search(Difficulty::Medium.search_config())
    }

    /// Every block enabled, full search.
    #[must_use]
    pub fn grandmaster() -> Self {
        Self::new("grandmaster")
            .with_aggression(0.6)
            .with_threat_awareness(1.0)
            .with_adaptiveness(0.5)
            .with_signature_set(VictorySet::GateAndPath)
            .with_toggles(Toggles::all())
            .with_search(Difficulty::Master.search_config())
    }
}

/// Names accepted by [`preset`].
pub const PRESET_NAMES: [&str; 6] =
    ["sentinel", "raider", "architect", "trickster", "echo", "grandmaster"];

/// Look up a preset by name, ignoring case.
#[must_use]
pub fn preset(name: &str) -> Option<Personality> {
    match name.to_ascii_lowercase().as_str() {
        "sentinel" => Some(Personality::sentinel()),
        "raider" => Some(Personality::raider()),
        "architect" => Some(Personality::architect()),
        "trickster" => Some(Personality::trickster()),
        "echo" => Some(Personality::echo()),
        "grandmaster" => Some(Personality::grandmaster()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_resolves() {
        for name in PRESET_NAMES {
            let personality = preset(name).unwrap();
            assert_eq!(personality.name, name);
        }
        assert_eq!(preset("Raider").map(|p| p.name), Some("raider".to_string()));
        assert!(preset("nobody").is_none());
    }

    #[test]
    fn test_probabilities_in_range() {
        for name in PRESET_NAMES {
            let p = preset(name).unwrap();
            let values = [
                p.aggression,
                p.threat_awareness,
                p.adaptiveness,
                p.chaos,
                p.mirror,
                p.hesitation,
            ];
            for value in values {
                assert!((0.0..=1.0).contains(&value), "{name}: {value}");
            }
            assert!(p.search.depth >= 1);
        }
    }

    #[test]
    fn test_lock_preference() {
        let pref = Personality::sentinel().lock_preference();
        assert_eq!(pref.kind, Some(PatternKind::Gate));
        assert_eq!(pref.set, Some(VictorySet::Fortress));
        assert_eq!(pref.bonus, PREFERENCE_BONUS);
    }

    #[test]
    fn test_effective_aggression() {
        let p = Personality::new("x").with_aggression(0.5).with_adaptiveness(1.0);
        assert_eq!(p.effective_aggression(0), 0.5);
        assert!((p.effective_aggression(3) - 0.8).abs() < 1e-9);
        assert_eq!(p.effective_aggression(20), 1.0);
    }

    #[test]
    fn test_personality_serialization() {
        let p = Personality::trickster();
        let json = serde_json::to_string(&p).unwrap();
        let back: Personality = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
