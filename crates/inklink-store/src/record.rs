//! Durable record types.

use std::collections::BTreeSet;
use std::time::SystemTime;

use inklink_protocol::{RoomCode, UserId};
use serde::{Deserialize, Serialize};

/// Cosmetics every newly registered user starts with.
pub const DEFAULT_COSMETICS: [&str; 2] = ["default_pen", "default_color"];

// ---------------------------------------------------------------------------
// RoomRecord
// ---------------------------------------------------------------------------

/// Where a room draws its candidate words from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordListSource {
    /// The shared difficulty-tagged catalog.
    #[default]
    Default,
    /// The host's own list (`RoomRecord::custom_words`).
    Custom,
}

/// The durable side of a room.
///
/// Written once at creation. Round progression never mutates it; only the
/// host's custom-word-list edits do, and those also refresh
/// `last_activity`, which an external TTL uses to expire idle rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub room_id: RoomCode,
    pub host_id: UserId,
    pub custom_words: Vec<String>,
    pub word_list_source: WordListSource,
    pub last_activity: SystemTime,
}

impl RoomRecord {
    /// A fresh record using the default catalog.
    pub fn new(room_id: RoomCode, host_id: UserId) -> Self {
        Self {
            room_id,
            host_id,
            custom_words: Vec::new(),
            word_list_source: WordListSource::Default,
            last_activity: SystemTime::now(),
        }
    }

    /// `true` if candidate words should come from `custom_words`.
    ///
    /// A room switched to `Custom` with an empty list still falls back to
    /// the catalog.
    pub fn uses_custom_words(&self) -> bool {
        self.word_list_source == WordListSource::Custom && !self.custom_words.is_empty()
    }

    /// Replaces the custom list and switches the room to it.
    ///
    /// Words are trimmed and lower-cased; blanks are dropped. Returns the
    /// number of words kept.
    pub fn set_custom_words<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.custom_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self.word_list_source = WordListSource::Custom;
        self.touch();
        self.custom_words.len()
    }

    /// Marks the room as active now.
    pub fn touch(&mut self) {
        self.last_activity = SystemTime::now();
    }
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// Level for a cumulative XP total: `1 + floor(sqrt(xp / 100))`.
///
/// Level 2 at 100 XP, 3 at 400, 4 at 900: each level costs a little more
/// than the one before, and a single correct guess (50–100 XP) never skips
/// more than one level past level 2.
pub fn level_for_xp(xp: u64) -> u32 {
    // isqrt(u64::MAX / 100) < 2^32, so the cast cannot truncate.
    (xp / 100).isqrt() as u32 + 1
}

/// A player's durable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    /// Lower-cased; unique across all users.
    pub username: String,
    /// Never decreases.
    pub xp: u64,
    pub level: u32,
    pub unlocked_cosmetics: BTreeSet<String>,
    pub correct_guesses: u64,
}

impl UserRecord {
    /// A newly registered user with zero XP and the default cosmetics.
    pub fn new(user_id: UserId, username: &str) -> Self {
        Self {
            user_id,
            username: username.trim().to_lowercase(),
            xp: 0,
            level: 1,
            unlocked_cosmetics: DEFAULT_COSMETICS.iter().map(|c| (*c).to_owned()).collect(),
            correct_guesses: 0,
        }
    }

    /// Applies one correct-guess award.
    ///
    /// Adds `xp`, bumps the correct-guess counter, recomputes the level and
    /// unlocks a `level-<n>-badge` for every level reached. Returns the new
    /// level if it changed.
    pub fn apply_award(&mut self, xp: u32) -> Option<u32> {
        self.xp = self.xp.saturating_add(u64::from(xp));
        self.correct_guesses += 1;

        let new_level = level_for_xp(self.xp);
        if new_level <= self.level {
            return None;
        }
        for reached in (self.level + 1)..=new_level {
            self.unlocked_cosmetics.insert(format!("level-{reached}-badge"));
        }
        self.level = new_level;
        Some(new_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> RoomCode {
        RoomCode::parse("AB12").unwrap()
    }

    #[test]
    fn test_level_for_xp_thresholds() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
        assert_eq!(level_for_xp(900), 4);
        assert!(level_for_xp(u64::MAX) > 1);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = 0;
        for xp in (0..20_000).step_by(37) {
            let level = level_for_xp(xp);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_new_room_record_uses_default_source() {
        let record = RoomRecord::new(code(), UserId::from("host"));
        assert_eq!(record.word_list_source, WordListSource::Default);
        assert!(record.custom_words.is_empty());
        assert!(!record.uses_custom_words());
    }

    #[test]
    fn test_set_custom_words_normalizes() {
        let mut record = RoomRecord::new(code(), UserId::from("host"));
        let kept = record.set_custom_words(["  Tree ", "", "ICE Cream", "   "]);
        assert_eq!(kept, 2);
        assert_eq!(record.custom_words, vec!["tree", "ice cream"]);
        assert!(record.uses_custom_words());
    }

    #[test]
    fn test_custom_source_with_empty_list_falls_back() {
        let mut record = RoomRecord::new(code(), UserId::from("host"));
        record.set_custom_words(Vec::<String>::new());
        assert_eq!(record.word_list_source, WordListSource::Custom);
        assert!(!record.uses_custom_words());
    }

    #[test]
    fn test_room_record_serializes_camel_case() {
        let record = RoomRecord::new(code(), UserId::from("host"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["roomId"], "AB12");
        assert_eq!(json["wordListSource"], "default");
    }

    #[test]
    fn test_new_user_has_default_cosmetics() {
        let user = UserRecord::new(UserId::from("u1"), "  Ann ");
        assert_eq!(user.username, "ann");
        assert_eq!(user.level, 1);
        assert!(user.unlocked_cosmetics.contains("default_pen"));
        assert!(user.unlocked_cosmetics.contains("default_color"));
    }

    #[test]
    fn test_apply_award_levels_up_and_unlocks_badges() {
        let mut user = UserRecord::new(UserId::from("u1"), "ann");
        assert_eq!(user.apply_award(60), None);
        assert_eq!(user.apply_award(60), Some(2));
        assert_eq!(user.xp, 120);
        assert_eq!(user.correct_guesses, 2);
        assert!(user.unlocked_cosmetics.contains("level-2-badge"));

        user.xp = 850;
        user.level = level_for_xp(850);
        assert_eq!(user.apply_award(100), Some(4));
        assert!(user.unlocked_cosmetics.contains("level-4-badge"));
    }
}
