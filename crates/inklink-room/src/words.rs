//! Candidate word selection.
//!
//! A room draws its candidates either from the host's custom list or from
//! the shared [`WordCatalog`]. Catalog picks are difficulty-balanced: one
//! word per [`DifficultyBand`] where the band has any, then random fill.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom, index};
use serde::{Deserialize, Serialize};

/// Words offered when the catalog is empty.
pub const FALLBACK_WORDS: [&str; 3] = ["house", "dog", "tree"];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One catalog word with its difficulty tier (1 easy, 10 hard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    pub difficulty: u8,
    /// Rounds this word has been drawn in. Informational.
    #[serde(default)]
    pub times_drawn: u64,
    /// Mean seconds to a correct guess. Informational.
    #[serde(default)]
    pub average_guess_secs: f64,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, difficulty: u8) -> Self {
        Self {
            word: word.into(),
            difficulty,
            times_drawn: 0,
            average_guess_secs: 0.0,
        }
    }

    pub fn band(&self) -> DifficultyBand {
        DifficultyBand::of(self.difficulty)
    }
}

/// Difficulty grouping used to balance candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifficultyBand {
    /// 1–3 (and anything below).
    Low,
    /// 4–6.
    Mid,
    /// 7–10 (and anything above).
    High,
}

impl DifficultyBand {
    pub const ALL: [DifficultyBand; 3] = [Self::Low, Self::Mid, Self::High];

    pub fn of(difficulty: u8) -> Self {
        match difficulty {
            0..=3 => Self::Low,
            4..=6 => Self::Mid,
            _ => Self::High,
        }
    }
}

/// The read-only word corpus shared by every room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCatalog {
    entries: Vec<WordEntry>,
}

impl WordCatalog {
    /// Builds a catalog, lower-casing words and dropping blanks and
    /// duplicates (first occurrence wins).
    pub fn new(entries: impl IntoIterator<Item = WordEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter_map(|mut entry| {
                entry.word = entry.word.trim().to_lowercase();
                (!entry.word.is_empty() && seen.insert(entry.word.clone())).then_some(entry)
            })
            .collect();
        Self { entries }
    }

    /// An empty catalog. Rooms using it get [`FALLBACK_WORDS`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a JSON array of `{ "word": ..., "difficulty": ... }` objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<WordEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Where a room's candidates come from this round.
#[derive(Debug, Clone, Copy)]
pub enum WordSource<'a> {
    /// The host's list. Ignored (falls through to the catalog) if empty.
    Custom(&'a [String]),
    /// The shared catalog.
    Catalog,
}

/// Picks up to `desired` distinct candidate words.
///
/// Returns `min(desired, distinct words available)` words and never
/// fails: an empty custom list uses the catalog, an empty catalog uses
/// [`FALLBACK_WORDS`].
pub fn select_candidates<R: Rng + ?Sized>(
    source: WordSource<'_>,
    catalog: &WordCatalog,
    desired: usize,
    rng: &mut R,
) -> Vec<String> {
    if let WordSource::Custom(words) = source {
        if !words.is_empty() {
            return sample_custom(words, desired, rng);
        }
    }
    if catalog.is_empty() {
        return FALLBACK_WORDS
            .iter()
            .take(desired)
            .map(|w| (*w).to_owned())
            .collect();
    }
    sample_balanced(catalog, desired, rng)
}

fn sample_custom<R: Rng + ?Sized>(words: &[String], desired: usize, rng: &mut R) -> Vec<String> {
    let mut seen = HashSet::new();
    let distinct: Vec<&String> = words.iter().filter(|w| seen.insert(w.as_str())).collect();
    let amount = desired.min(distinct.len());
    index::sample(rng, distinct.len(), amount)
        .into_iter()
        .map(|i| distinct[i].clone())
        .collect()
}

fn sample_balanced<R: Rng + ?Sized>(catalog: &WordCatalog, desired: usize, rng: &mut R) -> Vec<String> {
    let mut picked: Vec<String> = Vec::with_capacity(desired);

    for band in DifficultyBand::ALL {
        if picked.len() >= desired {
            break;
        }
        let in_band: Vec<&WordEntry> = catalog
            .entries()
            .iter()
            .filter(|e| e.band() == band)
            .collect();
        if let Some(entry) = in_band.choose(rng) {
            picked.push(entry.word.clone());
        }
    }

    if picked.len() < desired {
        // Catalog words are already distinct, so anything not yet picked
        // is a valid filler.
        let mut rest: Vec<&WordEntry> = catalog
            .entries()
            .iter()
            .filter(|e| !picked.contains(&e.word))
            .collect();
        rest.shuffle(rng);
        let missing = desired - picked.len();
        picked.extend(rest.into_iter().take(missing).map(|e| e.word.clone()));
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn catalog() -> WordCatalog {
        WordCatalog::new([
            WordEntry::new("cat", 1),
            WordEntry::new("sun", 2),
            WordEntry::new("guitar", 5),
            WordEntry::new("bridge", 6),
            WordEntry::new("telescope", 8),
            WordEntry::new("democracy", 10),
        ])
    }

    fn assert_distinct(words: &[String]) {
        let set: HashSet<_> = words.iter().collect();
        assert_eq!(set.len(), words.len(), "duplicates in {words:?}");
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(DifficultyBand::of(1), DifficultyBand::Low);
        assert_eq!(DifficultyBand::of(3), DifficultyBand::Low);
        assert_eq!(DifficultyBand::of(4), DifficultyBand::Mid);
        assert_eq!(DifficultyBand::of(6), DifficultyBand::Mid);
        assert_eq!(DifficultyBand::of(7), DifficultyBand::High);
        assert_eq!(DifficultyBand::of(10), DifficultyBand::High);
    }

    #[test]
    fn test_catalog_pick_covers_every_band() {
        let catalog = catalog();
        let mut rng = rng();
        for _ in 0..50 {
            let words = select_candidates(WordSource::Catalog, &catalog, 3, &mut rng);
            assert_eq!(words.len(), 3);
            assert_distinct(&words);

            let bands: HashSet<_> = words
                .iter()
                .map(|w| {
                    let entry = catalog.entries().iter().find(|e| &e.word == w).unwrap();
                    entry.band()
                })
                .collect();
            assert_eq!(bands.len(), 3);
        }
    }

    #[test]
    fn test_catalog_fill_when_bands_are_missing() {
        let catalog = WordCatalog::new([
            WordEntry::new("cat", 1),
            WordEntry::new("dog", 2),
            WordEntry::new("cup", 3),
            WordEntry::new("hat", 2),
        ]);
        let words = select_candidates(WordSource::Catalog, &catalog, 3, &mut rng());
        assert_eq!(words.len(), 3);
        assert_distinct(&words);
    }

    #[test]
    fn test_small_catalog_returns_what_it_has() {
        let catalog = WordCatalog::new([WordEntry::new("tree", 2)]);
        let words = select_candidates(WordSource::Catalog, &catalog, 3, &mut rng());
        assert_eq!(words, vec!["tree"]);
    }

    #[test]
    fn test_custom_words_sample_without_replacement() {
        let custom: Vec<String> = ["red", "blue", "red", "green", "blue", "pink"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let mut rng = rng();
        for _ in 0..50 {
            let words = select_candidates(WordSource::Custom(&custom), &catalog(), 3, &mut rng);
            assert_eq!(words.len(), 3);
            assert_distinct(&words);
            assert!(words.iter().all(|w| custom.contains(w)));
        }
    }

    #[test]
    fn test_custom_list_shorter_than_desired() {
        let custom = vec!["kite".to_string(), "kite".to_string()];
        let words = select_candidates(WordSource::Custom(&custom), &catalog(), 3, &mut rng());
        assert_eq!(words, vec!["kite"]);
    }

    #[test]
    fn test_empty_custom_list_uses_catalog() {
        let words = select_candidates(WordSource::Custom(&[]), &catalog(), 3, &mut rng());
        assert_eq!(words.len(), 3);
        assert!(words.iter().all(|w| catalog().entries().iter().any(|e| &e.word == w)));
    }

    #[test]
    fn test_empty_catalog_uses_fallback() {
        let words = select_candidates(WordSource::Catalog, &WordCatalog::empty(), 3, &mut rng());
        assert_eq!(words, vec!["house", "dog", "tree"]);

        let two = select_candidates(WordSource::Catalog, &WordCatalog::empty(), 2, &mut rng());
        assert_eq!(two, vec!["house", "dog"]);
    }

    #[test]
    fn test_catalog_normalizes_and_dedupes() {
        let catalog = WordCatalog::new([
            WordEntry::new(" Tree ", 2),
            WordEntry::new("tree", 9),
            WordEntry::new("  ", 3),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].word, "tree");
        assert_eq!(catalog.entries()[0].difficulty, 2);
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = WordCatalog::from_json(
            r#"[{"word": "Tree", "difficulty": 2}, {"word": "volcano", "difficulty": 7, "timesDrawn": 4}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[1].times_drawn, 4);
        assert_eq!(catalog.entries()[1].band(), DifficultyBand::High);
    }

    #[test]
    fn test_catalog_from_bad_json() {
        assert!(WordCatalog::from_json("{not json").is_err());
    }
}
