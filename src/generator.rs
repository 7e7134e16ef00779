//! Search for association tables that hash a vocabulary without collisions.
//!
//! The search is a min-conflicts local search: start from random weights, then repeatedly
//! pick a word that shares its slot with another word and give one of its bytes the weight
//! that leaves the fewest collisions. A search that stalls is restarted from new random
//! weights, and when every restart fails the weight range is doubled.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use slog::{debug, o, trace, warn, Discard, Logger};

use crate::hash::{association_indices, signature, AssociationTable, ASSOCIATION_LEN, KEY_POSITIONS};
use crate::table::KeywordTable;
use crate::vocabulary::{Code, Vocabulary};

/// Parameters of the association table search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Seed of the random number generator. Equal seeds give equal tables.
    pub seed: u64,

    /// Largest weight assigned in the first round.
    pub max_weight: u16,

    /// Local search steps before a restart.
    pub iterations: usize,

    /// Restarts per round.
    pub restarts: usize,

    /// Rounds. Every round after the first doubles `max_weight`.
    pub rounds: usize,

    /// Largest accepted number of slots (`MAX_HASH_VALUE + 1`). Collision-free tables that
    /// span more slots are thrown away and the search goes on. `None` accepts any span.
    pub max_span: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            seed: 0x6d6e656d,
            max_weight: 64,
            iterations: 1000,
            restarts: 32,
            rounds: 4,
            max_span: None,
        }
    }
}

/// Reasons a [KeywordTable] could not be built.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerateError {
    /// The words have the same length and read the same association indices, so every
    /// association table hashes them to the same slot.
    Indistinguishable { first: String, second: String },

    /// The association table hashes two words to the same slot.
    Collision {
        first: String,
        second: String,
        slot: usize,
    },

    /// A word cannot be found through the table it was placed in.
    Unreachable { text: String },

    /// No collision-free table was found within the configured search.
    Exhausted { max_weight: u16, attempts: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::Indistinguishable { first, second } => write!(
                f,
                "'{}' and '{}' cannot be told apart by length and key positions",
                first, second
            ),
            GenerateError::Collision {
                first,
                second,
                slot,
            } => write!(f, "'{}' and '{}' both hash to slot {}", first, second, slot),
            GenerateError::Unreachable { text } => write!(f, "'{}' is not reachable", text),
            GenerateError::Exhausted {
                max_weight,
                attempts,
            } => write!(
                f,
                "no perfect hash found after {} attempts (weights up to {})",
                attempts, max_weight
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

struct Key {
    length: usize,
    indices: Vec<usize>,
}

/// Tables spanning more than this many slots per keyword are reported as sparse.
const SPARSE_SPAN_FACTOR: usize = 4;

/// Builds [KeywordTable]s.
pub struct Generator {
    config: SearchConfig,
    logger: Logger,
}

impl Default for Generator {
    fn default() -> Generator {
        Generator::new(SearchConfig::default())
    }
}

impl Generator {
    pub fn new(config: SearchConfig) -> Generator {
        Generator::with_logger(config, None)
    }

    pub fn with_logger<L>(config: SearchConfig, logger: L) -> Generator
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "generation"));

        Generator { config, logger }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches for an association table for `vocabulary` and places every entry in its slot.
    pub fn generate<C: Code>(&self, vocabulary: &Vocabulary<C>) -> Result<KeywordTable<C>, GenerateError> {
        check_distinguishable(vocabulary)?;

        let association = self.search(vocabulary)?;
        let table = KeywordTable::from_parts(vocabulary, association)?;

        debug!(self.logger, "generated table";
            "keywords" => table.total_keywords(),
            "max_hash_value" => table.max_hash_value());

        if table.max_hash_value() >= SPARSE_SPAN_FACTOR * table.total_keywords() {
            warn!(self.logger, "sparse table, consider a different seed or max_span";
                "keywords" => table.total_keywords(),
                "slots" => table.max_hash_value() + 1);
        }

        Ok(table)
    }

    fn search<C: Code>(&self, vocabulary: &Vocabulary<C>) -> Result<AssociationTable, GenerateError> {
        let keys: Vec<Key> = vocabulary
            .iter()
            .map(|entry| Key {
                length: entry.text().len(),
                indices: association_indices(entry.text().as_bytes()).collect(),
            })
            .collect();

        let mut used: Vec<usize> = keys.iter().flat_map(|k| k.indices.iter().copied()).collect();
        used.sort_unstable();
        used.dedup();

        let longest = keys.iter().map(|k| k.length).max().unwrap_or(0);
        let limit = max_weight_limit(longest);

        if self.config.max_weight > limit {
            debug!(self.logger, "capping max_weight";
                "requested" => self.config.max_weight, "limit" => limit);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut max_weight = self.config.max_weight.max(1).min(limit);
        let mut attempts = 0;

        for round in 0..self.config.rounds {
            if round > 0 {
                max_weight = max_weight.saturating_mul(2).min(limit);
            }

            for restart in 0..self.config.restarts {
                attempts += 1;

                let mut weights = vec![0u16; ASSOCIATION_LEN];

                for index in &used {
                    weights[*index] = rng.gen_range(0..=max_weight);
                }

                if let Some(steps) = self.min_conflicts(&keys, &mut weights, max_weight, &mut rng) {
                    let max_hash = keys.iter().map(|k| key_hash(k, &weights)).max().unwrap_or(0);

                    let too_wide = self.config.max_span.map_or(false, |span| max_hash >= span);

                    if !too_wide {
                        debug!(self.logger, "found association table";
                            "round" => round, "restart" => restart, "steps" => steps,
                            "max_weight" => max_weight);

                        return Ok(finish(max_hash, &used, &weights));
                    }

                    trace!(self.logger, "table too wide";
                        "round" => round, "restart" => restart, "slots" => max_hash + 1);
                    continue;
                }

                trace!(self.logger, "restart"; "round" => round, "restart" => restart);
            }
        }

        Err(GenerateError::Exhausted {
            max_weight,
            attempts,
        })
    }

    /// Returns the number of steps taken when `weights` hash every key to a distinct value.
    fn min_conflicts(
        &self,
        keys: &[Key],
        weights: &mut [u16],
        max_weight: u16,
        rng: &mut StdRng,
    ) -> Option<usize> {
        let longest = keys.iter().map(|k| k.length).max().unwrap_or(0);
        let bound = longest + KEY_POSITIONS * max_weight as usize + 1;
        let mut counts = vec![0usize; bound];

        for step in 0..self.config.iterations {
            let hashes: Vec<usize> = keys.iter().map(|k| key_hash(k, weights)).collect();

            for count in counts.iter_mut() {
                *count = 0;
            }

            for hash in &hashes {
                counts[*hash] += 1;
            }

            let colliding: Vec<usize> = (0..keys.len()).filter(|k| counts[hashes[*k]] > 1).collect();

            let key = match colliding.choose(rng) {
                Some(key) => *key,
                None => return Some(step),
            };

            let index = match keys[key].indices.choose(rng) {
                Some(index) => *index,
                None => return None,
            };

            // Keys reading `index` move when its weight changes, the rest stay put.
            let mut moving = Vec::new();
            let mut conflicts = 0;

            for count in counts.iter_mut() {
                *count = 0;
            }

            for (k, hash) in keys.iter().zip(&hashes) {
                let multiplicity = k.indices.iter().filter(|i| **i == index).count();

                if multiplicity == 0 {
                    if counts[*hash] > 0 {
                        conflicts += 1;
                    }
                    counts[*hash] += 1;
                } else {
                    let base = hash - multiplicity * weights[index] as usize;
                    moving.push((base, multiplicity));
                }
            }

            let mut best = Vec::new();
            let mut best_conflicts = usize::MAX;

            for value in 0..=max_weight {
                let mut candidate = conflicts;

                for (base, multiplicity) in &moving {
                    let hash = base + multiplicity * value as usize;
                    if counts[hash] > 0 {
                        candidate += 1;
                    }
                    counts[hash] += 1;
                }

                for (base, multiplicity) in &moving {
                    counts[base + multiplicity * value as usize] -= 1;
                }

                if candidate < best_conflicts {
                    best_conflicts = candidate;
                    best.clear();
                }

                if candidate == best_conflicts {
                    best.push(value);
                }
            }

            if let Some(value) = best.choose(rng) {
                weights[index] = *value;
            }
        }

        None
    }
}

fn key_hash(key: &Key, weights: &[u16]) -> usize {
    key.length + key.indices.iter().map(|i| weights[*i] as usize).sum::<usize>()
}

/// Largest weight for which every hash of a word up to `longest` bytes, plus one, still fits
/// in a `u16`. Keeps the miss weight past every slot.
fn max_weight_limit(longest: usize) -> u16 {
    let limit = (u16::MAX as usize - 1).saturating_sub(longest) / KEY_POSITIONS;

    std::cmp::min(limit, u16::MAX as usize) as u16
}

/// Builds the final table: searched weights for the used indices, and a miss weight past the
/// largest word hash for every other index.
fn finish(max_hash: usize, used: &[usize], weights: &[u16]) -> AssociationTable {
    // max_weight_limit keeps this in range.
    let miss = std::cmp::min(max_hash + 1, u16::MAX as usize) as u16;

    let mut table = AssociationTable::filled(miss);

    for index in used {
        table.set(*index, weights[*index]);
    }

    table
}

fn check_distinguishable<C: Code>(vocabulary: &Vocabulary<C>) -> Result<(), GenerateError> {
    let mut seen = HashMap::new();

    for entry in vocabulary {
        if let Some(first) = seen.insert(signature(entry.text().as_bytes()), entry.text()) {
            return Err(GenerateError::Indistinguishable {
                first: first.to_string(),
                second: entry.text().to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::Mnemonic;
    use crate::vocabulary::Entry;

    #[test]
    fn test_generate_builtin() {
        let vocabulary = Vocabulary::builtin();
        let table = Generator::default().generate(&vocabulary).unwrap();

        assert_eq!(table.total_keywords(), vocabulary.len());
        assert!(table.verify().is_ok());

        for entry in &vocabulary {
            assert_eq!(table.lookup(entry.text().as_bytes()), entry.code());
        }
    }

    #[test]
    fn test_same_seed_same_table() {
        let vocabulary = Vocabulary::builtin();
        let a = Generator::default().generate(&vocabulary).unwrap();
        let b = Generator::default().generate(&vocabulary).unwrap();

        assert_eq!(a.association(), b.association());
    }

    #[test]
    fn test_table_span_stays_small() {
        let vocabulary = Vocabulary::builtin();
        let table = Generator::default().generate(&vocabulary).unwrap();

        assert!(table.max_hash_value() < 4 * vocabulary.len());
    }

    #[test]
    fn test_indistinguishable_words() {
        // Same length, and both read 'a' and 'b'.
        let vocabulary = Vocabulary::new(vec![
            Entry::new("ab", Mnemonic::Ld),
            Entry::new("ba", Mnemonic::St),
        ])
        .unwrap();

        assert_eq!(
            Generator::default().generate(&vocabulary).err(),
            Some(GenerateError::Indistinguishable {
                first: "ab".into(),
                second: "ba".into(),
            })
        );
    }

    #[test]
    fn test_exhausted_search() {
        let vocabulary = Vocabulary::builtin();
        let config = SearchConfig {
            max_weight: 1,
            iterations: 10,
            restarts: 2,
            rounds: 1,
            ..SearchConfig::default()
        };

        assert_eq!(
            Generator::new(config).generate(&vocabulary).err(),
            Some(GenerateError::Exhausted {
                max_weight: 1,
                attempts: 2,
            })
        );
    }

    #[test]
    fn test_miss_weight_past_every_slot() {
        let vocabulary = Vocabulary::builtin();
        let table = Generator::default().generate(&vocabulary).unwrap();
        let max = table.max_hash_value();

        let used: Vec<usize> = vocabulary
            .iter()
            .flat_map(|entry| association_indices(entry.text().as_bytes()).collect::<Vec<_>>())
            .collect();

        for index in (0..ASSOCIATION_LEN).filter(|i| !used.contains(i)) {
            assert_eq!(table.association().get(index), Some(max as u16 + 1), "index {}", index);
        }

        assert!(table.hash(b"zz") > max);
        assert!(table.hash(&[0xFF]) > max);
        assert!(table.hash(&[b'l', b'd', 0xFF]) > max);
    }

    #[test]
    fn test_max_weight_limit() {
        assert_eq!(max_weight_limit(5), 16382);
        assert_eq!(max_weight_limit(0), 16383);
        assert!(5 + KEY_POSITIONS * max_weight_limit(5) as usize + 1 <= u16::MAX as usize);
        assert_eq!(max_weight_limit(usize::MAX), 0);
    }

    #[test]
    fn test_huge_max_weight_is_capped() {
        let vocabulary = Vocabulary::new(vec![
            Entry::new("ld", Mnemonic::Ld),
            Entry::new("st", Mnemonic::St),
            Entry::new("nop", Mnemonic::Nop),
        ])
        .unwrap();
        let config = SearchConfig {
            max_weight: u16::MAX,
            ..SearchConfig::default()
        };

        let table = Generator::new(config).generate(&vocabulary).unwrap();
        let max = table.max_hash_value();

        assert!(max < u16::MAX as usize);
        assert!(table.hash(b"zz") > max);
        assert!(table.hash(&[0xFF]) > max);
        assert_eq!(table.lookup(b"nop"), Mnemonic::Nop);
    }

    #[test]
    fn test_max_span() {
        let vocabulary = Vocabulary::builtin();

        let config = SearchConfig {
            max_span: Some(4 * vocabulary.len()),
            ..SearchConfig::default()
        };
        let table = Generator::new(config).generate(&vocabulary).unwrap();

        assert!(table.max_hash_value() < 4 * vocabulary.len());

        // No table can place 82 words in fewer than 82 slots.
        let config = SearchConfig {
            max_span: Some(vocabulary.len() - 1),
            iterations: 50,
            restarts: 2,
            rounds: 1,
            ..SearchConfig::default()
        };

        assert_eq!(
            Generator::new(config).generate(&vocabulary).err(),
            Some(GenerateError::Exhausted {
                max_weight: 64,
                attempts: 2,
            })
        );
    }

    #[test]
    fn test_single_word() {
        let vocabulary = Vocabulary::new(vec![Entry::new("nop", Mnemonic::Nop)]).unwrap();
        let table = Generator::default().generate(&vocabulary).unwrap();

        assert_eq!(table.lookup(b"nop"), Mnemonic::Nop);
        assert_eq!(table.lookup(b"mop"), Mnemonic::Invalid);
    }
}
