//! The length + prefix hash function shared by the generator and the lookup.
//!
//! The hash of a word is its length plus the association values of its first four bytes.
//! The third byte is looked up one entry further into the table than the others, which is why
//! the association table has 257 entries instead of 256.

use std::fmt;

/// Number of entries in an [AssociationTable].
pub const ASSOCIATION_LEN: usize = 257;

/// Number of leading bytes that contribute to the hash.
pub const KEY_POSITIONS: usize = 4;

/// Per-byte weights used by [AssociationTable::hash].
#[derive(Clone, PartialEq, Eq)]
pub struct AssociationTable {
    values: [u16; ASSOCIATION_LEN],
}

impl AssociationTable {
    /// Creates a table where every index has the weight `value`.
    pub fn filled(value: u16) -> AssociationTable {
        AssociationTable {
            values: [value; ASSOCIATION_LEN],
        }
    }

    /// Creates a table from previously generated weights, e.g. the `ASSOCIATION_VALUES` array
    /// written by [codegen::write_rust](crate::codegen::write_rust).
    pub fn from_values(values: [u16; ASSOCIATION_LEN]) -> AssociationTable {
        AssociationTable { values }
    }

    /// Weight at association index `index`. Indices past the table have no weight.
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, value: u16) {
        self.values[index] = value;
    }

    pub fn values(&self) -> &[u16; ASSOCIATION_LEN] {
        &self.values
    }

    /// Hashes `word`.
    ///
    /// Defined for every byte sequence: an empty word hashes to `0` and bytes past the fourth
    /// only count through the length.
    pub fn hash(&self, word: &[u8]) -> usize {
        let weight = |index: usize| self.values[index] as usize;

        let prefix = match *word {
            [] => 0,
            [a] => weight(a as usize),
            [a, b] => weight(a as usize) + weight(b as usize),
            [a, b, c] => weight(a as usize) + weight(b as usize) + weight(c as usize + 1),
            [a, b, c, d, ..] => {
                weight(a as usize)
                    + weight(b as usize)
                    + weight(c as usize + 1)
                    + weight(d as usize)
            }
        };

        word.len() + prefix
    }
}

impl fmt::Debug for AssociationTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(
                self.values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v != self.values[0])
                    .map(|(i, v)| (i, *v)),
            )
            .finish()
    }
}

/// The association indices `word`'s hash reads, in key position order.
pub fn association_indices(word: &[u8]) -> impl Iterator<Item = usize> + '_ {
    word.iter()
        .take(KEY_POSITIONS)
        .enumerate()
        .map(|(position, byte)| match position {
            2 => *byte as usize + 1,
            _ => *byte as usize,
        })
}

/// The part of `word` that determines its hash under every association table: its length and
/// the sorted association indices.
///
/// Two words with equal signatures always collide.
pub fn signature(word: &[u8]) -> (usize, Vec<usize>) {
    let mut indices: Vec<usize> = association_indices(word).collect();
    indices.sort_unstable();

    (word.len(), indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(weights: &[(u8, u16)]) -> AssociationTable {
        let mut table = AssociationTable::filled(0);

        for (index, weight) in weights {
            table.set(*index as usize, *weight);
        }

        table
    }

    #[test]
    fn test_hash_by_length() {
        let t = table(&[(b'a', 1), (b'b', 10), (b'c', 100), (b'd', 1000), (b'e', 5000)]);

        assert_eq!(t.hash(b""), 0);
        assert_eq!(t.hash(b"a"), 1 + 1);
        assert_eq!(t.hash(b"ab"), 2 + 1 + 10);
        // The third byte reads the weight of the next byte value.
        assert_eq!(t.hash(b"abb"), 3 + 1 + 10 + 100);
        assert_eq!(t.hash(b"abbc"), 4 + 1 + 10 + 100 + 100);
        assert_eq!(t.hash(b"abbcd"), 5 + 1 + 10 + 100 + 100);
        assert_eq!(t.hash(b"abbcde"), 6 + 1 + 10 + 100 + 100);
    }

    #[test]
    fn test_hash_is_total() {
        let t = AssociationTable::filled(u16::MAX);

        assert_eq!(t.hash(&[0xFF, 0xFF, 0xFF, 0xFF]), 4 + 4 * u16::MAX as usize);
        assert_eq!(t.hash(&[0u8; 1000]), 1000 + 4 * u16::MAX as usize);
    }

    #[test]
    fn test_from_values() {
        let mut values = [7; ASSOCIATION_LEN];
        values[b'a' as usize] = 1;
        values[256] = 3;

        let t = AssociationTable::from_values(values);

        assert_eq!(t.get(b'a' as usize), Some(1));
        assert_eq!(t.get(256), Some(3));
        assert_eq!(t.get(257), None);
        assert_eq!(t.hash(b"ab"), 2 + 1 + 7);
        assert_eq!(t.values(), &values);
    }

    #[test]
    fn test_association_indices() {
        let indices: Vec<_> = association_indices(b"align").collect();

        assert_eq!(indices, vec![b'a' as usize, b'l' as usize, b'i' as usize + 1, b'g' as usize]);
        assert_eq!(association_indices(&[0xFF, 0xFF, 0xFF]).last(), Some(256));
    }

    #[test]
    fn test_signature() {
        assert_eq!(signature(b"ba"), signature(b"ab"));
        assert_ne!(signature(b"ab"), signature(b"abx"));
        // "bcs" reads 'b', 'c' and 't', "bcc" reads 'b', 'c' and 'd'.
        assert_ne!(signature(b"bcs"), signature(b"bcc"));
        assert_eq!(signature(b"abcde"), signature(b"abcdz"));
    }
}
