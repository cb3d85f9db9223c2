//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a token id in a [`crate::vocab::Vocabulary`].
///
/// These are constrained to be unsigned primitive integers;
/// such that the largest id in a vocabulary is less than `T::max()`.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A normalized token.
pub type Token = String;

/// An ordered list of tokens for one side of an utterance pair.
pub type Sequence = Vec<Token>;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type PCHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> PCHashMap<K, V> {
            PCHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PCHashMap<K, V> {
            PCHashMap::with_capacity(capacity)
        }

    } else {
        /// Type Alias for hash maps in this crate.
        pub type PCHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn hash_map_new<K, V>() -> PCHashMap<K, V> {
            PCHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> PCHashMap<K, V> {
            PCHashMap::with_capacity(capacity)
        }
    }
}

/// Convert a `usize` index into a token id.
///
/// Returns `None` if the index does not fit in `T`.
pub fn token_from_index<T: TokenType>(index: usize) -> Option<T> {
    T::from_usize(index)
}

#[cfg(test)]
mod tests {
    use core::marker::PhantomData;

    use super::*;

    #[test]
    fn test_common_token_types() {
        struct IsToken<T: TokenType>(PhantomData<T>);

        let _: IsToken<u16>;
        let _: IsToken<u32>;
        let _: IsToken<u64>;
        let _: IsToken<usize>;
    }

    #[test]
    fn test_token_from_index() {
        assert_eq!(token_from_index::<u8>(255), Some(255u8));
        assert_eq!(token_from_index::<u8>(256), None);
        assert_eq!(token_from_index::<u32>(70_000), Some(70_000u32));
    }

    #[test]
    fn test_hash_map_helpers() {
        let mut m: PCHashMap<String, u32> = hash_map_with_capacity(4);
        m.insert("a".to_string(), 1);
        assert_eq!(m.get("a"), Some(&1));

        let e: PCHashMap<u8, u8> = hash_map_new();
        assert!(e.is_empty());
    }
}
