//! chained-hash: separate-chaining hash containers with prime bucket
//! counts, a seeded Murmur-style digest, and explicit rehashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one chaining engine, four container flavors, each layer small
//!   enough to reason about on its own.
//! - Layers:
//!   - HashTable<T, H>: digest-addressed engine. Buckets are chains of
//!     nodes held in a `slotmap` arena; each node keeps the digest it was
//!     inserted under. Callers supply digests and equality closures.
//!   - HashSet / HashMultiSet: typed engines that compute digests from
//!     `T: Hash` and compare with `Eq` (or `Equivalent` for borrowed
//!     queries). The unique flavor rejects duplicates, the multi flavor
//!     keeps them.
//!   - HashMap / HashMultiMap: store `Pair<K, V>` in the matching set
//!     engine. A pair hashes and compares by key alone, so the map layer
//!     adds no table logic of its own.
//!
//! Constraints
//! - Bucket counts are always prime: requested counts round up via
//!   `prime::next_prime`.
//! - `len() == Σ bucket_size(i)` between any two public calls.
//! - An element's bucket is `digest % bucket_count`; its offset within the
//!   bucket changes as neighbours come and go.
//! - Elements are owned by the table. Removing one either drops it or
//!   hands it back (`take`, `erase`, `drain`, `take_all`); dropping the
//!   table drops everything still resident exactly once.
//! - `Send` when `T` and `H` are, never `Sync`.
//!
//! Digests
//! - A key's `Hash` impl is replayed into a byte buffer and the buffer is
//!   digested in one call to the table's [`HashFn`] with the table's seed.
//!   [`Murmur64`] is the default. Any `Fn(&[u8], u64) -> u64` works too.
//! - The buffer is a 32-byte stack array; only keys whose hash stream is
//!   longer allocate, once per hash.
//! - Borrowed queries (`&str` for `String`) must feed identical bytes to
//!   the hasher, which holds for the std types whose `Borrow` impls
//!   promise matching `Hash`.
//!
//! Growth
//! - After an insert pushes `len / bucket_count` past the configured
//!   maximum load (default 1.0), the table rehashes to the next prime at
//!   or above `2 * bucket_count + 1`. `TableConfig::fixed_capacity`
//!   disables this. `rehash` and `reserve` can be called explicitly and
//!   report allocation failure instead of aborting.
//! - Rehash relinks nodes by their stored digest; it never calls `Hash`
//!   or `Eq`.
//!
//! Reentrancy policy
//! - The engine guards its critical sections with a debug-only reentrancy
//!   check. `Hash` impls and equality code run inside those sections and
//!   must not call back into the same table; debug builds panic if they
//!   do.
//! - Traversal is not guarded: a `for_each` visitor may read the table it
//!   is visiting.
//!
//! Notes and non-goals
//! - No stable element handles: `Position` is a snapshot.
//! - Keys are immutable while resident; there is no `key_mut`.
//! - No concurrent access; wrap a table in a lock to share it.

pub mod hash;
pub mod prime;

mod chain;
mod config;
mod error;
mod reentrancy;

pub mod table;
pub mod iter;

pub mod hash_set;
pub mod hash_multiset;
pub mod pair;
pub mod hash_map;
pub mod hash_multimap;

mod table_proptest;

// Public surface
pub use config::{TableConfig, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};
pub use error::{InsertError, TryReserveError};
pub use hash::{HashFn, Murmur64, DEFAULT_SEED};
pub use hash_map::HashMap;
pub use hash_multimap::HashMultiMap;
pub use hash_multiset::HashMultiSet;
pub use hash_set::HashSet;
pub use pair::Pair;
pub use table::{HashTable, Position};
