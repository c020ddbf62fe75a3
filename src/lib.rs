//! An in-memory, incrementally-updatable keyword search index with
//! prefix and substring matching.
//!
//! ##### About
//!
//! Items are registered under a set of keywords; queries match on any
//! contiguous substring of a registered keyword, not just whole-word
//! or prefix matches. The index is built once via [`Config`] and then
//! updated and queried concurrently through a cheaply-cloneable
//! [`SearchIndex`] handle.
//!
//! Internally, every keyword materialises a small DAG of its own
//! substrings (the fragment graph); a query walks that graph from the
//! query token outward, scoring every keyword it reaches and keeping
//! the best score per item. Results across multiple query tokens are
//! combined by union or intersection, and the top results are selected
//! without a full sort.
//!
//! # Example usage
//!
//! ```
//! use kwsearch::{Config, MergePolicy};
//!
//! let index = Config::<String>::new()
//!     .merge_policy(MergePolicy::Union)
//!     .build()?;
//!
//! index.add_item("keyword.txt".to_string(), "keyword");
//! index.add_item("keyboard.txt".to_string(), "keyboard");
//!
//! // Substring matches, not just prefixes.
//! let hits = index.find_items("eywor", 10);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].as_str(), "keyword.txt");
//!
//! index.remove_item(&"keyword.txt".to_string());
//! assert_eq!(index.find_item("keyword"), None);
//! # Ok::<(), kwsearch::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]

mod cache;
mod config;
mod error;
mod frag;
mod graph;
mod index;
mod index_inner;
mod keyed_set;
mod query;
mod topk;
mod walk;

pub use cache::CacheStats;
pub use config::{
    Config, MergePolicy, UnmatchedPolicy, CACHE_BYTES_DISABLED, CACHE_BYTES_UNLIMITED,
};
pub use error::{Error, Result};
pub use index::SearchIndex;
pub use index_inner::IndexStats;
