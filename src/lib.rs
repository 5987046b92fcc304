//! Red-black tree collections for Rust.
//!
//! This crate provides one balanced search-tree engine, [`RBTree`], and four containers built on
//! it:
//!
//! - [`RBSet`] - unique values, ordered
//! - [`RBMultiSet`] - repeated values, ordered, equal values kept in insertion order
//! - [`RBMap`] - unique keys mapped to values
//! - [`RBMultiMap`] - several values per key, in insertion order
//!
//! Ordering is pluggable: every container takes a [`Compare`] policy (by default [`Natural`],
//! which defers to [`Ord`]). The engine itself is addressed through [`Pos`]itions, which stay
//! valid across insertions and across erasure of other elements.
//!
//! # Example
//!
//! ```
//! use wabi_rbtree::{RBMap, RBMultiSet};
//!
//! let mut scores = RBMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//! assert_eq!(scores.first_key_value(), Some((&"Alice", &100)));
//!
//! let rolls: RBMultiSet<u8> = [3, 6, 3, 1].into_iter().collect();
//! assert_eq!(rolls.count(&3), 2);
//! assert!(rolls.iter().copied().eq([1, 3, 3, 6]));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable positions** - Erasing an element never moves any other element
//! - **Fallible allocation** - `try_*` operations report [`AllocError`] instead of aborting
//! - **Self-checking** - [`RBTree::verify`] reports the first broken invariant as a [`Violation`]
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to each other by 32-bit handles, so parent links are plain
//! indices rather than owning pointers. The tree caches its minimum and maximum for O(1) access
//! to both ends, and deletion relinks nodes instead of swapping values, which is what keeps
//! positions stable.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod compare;
mod error;
mod raw;

pub mod rbmap;
pub mod rbmultimap;
pub mod rbmultiset;
pub mod rbset;
pub mod rbtree;

pub use compare::{Compare, Descending, First, FnCompare, Identity, KeyOf, Natural};
pub use error::{AllocError, KeyNotFound, Violation};
pub use rbmap::RBMap;
pub use rbmultimap::RBMultiMap;
pub use rbmultiset::RBMultiSet;
pub use rbset::RBSet;
pub use rbtree::{Pos, RBTree};
