// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # babel-stacks
//!
//! An infinite library. Every coordinate `hexagon.wall.shelf.volume` holds a
//! complete book (title, author, abstract, chapters, bibliography) that is
//! generated deterministically on demand and never stored. A bounded search
//! maps free-text queries to a small set of coordinates, generates the books
//! found there, scores them, and returns a diversity-aware top-K.
//!
//! ## Architecture
//!
//! - **Hashing** (`hash`): the 32-bit rolling hash every other part derives from
//! - **Vocabulary** (`vocabulary`): bundled TOML word tables, shared read-only
//! - **Generation** (`library`): pure coordinate → book synthesis
//! - **Search** (`search`): analyze → map → explore → score → rank
//! - **Engine** (`engine`): facade owning the vocabulary and worker pool
//!
//! ## Library usage
//!
//! ```no_run
//! use babel_stacks::coordinate::Coordinate;
//! use babel_stacks::engine::{Engine, EngineConfig};
//! use babel_stacks::search::SearchOptions;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let book = engine
//!     .generate_book(&Coordinate::new(12345, 3, 2, 15).unwrap())
//!     .unwrap();
//! assert_eq!(book.id, "12345.3.2.15");
//!
//! let response = engine
//!     .search("the memory of infinite libraries", &SearchOptions::default())
//!     .unwrap();
//! for hit in &response.results {
//!     println!("{:.3} {} by {}", hit.final_score, hit.book.title, hit.book.author);
//! }
//! ```

pub mod config;
pub mod coordinate;
pub mod engine;
pub mod error;
pub mod hash;
pub mod library;
pub mod search;
pub mod vocabulary;
