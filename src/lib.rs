//! # bricks-rs: the Bricks string abstract domain
//!
//! **`bricks-rs`** approximates the set of strings a program variable may
//! hold during static analysis. A value is a sequence of *bricks*; each
//! brick `[S](min, max)` stands for between `min` and `max` concatenated
//! strings drawn from the set `S`.
//!
//! ## Key Features
//!
//! - **Lattice operations**: partial order, join, an approximate meet and a
//!   widening bounded by configurable [`Thresholds`][crate::config::Thresholds].
//! - **Canonical form**: brick lists are kept normalized by a small rewriting
//!   system (see [`normalize`][crate::normalize]).
//! - **String transfer functions**: concatenation, substring and a
//!   three-valued `contains` check.
//! - **Analysis driver**: environments of string variables, statement
//!   transfer and a fixpoint engine with widening for loops.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bricks_rs::brick::Brick;
//! use bricks_rs::bricks::Bricks;
//! use bricks_rs::config::Thresholds;
//!
//! // Join of two literals keeps both alternatives in one brick
//! let word = Bricks::literal("cat").lub(&Bricks::literal("dog"));
//! assert_eq!(word, Bricks::new(vec![Brick::of(["cat", "dog"], 1, 1)]));
//!
//! // Concatenation merges adjacent exact bricks
//! let plural = word.concat(&Bricks::literal("s"));
//! assert_eq!(plural.to_string(), r#"{["cats", "dogs"](1,1)}"#);
//!
//! // Widening jumps to ⊤ when the operands are incomparable
//! let thresholds = Thresholds::default();
//! let widened = Bricks::literal("a").widening(&Bricks::literal("b"), &thresholds).unwrap();
//! assert!(widened.is_top());
//! ```
//!
//! ## Core Components
//!
//! - **[`index`]**: repetition bounds in `ℕ ∪ {∞}`.
//! - **[`brick`]**: the single-brick lattice.
//! - **[`normalize`]**: the rewriting rules behind the canonical form.
//! - **[`bricks`]**: brick sequences, the actual string abstraction.
//! - **[`transfer`]**: environments and the abstract semantics of statements.
//! - **[`fixpoint`]**: least fixpoints with widening and narrowing.

pub mod brick;
pub mod bricks;
pub mod config;
pub mod domain;
pub mod error;
pub mod expr;
pub mod fixpoint;
pub mod index;
pub mod normalize;
pub mod transfer;

// Re-exports for convenience
pub use brick::{Brick, BrickDomain};
pub use bricks::{Bricks, BricksDomain};
pub use config::Thresholds;
pub use domain::{AbstractDomain, Satisfiability};
pub use error::{DomainError, IndexError, Result};
pub use expr::{Stmt, StrExpr, StrPred};
pub use fixpoint::FixpointEngine;
pub use index::ExtendedIndex;
pub use transfer::{StringEnv, StringEnvDomain, StringTransfer, TransferFunction};
