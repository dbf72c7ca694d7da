//! Shared test fixtures for xplan crates.
//!
//! Factored models only. This crate depends on `xplan-core` alone so that
//! every other crate can take it as a dev-dependency.
//!
//! - [`chain`] - a three-state deterministic chain `s0 -a-> s1 -b-> goal`
//! - [`coin`] - a single fair coin flip
//! - [`robot`] - mobile-robot navigation with a speed/collision trade-off
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! xplan-test = { workspace = true }
//! ```
//!
//! ```
//! use xplan_test::chain::chain_model;
//!
//! let chain = chain_model();
//! assert_eq!(chain.xmdp.qfunctions().len(), 1);
//! ```

pub mod chain;
pub mod coin;
pub mod robot;

pub use chain::{chain_model, ChainModel};
pub use coin::{coin_model, CoinModel};
pub use robot::{robot_model, RobotModel};
