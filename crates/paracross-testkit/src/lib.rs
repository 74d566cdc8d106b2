//! # Paracross Testkit
//!
//! Testing utilities for paracross finality.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A four-validator title with store, registry, and primary chain
//! - **Generators**: Proptest strategies for blocks, hashes, and keys
//! - **Golden vectors**: Digest vectors for cross-implementation verification
//!
//! ## Test Fixtures
//!
//! ```rust
//! use paracross_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let paracross = fixture.paracross();
//! let tx = fixture.commit_tx(0, &fixture.chained_candidate(0));
//! let receipt = paracross.process_commit(&tx).unwrap();
//! assert_eq!(receipt.kv.len(), 1);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use paracross_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn filter_is_pure(params: BlockParams) {
//!         let block = block_from_params(&params);
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{TestFixture, TestParacross, ANCHOR_HEIGHT, TEST_TITLE};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, verify_all_vectors, DigestVector};
