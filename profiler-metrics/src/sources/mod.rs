//! Built-in query runners.
//!
//! Production connections live outside this crate and implement
//! [`QueryRunner`](crate::runner::QueryRunner) directly. The DataFusion runner
//! covers in-process tables and is what the test suite drives.

mod session;

pub use session::DataFusionRunner;
