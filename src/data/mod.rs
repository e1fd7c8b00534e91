//! Data layer: core types, loading, and example arrays.
//!
//! Architecture:
//! ```text
//!  .png / .npy / .json / .csv      generate::*
//!        │                              │
//!        ▼                              │
//!   ┌──────────┐                        │
//!   │  loader   │  parse file → grid    │
//!   └──────────┘                        │
//!        │                              │
//!        ▼                              ▼
//!   ┌──────────────┐   IntoGrid   ┌──────────┐
//!   │ NumericGrid  │ ◄─────────── │ ndarray  │
//!   └──────────────┘              └──────────┘
//! ```

pub mod generate;
pub mod loader;
pub mod model;
