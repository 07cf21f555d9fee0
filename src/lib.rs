//! tfunbind: copy a Visual Studio tree while stripping TFVC source-control bindings.
//!
//! Layers, innermost first:
//! - [`domain`]: entries, the marker table and content rules (no I/O)
//! - [`application`]: the unbind service walking the tree
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{UnbindOptions, UnbindService};
pub use domain::{Disposition, ExistingPolicy, MarkerTable, Summary};
