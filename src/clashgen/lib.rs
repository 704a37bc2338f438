//! # Clashgen Architecture
//!
//! Clashgen is a batch generator: one run turns a JSON user directory and a
//! Jinja2-style template into one Clash subscription file per user. The crate
//! is a library with a thin CLI client; everything from the module boundary
//! inward takes plain arguments, returns `Result` values, and never touches
//! stdout or the process exit code.
//!
//! ```text
//! CLI (args.rs, main.rs)
//!   │  parses flags, installs the log subscriber, maps the verdict to an
//!   │  exit code — the only place that knows about the process boundary
//!   ▼
//! Loaders (users.rs, template.rs) + catalog.rs
//!   │  users.rs: JSON file → validated UserStore, skipping bad records
//!   │  template.rs: directory + name → parsed, reusable ConfigTemplate
//!   │  catalog.rs: static server ids → ordered list of {id, name} entries
//!   ▼
//! Pipeline (generate.rs)
//!      renders the template once per user and writes <uuid>.yaml with
//!      mode 0640, counting successes and failures without ever aborting
//!      the batch on a per-user error
//! ```
//!
//! ## Failure policy
//!
//! Fatal conditions (unreadable users file, non-object user data, zero usable
//! records, missing or unparsable template) are [`error::GenError`] values and
//! abort the run before any file is written. Per-user conditions (a record
//! missing a field, a render error, a write error) are logged, skipped, and
//! reflected only in the final [`generate::RunSummary`].
//!
//! ## Module Overview
//!
//! - [`catalog`]: the static server list handed to every render
//! - [`users`]: user file loading and per-record validation
//! - [`template`]: template resolution and parsing (minijinja)
//! - [`generate`]: the per-user render-and-write loop
//! - [`error`]: error types

pub mod catalog;
pub mod error;
pub mod generate;
pub mod template;
pub mod users;
