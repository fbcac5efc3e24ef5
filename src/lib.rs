//! llmstxt - turn a built documentation site into an LLM-friendly corpus.
//!
//! Reads the rendered HTML pages of a site, converts the configured ones to
//! Markdown with every internal link rewritten to its `.md` sibling, and
//! aggregates them into `llms.txt` (index) and `llms-full.txt` (full text).
//!
//! # Modules
//!
//! | Module      | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `dom`       | Owned HTML tree, parsing and serialization           |
//! | `core`      | Link kinds and classifications                       |
//! | `pipeline`  | Clean → preprocess → convert per page                |
//! | `markdown`  | Markdown rendering and normalization                 |
//! | `generator` | Section buffers, `llms.txt` / `llms-full.txt`        |
//! | `page`      | Page metadata and site directory discovery           |
//! | `config`    | `llmstxt.toml`                                       |
//! | `cli`       | Command-line interface                               |

pub mod cli;
pub mod config;
pub mod core;
pub mod dom;
pub mod generator;
pub mod logger;
pub mod markdown;
pub mod page;
pub mod pipeline;
pub mod utils;
