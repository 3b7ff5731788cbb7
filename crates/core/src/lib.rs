//! Core library for codemorph
//!
//! This crate implements the **Functional Core** of the codemorph application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`codemorph_core`** (this crate): Pure transformation functions with zero I/O
//! - **`codemorph`**: File access, the Gemini call, terminal UI and orchestration
//!
//! Nothing in this crate touches the network, the filesystem or the terminal.
//! Every function can be tested with plain strings.
//!
//! # Module Organization
//!
//! - [`settings`]: The user settings record and its per-key parsing rules
//! - [`update`]: Prompt assembly, response cleanup, document edits and the
//!   progress milestones of a file update
//!
//! # Example Usage
//!
//! ```rust
//! use codemorph_core::update::{build_prompt, clean_response, TextEdit, DEFAULT_PROMPT};
//!
//! let original = "x=1";
//! let prompt = build_prompt(DEFAULT_PROMPT, original);
//! assert!(prompt.contains("```\nx=1\n```"));
//!
//! // Pretend the model answered with a fenced block
//! let cleaned = clean_response("```python\nx = 1\n```");
//!
//! let mut document = original.to_string();
//! TextEdit::full_replace(original, cleaned).apply(&mut document).unwrap();
//! assert_eq!(document, "x = 1");
//! ```

pub mod settings;
pub mod update;
