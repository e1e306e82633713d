//! Rill Markdown Stream - Streaming markdown renderer for terminal output.
//!
//! This crate renders incrementally-arriving text, such as token-by-token
//! output from a text-generation service, as styled terminal output without
//! ever holding the complete document. Headings, emphasis, lists, fenced
//! code blocks, tool-call and file pseudo blocks, and tables are recognized
//! across arbitrary fragment boundaries.
//!
//! # Example
//!
//! ```no_run
//! use rill_markdown_stream::RenderSession;
//! use std::io;
//!
//! let mut session = RenderSession::new(io::stdout());
//!
//! // Push fragments as they arrive from the stream
//! session.feed("Hello ");
//! session.feed("**world**!\n");
//!
//! // Finish rendering and append the trailing decoration
//! print!("{}", session.finalize());
//! ```

mod code;
mod inline;
mod languages;
mod renderer;
mod table;
mod theme;
mod utils;

pub use renderer::RenderSession;
pub use theme::{Style, Theme};
