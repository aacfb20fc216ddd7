//! Summary response parser: raw model text → `ParsedDocument`.
//!
//! Pure and synchronous. The tokenizer classifies lines, the parser groups
//! them into sections and cards, and the label table tags card fields.

pub mod document;
pub mod labels;
pub mod parser;
pub mod tokenizer;

pub use document::*;
pub use labels::*;
pub use parser::*;
pub use tokenizer::*;
