//! HTML tokenizer module.
//!
//! Tokenization runs in two passes. Segmentation walks a [`Cursor`] over
//! the input and cuts it into raw chunks: comments, tag candidates, text
//! runs and raw-text element content. Classification then turns each chunk
//! into a [`Token`].

/// Two-pass tokenizer implementation.
pub mod core;
/// Forward-only scanning primitive.
pub mod cursor;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{Chunk, HTMLTokenizer, TokenizerOptions, classify};
pub use cursor::Cursor;
pub use token::Token;
