//! Implementations of [`crate::ports::ImageGenerator`].
//!
//! - `live/` — Gemini `generateContent`
//! - `recording/` — wraps live and writes a cassette
//! - `replaying/` — serves a cassette, no network or API key

pub mod live;
pub mod recording;
pub mod replaying;
