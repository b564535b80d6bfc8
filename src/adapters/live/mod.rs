//! Live adapters that call real APIs.

pub mod gemini;
