//! Generative-language adapters.

mod gemini;

pub use gemini::GeminiSummaryClient;
