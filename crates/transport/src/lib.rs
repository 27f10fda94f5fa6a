//! Chat transport implementations for tablemind.
//!
//! One transport today: any OpenAI-compatible `/chat/completions`
//! endpoint (Gemini's OpenAI surface, OpenAI itself, Ollama, vLLM, ...).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatTransport;
