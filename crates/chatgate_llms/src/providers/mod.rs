pub mod anthropic;
pub mod cohere;
pub mod gemini;
pub mod ollama;

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use gemini::GeminiAdapter;
pub use ollama::OllamaAdapter;
