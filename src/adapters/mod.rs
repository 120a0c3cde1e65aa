// Adapters layer: concrete implementations of the domain ports.

pub mod llm;
pub mod speech;

pub use llm::HttpAdvisoryClient;
pub use speech::CommandSpeechRenderer;
