pub mod structuring; // AI gateway: prompts, Ollama client, assistant
pub mod summary; // Summary response parser
