mod model;
mod openai;

pub use model::{Generation, LanguageModel};
pub use openai::{OpenAiChatModel, OpenAiConfig};
