/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub qdrant_url: String,
    pub collection_name: String,
    pub data_dir: String,
    pub openai_model: String,
    pub top_k: usize,
    pub max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7880,
            qdrant_url: "http://localhost:6333".to_string(),
            collection_name: "financial_docs".to_string(),
            data_dir: "data".to_string(),
            openai_model: "gpt-4-turbo".to_string(),
            top_k: 3,
            max_tokens: 200,
        }
    }
}
