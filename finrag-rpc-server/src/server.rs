use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use finrag_agents::{BrokerAgent, BrokerConfig, OpenAiChatModel, OpenAiConfig, RagEngine, RagEngineConfig};
use finrag_data_services::{FastembedEmbedder, MarketDataStore, QdrantVectorStore};

use crate::config::ServerConfig;
use crate::error::RpcError;
use crate::handler::QaHandler;
use crate::protocol::*;

/// JSON-RPC server for financial QA and broker recommendations
pub struct RpcServer {
    config: ServerConfig,
    handler: Arc<QaHandler>,
}

impl RpcServer {
    /// Create a new RPC server, wiring up all pipeline components
    pub async fn new(config: ServerConfig) -> Result<Self> {
        tracing::info!("Initializing pipeline components...");

        let embedder = Arc::new(
            FastembedEmbedder::new().context("Failed to load embedding model")?,
        );

        let index = Arc::new(
            QdrantVectorStore::new(&config.qdrant_url, config.collection_name.clone())
                .await
                .context("Failed to connect to Qdrant")?,
        );

        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        let model = Arc::new(
            OpenAiChatModel::new(
                OpenAiConfig {
                    model: config.openai_model.clone(),
                    ..Default::default()
                },
                api_key,
            )
            .context("Failed to initialize OpenAI client")?,
        );

        let engine = Arc::new(RagEngine::new(
            embedder,
            index,
            model,
            RagEngineConfig {
                top_k: config.top_k,
                max_tokens: config.max_tokens,
            },
        ));

        let store = Arc::new(MarketDataStore::new(&config.data_dir));
        let broker = BrokerAgent::new(Arc::clone(&store), BrokerConfig::default());

        let handler = Arc::new(QaHandler::new(engine, broker, store));

        tracing::info!("Pipeline components initialized successfully");

        Ok(Self { config, handler })
    }

    /// Start the server and handle connections
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .context(format!("Failed to bind to {}", addr))?;

        tracing::info!("Financial QA JSON-RPC Server listening on {}", addr);
        tracing::info!("Ready to accept connections");

        loop {
            match listener.accept().await {
                Ok((socket, addr)) => {
                    tracing::debug!("New connection from {}", addr);
                    let handler = Arc::clone(&self.handler);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(socket, handler).await {
                            tracing::error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// Handle a single TCP connection
async fn handle_connection(mut socket: TcpStream, handler: Arc<QaHandler>) -> Result<()> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // Connection closed
            break;
        }

        tracing::debug!("Received request: {}", line.trim());

        let response = process_request(&line, &handler).await;

        let response_json = serde_json::to_string(&response)?;
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        tracing::debug!("Sent response");
    }

    Ok(())
}

/// Process a JSON-RPC request
async fn process_request(line: &str, handler: &QaHandler) -> Value {
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            return serde_json::to_value(JsonRpcError {
                jsonrpc: "2.0".to_string(),
                id: None,
                error: ErrorObject {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                },
            })
            .unwrap();
        }
    };

    if request.jsonrpc != "2.0" {
        return create_error_response(
            request.id,
            RpcError::InvalidRequest("JSON-RPC version must be 2.0".to_string()),
        );
    }

    let id = request.id.clone();
    let result = match request.method.as_str() {
        "qa.answer" => match parse_params::<QaRequest>(request.params) {
            Ok(params) => handler
                .handle_answer(params)
                .await
                .and_then(|r| to_value(&r)),
            Err(e) => Err(e),
        },
        "qa.answer_debug" => match parse_params::<QaRequest>(request.params) {
            Ok(params) => handler
                .handle_answer_debug(params)
                .await
                .and_then(|r| to_value(&r)),
            Err(e) => Err(e),
        },
        "broker.best_symbol" => match parse_params::<BrokerRequest>(request.params) {
            Ok(params) => handler.handle_best_symbol(params).and_then(|r| to_value(&r)),
            Err(e) => Err(e),
        },
        "market.data_info" => to_value(&handler.handle_data_info()),
        _ => Err(RpcError::MethodNotFound(request.method.clone())),
    };

    match result {
        Ok(value) => serde_json::to_value(JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: value,
        })
        .unwrap(),
        Err(e) => create_error_response(id, e),
    }
}

/// Deserialize method params, treating missing params as invalid
fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::InvalidParams("Missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(format!("Invalid params: {}", e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::InternalError(e.to_string()))
}

/// Create an error response
fn create_error_response(id: Option<Value>, error: RpcError) -> Value {
    serde_json::to_value(JsonRpcError {
        jsonrpc: "2.0".to_string(),
        id,
        error: ErrorObject {
            code: error.code(),
            message: error.to_string(),
            data: error.data(),
        },
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_response() {
        let error = RpcError::MethodNotFound("qa.unknown".to_string());
        let response = create_error_response(Some(Value::from(1)), error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Method not found"));
        assert!(json.contains("-32601"));
    }

    #[test]
    fn test_parse_params_missing() {
        let err = parse_params::<QaRequest>(None).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams(_)));
    }

    #[test]
    fn test_parse_params_qa_request() {
        let params = serde_json::json!({"question": "What is RSI?"});
        let req: QaRequest = parse_params(Some(params)).unwrap();
        assert_eq!(req.question, "What is RSI?");
        assert_eq!(req.top_k, 3);
    }
}
