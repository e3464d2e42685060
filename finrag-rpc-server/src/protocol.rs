use finrag_core::{BrokerRecommendation, MarketInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 Success Response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub result: Value,
}

/// JSON-RPC 2.0 Error Response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub error: ErrorObject,
}

/// JSON-RPC Error Object
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Custom error codes
pub const EMBEDDING_ERROR: i32 = -32001;
pub const GENERATION_ERROR: i32 = -32002;
pub const VECTOR_STORE_ERROR: i32 = -32003;
pub const NO_MARKET_DATA: i32 = -32004;

/// Parameters for qa.answer and qa.answer_debug
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

/// Result of qa.answer
#[derive(Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
}

/// Parameters for broker.best_symbol
#[derive(Debug, Deserialize)]
pub struct BrokerRequest {
    pub market: String,
}

/// Result of broker.best_symbol
#[derive(Debug, Serialize)]
pub struct BrokerAnswer {
    pub agent: String,
    pub answer: String,
    pub recommendation: BrokerRecommendation,
}

/// Result of market.data_info
#[derive(Debug, Serialize)]
pub struct DataInfoResponse {
    pub markets: Vec<MarketInfo>,
}
