mod broker;
mod financial;
mod stock;

pub use broker::{BrokerAgent, BrokerConfig};
pub use financial::FinancialRagAgent;
pub use stock::StockAgent;
