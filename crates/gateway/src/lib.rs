#![forbid(unsafe_code)]

pub mod http;
pub mod memory;
pub mod port;

pub use http::{HttpGateway, HttpGatewayConfig};
pub use memory::InMemoryGateway;
pub use port::{ChatMessage, ChatRequest, ChatRole, GatewayError, QuizGateway};
