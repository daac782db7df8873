//! # Services
//!
//! The request path: a single-worker executor, the request task it runs,
//! and the transport the task talks through.

pub mod error;
pub mod executor;
pub mod http;
pub mod mock;
pub mod request_task;

pub use error::RequestError;
pub use executor::{RequestContext, RequestExecutor, RequestHandle};
pub use http::{BoardRequest, BoardTransport, HttpTransport, TransportResponse};
pub use mock::{MockReply, MockTransport, RecordedRequest};
pub use request_task::{OutgoingMessage, Outbox, RequestTask};
