pub mod caller;
pub mod request_id;

pub use caller::{require_caller, Caller, CALLER_HEADER};
pub use request_id::{request_id_middleware, request_span, RequestId, REQUEST_ID_HEADER};
