//! Core Infrastructure
//!
//! HTTP transport shared by the token provider and the request dispatcher.

pub mod transport;

pub use transport::{
    create_transport, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, MockHttpTransport, ReqwestHttpTransport, DEFAULT_MAX_RESPONSE_SIZE,
};
