//! Error handling for the Gitter client.
//!
//! Transport adapters report [`HttpError`](crate::traits::HttpError); everything
//! above them speaks [`ApiError`], which maps onto the failure kinds a caller
//! needs to tell apart:
//!
//! | Variant | Meaning | Category |
//! |---------|---------|----------|
//! | `Connection` | DNS, TCP, TLS, premature close | Network |
//! | `Timeout` | discrete request too slow | Network |
//! | `HttpStatus` | non-2xx answer (401/403 are auth errors) | Auth / Client / Server |
//! | `Decode` | body or frame is not the expected JSON | Protocol |
//! | `InvalidUrl` | URL could not be built | Client |

mod api_error;
mod category;
mod result;

pub use api_error::ApiError;
pub use category::ErrorCategory;
pub use result::ApiResult;
