//! Response handling policy consulted by the gateway after every response.

use std::fmt;

use reqwest::StatusCode;

/// What the gateway should do with a response it just received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecision {
    /// Send the same request again.
    Retry,
    /// Drop the stored credentials, then surface the response as an error.
    ClearSession,
    /// Hand the response to the caller untouched.
    PassThrough,
}

/// Decides how a response status is handled. Implementations must bound
/// retries themselves using `attempt`, which starts at 1.
pub trait ResponsePolicy: Send + Sync + fmt::Debug {
    /// Decision for a response with `status` on the given attempt.
    fn decide(&self, status: StatusCode, attempt: u32) -> ResponseDecision;
}

/// Default policy: a 401 clears the session, nothing is ever retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthorizedPolicy;

impl ResponsePolicy for UnauthorizedPolicy {
    fn decide(&self, status: StatusCode, _attempt: u32) -> ResponseDecision {
        if status == StatusCode::UNAUTHORIZED {
            ResponseDecision::ClearSession
        } else {
            ResponseDecision::PassThrough
        }
    }
}
