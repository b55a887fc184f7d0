//! Handler chain result type.

/// Handler result for the chain. `Reply(text)` carries the delivered text so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach the text that was sent.
    Reply(String),
}

impl HandlerResponse {
    /// Variant name without the reply text.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerResponse::Continue => "continue",
            HandlerResponse::Stop => "stop",
            HandlerResponse::Ignore => "ignore",
            HandlerResponse::Reply(_) => "reply",
        }
    }

    /// Length in chars of the reply text, if any.
    pub fn reply_len(&self) -> Option<usize> {
        match self {
            HandlerResponse::Reply(text) => Some(text.chars().count()),
            _ => None,
        }
    }
}
