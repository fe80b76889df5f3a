//! News sentiment port trait.
//!
//! Implementations wrap whatever produces the score (a search API plus a
//! language-model call, a file written by such a pipeline). Any network work
//! happens inside the implementation; the domain only sees the result.

use crate::domain::error::CopilotError;
use crate::domain::sentiment::SentimentScore;

pub trait SentimentPort {
    /// `Ok(None)` when the source has nothing for `symbol`.
    fn sentiment_for(&self, symbol: &str) -> Result<Option<SentimentScore>, CopilotError>;
}
