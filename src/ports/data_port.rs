//! Price data port trait.

use crate::domain::error::CopilotError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// All bars known for `symbol`, oldest first. Unknown symbols are `NoData`.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, CopilotError>;

    fn list_symbols(&self) -> Result<Vec<String>, CopilotError>;
}
