pub mod quotes;

pub use quotes::{QuoteSource, TickerFetch, YahooQuoteSource};
