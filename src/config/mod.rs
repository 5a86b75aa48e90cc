use std::path::PathBuf;

/// Static definition of one tracked market instrument.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    pub symbol: String,
    pub pretty: String,
    pub seed: f64,
}

impl TickerConfig {
    pub fn new(symbol: &str, pretty: &str, seed: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            pretty: pretty.to_string(),
            seed,
        }
    }
}

/// Everything the markets pipeline needs for one run: the instrument set,
/// the snapshot location, and how many fresh prices justify a rewrite.
#[derive(Debug, Clone)]
pub struct MarketsConfig {
    pub tickers: Vec<TickerConfig>,
    pub snapshot_path: PathBuf,
    pub fresh_quorum: usize,
}

impl MarketsConfig {
    pub fn builtin() -> Self {
        let tickers = vec![
            TickerConfig::new("^NSEI", "NSE Nifty", 22000.00),
            TickerConfig::new("GC=F", "Gold", 2000.00),
            TickerConfig::new("CL=F", "Crude Oil", 62.24),
            TickerConfig::new("USDINR=X", "USD/INR", 91.56),
        ];
        let fresh_quorum = majority_quorum(tickers.len());

        Self {
            tickers,
            snapshot_path: PathBuf::from("public/markets.json"),
            fresh_quorum,
        }
    }
}

/// Majority-plus-one of the ticker count; 3 for the builtin set of 4.
pub fn majority_quorum(ticker_count: usize) -> usize {
    ticker_count / 2 + 1
}

/// One stacked bar on the leaderboard. Identity is positional; the shares
/// are percentages expected to sum to roughly 100.
#[derive(Debug, Clone)]
pub struct OutletSeries {
    pub name: String,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    pub article_count: u32,
    pub logo_path: Option<PathBuf>,
}

impl OutletSeries {
    fn new(name: &str, positive: f64, neutral: f64, negative: f64, count: u32, logo: &str) -> Self {
        Self {
            name: name.to_string(),
            positive_pct: positive,
            neutral_pct: neutral,
            negative_pct: negative,
            article_count: count,
            logo_path: Some(PathBuf::from(logo)),
        }
    }
}

/// Fixed sentiment colour mapping, kept in sync with the site styling.
#[derive(Debug, Clone, Copy)]
pub struct SentimentPalette {
    pub positive: (u8, u8, u8),
    pub neutral: (u8, u8, u8),
    pub negative: (u8, u8, u8),
}

impl SentimentPalette {
    pub fn builtin() -> Self {
        Self {
            positive: (0x2e, 0xcc, 0x71),
            neutral: (0xbd, 0xc3, 0xc7),
            negative: (0xe7, 0x4c, 0x3c),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub outlets: Vec<OutletSeries>,
    pub palette: SentimentPalette,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl LeaderboardConfig {
    pub fn builtin() -> Self {
        let outlets = vec![
            OutletSeries::new("The Hindu", 46.0, 39.0, 15.0, 32, "logos/thehindu.png"),
            OutletSeries::new("NDTV", 38.0, 45.0, 17.0, 28, "logos/ndtv.png"),
            OutletSeries::new("India Today", 34.0, 48.0, 18.0, 24, "logos/indiatoday.png"),
            OutletSeries::new("News18", 22.0, 60.0, 18.0, 20, "logos/news18.png"),
            OutletSeries::new("Mint", 41.0, 42.0, 17.0, 18, "logos/mint.png"),
            OutletSeries::new("HT", 29.0, 53.0, 18.0, 22, "logos/hindustantimes.png"),
            OutletSeries::new("TOI", 33.0, 51.0, 16.0, 26, "logos/toi.png"),
            OutletSeries::new("IE", 28.0, 55.0, 17.0, 19, "logos/indianexpress.png"),
        ];

        Self {
            outlets,
            palette: SentimentPalette::builtin(),
            output_path: PathBuf::from("leaderboard_with_logos.png"),
            width: 2000,
            height: 1200,
        }
    }
}
