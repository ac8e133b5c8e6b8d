use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a holding's price comes from.
///
/// Each variant maps to exactly one registered provider. Adding a new
/// upstream means adding a variant here and a provider implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Naver Finance item page (KRX listed stocks and ETFs), screen-scraped.
    Naver,
    /// Yahoo Finance v8 chart endpoint (US listings, indices, FX pairs).
    Yahoo,
}

impl QuoteSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Naver => "naver",
            QuoteSource::Yahoo => "yahoo",
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naver" => Ok(QuoteSource::Naver),
            "yahoo" => Ok(QuoteSource::Yahoo),
            other => Err(format!("unknown quote source '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_source_serde() {
        assert_eq!(serde_json::to_string(&QuoteSource::Naver).unwrap(), "\"naver\"");
        assert_eq!(
            serde_json::from_str::<QuoteSource>("\"yahoo\"").unwrap(),
            QuoteSource::Yahoo
        );
    }

    #[test]
    fn test_quote_source_from_str() {
        assert_eq!("NAVER".parse::<QuoteSource>().unwrap(), QuoteSource::Naver);
        assert_eq!(" yahoo ".parse::<QuoteSource>().unwrap(), QuoteSource::Yahoo);
        assert!("bloomberg".parse::<QuoteSource>().is_err());
    }
}
