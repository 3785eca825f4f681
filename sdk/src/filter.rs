use crate::models::MarketQuote;

/// Narrows a fetched listing to the assets whose `"{name} {symbol}"` contains
/// `query`, ignoring case. An empty query keeps everything. Never fetches.
pub fn filter_quotes<'a>(quotes: &'a [MarketQuote], query: &str) -> Vec<&'a MarketQuote> {
    if query.is_empty() {
        return quotes.iter().collect();
    }

    let needle = query.to_lowercase();

    quotes
        .iter()
        .filter(|quote| {
            format!("{} {}", quote.name, quote.symbol)
                .to_lowercase()
                .contains(&needle)
        })
        .collect()
}
