use {serde::Serialize, std::collections::BTreeSet};

/// Symbols the user starred. Lives for the session only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Favorites(BTreeSet<String>);

impl Favorites {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Adds the symbol if absent, removes it otherwise. Returns whether it is
    /// a favorite afterwards.
    pub fn toggle(&mut self, symbol: &str) -> bool {
        if self.0.remove(symbol) {
            return false;
        }

        self.0.insert(symbol.to_string());

        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_set() {
        let original = Favorites::new(["HFV", "BTC"]);
        let mut favorites = original.clone();

        assert!(favorites.toggle("ETH"));
        assert!(favorites.contains("ETH"));
        assert!(!favorites.toggle("ETH"));
        assert_eq!(favorites, original);

        assert!(!favorites.toggle("BTC"));
        assert!(favorites.toggle("BTC"));
        assert_eq!(favorites, original);
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        let mut favorites = Favorites::default();

        favorites.toggle("btc");

        assert!(!favorites.contains("BTC"));
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec!["btc"]);
    }
}
