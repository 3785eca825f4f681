use {
    crate::{
        currency::Currency,
        models::{CoinDetail, ExchangeListing, GlobalMetrics, MarketQuote},
        proxy_client::{ProxyClient, ProxyError},
    },
    std::{fmt::Debug, future::Future},
};

/// Something a [`crate::view::PollingView`] can fetch. `Key` is the set of
/// dependencies of one fetch; changing it is what invalidates results that are
/// still in flight.
pub trait ViewSource: Send + Sync + 'static {
    type Key: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Data: Clone + Debug + Send + Sync + 'static;

    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn fetch(&self, key: &Self::Key) -> impl Future<Output = Result<Self::Data, ProxyError>> + Send;
}

/// Top 100 assets by rank.
pub struct MarketsSource(pub ProxyClient);

impl ViewSource for MarketsSource {
    type Key = Currency;
    type Data = Vec<MarketQuote>;

    fn name(&self) -> &'static str {
        "markets"
    }

    async fn fetch(&self, currency: &Currency) -> Result<Vec<MarketQuote>, ProxyError> {
        self.0.markets(*currency).await
    }
}

pub struct GlobalSource(pub ProxyClient);

impl ViewSource for GlobalSource {
    type Key = Currency;
    type Data = GlobalMetrics;

    fn name(&self) -> &'static str {
        "global"
    }

    async fn fetch(&self, currency: &Currency) -> Result<GlobalMetrics, ProxyError> {
        self.0.global(*currency).await
    }
}

/// Exchange listing; it has no dependencies.
pub struct ExchangesSource(pub ProxyClient);

impl ViewSource for ExchangesSource {
    type Key = ();
    type Data = Vec<ExchangeListing>;

    fn name(&self) -> &'static str {
        "exchanges"
    }

    async fn fetch(&self, _: &()) -> Result<Vec<ExchangeListing>, ProxyError> {
        self.0.exchanges().await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinKey {
    pub symbol: String,
    pub currency: Currency,
}

pub struct CoinDetailSource(pub ProxyClient);

impl ViewSource for CoinDetailSource {
    type Key = CoinKey;
    type Data = CoinDetail;

    fn name(&self) -> &'static str {
        "coin"
    }

    async fn fetch(&self, key: &CoinKey) -> Result<CoinDetail, ProxyError> {
        self.0.coin(&key.symbol, key.currency).await
    }
}
