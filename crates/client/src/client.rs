use crate::dispatcher::RequestDispatcher;
use crate::error::ClientError;
use amberdata_core::{ClientConfig, Endpoint, QueryParams};
use serde_json::Value;

/// Client for the derivatives analytics endpoints.
///
/// Every lookup takes its required parameters as arguments plus an `extra`
/// bag of optional ones, forwarded verbatim. Required parameters always come
/// first on the wire, and an extra with the same name as a required one is
/// dropped rather than overriding it.
///
/// ```rust,no_run
/// use amberdata_client::{DerivativesClient, QueryParams, TimeFormat};
///
/// # async fn run() -> Result<(), amberdata_client::ClientError> {
/// let client = DerivativesClient::new("my-api-key")?;
/// let quotes = client
///     .get_level_1_quotes("deribit", "BTC", QueryParams::new().time_format(TimeFormat::Iso))
///     .await?;
/// println!("{}", quotes);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DerivativesClient {
    dispatcher: RequestDispatcher,
}

impl DerivativesClient {
    /// Client against the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            dispatcher: RequestDispatcher::new(config)?,
        })
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Query any endpoint with a prepared parameter set.
    pub async fn fetch(&self, endpoint: Endpoint, params: &QueryParams) -> Result<Value, ClientError> {
        self.dispatcher.get(&endpoint.path(), params).await
    }

    async fn request(
        &self,
        endpoint: Endpoint,
        mut required: QueryParams,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        required.merge(extra);
        self.fetch(endpoint, &required).await
    }

    fn exchange_currency(exchange: &str, currency: &str) -> QueryParams {
        QueryParams::new()
            .with("exchange", exchange)
            .with("currency", currency)
    }

    // -----------------------------------------------------------------------
    // Instruments
    // -----------------------------------------------------------------------

    /// Active instruments, optionally filtered by `exchange`, `currency`,
    /// `putCall`, `strike`, or viewed as of a past `timestamp`.
    pub async fn get_instrument_information(&self, extra: QueryParams) -> Result<Value, ClientError> {
        self.request(Endpoint::InstrumentInformation, QueryParams::new(), extra)
            .await
    }

    // -----------------------------------------------------------------------
    // Term Structures
    // -----------------------------------------------------------------------

    #[deprecated(note = "use `get_term_structures_floating` instead")]
    pub async fn get_term_structure_floating(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.get_term_structures_floating(exchange, currency, extra)
            .await
    }

    /// Forward volatility term structure over exchange-listed expirations.
    pub async fn get_term_structures_floating(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::TermStructuresFloating,
            Self::exchange_currency(exchange, currency),
            extra,
        )
        .await
    }

    #[deprecated(note = "use `get_term_structures_constant` instead")]
    pub async fn get_term_structure_constant(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.get_term_structures_constant(exchange, currency, extra)
            .await
    }

    /// Forward volatility term structure over constant maturities.
    pub async fn get_term_structures_constant(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::TermStructuresConstant,
            Self::exchange_currency(exchange, currency),
            extra,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Level 1 Quotes
    // -----------------------------------------------------------------------

    #[deprecated(note = "use `get_level_1_quotes` instead")]
    pub async fn get_tickers(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.get_level_1_quotes(exchange, currency, extra).await
    }

    /// Level 1 option chain with volatilities, greeks and underlying prices.
    ///
    /// Returns the first observation per instrument per `timeInterval`
    /// (minute, hour or day). Without a date range the latest chain is
    /// returned; historical ranges are capped at 60 minutes or 24 hours per
    /// call by the service.
    pub async fn get_level_1_quotes(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::Level1Quotes,
            Self::exchange_currency(exchange, currency),
            extra,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Delta Surfaces
    // -----------------------------------------------------------------------

    /// Option delta surface with constant maturities.
    ///
    /// The service caps ranges at 1 year of daily, 90 days of hourly or 1 hour
    /// of minutely data per call.
    pub async fn get_delta_surfaces_constant(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::DeltaSurfacesConstant,
            Self::exchange_currency(exchange, currency),
            extra,
        )
        .await
    }

    /// Option delta surface over exchange-listed expirations.
    pub async fn get_delta_surfaces_floating(
        &self,
        exchange: &str,
        currency: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::DeltaSurfacesFloating,
            Self::exchange_currency(exchange, currency),
            extra,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Futures & Perpetuals
    // -----------------------------------------------------------------------

    /// Traded volume per underlying, bucketed by `timeFrame` (e.g. `12h`, `7d`).
    pub async fn get_futures_perpetuals_volumes(
        &self,
        asset: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::FuturesPerpetualsVolumes,
            QueryParams::new().with("asset", asset),
            extra,
        )
        .await
    }

    /// Cumulated realized funding rates, split by margin type
    /// (`coins` or `stables`).
    pub async fn get_futures_perpetuals_realized_funding_rates_cumulated(
        &self,
        asset: &str,
        margin_type: &str,
        extra: QueryParams,
    ) -> Result<Value, ClientError> {
        self.request(
            Endpoint::FuturesPerpetualsRealizedFundingRatesCumulated,
            QueryParams::new()
                .with("asset", asset)
                .with("marginType", margin_type),
            extra,
        )
        .await
    }
}
