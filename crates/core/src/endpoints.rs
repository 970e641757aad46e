use std::fmt;

/// Root of every derivatives analytics resource path.
const ANALYTICS_ROOT: &str = "markets/derivatives/analytics";

/// A derivatives analytics resource exposed by the REST API.
///
/// Each variant maps to exactly one fixed resource path. The path is relative
/// to the client's base URL and carries no leading slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    InstrumentInformation,
    TermStructuresFloating,
    TermStructuresConstant,
    Level1Quotes,
    DeltaSurfacesConstant,
    DeltaSurfacesFloating,
    FuturesPerpetualsVolumes,
    FuturesPerpetualsRealizedFundingRatesCumulated,
}

impl Endpoint {
    /// Every endpoint, in documentation order.
    pub const ALL: [Endpoint; 8] = [
        Endpoint::InstrumentInformation,
        Endpoint::TermStructuresFloating,
        Endpoint::TermStructuresConstant,
        Endpoint::Level1Quotes,
        Endpoint::DeltaSurfacesConstant,
        Endpoint::DeltaSurfacesFloating,
        Endpoint::FuturesPerpetualsVolumes,
        Endpoint::FuturesPerpetualsRealizedFundingRatesCumulated,
    ];

    /// The resource segment below the analytics root.
    fn suffix(&self) -> &'static str {
        match self {
            Endpoint::InstrumentInformation => "instruments/information",
            Endpoint::TermStructuresFloating => "term-structures/forward-volatility/floating",
            Endpoint::TermStructuresConstant => "term-structures/forward-volatility/constant",
            Endpoint::Level1Quotes => "level-1-quotes",
            Endpoint::DeltaSurfacesConstant => "delta-surfaces/constant",
            Endpoint::DeltaSurfacesFloating => "delta-surfaces/floating",
            Endpoint::FuturesPerpetualsVolumes => "futures-perpetuals/volumes",
            Endpoint::FuturesPerpetualsRealizedFundingRatesCumulated => {
                "futures-perpetuals/realized-funding-rates-cumulated"
            }
        }
    }

    /// Full resource path, e.g. `markets/derivatives/analytics/level-1-quotes`.
    pub fn path(&self) -> String {
        format!("{}/{}", ANALYTICS_ROOT, self.suffix())
    }

    /// Names of the parameters the wrapper for this endpoint requires.
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Endpoint::InstrumentInformation => &[],
            Endpoint::FuturesPerpetualsVolumes => &["asset"],
            Endpoint::FuturesPerpetualsRealizedFundingRatesCumulated => &["asset", "marginType"],
            _ => &["exchange", "currency"],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
