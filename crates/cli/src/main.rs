use amberdata_client::{ApiResponse, DerivativesClient};
use amberdata_core::{
    DateParam, Endpoint, QueryParams, Settings, TimeFormat, TimeInterval, API_KEY_ENV,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "amberdata")]
#[command(about = "Query Amberdata derivatives analytics and print the JSON response")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Path to a TOML settings file (api_key, base_url, time_format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API root URL
    #[arg(long)]
    base_url: Option<String>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Active instruments, optionally filtered
    Instruments {
        /// Exchange (e.g. deribit, okex, bybit)
        #[arg(short, long)]
        exchange: Option<String>,

        /// Underlying currency (e.g. BTC, SOL_USDC)
        #[arg(long)]
        currency: Option<String>,

        /// C or P
        #[arg(long)]
        put_call: Option<String>,

        #[arg(long)]
        strike: Option<i64>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Forward volatility term structure
    TermStructures {
        #[arg(value_enum)]
        maturity: Maturity,

        #[arg(short, long)]
        exchange: String,

        #[arg(long)]
        currency: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Level 1 option chain quotes
    #[command(name = "level1-quotes")]
    Level1Quotes {
        #[arg(short, long)]
        exchange: String,

        #[arg(long)]
        currency: String,

        /// Instrument name (e.g. BTC-26APR24-100000-C)
        #[arg(short, long)]
        instrument: Option<String>,

        /// Only at-the-money options
        #[arg(long)]
        is_atm: Option<bool>,

        /// C or P
        #[arg(long)]
        put_call: Option<String>,

        #[arg(long)]
        strike: Option<i64>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Option delta surface
    DeltaSurfaces {
        #[arg(value_enum)]
        maturity: Maturity,

        #[arg(short, long)]
        exchange: String,

        #[arg(long)]
        currency: String,

        #[arg(long)]
        days_to_expiration_start: Option<u32>,

        #[arg(long)]
        days_to_expiration_end: Option<u32>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Futures/perpetuals traded volume
    FuturesVolumes {
        /// Underlying asset (e.g. BTC)
        #[arg(short, long)]
        asset: String,

        /// Bucket size (e.g. 12h, 7d)
        #[arg(long)]
        time_frame: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Futures/perpetuals cumulated realized funding rates
    FundingRatesCumulated {
        /// Underlying asset (e.g. BTC)
        #[arg(short, long)]
        asset: String,

        /// coins or stables
        #[arg(short, long)]
        margin_type: String,

        #[arg(long)]
        time_frame: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List endpoints and their required parameters
    Endpoints,
}

#[derive(Clone, Copy, ValueEnum)]
enum Maturity {
    /// Exchange-listed expirations
    Floating,
    /// Constant maturities
    Constant,
}

/// Optional parameters shared by every lookup.
#[derive(Args, Default)]
struct CommonArgs {
    /// Point in time (Unix seconds, Unix milliseconds, or ISO-8601)
    #[arg(long)]
    timestamp: Option<DateParam>,

    /// Range start (Unix seconds, Unix milliseconds, or ISO-8601)
    #[arg(long)]
    start_date: Option<DateParam>,

    /// Range end (Unix seconds, Unix milliseconds, or ISO-8601)
    #[arg(long)]
    end_date: Option<DateParam>,

    /// milliseconds, ms, iso, iso8601, or hr
    #[arg(long)]
    time_format: Option<TimeFormat>,

    /// minute, hour, or day
    #[arg(long)]
    time_interval: Option<TimeInterval>,

    /// Extra query parameter, repeatable (e.g. -p timeFrame=12h)
    #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,
}

impl CommonArgs {
    /// Append the shared options to `params`, then raw `-p` pairs.
    fn apply(self, mut params: QueryParams, default_time_format: Option<TimeFormat>) -> QueryParams {
        if let Some(ts) = self.timestamp {
            params = params.timestamp(ts);
        }
        if let Some(start) = self.start_date {
            params = params.start_date(start);
        }
        if let Some(end) = self.end_date {
            params = params.end_date(end);
        }
        if let Some(format) = self.time_format.or(default_time_format) {
            params = params.time_format(format);
        }
        if let Some(interval) = self.time_interval {
            params = params.time_interval(interval);
        }
        for (key, value) in self.params {
            params.insert(key, value);
        }
        params
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn with_opt<T: ToString>(params: QueryParams, key: &str, value: Option<T>) -> QueryParams {
    match value {
        Some(v) => params.with(key, v),
        None => params,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Endpoints = cli.command {
        println!("Available endpoints:");
        for endpoint in Endpoint::ALL {
            let required = endpoint.required_params();
            println!(
                "  {:<55} required: {}",
                endpoint.path(),
                if required.is_empty() {
                    "-".to_string()
                } else {
                    required.join(", ")
                }
            );
        }
        return Ok(());
    }

    let file_settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let settings = file_settings.overlay(Settings {
        api_key: cli.api_key.clone(),
        base_url: cli.base_url.clone(),
        time_format: None,
    });
    tracing::debug!(settings = ?settings, "Resolved settings");

    let client = DerivativesClient::with_config(settings.client_config()?)?;
    let body = run_command(&client, cli.command, settings.time_format).await?;

    if cli.compact {
        println!("{}", serde_json::to_string(&body)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&body)?);
    }

    let response = ApiResponse::new(&body);
    if response.is_error() {
        anyhow::bail!(
            "Request failed with status {}: {}",
            response
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            response.description().unwrap_or("no description")
        );
    }
    tracing::info!(rows = response.len(), "Request complete");

    Ok(())
}

async fn run_command(
    client: &DerivativesClient,
    command: Commands,
    default_time_format: Option<TimeFormat>,
) -> Result<Value> {
    let body = match command {
        Commands::Instruments {
            exchange,
            currency,
            put_call,
            strike,
            common,
        } => {
            let params = with_opt(QueryParams::new(), "exchange", exchange);
            let params = with_opt(params, "currency", currency);
            let params = with_opt(params, "putCall", put_call);
            let params = with_opt(params, "strike", strike);
            client
                .get_instrument_information(common.apply(params, default_time_format))
                .await?
        }
        Commands::TermStructures {
            maturity,
            exchange,
            currency,
            common,
        } => {
            let extra = common.apply(QueryParams::new(), default_time_format);
            match maturity {
                Maturity::Floating => {
                    client
                        .get_term_structures_floating(&exchange, &currency, extra)
                        .await?
                }
                Maturity::Constant => {
                    client
                        .get_term_structures_constant(&exchange, &currency, extra)
                        .await?
                }
            }
        }
        Commands::Level1Quotes {
            exchange,
            currency,
            instrument,
            is_atm,
            put_call,
            strike,
            common,
        } => {
            let mut params = with_opt(QueryParams::new(), "instrument", instrument);
            if let Some(atm) = is_atm {
                params = params.is_atm(atm);
            }
            let params = with_opt(params, "putCall", put_call);
            let params = with_opt(params, "strike", strike);
            client
                .get_level_1_quotes(
                    &exchange,
                    &currency,
                    common.apply(params, default_time_format),
                )
                .await?
        }
        Commands::DeltaSurfaces {
            maturity,
            exchange,
            currency,
            days_to_expiration_start,
            days_to_expiration_end,
            common,
        } => {
            let params = with_opt(
                QueryParams::new(),
                "daysToExpirationStart",
                days_to_expiration_start,
            );
            let params = with_opt(params, "daysToExpirationEnd", days_to_expiration_end);
            let extra = common.apply(params, default_time_format);
            match maturity {
                Maturity::Floating => {
                    client
                        .get_delta_surfaces_floating(&exchange, &currency, extra)
                        .await?
                }
                Maturity::Constant => {
                    client
                        .get_delta_surfaces_constant(&exchange, &currency, extra)
                        .await?
                }
            }
        }
        Commands::FuturesVolumes {
            asset,
            time_frame,
            common,
        } => {
            let params = with_opt(QueryParams::new(), "timeFrame", time_frame);
            client
                .get_futures_perpetuals_volumes(&asset, common.apply(params, default_time_format))
                .await?
        }
        Commands::FundingRatesCumulated {
            asset,
            margin_type,
            time_frame,
            common,
        } => {
            let params = with_opt(QueryParams::new(), "timeFrame", time_frame);
            client
                .get_futures_perpetuals_realized_funding_rates_cumulated(
                    &asset,
                    &margin_type,
                    common.apply(params, default_time_format),
                )
                .await?
        }
        Commands::Endpoints => unreachable!("handled before the client is built"),
    };

    Ok(body)
}
