//! `rate-quote`: prints price-ordered shipping quotes as JSON.
//!
//! ```text
//! rate-quote --from "US,CA,Beverly Hills,90210" --to "US,WA,Seattle,98101" \
//!     --weight 12 --dims 15x10x4.5 --units imperial --carrier UPS
//! rate-quote --request shipment.json
//! ```

use anyhow::{Context, bail};
use clap::Parser;
use shipping_rates::application::{RateError, RateShoppingService};
use shipping_rates::config::AppConfig;
use shipping_rates::domain::entities::RateRequest;
use shipping_rates::domain::value_objects::{CarrierId, Location, Package, Supplied, UnitSystem};
use shipping_rates::infrastructure::carriers::build_registry;
use shipping_rates::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "rate-quote")]
#[command(author, version, about = "Compare shipping rates across carriers")]
struct Cli {
    /// Origin as COUNTRY,STATE,CITY,POSTAL_CODE
    #[arg(long, value_parser = parse_location)]
    from: Option<Location>,

    /// Destination as COUNTRY,STATE,CITY,POSTAL_CODE
    #[arg(long, value_parser = parse_location)]
    to: Option<Location>,

    /// Package weight
    #[arg(long)]
    weight: Option<f64>,

    /// Package dimensions as LENGTHxWIDTHxHEIGHT
    #[arg(long, value_parser = parse_dimensions)]
    dims: Option<[f64; 3]>,

    /// Unit system of weight and dimensions
    #[arg(long, default_value = "metric")]
    units: UnitSystem,

    /// Read the request from a JSON file with origin, destination and package
    #[arg(long, value_name = "PATH", conflicts_with_all = ["from", "to", "weight", "dims"])]
    request: Option<PathBuf>,

    /// Carrier to query; repeat for several. Defaults to every configured carrier
    #[arg(short, long = "carrier", value_name = "ID")]
    carriers: Vec<CarrierId>,

    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_location(value: &str) -> Result<Location, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [country, state, city, postal_code] => {
            Ok(Location::new(*country, *state, *city, *postal_code))
        }
        _ => Err(format!(
            "expected COUNTRY,STATE,CITY,POSTAL_CODE, got '{value}'"
        )),
    }
}

fn parse_dimensions(value: &str) -> Result<[f64; 3], String> {
    let parsed: Result<Vec<f64>, _> = value.split(['x', 'X']).map(|d| d.trim().parse()).collect();
    match parsed.as_deref() {
        Ok([length, width, height]) => Ok([*length, *width, *height]),
        _ => Err(format!("expected LENGTHxWIDTHxHEIGHT, got '{value}'")),
    }
}

impl Cli {
    fn rate_request(&self) -> anyhow::Result<RateRequest> {
        if let Some(path) = &self.request {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let document: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            return Ok(RateRequest::from_json(&document));
        }

        let package = match (self.weight, self.dims) {
            (Some(weight), Some(dims)) => Supplied::Value(
                Package::new(weight, dims, self.units).context("reading package measurements")?,
            ),
            _ => Supplied::Missing,
        };
        Ok(RateRequest::new(self.from.clone(), self.to.clone(), package))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    telemetry::init(&config.logging);

    let registry = build_registry(&config.carriers).context("building carrier clients")?;
    let service = RateShoppingService::new(Arc::new(registry));
    let request = cli.rate_request()?;

    let result = if cli.carriers.is_empty() {
        service.rates_from_registered(&request).await
    } else {
        service.rates_from_all(&request, &cli.carriers).await
    };

    match result {
        Ok(quotes) => {
            println!("{}", serde_json::to_string_pretty(&quotes)?);
            Ok(())
        }
        Err(RateError::Validation(err)) => {
            println!("{}", serde_json::to_string_pretty(err.report())?);
            bail!("{err}")
        }
        Err(err) => Err(err.into()),
    }
}
