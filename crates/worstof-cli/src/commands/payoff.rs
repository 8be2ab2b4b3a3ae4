use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use worstof_core::payoff::payoff_curve;

use super::common::CertificateArgs;

/// Arguments for the redemption profile
#[derive(Args)]
pub struct PayoffArgs {
    #[command(flatten)]
    pub certificate: CertificateArgs,

    /// Lowest worst-of performance to sample, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub from: Option<Decimal>,

    /// Highest worst-of performance to sample, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub to: Option<Decimal>,

    /// Number of samples, endpoints included
    #[arg(long)]
    pub points: Option<usize>,
}

pub fn run_payoff(args: PayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.certificate.resolve()?;
    let mut domain = config.payoff_domain;
    if let Some(from) = args.from {
        domain.start = from;
    }
    if let Some(to) = args.to {
        domain.end = to;
    }
    if let Some(points) = args.points {
        domain.points = points;
    }

    let curve = payoff_curve(&config.barrier, &domain)?;
    Ok(serde_json::to_value(curve.points)?)
}
