use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::simulation::random::RandomSource;
use crate::types::{safe_pct, Money, Rate};
use crate::ProjectFinanceResult;

/// A synthetic work item. Immutable once built; construct through [`Project::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub client: String,
    pub duration_days: u32,
    pub amount: Money,
    pub profit: Money,
    /// `100 * profit / amount` to one decimal; zero when `amount` is zero.
    pub margin_pct: Decimal,
}

impl Project {
    /// Build a project from an already-drawn margin fraction (0.25 = 25%).
    /// Profit is rounded to a whole currency unit.
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        duration_days: u32,
        amount: Money,
        margin_fraction: Rate,
    ) -> ProjectFinanceResult<Self> {
        if duration_days == 0 {
            return Err(ProjectFinanceError::InvalidInput {
                field: "duration_days".into(),
                reason: "Duration must be at least one day".into(),
            });
        }
        if amount < Decimal::ZERO {
            return Err(ProjectFinanceError::InvalidInput {
                field: "amount".into(),
                reason: "Amount cannot be negative".into(),
            });
        }
        let margin = Decimal::from_f64(margin_fraction)
            .filter(|m| (Decimal::ZERO..=Decimal::ONE).contains(m))
            .ok_or_else(|| ProjectFinanceError::InvalidInput {
                field: "margin_fraction".into(),
                reason: format!("Margin {margin_fraction} must lie in [0, 1]"),
            })?;

        let profit = (amount * margin).round();
        let margin_pct = safe_pct(profit, amount).round_dp(1);

        Ok(Self {
            name: name.into(),
            client: client.into(),
            duration_days,
            amount,
            profit,
            margin_pct,
        })
    }
}

/// Range the per-project profit margin is drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConfig {
    pub min_fraction: Rate,
    pub max_fraction: Rate,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            min_fraction: 0.20,
            max_fraction: 0.35,
        }
    }
}

pub fn draw_margin(rng: &mut impl RandomSource, cfg: &MarginConfig) -> Rate {
    rng.uniform(cfg.min_fraction, cfg.max_fraction)
}

pub const PROJECT_TEMPLATES: &[&str] = &[
    "Hydraulic brake unit repair",
    "Mill hydraulic system maintenance",
    "Hoisting manifold fabrication",
    "30T hydraulic jack repair",
    "Industrial hydraulic press maintenance",
    "Valve bank diagnosis and bench test",
    "Cooling hydraulic pump repair",
    "Mobile hydraulic power unit maintenance",
    "Hydraulic unit supply",
    "Lubrication truck repair",
];

pub const CLIENT_TYPES: &[&str] = &[
    "Minera",
    "Constructora",
    "Transporte",
    "Cementos",
    "Maestro Perú",
    "Metalurgia",
    "Cosapi",
    "Haug",
    "Aurífera",
    "Pesado Cruz",
];

pub const COMPANIES: &[&str] = &[
    "Colquiria S.A.",
    "San José S.A.",
    "Cruz del Sur",
    "Pacasmayo S.A.A.",
    "Minería S.A.C",
    "Perú S.A.",
    "Retamas S.A.",
    "S.A.",
    "& Servicios EIRL",
    "Sucursal Zárate",
    "SAG",
    "Industrial",
];

/// Draw a project name and a `"<client type> <company>"` client label.
pub fn draw_identity(rng: &mut impl RandomSource) -> (String, String) {
    let name = PROJECT_TEMPLATES[rng.pick_index(PROJECT_TEMPLATES.len())];
    let client_type = CLIENT_TYPES[rng.pick_index(CLIENT_TYPES.len())];
    let company = COMPANIES[rng.pick_index(COMPANIES.len())];
    (name.to_string(), format!("{client_type} {company}"))
}
