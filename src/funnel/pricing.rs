use crate::config;

pub const EARLY_BIRD_PRICE: u32 = 297;
pub const STANDARD_PRICE: u32 = 397;
pub const EARLY_BIRD_SAVINGS: u32 = STANDARD_PRICE - EARLY_BIRD_PRICE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceTier {
    EarlyBird,
    Standard,
}

impl PriceTier {
    pub fn amount(self) -> u32 {
        match self {
            PriceTier::EarlyBird => EARLY_BIRD_PRICE,
            PriceTier::Standard => STANDARD_PRICE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceTier::EarlyBird => "Early Bird Price",
            PriceTier::Standard => "Regular Price",
        }
    }
}

pub fn tier(expired: bool) -> PriceTier {
    if expired {
        PriceTier::Standard
    } else {
        PriceTier::EarlyBird
    }
}

/// Course price in whole dollars for the current countdown state.
pub fn price(expired: bool) -> u32 {
    tier(expired).amount()
}

/// A purchasable seat as the payment provider knows it.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: &'static str,
    pub price_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Whole dollars.
    pub price: u32,
    pub currency: &'static str,
}

impl Product {
    pub fn for_tier(tier: PriceTier) -> Self {
        match tier {
            PriceTier::EarlyBird => Self {
                id: "masterclass-early-bird",
                price_id: config::early_bird_price_id(),
                name: "N8N Automations Masterclass (Early Bird)",
                description: "Live 3-hour masterclass, recording and templates at the early-bird rate",
                price: EARLY_BIRD_PRICE,
                currency: "USD",
            },
            PriceTier::Standard => Self {
                id: "masterclass-standard",
                price_id: config::standard_price_id(),
                name: "N8N Automations Masterclass",
                description: "Live 3-hour masterclass, recording and templates",
                price: STANDARD_PRICE,
                currency: "USD",
            },
        }
    }

    /// Both tiers, cheapest first.
    pub fn catalogue() -> Vec<Self> {
        vec![Self::for_tier(PriceTier::EarlyBird), Self::for_tier(PriceTier::Standard)]
    }

    /// `$297.00 USD`
    pub fn display_price(&self) -> String {
        format!("${}.00 {}", self.price, self.currency)
    }
}
