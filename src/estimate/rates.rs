use super::models::Tier;

/// Per-tier rate table
///
/// All rates are in currency units; area rates per m², joinery rates per linear meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable {
    pub design_rate: f64,
    pub base_rate: f64,
    pub kitchen_rate: f64,
    pub appliance_package: f64,
    pub wardrobe_rate: f64,
    pub furniture_rate: f64,
}

const BUDGET: RateTable = RateTable {
    design_rate: 35.0,
    base_rate: 380.0,
    kitchen_rate: 800.0,
    appliance_package: 3500.0,
    wardrobe_rate: 550.0,
    furniture_rate: 90.0,
};

const STANDARD: RateTable = RateTable {
    design_rate: 50.0,
    base_rate: 550.0,
    kitchen_rate: 1200.0,
    appliance_package: 6000.0,
    wardrobe_rate: 800.0,
    furniture_rate: 150.0,
};

const PREMIUM: RateTable = RateTable {
    design_rate: 80.0,
    base_rate: 900.0,
    kitchen_rate: 2200.0,
    appliance_package: 12000.0,
    wardrobe_rate: 1400.0,
    furniture_rate: 300.0,
};

/// Renovation prep cost per m², independent of tier
pub const RENOVATION_RATE: f64 = 120.0;

/// Design fee weight of each service
pub const SPACE_PLANNING_WEIGHT: f64 = 0.40;
pub const INTERIOR_FINISHES_WEIGHT: f64 = 0.35;
pub const FURNISHING_DECOR_WEIGHT: f64 = 0.25;

/// Share of the construction base attributed to rough labor; the rest is finish labor
pub const ROUGH_LABOR_SHARE: f64 = 0.20;
pub const FINISH_LABOR_SHARE: f64 = 0.80;

pub const URGENCY_MULTIPLIER: f64 = 1.20;
pub const VARIANCE: f64 = 0.15;
pub const ROUNDING_UNIT: f64 = 100.0;
pub const MIN_AREA: f64 = 1.0;

/// Look up the rate table for a tier
pub fn rates_for(tier: Tier) -> &'static RateTable {
    match tier {
        Tier::Budget => &BUDGET,
        Tier::Standard => &STANDARD,
        Tier::Premium => &PREMIUM,
    }
}

/// Round to the nearest rounding unit (half away from zero)
pub fn round_to_unit(value: f64) -> f64 {
    (value / ROUNDING_UNIT).round() * ROUNDING_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_unit() {
        assert_eq!(round_to_unit(3250.0), 3300.0);
        assert_eq!(round_to_unit(3249.0), 3200.0);
        assert_eq!(round_to_unit(49.0), 0.0);
        assert_eq!(round_to_unit(0.0), 0.0);
    }

    #[test]
    fn test_rates_strictly_increase_with_tier() {
        let tiers = [Tier::Budget, Tier::Standard, Tier::Premium];
        for pair in tiers.windows(2) {
            let lower = rates_for(pair[0]);
            let higher = rates_for(pair[1]);
            assert!(lower.design_rate < higher.design_rate);
            assert!(lower.base_rate < higher.base_rate);
            assert!(lower.kitchen_rate < higher.kitchen_rate);
            assert!(lower.appliance_package < higher.appliance_package);
            assert!(lower.wardrobe_rate < higher.wardrobe_rate);
            assert!(lower.furniture_rate < higher.furniture_rate);
        }
    }

    #[test]
    fn test_service_weights_sum_to_one() {
        let sum = SPACE_PLANNING_WEIGHT + INTERIOR_FINISHES_WEIGHT + FURNISHING_DECOR_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
