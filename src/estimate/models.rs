use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pricing/quality level selecting which rate table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Budget,
    Standard,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Budget, Tier::Standard, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Budget => "budget",
            Tier::Standard => "standard",
            Tier::Premium => "premium",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Standard
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "budget" => Ok(Tier::Budget),
            "standard" => Ok(Tier::Standard),
            "premium" => Ok(Tier::Premium),
            other => Err(format!("unknown tier '{}' (expected budget, standard or premium)", other)),
        }
    }
}

/// Which design services the client has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceSelection {
    #[serde(default)]
    pub space_planning: bool,
    #[serde(default)]
    pub interior_finishes: bool,
    #[serde(default)]
    pub furnishing_decor: bool,
}

impl ServiceSelection {
    pub fn all() -> Self {
        Self {
            space_planning: true,
            interior_finishes: true,
            furnishing_decor: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.space_planning || self.interior_finishes || self.furnishing_decor
    }
}

/// Everything the pricing engine needs for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Floor area in m²
    pub area: f64,
    #[serde(default)]
    pub is_renovation: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub services: ServiceSelection,
    /// Kitchen joinery run in linear meters
    #[serde(default)]
    pub kitchen_length: f64,
    /// Wardrobe run in linear meters
    #[serde(default)]
    pub wardrobe_length: f64,
    #[serde(default)]
    pub tier: Tier,
}

/// One priced component of the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostItem {
    DesignFee,
    Construction,
    RenovationPrep,
    KitchenJoinery,
    Wardrobes,
    Appliances,
    Furniture,
}

impl CostItem {
    pub const ALL: [CostItem; 7] = [
        CostItem::DesignFee,
        CostItem::Construction,
        CostItem::RenovationPrep,
        CostItem::KitchenJoinery,
        CostItem::Wardrobes,
        CostItem::Appliances,
        CostItem::Furniture,
    ];

    pub fn group(&self) -> CostGroupKind {
        match self {
            CostItem::DesignFee => CostGroupKind::DesignProject,
            CostItem::Construction | CostItem::RenovationPrep => CostGroupKind::ShellAndFinishes,
            CostItem::KitchenJoinery | CostItem::Wardrobes | CostItem::Appliances => {
                CostGroupKind::FixedJoinery
            }
            CostItem::Furniture => CostGroupKind::MovablesAndTech,
        }
    }
}

/// Display category of line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostGroupKind {
    DesignProject,
    ShellAndFinishes,
    FixedJoinery,
    MovablesAndTech,
}

impl CostGroupKind {
    /// Display order
    pub const ALL: [CostGroupKind; 4] = [
        CostGroupKind::DesignProject,
        CostGroupKind::ShellAndFinishes,
        CostGroupKind::FixedJoinery,
        CostGroupKind::MovablesAndTech,
    ];

    /// Items of this group in display order
    pub fn items(&self) -> &'static [CostItem] {
        match self {
            CostGroupKind::DesignProject => &[CostItem::DesignFee],
            CostGroupKind::ShellAndFinishes => &[CostItem::Construction, CostItem::RenovationPrep],
            CostGroupKind::FixedJoinery => &[
                CostItem::KitchenJoinery,
                CostItem::Wardrobes,
                CostItem::Appliances,
            ],
            CostGroupKind::MovablesAndTech => &[CostItem::Furniture],
        }
    }
}

/// The seven component values, after urgency adjustment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentCosts {
    pub design_fee: f64,
    pub construction: f64,
    pub renovation_prep: f64,
    pub kitchen_joinery: f64,
    pub wardrobes: f64,
    pub appliances: f64,
    pub furniture: f64,
}

impl ComponentCosts {
    pub fn get(&self, item: CostItem) -> f64 {
        match item {
            CostItem::DesignFee => self.design_fee,
            CostItem::Construction => self.construction,
            CostItem::RenovationPrep => self.renovation_prep,
            CostItem::KitchenJoinery => self.kitchen_joinery,
            CostItem::Wardrobes => self.wardrobes,
            CostItem::Appliances => self.appliances,
            CostItem::Furniture => self.furniture,
        }
    }

    /// Apply `f` to every component
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            design_fee: f(self.design_fee),
            construction: f(self.construction),
            renovation_prep: f(self.renovation_prep),
            kitchen_joinery: f(self.kitchen_joinery),
            wardrobes: f(self.wardrobes),
            appliances: f(self.appliances),
            furniture: f(self.furniture),
        }
    }

    pub fn sum(&self) -> f64 {
        CostItem::ALL.iter().map(|item| self.get(*item)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub item: CostItem,
    pub label: String,
    pub value: f64,
    pub low_value: f64,
    pub high_value: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostGroup {
    pub kind: CostGroupKind,
    pub header: String,
    pub items: Vec<CostLineItem>,
    pub subtotal: f64,
}

/// Indicative project duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub design_weeks: u32,
    pub construction_weeks: u32,
    pub renovation_weeks: u32,
    pub joinery_lead_weeks: u32,
    pub total_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCalculation {
    pub total: f64,
    pub low_estimate: f64,
    pub high_estimate: f64,
    pub grouped_line_items: Vec<CostGroup>,
    pub renovation_cost: f64,
    pub design_fee: f64,
    pub construction_cost: f64,
    pub joinery_cost: f64,
    pub furniture_cost: f64,
    pub components: ComponentCosts,
    pub timeline: Timeline,
}
