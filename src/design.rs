//! Design catalog and the user's current selections

use crate::estimate::{EstimateInput, ServiceSelection, Tier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    LivingRoom,
    Kitchen,
    Bedroom,
    Bathroom,
    DiningRoom,
    HomeOffice,
}

impl RoomType {
    pub fn description(&self) -> &'static str {
        match self {
            RoomType::LivingRoom => "living room",
            RoomType::Kitchen => "kitchen",
            RoomType::Bedroom => "bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::DiningRoom => "dining room",
            RoomType::HomeOffice => "home office",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPalette {
    WarmOak,
    NordicLight,
    IndustrialConcrete,
    TerrazzoPastel,
    DarkWalnut,
    MarbleBrass,
}

impl MaterialPalette {
    pub fn description(&self) -> &'static str {
        match self {
            MaterialPalette::WarmOak => {
                "warm natural oak flooring and joinery, linen textiles, off-white plaster walls"
            }
            MaterialPalette::NordicLight => {
                "pale ash wood, white walls, light grey wool textiles and matte white ceramics"
            }
            MaterialPalette::IndustrialConcrete => {
                "polished concrete floors, black steel frames, exposed brick and aged leather"
            }
            MaterialPalette::TerrazzoPastel => {
                "pastel terrazzo surfaces, blush and sage paint, rounded light wood accents"
            }
            MaterialPalette::DarkWalnut => {
                "dark walnut paneling, deep green velvet, smoked glass and bronze details"
            }
            MaterialPalette::MarbleBrass => {
                "white Carrara marble, brushed brass fittings, cream bouclé and warm lighting"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitecturalStyle {
    Minimalist,
    Scandinavian,
    Industrial,
    MidCentury,
    Japandi,
    ClassicContemporary,
}

impl ArchitecturalStyle {
    pub fn description(&self) -> &'static str {
        match self {
            ArchitecturalStyle::Minimalist => {
                "minimalist: clean lines, uncluttered surfaces, hidden storage"
            }
            ArchitecturalStyle::Scandinavian => {
                "Scandinavian: bright, functional, cozy layers and natural light"
            }
            ArchitecturalStyle::Industrial => {
                "industrial: raw materials, open layout, metal and reclaimed wood"
            }
            ArchitecturalStyle::MidCentury => {
                "mid-century modern: organic curves, tapered legs, graphic accents"
            }
            ArchitecturalStyle::Japandi => {
                "Japandi: calm Japanese-Scandinavian blend, low furniture, muted tones"
            }
            ArchitecturalStyle::ClassicContemporary => {
                "classic contemporary: moldings and symmetry with modern furniture"
            }
        }
    }
}

/// Everything the user has chosen in one design session
///
/// This is the snapshot stored for shared links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSelections {
    pub room_type: RoomType,
    pub palette: MaterialPalette,
    pub style: ArchitecturalStyle,
    #[serde(default)]
    pub tier: Tier,
    pub area: f64,
    #[serde(default)]
    pub services: ServiceSelection,
    #[serde(default)]
    pub kitchen_length: f64,
    #[serde(default)]
    pub wardrobe_length: f64,
    #[serde(default)]
    pub is_renovation: bool,
    #[serde(default)]
    pub is_urgent: bool,
    /// URL of a generated visualization, if one was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
}

impl DesignSelections {
    pub fn estimate_input(&self) -> EstimateInput {
        EstimateInput {
            area: self.area,
            is_renovation: self.is_renovation,
            is_urgent: self.is_urgent,
            services: self.services,
            kitchen_length: self.kitchen_length,
            wardrobe_length: self.wardrobe_length,
            tier: self.tier,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err("area must be a positive number".to_string());
        }
        if !self.kitchen_length.is_finite() || self.kitchen_length < 0.0 {
            return Err("kitchen_length must not be negative".to_string());
        }
        if !self.wardrobe_length.is_finite() || self.wardrobe_length < 0.0 {
            return Err("wardrobe_length must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_selections() -> DesignSelections {
    DesignSelections {
        room_type: RoomType::Kitchen,
        palette: MaterialPalette::WarmOak,
        style: ArchitecturalStyle::Japandi,
        tier: Tier::Premium,
        area: 24.0,
        services: ServiceSelection::all(),
        kitchen_length: 3.5,
        wardrobe_length: 0.0,
        is_renovation: true,
        is_urgent: false,
        generated_image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_input_carries_every_field() {
        let selections = sample_selections();
        let input = selections.estimate_input();
        assert_eq!(input.area, 24.0);
        assert_eq!(input.tier, Tier::Premium);
        assert_eq!(input.kitchen_length, 3.5);
        assert!(input.is_renovation);
        assert!(input.services.interior_finishes);
    }

    #[test]
    fn test_validate_rejects_bad_area() {
        let mut selections = sample_selections();
        selections.area = 0.0;
        assert!(selections.validate().is_err());
        selections.area = f64::NAN;
        assert!(selections.validate().is_err());
    }

    #[test]
    fn test_selections_from_json() {
        let json = r#"{
            "room_type": "living_room",
            "palette": "nordic_light",
            "style": "mid_century",
            "area": 35
        }"#;
        let selections: DesignSelections = serde_json::from_str(json).unwrap();
        assert_eq!(selections.room_type, RoomType::LivingRoom);
        assert_eq!(selections.style, ArchitecturalStyle::MidCentury);
        assert_eq!(selections.tier, Tier::Standard);
        assert!(selections.validate().is_ok());
    }
}
