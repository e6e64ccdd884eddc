use super::models::{
    ComponentCosts, CostCalculation, CostGroup, CostGroupKind, CostItem, CostLineItem,
    EstimateInput, Timeline,
};
use super::rates::{
    rates_for, round_to_unit, FINISH_LABOR_SHARE, FURNISHING_DECOR_WEIGHT,
    INTERIOR_FINISHES_WEIGHT, MIN_AREA, RENOVATION_RATE, ROUGH_LABOR_SHARE,
    SPACE_PLANNING_WEIGHT, URGENCY_MULTIPLIER, VARIANCE,
};
use crate::i18n::{MessageKey, MessageLookup};

/// Area adjustment factor: small areas inflate the per-m² cost, large ones approach 0.9
///
/// The area is clamped to [`MIN_AREA`] so the factor is always finite.
pub fn area_adjustment(area: f64) -> f64 {
    20.0 / clamp_area(area) + 0.9
}

fn clamp_area(area: f64) -> f64 {
    if area.is_finite() && area > MIN_AREA {
        area
    } else {
        MIN_AREA
    }
}

fn clamp_length(length: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        length
    } else {
        0.0
    }
}

/// Weighted design scope of the selected services, zero when nothing is selected
pub fn scope_multiplier(input: &EstimateInput) -> f64 {
    let mut scope = 0.0;
    if input.services.space_planning {
        scope += SPACE_PLANNING_WEIGHT;
    }
    if input.services.interior_finishes {
        scope += INTERIOR_FINISHES_WEIGHT;
    }
    if input.services.furnishing_decor {
        scope += FURNISHING_DECOR_WEIGHT;
    }
    scope
}

/// Component values before the urgency surcharge, each rounded to the unit
pub fn base_components(input: &EstimateInput) -> ComponentCosts {
    let rates = rates_for(input.tier);
    let area = clamp_area(input.area);
    let adjustment = area_adjustment(area);
    let services = input.services;

    let design_fee = round_to_unit(area * rates.design_rate * scope_multiplier(input) * adjustment);

    let construction_base = area * rates.base_rate * adjustment;
    let rough_labor = if services.space_planning {
        round_to_unit(construction_base * ROUGH_LABOR_SHARE)
    } else {
        0.0
    };
    let finish_labor = if services.interior_finishes {
        round_to_unit(construction_base * FINISH_LABOR_SHARE)
    } else {
        0.0
    };

    let (kitchen_joinery, appliances, wardrobes) = if services.interior_finishes {
        (
            round_to_unit(clamp_length(input.kitchen_length) * rates.kitchen_rate),
            rates.appliance_package,
            round_to_unit(clamp_length(input.wardrobe_length) * rates.wardrobe_rate),
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let renovation_prep = if input.is_renovation {
        round_to_unit(area * RENOVATION_RATE)
    } else {
        0.0
    };

    let furniture = if services.furnishing_decor {
        round_to_unit(area * rates.furniture_rate)
    } else {
        0.0
    };

    ComponentCosts {
        design_fee,
        construction: rough_labor + finish_labor,
        renovation_prep,
        kitchen_joinery,
        wardrobes,
        appliances,
        furniture,
    }
}

/// Apply the rush surcharge to each component independently
pub fn apply_urgency(components: &ComponentCosts) -> ComponentCosts {
    components.map(|value| round_to_unit(value * URGENCY_MULTIPLIER))
}

/// Lower and upper variance band around a value
pub fn variance_band(value: f64) -> (f64, f64) {
    (
        round_to_unit(value * (1.0 - VARIANCE)),
        round_to_unit(value * (1.0 + VARIANCE)),
    )
}

/// Indicative duration in weeks for the selected scope
pub fn estimate_timeline(input: &EstimateInput) -> Timeline {
    let services = input.services;
    let area = clamp_area(input.area);

    let design_weeks = if services.any() { 2 } else { 0 };
    let construction_weeks = if services.space_planning || services.interior_finishes {
        (area / 25.0).ceil() as u32
    } else {
        0
    };
    let renovation_weeks = if input.is_renovation { 2 } else { 0 };
    let has_joinery = services.interior_finishes
        && (clamp_length(input.kitchen_length) > 0.0 || clamp_length(input.wardrobe_length) > 0.0);
    let joinery_lead_weeks = if has_joinery { 3 } else { 0 };

    let mut total_weeks = design_weeks + construction_weeks + renovation_weeks + joinery_lead_weeks;
    if input.is_urgent && total_weeks > 0 {
        total_weeks = ((total_weeks as f64) * 0.75).ceil().max(1.0) as u32;
    }

    Timeline {
        design_weeks,
        construction_weeks,
        renovation_weeks,
        joinery_lead_weeks,
        total_weeks,
    }
}

/// Compute the full itemized estimate
///
/// Pure and deterministic: the same input and labels always yield the same result.
pub fn calculate_costs(input: &EstimateInput, labels: &impl MessageLookup) -> CostCalculation {
    let mut components = base_components(input);
    if input.is_urgent {
        components = apply_urgency(&components);
    }

    let total = components.sum();
    let (low_estimate, high_estimate) = variance_band(total);

    let grouped_line_items = CostGroupKind::ALL
        .iter()
        .filter_map(|kind| build_group(*kind, &components, input, labels))
        .collect();

    CostCalculation {
        total,
        low_estimate,
        high_estimate,
        grouped_line_items,
        renovation_cost: components.renovation_prep,
        design_fee: components.design_fee,
        construction_cost: components.construction,
        joinery_cost: components.kitchen_joinery + components.wardrobes + components.appliances,
        furniture_cost: components.furniture,
        components,
        timeline: estimate_timeline(input),
    }
}

fn build_group(
    kind: CostGroupKind,
    components: &ComponentCosts,
    input: &EstimateInput,
    labels: &impl MessageLookup,
) -> Option<CostGroup> {
    let items: Vec<CostLineItem> = kind
        .items()
        .iter()
        .filter(|item| components.get(**item) > 0.0)
        .map(|item| build_line_item(*item, components.get(*item), input, labels))
        .collect();

    if items.is_empty() {
        return None;
    }

    let subtotal = items.iter().map(|item| item.value).sum();
    Some(CostGroup {
        kind,
        header: labels.text(MessageKey::GroupHeader(kind)),
        items,
        subtotal,
    })
}

fn build_line_item(
    item: CostItem,
    value: f64,
    input: &EstimateInput,
    labels: &impl MessageLookup,
) -> CostLineItem {
    let (low_value, high_value) = variance_band(value);
    CostLineItem {
        item,
        label: labels.text(MessageKey::CostItemLabel(item)),
        value,
        low_value,
        high_value,
        tooltip: labels.text(MessageKey::CostItemTooltip(item, input.tier)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::{ServiceSelection, Tier};
    use crate::i18n::Translator;

    fn reference_input() -> EstimateInput {
        EstimateInput {
            area: 50.0,
            is_renovation: false,
            is_urgent: false,
            services: ServiceSelection::all(),
            kitchen_length: 4.0,
            wardrobe_length: 3.0,
            tier: Tier::Standard,
        }
    }

    #[test]
    fn test_area_adjustment() {
        assert!((area_adjustment(50.0) - 1.3).abs() < 1e-12);
        assert!((area_adjustment(200.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_adjustment_clamps_zero_and_negative() {
        assert!((area_adjustment(0.0) - 20.9).abs() < 1e-12);
        assert!((area_adjustment(-5.0) - 20.9).abs() < 1e-12);
        assert!((area_adjustment(f64::NAN) - 20.9).abs() < 1e-12);
    }

    #[test]
    fn test_scope_multiplier() {
        let mut input = reference_input();
        assert!((scope_multiplier(&input) - 1.0).abs() < 1e-12);

        input.services = ServiceSelection {
            space_planning: true,
            interior_finishes: false,
            furnishing_decor: false,
        };
        assert!((scope_multiplier(&input) - 0.40).abs() < 1e-12);

        input.services = ServiceSelection::none();
        assert_eq!(scope_multiplier(&input), 0.0);
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate_costs(&reference_input(), &Translator::default());

        assert_eq!(result.components.design_fee, 3300.0);
        assert_eq!(result.components.construction, 35800.0);
        assert_eq!(result.components.kitchen_joinery, 4800.0);
        assert_eq!(result.components.appliances, 6000.0);
        assert_eq!(result.components.wardrobes, 2400.0);
        assert_eq!(result.components.furniture, 7500.0);
        assert_eq!(result.components.renovation_prep, 0.0);
        assert_eq!(result.total, 59800.0);
        assert_eq!(result.low_estimate, 50800.0);
        assert_eq!(result.high_estimate, 68800.0);
    }

    #[test]
    fn test_reference_scenario_urgent() {
        let mut input = reference_input();
        input.is_urgent = true;
        let result = calculate_costs(&input, &Translator::default());

        assert_eq!(result.components.design_fee, 4000.0);
        assert_eq!(result.components.construction, 43000.0);
        assert_eq!(result.components.kitchen_joinery, 5800.0);
        assert_eq!(result.components.appliances, 7200.0);
        assert_eq!(result.components.wardrobes, 2900.0);
        assert_eq!(result.components.furniture, 9000.0);
        assert_eq!(result.total, 71900.0);
    }

    #[test]
    fn test_group_subtotals() {
        let mut input = reference_input();
        input.is_renovation = true;
        let result = calculate_costs(&input, &Translator::default());

        assert_eq!(result.renovation_cost, 6000.0);
        assert_eq!(result.joinery_cost, 4800.0 + 2400.0 + 6000.0);

        let shell = result
            .grouped_line_items
            .iter()
            .find(|g| g.kind == CostGroupKind::ShellAndFinishes)
            .unwrap();
        assert_eq!(shell.items.len(), 2);
        assert_eq!(shell.subtotal, 35800.0 + 6000.0);
        assert_eq!(shell.header, "Shell & Finishes");
    }

    #[test]
    fn test_empty_groups_and_zero_items_are_omitted() {
        let mut input = reference_input();
        input.services = ServiceSelection {
            space_planning: true,
            interior_finishes: false,
            furnishing_decor: false,
        };
        let result = calculate_costs(&input, &Translator::default());

        let kinds: Vec<_> = result.grouped_line_items.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![CostGroupKind::DesignProject, CostGroupKind::ShellAndFinishes]);
        for group in &result.grouped_line_items {
            assert!(!group.items.is_empty());
            assert!(group.items.iter().all(|item| item.value > 0.0));
        }
    }

    #[test]
    fn test_line_item_band_and_tooltip() {
        let result = calculate_costs(&reference_input(), &Translator::default());
        let design = &result.grouped_line_items[0].items[0];

        assert_eq!(design.item, CostItem::DesignFee);
        assert_eq!(design.low_value, 2800.0);
        assert_eq!(design.high_value, 3800.0);
        assert!(design.tooltip.contains("two revision rounds"));
    }

    #[test]
    fn test_negative_lengths_are_treated_as_zero() {
        let mut input = reference_input();
        input.kitchen_length = -3.0;
        input.wardrobe_length = f64::INFINITY;
        let components = base_components(&input);
        assert_eq!(components.kitchen_joinery, 0.0);
        assert_eq!(components.wardrobes, 0.0);
    }

    #[test]
    fn test_timeline() {
        let mut input = reference_input();
        input.is_renovation = true;
        let timeline = estimate_timeline(&input);
        assert_eq!(timeline.design_weeks, 2);
        assert_eq!(timeline.construction_weeks, 2);
        assert_eq!(timeline.renovation_weeks, 2);
        assert_eq!(timeline.joinery_lead_weeks, 3);
        assert_eq!(timeline.total_weeks, 9);

        input.is_urgent = true;
        assert_eq!(estimate_timeline(&input).total_weeks, 7);
    }

    #[test]
    fn test_timeline_without_scope() {
        let mut input = reference_input();
        input.services = ServiceSelection::none();
        assert_eq!(estimate_timeline(&input).total_weeks, 0);
    }
}
