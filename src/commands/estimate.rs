use crate::cli::EstimateArgs;
use anyhow::Result;
use colored::Colorize;
use interior_studio::estimate::{calculate_costs, CostCalculation, EstimateInput, ServiceSelection};
use interior_studio::i18n::{MessageKey, MessageLookup, Translator};

/// Run the pricing engine for the given flags and print the breakdown
pub fn execute(args: &EstimateArgs) -> Result<()> {
    let input = input_from_args(args);
    let translator = Translator::for_language(args.language);
    let calculation = calculate_costs(&input, &translator);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calculation)?);
        return Ok(());
    }

    print_table(&input, &calculation, &translator);
    Ok(())
}

fn input_from_args(args: &EstimateArgs) -> EstimateInput {
    EstimateInput {
        area: args.area,
        is_renovation: args.renovation,
        is_urgent: args.urgent,
        services: ServiceSelection {
            space_planning: !args.no_space_planning,
            interior_finishes: !args.no_finishes,
            furnishing_decor: !args.no_furnishing,
        },
        kitchen_length: args.kitchen,
        wardrobe_length: args.wardrobe,
        tier: args.tier,
    }
}

fn print_table(input: &EstimateInput, calculation: &CostCalculation, labels: &impl MessageLookup) {
    println!(
        "{} {} m², {}{}",
        "Estimate:".bold(),
        input.area,
        labels.text(MessageKey::TierName(input.tier)).cyan(),
        if input.is_urgent { ", urgent".yellow().to_string() } else { String::new() }
    );
    println!();

    for group in &calculation.grouped_line_items {
        println!("{:<34} {:>10}", group.header.bold(), format_amount(group.subtotal).bold());
        for item in &group.items {
            println!(
                "  {:<32} {:>10}  {}",
                item.label,
                format_amount(item.value),
                format!(
                    "({} – {})",
                    format_amount(item.low_value),
                    format_amount(item.high_value)
                )
                .dimmed()
            );
        }
        println!();
    }

    println!(
        "{:<34} {:>10}",
        "Total".green().bold(),
        format_amount(calculation.total).green().bold()
    );
    println!(
        "{:<34} {:>10} – {}",
        "Range".dimmed(),
        format_amount(calculation.low_estimate),
        format_amount(calculation.high_estimate)
    );
    println!(
        "{:<34} {:>10}",
        "Timeline".dimmed(),
        format!("{} weeks", calculation.timeline.total_weeks)
    );
}

/// Whole currency units with thousands separators
fn format_amount(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    out
}
