use comfy_table::{presets::NOTHING, *};
use covidtracker::dataset::{DatasetProfile, Metric};
use covidtracker::latest::LatestSnapshot;
use covidtracker::stats::{death_rate, CountryCount, CountryRate, Superlatives};
use itertools::Itertools;
use nonempty::NonEmpty;

const NO_DATA: &str = "No data";

pub fn display_profile(profile: &DatasetProfile, cohort: &NonEmpty<String>) {
    println!("COVID-19 Global Data Tracker");
    println!("===========================\n");
    println!("Dataset loaded with {} rows.", profile.rows);
    println!("Number of countries/locations: {}", profile.locations);
    println!(
        "Continents in the dataset: {}",
        profile.continents.iter().join(", ")
    );
    if let Some((start, end)) = profile.date_range {
        println!("Date range: {start} to {end}");
    }
    println!(
        "\nAnalyzing data for countries: {}",
        cohort.iter().join(", ")
    );
}

/// One display row per cohort member, in cohort order: country, latest date,
/// total cases, total deaths, death rate. Counts fall back to 0 only here, at
/// the presentation boundary.
fn snapshot_rows(snapshot: &LatestSnapshot) -> Vec<[String; 5]> {
    snapshot
        .iter()
        .map(|(location, record)| match record {
            Some(record) => [
                location.to_string(),
                record.date.to_string(),
                format_count(record.count(Metric::TotalCases).unwrap_or(0)),
                format_count(record.count(Metric::TotalDeaths).unwrap_or(0)),
                format!("{:.4}", death_rate(record)),
            ],
            None => [
                location.to_string(),
                NO_DATA.to_string(),
                NO_DATA.to_string(),
                NO_DATA.to_string(),
                "N/A".to_string(),
            ],
        })
        .collect()
}

pub fn display_snapshot(snapshot: &LatestSnapshot) {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Country").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Total Cases").add_attribute(Attribute::Bold),
            Cell::new("Total Deaths").add_attribute(Attribute::Bold),
            Cell::new("Death Rate").add_attribute(Attribute::Bold),
        ])
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    for row in snapshot_rows(snapshot) {
        table.add_row(row.to_vec());
    }
    for column_index in 2..=4 {
        if let Some(column) = table.column_mut(column_index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\nLatest COVID-19 Statistics:");
    println!("{table}");
}

pub fn display_superlatives(superlatives: &Superlatives) {
    println!("\nAdditional Statistics:");
    println!("---------------------");
    print_count_fact("Country with highest total cases", &superlatives.highest_cases);
    print_count_fact(
        "Country with highest total deaths",
        &superlatives.highest_deaths,
    );
    print_rate_fact(
        "Country with highest death rate",
        &superlatives.highest_death_rate,
    );
    print_rate_fact(
        "Country with lowest death rate",
        &superlatives.lowest_death_rate,
    );
}

fn print_count_fact(label: &str, fact: &Option<CountryCount>) {
    match fact {
        Some(entry) => println!("{label}: {} ({})", entry.location, format_count(entry.value)),
        None => println!("{label}: no country qualified"),
    }
}

fn print_rate_fact(label: &str, fact: &Option<CountryRate>) {
    match fact {
        Some(entry) => println!("{label}: {} ({:.4})", entry.location, entry.rate),
        None => println!("{label}: no country qualified"),
    }
}

/// Render a count with thousands separators, e.g. 1234567 -> "1,234,567".
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
