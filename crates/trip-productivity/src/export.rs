//! Report output (CSV export and console summary)

use anyhow::Result;
use csv::Writer;
use std::io::Write;
use std::path::Path;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use trip_productivity::revenue::BookingRevenue;
use trip_productivity::{ExpenseCategory, TripGroupRow, TripProductivityReport};

const CSV_HEADER: [&str; 19] = [
    "Trip_No",
    "Trip_Type",
    "Vehicle_Type",
    "Vehicle_No",
    "Start_Date",
    "End_Date",
    "Route",
    "Legs",
    "Manifests",
    "LRs",
    "Revenue",
    "Fuel",
    "Diesel_Finalized",
    "Toll",
    "Bhatta",
    "Salary",
    "Other",
    "Total_Expense",
    "Profit",
];

/// Write the report rows and a totals line as CSV
pub fn write_csv(path: &Path, report: &TripProductivityReport) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, report)?;
    println!("  Generated: {}", path.display());
    Ok(())
}

fn write_csv_to<W: Write>(out: W, report: &TripProductivityReport) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    wtr.write_record(CSV_HEADER)?;

    for row in &report.rows {
        let expenses = &row.expenses;
        wtr.write_record([
            &row.trip_number,
            &row.trip_type,
            &row.vehicle_type,
            &row.vehicle_number,
            &format_date(row.start_date),
            &format_date(row.end_date),
            &row.route,
            &row.legs.to_string(),
            &row.manifest_count.to_string(),
            &row.booking_count.to_string(),
            &format!("{:.2}", row.revenue),
            &format!("{:.2}", expenses.fuel),
            &format!("{:.2}", expenses.diesel_finalized),
            &format!("{:.2}", expenses.toll),
            &format!("{:.2}", expenses.bhatta),
            &format!("{:.2}", expenses.salary_combined()),
            &format!("{:.2}", expenses.other),
            &format!("{:.2}", row.total_expense),
            &format!("{:.2}", row.profit),
        ])?;
    }

    let totals = &report.totals;
    wtr.write_record([
        "TOTAL",
        "",
        "",
        "",
        "",
        "",
        "",
        &totals.legs.to_string(),
        "",
        &totals.bookings.to_string(),
        &format!("{:.2}", totals.revenue),
        &format!("{:.2}", totals.expenses.fuel),
        &format!("{:.2}", totals.expenses.diesel_finalized),
        &format!("{:.2}", totals.expenses.toll),
        &format!("{:.2}", totals.expenses.bhatta),
        &format!("{:.2}", totals.expenses.salary_combined()),
        &format!("{:.2}", totals.expenses.other),
        &format!("{:.2}", totals.total_expense),
        &format!("{:.2}", totals.profit),
    ])?;

    wtr.flush()?;
    Ok(())
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Normalize -0.0 to 0.0 for cleaner display
fn normalize_zero(val: f64) -> f64 {
    if val == 0.0 { 0.0 } else { val }
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Trip")]
    trip: String,
    #[tabled(rename = "Type")]
    trip_type: String,
    #[tabled(rename = "Dates")]
    dates: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "LRs")]
    bookings: usize,
    #[tabled(rename = "Revenue")]
    revenue: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

impl From<&TripGroupRow> for TableRow {
    fn from(row: &TripGroupRow) -> Self {
        let dates = match (row.start_date, row.end_date) {
            (Some(start), Some(end)) if start != end => format!("{} → {}", start, end),
            (Some(start), _) => start.to_string(),
            _ => "-".to_string(),
        };
        let trip = if row.trip_number.is_empty() {
            row.group_key.to_string()
        } else {
            row.trip_number.clone()
        };

        Self {
            trip,
            trip_type: row.trip_type.clone(),
            dates,
            route: row.route.clone(),
            bookings: row.booking_count,
            revenue: format!("{:.2}", normalize_zero(row.revenue)),
            expense: format!("{:.2}", normalize_zero(row.total_expense)),
            profit: format!("{:.2}", normalize_zero(row.profit)),
        }
    }
}

/// Print the per-trip table to the console
pub fn print_table(report: &TripProductivityReport) {
    let rows: Vec<TableRow> = report.rows.iter().map(TableRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

/// Print the P&L summary block to the console
pub fn print_summary(report: &TripProductivityReport) {
    let totals = &report.totals;

    println!("\n============================================================");
    println!("                TRIP PRODUCTIVITY SUMMARY");
    println!("============================================================\n");

    println!(
        "  Trips:              {:>10} ({} legs)",
        totals.groups, totals.legs
    );
    println!("  LRs:                {:>10}", totals.bookings);

    println!("\nREVENUE:");
    println!(
        "  Freight:                       {:>12.2}",
        normalize_zero(totals.revenue)
    );

    println!("\nEXPENSES:");
    for category in ExpenseCategory::ALL {
        println!(
            "  {:<30} {:>12.2}",
            format!("{}:", category),
            normalize_zero(totals.expenses.get(category))
        );
    }
    println!("  ─────────────────────────────────────────────");
    println!(
        "  Total Expenses:                {:>12.2}",
        normalize_zero(totals.total_expense)
    );

    println!("\nPROFIT/LOSS:");
    println!(
        "  Net Profit:                    {:>12.2}",
        normalize_zero(totals.profit)
    );

    println!("============================================================");
}

/// Print one trip group with its per-booking revenue
pub fn print_trip_detail(row: &TripGroupRow, bookings: &[BookingRevenue]) {
    println!("Trip {}", row.trip_number);
    println!("=============================================\n");
    println!("  Type:          {}", row.trip_type);
    println!("  Vehicle:       {} {}", row.vehicle_number, row.vehicle_type);
    println!(
        "  Dates:         {} → {}",
        format_date(row.start_date),
        format_date(row.end_date)
    );
    println!("  Route:         {}", row.route);
    println!("  Legs:          {}", row.legs);
    println!("  Manifests:     {}", row.manifest_count);

    println!("\nLRs:");
    println!("  {:<16} {:<8} {:>12}", "LR", "Source", "Freight");
    println!("  {}", "-".repeat(38));
    for booking in bookings {
        let source = booking
            .source
            .map(|s| s.to_string())
            .unwrap_or_else(|| "missing".to_string());
        println!(
            "  {:<16} {:<8} {:>12.2}",
            booking.id, source, booking.freight
        );
    }
    println!("  {}", "-".repeat(38));
    println!("  {:<25} {:>12.2}", "Revenue", row.revenue);

    println!("\nEXPENSES:");
    for (category, amount) in row.expenses.by_category() {
        println!("  {:<25} {:>12.2}", category.to_string(), amount);
    }
    println!("  {:<25} {:>12.2}", "Total", row.total_expense);

    println!("\n  {:<25} {:>12.2}", "Profit", normalize_zero(row.profit));
}
