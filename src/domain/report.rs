//! HTML bodies for simulation notifications.

use super::simulation::{Simulation, SimulationResult};
use rust_decimal::Decimal;
use std::fmt::Write;

const CELL: &str = "border: 1px solid #ddd; padding: 8px;";
const SIGNATURE: &str = "<p>Kind regards,</p><p>The Simulation Team</p>";

fn money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

pub fn render_single(simulation: &Simulation) -> String {
    format!(
        "<h1>Simulation Result</h1>\
         <table border=\"1\" style=\"border-collapse: collapse; width: 100%;\">\
         <tr><th>ID</th><td>{}</td></tr>\
         <tr><th>Total Amount</th><td>{:.2}</td></tr>\
         <tr><th>Monthly Installment</th><td>{:.2}</td></tr>\
         <tr><th>Total Interest</th><td>{:.2}</td></tr>\
         </table>{SIGNATURE}",
        simulation.id(),
        money(simulation.total_amount()),
        money(simulation.monthly_installment()),
        money(simulation.total_interest()),
    )
}

/// One table row per successful simulation.
///
/// `failed` counts items of the batch that produced no result; when non-zero
/// a paragraph stating the count is appended below the table.
pub fn render_summary(results: &[SimulationResult], failed: usize) -> String {
    let mut body = String::from(
        "<h1>Simulation Results</h1>\
         <p>Below are the details of the simulations performed:</p>\
         <table style='border-collapse: collapse; width: 100%;'><thead><tr>",
    );
    for header in ["ID", "Total Amount", "Monthly Installment", "Total Interest"] {
        let _ = write!(body, "<th style='{CELL}'>{header}</th>");
    }
    body.push_str("</tr></thead><tbody>");

    for result in results {
        let _ = write!(
            body,
            "<tr><td style='{CELL}'>{}</td><td style='{CELL}'>{:.2}</td>\
             <td style='{CELL}'>{:.2}</td><td style='{CELL}'>{:.2}</td></tr>",
            result.id,
            money(result.total_amount),
            money(result.monthly_installment),
            money(result.total_interest),
        );
    }
    body.push_str("</tbody></table>");

    if failed > 0 {
        let _ = write!(
            body,
            "<p>{failed} of {} simulations could not be processed.</p>",
            results.len() + failed
        );
    }
    body.push_str(SIGNATURE);
    body
}
