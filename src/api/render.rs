//! Server-side HTML for the comparison page.

use crate::models::{ComparisonReport, ForecastDetail, RowStatus};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Column headers of the comparison table, in display order
pub const COMPARISON_COLUMNS: [&str; 4] = ["ProductName", "NDC", "ForecastedOrderQty", "OrderedQty"];

const FORECAST_COLUMNS: [&str; 11] = [
    "ProductName",
    "NDC",
    "ForecastedOrderQty",
    "OrderUOM",
    "ParMin",
    "ParMax",
    "ForecastQty",
    "DispensedQty",
    "PendingTransferQty",
    "PendingOrderedQty",
    "CurrentInventoryQty",
];

const ORDER_COLUMNS: [&str; 3] = ["NDC", "DrugName", "OrderedQty"];

/// Row background per status
pub fn status_color(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Match => "lightgreen",
        RowStatus::Mismatch => "lightyellow",
        RowStatus::Zero => "lightcoral",
    }
}

/// What goes below the selector
pub enum PageBody<'a> {
    Prompt,
    Report(&'a ComparisonReport),
    Error(&'a str),
    /// Orders refused; the forecast is still shown above the message
    Blocked {
        message: &'a str,
        forecast: &'a [ForecastDetail],
    },
}

pub fn render_page(sites: &[String], selected: &str, date: NaiveDate, body: PageBody<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Forecast vs Orders</title>\n<style>\n\
         body { font-family: sans-serif; margin: 1.5rem; }\n\
         table { border-collapse: collapse; width: 100%; margin-bottom: 2rem; }\n\
         th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n\
         .info { background: #e8f0fe; padding: 0.75rem; }\n\
         .error { background: #fde2e1; padding: 0.75rem; }\n\
         </style>\n</head>\n<body>\n<h1>Forecast vs Actual Orders Comparison</h1>\n",
    );

    render_selector(&mut html, sites, selected, date);

    match body {
        PageBody::Prompt => {
            html.push_str("<p class=\"info\">Please select a site to view forecast and orders.</p>\n");
        }
        PageBody::Error(message) => {
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
        }
        PageBody::Blocked { message, forecast } => {
            render_forecast_table(&mut html, date, forecast);
            html.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
        }
        PageBody::Report(report) => render_report(&mut html, report),
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_selector(html: &mut String, sites: &[String], selected: &str, date: NaiveDate) {
    html.push_str("<form method=\"get\" action=\"/\">\n<label for=\"site\">Select a Site</label>\n");
    html.push_str("<select id=\"site\" name=\"site\" onchange=\"this.form.submit()\">\n<option value=\"\"></option>\n");
    for site in sites {
        let marker = if site == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{0}\"{1}>{0}</option>\n",
            escape(site),
            marker
        ));
    }
    html.push_str("</select>\n");
    html.push_str(&format!(
        "<input type=\"date\" name=\"date\" value=\"{}\">\n<button type=\"submit\">Show</button>\n</form>\n",
        date.format("%Y-%m-%d")
    ));
}

fn render_forecast_table(html: &mut String, date: NaiveDate, forecast: &[ForecastDetail]) {
    html.push_str(&format!("<h2>Forecasted Orders ({})</h2>\n", date.format("%Y-%m-%d")));
    open_table(html, &FORECAST_COLUMNS);
    for f in forecast {
        let cells = [
            escape(&f.product_name),
            escape(&f.ndc),
            f.forecasted_order_qty.to_string(),
            escape(f.order_uom.as_deref().unwrap_or_default()),
            decimal(&f.par_min),
            decimal(&f.par_max),
            decimal(&f.forecast_qty),
            decimal(&f.dispensed_qty),
            decimal(&f.pending_transfer_qty),
            decimal(&f.pending_ordered_qty),
            decimal(&f.current_inventory_qty),
        ];
        push_row(html, None, &cells);
    }
    html.push_str("</tbody>\n</table>\n");
}

fn render_report(html: &mut String, report: &ComparisonReport) {
    let date = report.date.format("%Y-%m-%d");

    render_forecast_table(html, report.date, &report.forecast);

    html.push_str(&format!("<h2>Actual Orders ({date})</h2>\n"));
    open_table(html, &ORDER_COLUMNS);
    for o in &report.orders {
        let cells = [escape(&o.ndc), escape(&o.drug_name), o.ordered_qty.to_string()];
        push_row(html, None, &cells);
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str("<h2>Forecast vs Actual Comparison</h2>\n");
    html.push_str(&format!(
        "<p>{} rows: {} match, {} mismatch, {} zero</p>\n",
        report.summary.total(),
        report.summary.matched,
        report.summary.mismatched,
        report.summary.zero
    ));
    open_table(html, &COMPARISON_COLUMNS);
    for row in &report.rows {
        let cells = [
            escape(&row.product_name),
            escape(&row.ndc),
            row.forecasted_order_qty.to_string(),
            row.ordered_qty.to_string(),
        ];
        push_row(html, Some(status_color(row.status)), &cells);
    }
    html.push_str("</tbody>\n</table>\n");
}

fn open_table(html: &mut String, columns: &[&str]) {
    html.push_str("<table>\n<thead>\n<tr>");
    for col in columns {
        html.push_str(&format!("<th>{col}</th>"));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
}

fn push_row(html: &mut String, background: Option<&str>, cells: &[String]) {
    match background {
        Some(color) => html.push_str(&format!("<tr style=\"background-color: {color}\">")),
        None => html.push_str("<tr>"),
    }
    for cell in cells {
        html.push_str(&format!("<td>{cell}</td>"));
    }
    html.push_str("</tr>\n");
}

fn decimal(value: &Option<BigDecimal>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
