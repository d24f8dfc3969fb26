//! CSV exports of batch tables and the dashboard.

use api_types::analytics::RangeQuery;
use axum::{
    Extension,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use csv::Writer;
use engine::{
    Entry, Totals, User,
    analytics::sum_totals,
    money::{checked_sum, format_amount, format_percent},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{ServerError, analytics::load_dashboard, server::ServerState};

/// One row of an entry table: date, item, category, quantity, unit amount, total.
type EntryRow<'a> = (
    Option<NaiveDate>,
    &'a str,
    &'a str,
    Decimal,
    Decimal,
    Decimal,
);

/// `<kind>_<name with underscores>_<date>.csv`
fn export_file_name(kind: &str, batch_name: &str, today: NaiveDate) -> String {
    let name: String = batch_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{kind}_{name}_{}.csv", today.format("%Y-%m-%d"))
}

/// Free text cell, quoted with a leading `'` when a spreadsheet would read it
/// as a formula.
fn text_cell(value: &str) -> String {
    if value.starts_with(['=', '+', '-', '@', '\t', '\r']) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

fn write_rows<I, R>(rows: I) -> Result<Vec<u8>, ServerError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = Writer::from_writer(vec![]);
    for row in rows {
        writer.write_record(row).map_err(|err| {
            tracing::error!("failed to write export row: {err}");
            ServerError::Export(err.to_string())
        })?;
    }
    writer.into_inner().map_err(|err| {
        tracing::error!("failed to finalize export: {err}");
        ServerError::Export(err.to_string())
    })
}

fn entry_table(
    header: [&str; 6],
    total_label: &str,
    rows: &[EntryRow<'_>],
) -> Result<Vec<u8>, ServerError> {
    let total = checked_sum(rows.iter().map(|row| row.5))?;

    let mut table: Vec<Vec<String>> = vec![header.iter().map(ToString::to_string).collect()];
    table.extend(rows.iter().map(|(date, item, category, quantity, unit, line)| {
        vec![
            date.map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            text_cell(item),
            text_cell(category),
            quantity.normalize().to_string(),
            format_amount(*unit),
            format_amount(*line),
        ]
    }));
    table.push(vec![
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        total_label.to_string(),
        format_amount(total),
    ]);
    write_rows(table)
}

fn report_table(totals: &Totals) -> Result<Vec<u8>, ServerError> {
    write_rows([
        ["Metric".to_string(), "Value".to_string()],
        ["Total Expenses".to_string(), format_amount(totals.total_expenses)],
        ["Total Earnings".to_string(), format_amount(totals.total_earnings)],
        ["Profit/Loss".to_string(), format_amount(totals.profit_loss)],
        ["Return on Investment (ROI)".to_string(), format_percent(totals.roi)],
    ])
}

fn csv_response(file_name: String, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}

pub async fn batch_expenses(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let detail = state.engine.batch_detail(&user, batch_id).await?;
    let rows: Vec<EntryRow<'_>> = detail
        .expenses
        .iter()
        .map(|e| {
            (
                e.transaction_date,
                e.item_name.as_str(),
                e.category(),
                e.quantity,
                e.cost_per_unit,
                e.total(),
            )
        })
        .collect();
    let body = entry_table(
        ["Date", "Item", "Category", "Quantity", "Cost/Unit", "Total"],
        "Total Expenses:",
        &rows,
    )?;

    let today = Utc::now().date_naive();
    Ok(csv_response(
        export_file_name("expenses", &detail.batch.name, today),
        body,
    ))
}

pub async fn batch_earnings(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let detail = state.engine.batch_detail(&user, batch_id).await?;
    let rows: Vec<EntryRow<'_>> = detail
        .earnings
        .iter()
        .map(|e| {
            (
                e.transaction_date,
                e.item_name.as_str(),
                e.category(),
                e.quantity,
                e.amount_per_unit,
                e.total(),
            )
        })
        .collect();
    let body = entry_table(
        ["Date", "Item", "Category", "Quantity", "Amount/Unit", "Total"],
        "Total Earnings:",
        &rows,
    )?;

    let today = Utc::now().date_naive();
    Ok(csv_response(
        export_file_name("earnings", &detail.batch.name, today),
        body,
    ))
}

pub async fn batch_report(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let detail = state.engine.batch_detail(&user, batch_id).await?;
    let totals = Totals::new(sum_totals(&detail.expenses)?, sum_totals(&detail.earnings)?)?;
    let body = report_table(&totals)?;

    let today = Utc::now().date_naive();
    Ok(csv_response(
        export_file_name("analytics", &detail.batch.name, today),
        body,
    ))
}

pub async fn dashboard(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let dashboard = load_dashboard(&state, &user, &query).await?;

    let mut table = vec![[
        "Batch".to_string(),
        "Expenses".to_string(),
        "Earnings".to_string(),
        "Profit/Loss".to_string(),
    ]];
    table.extend(dashboard.batches.iter().map(|summary| {
        [
            text_cell(&summary.batch.name),
            format_amount(summary.totals.total_expenses),
            format_amount(summary.totals.total_earnings),
            format_amount(summary.totals.profit_loss),
        ]
    }));
    table.push([
        "Total".to_string(),
        format_amount(dashboard.overall.total_expenses),
        format_amount(dashboard.overall.total_earnings),
        format_amount(dashboard.overall.profit_loss),
    ]);
    let body = write_rows(table)?;

    Ok(csv_response(
        format!("dashboard_report_{}.csv", dashboard.until.format("%Y-%m-%d")),
        body,
    ))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn file_name_replaces_whitespace() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(
            export_file_name("expenses", "Spring  layers A", today),
            "expenses_Spring_layers_A_2026-03-05.csv"
        );
    }

    #[test]
    fn entry_table_appends_total_row() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let rows = [
            (Some(date), "Layer mash", "FEED", d("10"), d("2.5"), d("25")),
            (None, "Newcastle", "VACCINES", d("2"), d("2"), d("4")),
        ];
        let body = entry_table(
            ["Date", "Item", "Category", "Quantity", "Cost/Unit", "Total"],
            "Total Expenses:",
            &rows,
        )
        .unwrap();

        let text = String::from_utf8(body).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Date,Item,Category,Quantity,Cost/Unit,Total");
        assert_eq!(lines[1], "2026-03-05,Layer mash,FEED,10,2.50,25.00");
        assert_eq!(lines[2], "N/A,Newcastle,VACCINES,2,2.00,4.00");
        assert_eq!(lines[3], ",,,,Total Expenses:,29.00");
    }

    #[test]
    fn report_table_shows_roi_or_na() {
        let body = report_table(&Totals::new(d("29"), d("30")).unwrap()).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Profit/Loss,1.00"));
        assert!(text.contains("Return on Investment (ROI),3.45%"));

        let body = report_table(&Totals::new(Decimal::ZERO, d("5")).unwrap()).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Return on Investment (ROI),N/A"));
    }

    #[test]
    fn formula_like_text_is_quoted() {
        assert_eq!(text_cell("=HYPERLINK(\"x\")"), "'=HYPERLINK(\"x\")");
        assert_eq!(text_cell("+1"), "'+1");
        assert_eq!(text_cell("-2"), "'-2");
        assert_eq!(text_cell("@SUM(A1)"), "'@SUM(A1)");
        assert_eq!(text_cell("Layer mash"), "Layer mash");

        let rows = [(None, "=1+1", "@cmd", d("1"), d("0"), d("0"))];
        let body = entry_table(
            ["Date", "Item", "Category", "Quantity", "Cost/Unit", "Total"],
            "Total Expenses:",
            &rows,
        )
        .unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.lines().nth(1), Some("N/A,'=1+1,'@cmd,1,0.00,0.00"));
    }

    #[test]
    fn entry_table_total_overflow_is_an_error() {
        let huge = d("50000000000000000000000000000");
        let rows = [
            (None, "a", "FEED", d("1"), huge, huge),
            (None, "b", "FEED", d("1"), huge, huge),
        ];
        assert!(
            entry_table(
                ["Date", "Item", "Category", "Quantity", "Cost/Unit", "Total"],
                "Total Expenses:",
                &rows,
            )
            .is_err()
        );
    }
}
