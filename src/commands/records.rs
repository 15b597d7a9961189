use std::time::Duration;

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_json, report_feedback};
use crate::api::{HttpBackend, Mutation, Resource, ResourceBackend};
use crate::controller::{
    FetchOutcome, FilteredListController, ListQuery, debounce_channel, drive_search,
};
use crate::error::{FloranetError, Result};
use crate::pages::{cctv, check_filter, collections, complaints};
use crate::projection::{CctvRow, CollectionRow, ComplaintRow, Project};
use crate::types::{CctvRequest, CollectionBatch, Complaint, RecordId};

/// A resource the CLI can list, show and mutate
pub trait Listing: Resource + Project + Serialize {
    /// Plural used in headings and empty-list messages
    const PLURAL: &'static str;
    const FILTERS: &'static [&'static str];

    fn table(rows: &[Self::Row]) -> Table;

    fn detail(row: &Self::Row) -> String;
}

#[derive(Tabled)]
struct ComplaintTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Resident")]
    resident: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "Follow-ups")]
    followups: usize,
}

impl Listing for Complaint {
    const PLURAL: &'static str = "complaints";
    const FILTERS: &'static [&'static str] = complaints::FILTERS;

    fn table(rows: &[ComplaintRow]) -> Table {
        Table::new(rows.iter().map(|r| ComplaintTableRow {
            id: r.id.to_string(),
            title: r.title.clone(),
            resident: r.resident.clone(),
            unit: r.unit.clone(),
            status: r.status.to_string(),
            priority: r.priority.to_string(),
            submitted: format!("{} {}", r.submitted_date, r.submitted_time),
            followups: r.followup_count,
        }))
    }

    fn detail(row: &ComplaintRow) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", format!("#{}", row.id).cyan(), row.title.bold()));
        out.push_str(&format!("{}: {}\n", "Category".green().bold(), row.category));
        out.push_str(&format!(
            "{}: {} ({})\n",
            "Resident".green().bold(),
            row.resident,
            row.unit
        ));
        out.push_str(&format!("{}: {}\n", "Status".green().bold(), row.status));
        out.push_str(&format!("{}: {}\n", "Priority".green().bold(), row.priority));
        out.push_str(&format!(
            "{}: {} {}\n",
            "Submitted".green().bold(),
            row.submitted_date,
            row.submitted_time
        ));
        out.push_str(&format!("{}: {}\n", "Remarks".green().bold(), row.remarks));
        out.push_str(&format!("\n{}\n", row.description));

        if row.expanded {
            out.push_str(&format!("\n{} ({})\n", "Follow-ups".cyan().bold(), row.followup_count));
            for followup in &row.followups {
                out.push_str(&format!(
                    "  {} {}\n",
                    format!("[{} {} - {}]", followup.date, followup.time, followup.author).dimmed(),
                    followup.content
                ));
            }
        }
        out
    }
}

#[derive(Tabled)]
struct CctvTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Resident")]
    resident: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Incident")]
    incident: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Footage")]
    footage: usize,
}

impl Listing for CctvRequest {
    const PLURAL: &'static str = "CCTV requests";
    const FILTERS: &'static [&'static str] = cctv::FILTERS;

    fn table(rows: &[CctvRow]) -> Table {
        Table::new(rows.iter().map(|r| CctvTableRow {
            id: r.id.to_string(),
            resident: r.resident.clone(),
            location: r.location.clone(),
            incident: format!("{} {}", r.incident_date, r.incident_time),
            status: r.status.to_string(),
            footage: r.footage_count,
        }))
    }

    fn detail(row: &CctvRow) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", format!("#{}", row.id).cyan(), row.location.bold()));
        out.push_str(&format!(
            "{}: {} ({})\n",
            "Resident".green().bold(),
            row.resident,
            row.unit
        ));
        out.push_str(&format!(
            "{}: {} {}\n",
            "Incident".green().bold(),
            row.incident_date,
            row.incident_time
        ));
        out.push_str(&format!("{}: {}\n", "Status".green().bold(), row.status));
        out.push_str(&format!("{}: {}\n", "Remarks".green().bold(), row.remarks));
        out.push_str(&format!("\n{}\n", row.reason));

        if row.expanded {
            out.push_str(&format!("\n{} ({})\n", "Footage".cyan().bold(), row.footage_count));
            for footage in &row.footage {
                out.push_str(&format!(
                    "  {} {} {}\n",
                    format!("[{}]", footage.id).cyan(),
                    footage.description,
                    format!("{} ({})", footage.path, footage.uploaded).dimmed()
                ));
            }
        }
        out
    }
}

#[derive(Tabled)]
struct CollectionTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Collected")]
    collected: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl Listing for CollectionBatch {
    const PLURAL: &'static str = "collections";
    const FILTERS: &'static [&'static str] = collections::FILTERS;

    fn table(rows: &[CollectionRow]) -> Table {
        Table::new(rows.iter().map(|r| CollectionTableRow {
            id: r.id.to_string(),
            title: r.title.clone(),
            period: r.billing_period.clone(),
            total: r.total_amount.clone(),
            collected: r.collected_amount.clone(),
            status: r.status.to_string(),
            created: r.created_date.clone(),
        }))
    }

    fn detail(row: &CollectionRow) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", format!("#{}", row.id).cyan(), row.title.bold()));
        out.push_str(&format!("{}: {}\n", "Billing period".green().bold(), row.billing_period));
        out.push_str(&format!("{}: {}\n", "Total".green().bold(), row.total_amount));
        out.push_str(&format!("{}: {}\n", "Collected".green().bold(), row.collected_amount));
        out.push_str(&format!("{}: {}\n", "Status".green().bold(), row.status));
        out.push_str(&format!("{}: {}\n", "Created".green().bold(), row.created_date));
        out
    }
}

/// Options for a list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub page: u32,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub expand: Vec<RecordId>,
    pub json: bool,
}

impl ListOptions {
    fn to_query<R: Listing>(&self) -> Result<ListQuery> {
        let mut query = ListQuery::new();
        if let Some(search) = &self.search {
            query.set_search_text(search.clone());
        }
        for (name, value) in &self.filters {
            check_filter(R::FILTERS, name)?;
            query.set_filter(name.clone(), value.clone());
        }
        query.set_page(self.page);
        Ok(query)
    }
}

fn print_page<R: Listing, B: ResourceBackend<R>>(controller: &FilteredListController<R, B>) {
    let rows = controller.rows();
    let Some(page) = controller.page() else {
        return;
    };

    if rows.is_empty() {
        println!("No {} found.", R::PLURAL);
    } else {
        let mut table = R::table(&rows);
        table.with(Style::rounded());
        println!("{table}");

        let expanded = controller
            .items()
            .iter()
            .zip(&rows)
            .filter(|(record, _)| controller.is_expanded(record.id()));
        for (_, row) in expanded {
            println!("\n{}", R::detail(row));
        }
    }

    let range = match (page.from, page.to) {
        (Some(from), Some(to)) => format!("Showing {} to {} of {} results", from, to, page.total),
        _ => format!("Showing 0 of {} results", page.total),
    };
    println!(
        "\n{} {}",
        range,
        format!("(page {} of {})", page.current_page, page.last_page).dimmed()
    );
}

/// List one page of records
pub async fn cmd_list<R: Listing>(backend: HttpBackend, options: ListOptions) -> Result<()> {
    let query = options.to_query::<R>()?;
    let mut controller: FilteredListController<R, HttpBackend> =
        FilteredListController::with_query(backend, query);

    if controller.fetch_list().await == FetchOutcome::Failed {
        return report_feedback(controller.feedback(), options.json);
    }
    for id in &options.expand {
        controller.toggle_expand(id);
    }

    if options.json {
        let nav = controller.page_nav();
        let page = controller.page();
        return print_json(&json!({
            "items": controller.items(),
            "current_page": page.map(|p| p.current_page),
            "last_page": page.map(|p| p.last_page),
            "per_page": page.map(|p| p.per_page),
            "total": page.map(|p| p.total),
            "from": page.and_then(|p| p.from),
            "to": page.and_then(|p| p.to),
            "has_prev": nav.map(|n| n.has_prev()),
            "has_next": nav.map(|n| n.has_next()),
        }));
    }

    print_page(&controller);
    Ok(())
}

/// Show one record with its detail section expanded
pub async fn cmd_show<R: Listing>(backend: HttpBackend, id: RecordId, json: bool) -> Result<()> {
    let controller: FilteredListController<R, HttpBackend> = FilteredListController::new(backend);
    let record = controller.fetch_record(&id).await?;

    if json {
        print_json(&record)
    } else {
        print!("{}", R::detail(&record.project(true)));
        Ok(())
    }
}

/// Apply one row mutation and report the resulting feedback
pub async fn cmd_mutate<R: Listing>(
    backend: HttpBackend,
    id: RecordId,
    mutation: Mutation<R>,
    json: bool,
) -> Result<()> {
    let mut controller: FilteredListController<R, HttpBackend> = FilteredListController::new(backend);
    controller.apply_row_mutation(&id, mutation).await;
    report_feedback(controller.feedback(), json)
}

/// Interactive search: each stdin line replaces the search text, and the
/// list is refetched once typing settles.
pub async fn cmd_search<R: Listing>(
    backend: HttpBackend,
    options: ListOptions,
    delay: Duration,
) -> Result<()> {
    let query = options.to_query::<R>()?;
    let mut controller: FilteredListController<R, HttpBackend> =
        FilteredListController::with_query(backend, query);

    if controller.fetch_list().await == FetchOutcome::Failed {
        report_feedback(controller.feedback(), false)?;
    }
    print_page(&controller);
    eprintln!("{}", "Type to search; Ctrl-D to finish.".dimmed());

    let (tx, input) = debounce_channel(delay);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    drive_search(&mut controller, input, |controller, outcome| match outcome {
        FetchOutcome::Applied => print_page(controller),
        FetchOutcome::Failed => {
            eprintln!("{}", controller.feedback().message.red());
        }
        FetchOutcome::Stale | FetchOutcome::Skipped => {}
    })
    .await;

    reader
        .await
        .map_err(|e| FloranetError::ActionFailed(format!("stdin reader stopped: {e}")))
}

/// Print the public URL of a stored file
pub fn cmd_download(backend: &HttpBackend, path: &str, json: bool) -> Result<()> {
    let url = backend.storage_url(path)?;
    if json {
        print_json(&json!({ "path": path, "url": url.as_str() }))
    } else {
        println!("{url}");
        Ok(())
    }
}
