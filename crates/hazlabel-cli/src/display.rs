//! Terminal rendering for the task table and the per-task card.
//!
//! The table mirrors the dashboard columns with long text truncated; the
//! card shows one task in full, grouped by section.

use chrono::{DateTime, Utc};

use hazlabel_core::{HazardTask, LabelField, Taxonomy, time_remaining};
use hazlabel_engine::Agreement;
use hazlabel_host::{AuditRecord, Row, TableView};
use hazlabel_store::{FilterOptions, RowFlags};

const ID_WIDTH: usize = 10;
const SITE_WIDTH: usize = 14;
const LOCATION_WIDTH: usize = 16;
const LABEL_WIDTH: usize = 22;
const TIME_WIDTH: usize = 10;

// ── Table ──

/// Print one page of the table plus its pager line.
pub fn print_table(view: &TableView) {
    if view.rows.is_empty() {
        println!("No tasks match the current filters.");
        return;
    }

    println!(
        "  {:<id$} {:<16} {:<site$} {:<loc$} {:<lab$} {:<lab$} {:<lab$} {:<time$} {}",
        "ID",
        "REPORTED",
        "SITE",
        "LOCATION",
        "TBC",
        "PSPP",
        "GR",
        "TIME LEFT",
        "STATUS",
        id = ID_WIDTH,
        site = SITE_WIDTH,
        loc = LOCATION_WIDTH,
        lab = LABEL_WIDTH,
        time = TIME_WIDTH,
    );
    for row in &view.rows {
        print_row(row);
    }

    println!();
    print!(
        "Page {} of {} ({} results, {} per page)",
        view.page, view.total_pages, view.total_results, view.page_size
    );
    if view.active_filters > 0 {
        print!(", {} filters active", view.active_filters);
    }
    println!();
}

fn print_row(row: &Row) {
    let task = &row.task;
    let marker = if row.flags.urgent {
        '!'
    } else if row.flags.low_relevance {
        '?'
    } else {
        ' '
    };
    let labels: Vec<String> = Taxonomy::ALL
        .into_iter()
        .map(|t| label_cell(task.field(t)))
        .collect();
    println!(
        "{marker} {:<id$} {:<16} {:<site$} {:<loc$} {:<lab$} {:<lab$} {:<lab$} {:<time$} {}",
        truncate(&task.id, ID_WIDTH),
        task.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        truncate(&task.site, SITE_WIDTH),
        truncate(&task.location, LOCATION_WIDTH),
        truncate(&labels[0], LABEL_WIDTH),
        truncate(&labels[1], LABEL_WIDTH),
        truncate(&labels[2], LABEL_WIDTH),
        row.countdown.to_string(),
        task.status(),
        id = ID_WIDTH,
        site = SITE_WIDTH,
        loc = LOCATION_WIDTH,
        lab = LABEL_WIDTH,
        time = TIME_WIDTH,
    );
}

/// Compact cell text: display label with its lifecycle marker.
fn label_cell(field: &LabelField) -> String {
    let Some(label) = field.display_label() else {
        return "-".to_string();
    };
    if field.is_auto_confirmed() {
        format!("{label} [auto]")
    } else if field.human_label().is_some() {
        format!("{label} [human]")
    } else {
        format!("{label} ({}%)", field.top_relevance())
    }
}

// ── Card ──

/// Print a single task as a vertical card.
pub fn print_task_card(task: &HazardTask, now: DateTime<Utc>) {
    println!("=== {} ===", task.id);
    if !task.description.is_empty() {
        println!("{}", task.description);
    }
    println!();

    println!("Report");
    print_kv("reported_at", &task.timestamp.to_rfc3339());
    print_kv("reporter", task.reporter.as_deref().unwrap_or_default());
    print_kv("pic_company", &task.pic_company);
    print_kv("site", &task.site);
    print_kv("location", &task.location);
    print_kv("detail_location", &task.detail_location);
    print_kv("nonconformity", &task.nonconformity);
    print_kv("sub_nonconformity", &task.sub_nonconformity);
    print_kv("image_url", &task.image_url);

    println!("Evaluation");
    let flags = RowFlags::of(task, now);
    print_kv("status", task.status().as_str());
    print_kv("sla_deadline", &task.sla_deadline().to_rfc3339());
    print_kv(
        "time_left",
        &time_remaining(task.sla_deadline(), now).to_string(),
    );
    if flags.urgent {
        print_kv("warning", "deadline is close");
    }
    if flags.low_relevance {
        print_kv("warning", "low AI relevance");
    }
    if let Some(at) = task.submitted_at() {
        print_kv("submitted_at", &at.to_rfc3339());
        print_kv("submitted_by", task.submitted_by().unwrap_or_default());
        print_kv(
            "justification",
            task.final_justification().unwrap_or_default(),
        );
    }

    for (taxonomy, field) in task.fields() {
        print_field_section(taxonomy, field);
    }
}

fn print_field_section(taxonomy: Taxonomy, field: &LabelField) {
    println!("{}", taxonomy.display_name());
    print_kv("state", field.state().as_str());
    print_kv(
        "label",
        field.display_label().unwrap_or("(no candidates)"),
    );
    if field.human_label().is_some() {
        print_kv("agreement", Agreement::of(field).as_str());
    }
    if let Some(by) = field.annotated_by() {
        print_kv("annotated_by", by);
    }
    if let Some(at) = field.annotated_at() {
        print_kv("annotated_at", &at.to_rfc3339());
    }
    if let Some(note) = field.annotation_note() {
        print_kv("note", note);
    }
    for (rank, candidate) in field.candidates().iter().enumerate() {
        println!(
            "    #{} {:<40} {:>3}%  {}",
            rank + 1,
            candidate.label,
            candidate.relevance,
            candidate.reasoning
        );
    }
}

// ── Filter options and audit ──

pub fn print_filter_options(options: &FilterOptions) {
    print_list("sites", &options.sites);
    print_list("locations", &options.locations);
    print_list("detail_locations", &options.detail_locations);
    print_list("nonconformities", &options.nonconformities);
    print_list("sub_nonconformities", &options.sub_nonconformities);
    print_list("pic_companies", &options.pic_companies);
    for (taxonomy, labels) in &options.labels {
        print_list(&format!("{taxonomy} labels"), labels);
    }
}

pub fn print_audit(records: &[AuditRecord]) {
    for r in records {
        println!(
            "  {} {:<22} {:<14} {}",
            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            r.event_type,
            r.resource,
            r.detail
        );
    }
}

// ── Helpers ──

fn print_kv(key: &str, value: &str) {
    if !value.is_empty() {
        println!("  {key:<20} {value}");
    }
}

fn print_list(header: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    println!("{header}");
    for v in values {
        println!("  - {v}");
    }
}

/// Cut `s` to `width` characters, marking the cut with `~`.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
