use crate::domain::dates::{format_date, format_date_time};
use crate::domain::validation::format_phone_display;
use crate::domain::{countdown, VehicleType};
use crate::templates::{desktop_layout, notice, Notice, NoticeKind};
use crate::view::{CustomFilter, FilterState, FilteredView, RefreshFailure};
use chrono::NaiveDate;
use maud::{html, Markup};

pub struct RegistrationsVm<'a> {
    pub user: &'a str,
    pub view: &'a FilteredView<'a>,
    pub filters: &'a FilterState,
    /// Custom filter that produced `view`, if any. Only export links carry it.
    pub custom: Option<CustomFilter>,
    pub today: NaiveDate,
    pub notice: Option<Notice>,
    pub last_error: Option<RefreshFailure>,
}

/// Last eight characters of a document id.
fn short_id(id: &str) -> &str {
    let start = id.char_indices().rev().nth(7).map(|(i, _)| i).unwrap_or(0);
    &id[start..]
}

fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Export links serialize the rows on screen, custom filter included.
fn export_query(query: &str, custom: Option<CustomFilter>) -> String {
    match custom {
        Some(c) if query.is_empty() => format!("view={}", c.as_str()),
        Some(c) => format!("{query}&view={}", c.as_str()),
        None => query.to_string(),
    }
}

fn filter_form(filters: &FilterState) -> Markup {
    html! {
        form class="filters card" method="get" action="/registrations" {
            label { "Search" br; input type="search" name="q" value=(filters.global) placeholder="Search all fields"; }
            label { "Owner" br; input type="text" name="owner" value=(filters.owner_name); }
            label { "Reg number" br; input type="text" name="reg" value=(filters.reg_number); }
            label {
                "Vehicle type" br;
                select name="type" {
                    option value="" { "All" }
                    @for t in VehicleType::ALL {
                        option value=(t.as_str()) selected[filters.vehicle_type == t.as_str()] { (t.display_name()) }
                    }
                }
            }
            label {
                "Status" br;
                select name="status" {
                    option value="" { "All" }
                    @for s in ["pending", "approved", "rejected"] {
                        option value=(s) selected[filters.status == s] { (s) }
                    }
                }
            }
            label { "Expiry date" br; input type="date" name="expiring" value=(filters.expiring_date); }
            button type="submit" { "Apply filters" }
            a href="/registrations?clear=1" { "Clear filters" }
        }
    }
}

fn rows(vm: &RegistrationsVm) -> Markup {
    html! {
        @for row in &vm.view.rows {
            @let reg = &row.record;
            @let level = row.urgency.level.as_str();
            tr data-id=(reg.id) class=(format!("urgency-{level}")) {
                td { span class="registration-id" { (short_id(&reg.id)) } }
                td { strong { (reg.owner_name.as_deref().unwrap_or("N/A")) } }
                td { (reg.phone().map(format_phone_display).unwrap_or_else(|| "N/A".into())) }
                td { (reg.email().unwrap_or("N/A")) }
                td { span class="vehicle-type-badge" { (reg.vehicle_label()) } }
                td { strong { (reg.registration_number.as_deref().unwrap_or("N/A")) } }
                td { (format_date(reg.testing_date.as_deref())) }
                td class="expiry-cell" {
                    div class="expiry-date" { (format_date(reg.expiring_date.as_deref())) }
                    div class=(format!("expiry-urgency urgency-{level}")) {
                        (countdown(reg.expiring_date.as_deref(), vm.today))
                    }
                }
                td { span class=(format!("status-badge status-{}", reg.status())) { (reg.status().to_uppercase()) } }
                td { (format_date_time(reg.submitted_or_created())) }
            }
        }
    }
}

pub fn registrations_page(vm: &RegistrationsVm) -> Markup {
    let query = vm.filters.to_query_string();
    let export = export_query(&query, vm.custom);

    desktop_layout(
        "Registrations",
        Some(vm.user),
        html! {
            main class="container" {
                h1 { "Vehicle registrations" }

                @if let Some(n) = &vm.notice {
                    (notice(n))
                }
                @if let Some(failure) = &vm.last_error {
                    (notice(&Notice::new(NoticeKind::Error, failure.message.as_str())))
                }

                (filter_form(vm.filters))

                div class="toolbar" {
                    span class="counts" {
                        "Showing " strong { (vm.view.visible()) } " of " strong { (vm.view.total) } " registrations"
                    }
                    " "
                    form method="post" action=(with_query("/registrations/refresh", &query)) style="display:inline" {
                        button type="submit" { "Refresh" }
                    }
                    " "
                    a href=(with_query("/registrations/export.csv", &export)) { "Export CSV" }
                    " "
                    a href=(with_query("/registrations/export.xlsx", &export)) { "Export XLSX" }
                }

                table {
                    thead {
                        tr {
                            th { "ID" } th { "Owner" } th { "Phone" } th { "Email" }
                            th { "Vehicle" } th { "Reg Number" } th { "Testing" }
                            th { "Expiry" } th { "Status" } th { "Submitted" }
                        }
                    }
                    tbody {
                        @if vm.view.total == 0 {
                            tr {
                                td colspan="10" class="no-results" {
                                    p { strong { "No registrations found" } }
                                    a href="/register" { "Add Registration" }
                                }
                            }
                        } @else if vm.view.is_empty() {
                            tr {
                                td colspan="10" class="no-results" {
                                    p { "No registrations match your filters." }
                                    a href="/registrations?clear=1" { "Clear filters" }
                                }
                            }
                        } @else {
                            (rows(vm))
                        }
                    }
                }
            }
        },
    )
}
