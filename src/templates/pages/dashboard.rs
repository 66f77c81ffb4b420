use crate::domain::dates::parse_timestamp;
use crate::templates::components::stat_card;
use crate::templates::{card, desktop_layout};
use crate::view::stats::time_ago;
use crate::view::DashboardStats;
use chrono::NaiveDateTime;
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub email: &'a str,
    pub stats: DashboardStats<'a>,
    pub now: NaiveDateTime,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        Some(vm.email),
        html! {
            main class="container" {
                h1 { "Dashboard" }
                p { "Signed in as " strong { (vm.email) } }

                section class="stats" {
                    (stat_card("Total registrations", vm.stats.total, "/registrations"))
                    (stat_card("Pending", vm.stats.pending, "/registrations?status=pending"))
                    (stat_card("This month", vm.stats.this_month, "/registrations"))
                    (stat_card("Expiring soon", vm.stats.expiring_soon, "/registrations?view=expiring-soon"))
                    (stat_card("Expired", vm.stats.expired, "/registrations?view=expired"))
                }

                (card("Recent activity", html! {
                    @if vm.stats.recent.is_empty() {
                        p { strong { "No registrations yet" } }
                        p { "Start by adding your first vehicle registration. " a href="/register" { "Register a vehicle" } }
                    } @else {
                        ul class="activity" {
                            @for row in &vm.stats.recent {
                                @let reg = &row.record;
                                li {
                                    strong { (reg.owner_name.as_deref().unwrap_or("Unknown")) }
                                    " registered "
                                    (reg.vehicle_type.as_deref().unwrap_or("vehicle"))
                                    " · "
                                    @match reg.submitted_or_created().and_then(parse_timestamp) {
                                        Some(at) => (time_ago(at, vm.now)),
                                        None => "date unknown",
                                    }
                                    br;
                                    small {
                                        "Registration: " (reg.registration_number.as_deref().unwrap_or("N/A"))
                                        " · Email: " (reg.email().unwrap_or("N/A"))
                                    }
                                    " "
                                    span class=(format!("status status-{}", reg.status())) {
                                        (reg.status().to_uppercase())
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}
