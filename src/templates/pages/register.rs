use crate::domain::validation::RegistrationForm;
use crate::domain::VehicleType;
use crate::errors::ValidationErrors;
use crate::templates::components::field_error;
use crate::templates::{desktop_layout, notice, Notice, NoticeKind};
use chrono::NaiveDate;
use maud::{html, Markup};

pub struct RegisterVm<'a> {
    pub user: &'a str,
    pub form: &'a RegistrationForm,
    pub errors: &'a ValidationErrors,
    pub today: NaiveDate,
}

fn text_field(label: &str, name: &str, kind: &str, value: &str, error: Option<&str>) -> Markup {
    html! {
        p {
            label for=(name) { (label) }
            br;
            input type=(kind) id=(name) name=(name) value=(value) required;
            (field_error(error))
        }
    }
}

pub fn register_page(vm: &RegisterVm) -> Markup {
    let min_date = vm.today.format("%Y-%m-%d").to_string();
    let form = vm.form;

    desktop_layout(
        "Register vehicle",
        Some(vm.user),
        html! {
            main class="container narrow" {
                h1 { "Register a vehicle" }
                @if !vm.errors.is_empty() {
                    (notice(&Notice::new(NoticeKind::Error, "Please fix the highlighted fields.")))
                }
                form method="post" action="/register" novalidate {
                    (text_field("Owner name", "ownerName", "text", &form.owner_name, vm.errors.get("ownerName")))
                    (text_field("Email", "ownerEmail", "email", &form.owner_email, vm.errors.get("ownerEmail")))
                    (text_field("Phone", "ownerPhone", "tel", &form.owner_phone, vm.errors.get("ownerPhone")))
                    p {
                        label for="vehicleType" { "Vehicle type" }
                        br;
                        select id="vehicleType" name="vehicleType" required {
                            option value="" selected[form.vehicle_type.is_empty()] { "Select vehicle type" }
                            @for t in VehicleType::ALL {
                                option value=(t.as_str()) selected[form.vehicle_type == t.as_str()] {
                                    (t.display_name())
                                }
                            }
                        }
                        (field_error(vm.errors.get("vehicleType")))
                    }
                    (text_field("Registration number", "registrationNumber", "text", &form.registration_number, vm.errors.get("registrationNumber")))
                    p {
                        label for="testingDate" { "Testing date" }
                        br;
                        input type="date" id="testingDate" name="testingDate" min=(min_date)
                            value=(form.testing_date) required;
                        (field_error(vm.errors.get("testingDate")))
                    }
                    p {
                        label for="expiringDate" { "Expiring date" }
                        br;
                        input type="date" id="expiringDate" name="expiringDate" min=(min_date)
                            value=(form.expiring_date) required;
                        (field_error(vm.errors.get("expiringDate")))
                    }
                    button type="submit" class="primary" { "Submit registration" }
                }
            }
        },
    )
}
