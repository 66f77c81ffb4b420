mod auth_tests;
mod dashboard_tests;
mod export_tests;
mod registrations_tests;
