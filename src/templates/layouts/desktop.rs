use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header nav ul { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
main.container { max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
main.narrow { max-width: 420px; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 1rem; }
.stat-value { font-size: 2rem; font-weight: 700; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e5e7eb; }
tr.urgency-expired { background: #fee2e2; }
tr.urgency-critical { background: #ffedd5; }
tr.urgency-warning { background: #fef9c3; }
.notice { padding: 0.75rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.notice-info { background: #dbeafe; }
.notice-success { background: #dcfce7; }
.notice-warning { background: #fef3c7; }
.notice-error { background: #fee2e2; }
.field-error { color: #dc2626; font-size: 0.85rem; }
.filters { display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: end; }
"#;

pub fn desktop_layout(title: &str, user: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Vehicle Registry" }
                style { (PreEscaped(STYLES)) }
            }
            body {
                header {
                    h3 { "Vehicle Registry" }
                    @if let Some(email) = user {
                        nav {
                            ul {
                                li { a href="/dashboard" { "Dashboard" } }
                                li { a href="/registrations" { "Registrations" } }
                                li { a href="/register" { "Register" } }
                            }
                        }
                        form method="post" action="/logout" {
                            span class="user" { (email) " " }
                            button type="submit" { "Logout" }
                        }
                    } @else {
                        a href="/login" { "Login" }
                    }
                }
                (content)
            }
        }
    }
}
