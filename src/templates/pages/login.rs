use crate::templates::{desktop_layout, notice, Notice, NoticeKind};
use maud::{html, Markup};

pub fn login_page(error: Option<&str>, email: &str) -> Markup {
    desktop_layout(
        "Sign in",
        None,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                @if let Some(msg) = error {
                    (notice(&Notice::new(NoticeKind::Error, msg)))
                }
                form method="post" action="/login" {
                    p {
                        label for="email" { "Email address" }
                        br;
                        input type="email" id="email" name="email" value=(email)
                            autocomplete="email" required;
                    }
                    p {
                        label for="password" { "Password" }
                        br;
                        input type="password" id="password" name="password"
                            autocomplete="current-password" required;
                    }
                    button type="submit" class="primary" { "Sign in" }
                }
            }
        },
    )
}
