use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Staff login",
        false,
        html! {
            main class="container narrow" {
                h1 { "Staff login" }
                @if let Some(msg) = error {
                    p class="error" { (msg) }
                }
                form method="post" action="/login" {
                    label for="token" { "Staff token" }
                    input type="password" id="token" name="token" autocomplete="current-password" required;
                    button type="submit" class="primary" { "Sign in" }
                }
            }
        },
    )
}
