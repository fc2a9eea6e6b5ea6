use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, is_admin: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Brokerage" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { "Brokerage" }
                    nav {
                        ul {
                            li { a href="/" { "Home" } }
                            li { a href="/properties" { "Properties" } }
                            li { a href="/projects" { "Projects" } }
                            @if is_admin {
                                li { a href="/admin" { "Admin" } }
                            }
                        }
                    }
                    @if is_admin {
                        form action="/logout" method="post" class="inline" {
                            button type="submit" class="link" { "Log out" }
                        }
                    } @else {
                        a href="/login" class="text-base font-medium" { "Staff login" }
                    }
                }
                (content)
            }
        }
    }
}
