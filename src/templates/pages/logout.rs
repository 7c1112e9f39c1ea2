use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn logout_page() -> Markup {
    desktop_layout(
        "Signed out",
        html! {
            main class="container narrow" {
                section class="card" {
                    h3 { "Signed out" }
                    p { "Your token bundle has been cleared from this browser." }
                    a href="/login" { "Sign in again" }
                }
            }
        },
    )
}
