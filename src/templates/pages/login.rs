use crate::auth::login::LoginParams;
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Two-step login: open the Tesla authorize URL, then paste the
/// void-callback URL the browser lands on back into the form. The PKCE
/// verifier rides along as a hidden field so the callback can complete
/// the exchange.
pub fn login_page(params: &LoginParams) -> Markup {
    desktop_layout(
        "Sign in",
        html! {
            main class="container narrow" {
                h1 { "Sign in with Tesla" }

                section class="card" {
                    h3 { "Step 1" }
                    p { "Sign in on Tesla's own login page. After signing in you will land on a blank \"Page Not Found\" — that is expected." }
                    a class="btn" href=(params.auth_url) target="_blank" rel="noopener" { "Open Tesla login" }
                }

                section class="card" {
                    h3 { "Step 2" }
                    p { "Copy the full URL of that blank page and paste it here." }
                    form action="/callback" method="post" {
                        label for="url" { "Redirected URL" }
                        input type="url" id="url" name="url" required
                            placeholder="https://auth.tesla.com/void/callback?code=...";
                        input type="hidden" name="verifier" value=(params.code_verifier);
                        button type="submit" class="btn" style="margin-top: 12px;" { "Complete sign in" }
                    }
                }
            }
        },
    )
}
