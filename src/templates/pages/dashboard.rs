use crate::domain::view::OrderView;
use crate::templates::components::{blocker_table, card, label_value_list, progress_timeline, task_card};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn dashboard_page(orders: &[OrderView], refreshed: bool) -> Markup {
    desktop_layout(
        "Your orders",
        html! {
            main class="container" {
                @if refreshed {
                    p class="notice" { "Order data refreshed." }
                }

                @if orders.is_empty() {
                    section class="card" {
                        h3 { "No orders" }
                        p { "Your Tesla account has no active orders." }
                    }
                }

                @for order in orders {
                    (order_section(order))
                }
            }
        },
    )
}

fn order_section(order: &OrderView) -> Markup {
    html! {
        section class="card" {
            div class="order-header" {
                h2 { (order.full_model_label) }
                span class="order-status" { (order.status_label) }
            }
            p { "Order " strong { (order.reference) }
                @if let Some(vin) = &order.vin {
                    " · VIN " strong { (vin) }
                }
            }

            @if !order.images.is_empty() {
                div class="image-strip" {
                    @for image in &order.images {
                        img src=(image.url) alt=(image.label) loading="lazy";
                    }
                }
            }

            (progress_timeline(&order.progress))

            @if let Some(window) = &order.delivery_window {
                p { "Delivery window: " strong { (window) } }
            }
            @if let Some(eta) = &order.eta {
                p { "ETA to delivery center: " strong { (eta) } }
            }
            @if let Some(address) = &order.delivery_address {
                p { "Delivery location: " (address) }
            }
        }

        div class="panel-grid" {
            @if !order.insights.finance.is_empty() {
                (card("Financing", label_value_list(&order.insights.finance)))
            }
            @if !order.insights.delivery.is_empty() {
                (card("Delivery", label_value_list(&order.insights.delivery)))
            }
            @if !order.insights.registration.is_empty() {
                (card("Registration", label_value_list(&order.insights.registration)))
            }
            @if !order.insights.metadata.is_empty() {
                (card("Order details", label_value_list(&order.insights.metadata)))
            }
        }

        @if !order.insights.blockers.is_empty() {
            (card("Delivery blockers", blocker_table(&order.insights.blockers)))
        }

        @if let Some(details) = &order.vin_details {
            (card("VIN decoder", html! {
                table class="vin-table" {
                    @for (label, value) in details.rows() {
                        tr { td { (label) } td { (value) } }
                    }
                }
            }))
        }

        @if !order.tasks.is_empty() {
            h2 { "Tasks" }
            @for task in &order.tasks {
                (task_card(task))
            }
        }
    }
}
