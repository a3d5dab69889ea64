//! Checkout route handlers.
//!
//! Checkout never leaves the process: a complete form clears the cart and
//! shows a confirmation. An incomplete form re-renders the form as entered,
//! with no error message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use pocket_cart_core::{CartError, CheckoutForm, CheckoutOutcome, Price, submit_checkout};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub order_total: String,
    pub name: String,
    pub email: String,
    pub cart_count: u64,
}

/// Checkout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub order_total: String,
    pub item_count: u64,
    pub cart_count: u64,
}

/// Display the checkout form with the current order total.
///
/// An empty cart has nothing to check out, so the visitor is sent back to
/// the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Response {
    let cart = state.cart().await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        order_total: Price::new(cart.total(), state.currency()).display(),
        name: String::new(),
        email: String::new(),
        cart_count: cart.total_item_count(),
    }
    .into_response()
}

/// Submit the checkout form.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let currency = state.currency();
    let (outcome, total, cart_count, form) = state
        .with_cart(move |cart, _| {
            let outcome = submit_checkout(cart, &form)?;
            Ok::<_, CartError>((outcome, cart.total(), cart.total_item_count(), form))
        })
        .await??;

    match outcome {
        CheckoutOutcome::Accepted {
            order_total,
            item_count,
        } => {
            add_breadcrumb("checkout", "Checkout completed", None);
            Ok(CheckoutSuccessTemplate {
                order_total: Price::new(order_total, currency).display(),
                item_count,
                cart_count,
            }
            .into_response())
        }
        CheckoutOutcome::Ignored => Ok(CheckoutTemplate {
            order_total: Price::new(total, currency).display(),
            name: form.name,
            email: form.email,
            cart_count,
        }
        .into_response()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_keeps_entered_values() {
        let html = CheckoutTemplate {
            order_total: "₹250.00".to_string(),
            name: String::new(),
            email: "a@b.com".to_string(),
            cart_count: 3,
        }
        .render()
        .unwrap();

        assert!(html.contains("₹250.00"));
        assert!(html.contains("value=\"a@b.com\""));
    }

    #[test]
    fn test_success_page() {
        let html = CheckoutSuccessTemplate {
            order_total: "₹250.00".to_string(),
            item_count: 3,
            cart_count: 0,
        }
        .render()
        .unwrap();

        assert!(html.contains("Thank you"));
        assert!(html.contains("₹250.00"));
    }
}
