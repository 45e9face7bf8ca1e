//! Billing provider outbound adapters.
//!
//! A thin HTTP implementation of the `BillingProvider` port for Stripe.

mod dto;
mod stripe;

pub use stripe::{STRIPE_REQUEST_TIMEOUT, StripeBillingProvider};
