//! Application layer: the components that react to user actions.
//!
//! `CheckoutFlow` owns the order/SMS stage machine, `CartController` the
//! cart page and `ReservationForm` the table booking form. Both talk to the server only through the backend ports and to
//! the screen only through the view ports, so they run the same against the
//! HTTP backend, a terminal, or the in-memory doubles used in tests.

pub mod cart;
pub mod checkout;
pub mod reservation;
