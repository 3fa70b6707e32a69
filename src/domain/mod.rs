//! Plain data and the traits the rest of the crate is written against.

pub mod ack;
pub mod cart;
pub mod code;
pub mod order;
pub mod phone;
pub mod ports;
pub mod reservation;
pub mod review;
pub mod stage;
