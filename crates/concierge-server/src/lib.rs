//! concierge server: HTTP front end over the routing service.

pub mod http;
