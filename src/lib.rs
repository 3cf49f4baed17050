//! Storefront catalog core: a typed client for the commerce API, paginated
//! listings for infinite-scroll screens, and a persisted wishlist.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod mvi;
pub mod wishlist;
