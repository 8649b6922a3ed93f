//! A small book-shelf backend: accounts with cookie sessions and a free-form
//! book collection, served over HTTP.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
