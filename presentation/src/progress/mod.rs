//! Progress reporting for the query pipeline

pub mod reporter;
