pub mod assertions;
pub mod categories;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod expectations;
pub mod filters;
pub mod logging;
pub mod manifests;
pub mod report;
pub mod request;
pub mod response;
pub mod results;
pub mod runner;
pub mod stats;
pub mod suites;
