//! Repository history mining for data clump research: SZZ bug attribution,
//! commit ancestry, fault annotation of data-clump reports, evolution
//! classification and rank correlation.

pub mod ancestry;
pub mod cancel;
pub mod cli;
mod cli_help;
pub mod config;
pub mod correlation;
pub mod error;
pub mod evolution;
pub mod faults;
pub mod git;
pub mod logging;
pub mod report;
pub mod report_helpers;
pub mod szz;

#[cfg(test)]
pub mod testutil;
