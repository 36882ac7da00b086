//! Test module for startmenu-core
//!
//! Covers the overlay lifecycle, the refresh pipeline's supersede rules,
//! list ordering and filtering, search submission and configuration.

mod pipeline_tests;
mod search_tests;
