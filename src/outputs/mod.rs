//! Output generation for the on-disk article table.
//!
//! One submodule today:
//!
//! - [`table`]: the CSV article table — fully overwritten by each scrape
//!   run, re-read and annotated in place by the classifier.

pub mod table;
