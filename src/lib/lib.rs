#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Mail relay that takes over a host's outgoing mail, optionally rewriting
//! every sender to a fixed envelope sender for DMARC alignment.

pub mod domain;
pub mod infrastructure;
