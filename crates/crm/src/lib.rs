//! CRM pipeline board adapter.
//!
//! A thin domain layer over the generic board engine: accounts partitioned
//! into status lanes, cross-lane drops translated into status-change
//! persistence intents for the host (`PATCH /crm/accounts/{id}`).

pub mod pipeline;

pub use pipeline::{
    AccountCard, AccountStatus, AccountStatusChanged, Lane, PipelineBoard,
};
