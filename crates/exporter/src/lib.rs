//! Supplier export board adapter.
//!
//! A thin domain layer over the generic board engine for the platform export
//! screen: suppliers partitioned into pool / stock / available tiers, with
//! per-platform row limits (netCOMPONENTS, ICSource) and overflow badges. The
//! ordered tier lists feed the backend's system-settings document.

pub mod export;

pub use export::{
    ExportBoard, ExportSettings, ExportTier, Platform, PlatformOverflow, PlatformSettings,
    SupplierRow, SupplierTierChanged,
};
