use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use partdesk_board::{Board, BucketLimits, HoverTarget, LoadRecord, project};
use partdesk_core::{BoardError, BoardResult, BucketKey, ItemId};
use partdesk_events::Event;

/// Export tier a supplier sits in.
///
/// `Pool` is everything not selected for export; `Stock` and `Available` are
/// the two exported row groups, each with its own per-platform ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTier {
    Pool,
    Stock,
    Available,
}

impl ExportTier {
    /// All tiers, in display order.
    pub const ALL: [ExportTier; 3] = [ExportTier::Pool, ExportTier::Stock, ExportTier::Available];

    pub fn key(self) -> BucketKey {
        BucketKey::from(match self {
            ExportTier::Pool => "pool",
            ExportTier::Stock => "stock",
            ExportTier::Available => "available",
        })
    }

    pub fn from_key(key: &BucketKey) -> Option<Self> {
        match key.as_str() {
            "pool" => Some(ExportTier::Pool),
            "stock" => Some(ExportTier::Stock),
            "available" => Some(ExportTier::Available),
            _ => None,
        }
    }
}

/// Target platform for an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    NetComponents,
    IcSource,
}

/// One supplier as fetched from the inventory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRow {
    pub supplier: String,
    #[serde(default)]
    pub total_parts: u64,
}

/// Per-platform export switches and row ceilings (zero = unlimited).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub enabled: bool,
    pub max_stock: u64,
    pub max_available: u64,
}

/// The persisted export configuration, mirroring the backend's
/// system-settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub export_netcomponents: bool,
    #[serde(default)]
    pub export_icsource: bool,
    #[serde(default)]
    pub netcomponents_max_stock: u64,
    #[serde(default)]
    pub netcomponents_max_available: u64,
    #[serde(default)]
    pub icsource_max_stock: u64,
    #[serde(default)]
    pub icsource_max_available: u64,
    #[serde(default)]
    pub stock_suppliers: Vec<String>,
    #[serde(default)]
    pub available_suppliers: Vec<String>,
}

impl ExportSettings {
    pub fn platform(&self, platform: Platform) -> PlatformSettings {
        match platform {
            Platform::NetComponents => PlatformSettings {
                enabled: self.export_netcomponents,
                max_stock: self.netcomponents_max_stock,
                max_available: self.netcomponents_max_available,
            },
            Platform::IcSource => PlatformSettings {
                enabled: self.export_icsource,
                max_stock: self.icsource_max_stock,
                max_available: self.icsource_max_available,
            },
        }
    }
}

/// Overflow badges for one platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformOverflow {
    pub stock: bool,
    pub available: bool,
}

/// Event: a supplier changed export tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierTierChanged {
    pub supplier: String,
    pub from: ExportTier,
    pub to: ExportTier,
    pub occurred_at: DateTime<Utc>,
}

impl Event for SupplierTierChanged {
    fn event_type(&self) -> &'static str {
        "exporter.supplier.tier_changed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// The supplier export board: pool / stock / available tiers over the engine.
///
/// Suppliers are identified by name at this boundary (that is what the
/// settings document stores); the adapter owns the name <-> id mapping and
/// weighs each supplier by its parts count so tier aggregates are exportable
/// row totals.
#[derive(Debug)]
pub struct ExportBoard {
    board: Board,
    names: HashMap<ItemId, String>,
    ids: HashMap<String, ItemId>,
    net_components: PlatformSettings,
    ic_source: PlatformSettings,
}

impl ExportBoard {
    pub fn new() -> Self {
        Self {
            board: Board::new(ExportTier::ALL.map(ExportTier::key)),
            names: HashMap::new(),
            ids: HashMap::new(),
            net_components: PlatformSettings::default(),
            ic_source: PlatformSettings::default(),
        }
    }

    /// Populate the board from a supplier fetch plus the persisted settings.
    ///
    /// Placement follows the settings name lists; everything unlisted goes to
    /// the pool. Within each tier, suppliers keep fetch order (the order the
    /// backend returned them in). Duplicate fetch rows collapse (last wins);
    /// listed names missing from the fetch are skipped.
    pub fn load(&mut self, suppliers: Vec<SupplierRow>, settings: &ExportSettings) -> BoardResult<()> {
        let mut unique: Vec<SupplierRow> = Vec::with_capacity(suppliers.len());
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for row in suppliers {
            match by_name.get(&row.supplier).copied() {
                Some(at) => unique[at] = row,
                None => {
                    by_name.insert(row.supplier.clone(), unique.len());
                    unique.push(row);
                }
            }
        }

        for name in settings
            .stock_suppliers
            .iter()
            .chain(&settings.available_suppliers)
        {
            if !by_name.contains_key(name) {
                warn!(supplier = %name, "configured supplier missing from fetch, skipped");
            }
        }

        let tier_of = |name: &str| {
            if settings.stock_suppliers.iter().any(|s| s == name) {
                ExportTier::Stock
            } else if settings.available_suppliers.iter().any(|s| s == name) {
                ExportTier::Available
            } else {
                ExportTier::Pool
            }
        };

        let mut names = HashMap::with_capacity(unique.len());
        let mut ids = HashMap::with_capacity(unique.len());
        let mut records = Vec::with_capacity(unique.len());
        for row in &unique {
            let id = ItemId::new();
            names.insert(id, row.supplier.clone());
            ids.insert(row.supplier.clone(), id);
            records.push(LoadRecord {
                id,
                weight: row.total_parts,
                bucket: tier_of(&row.supplier).key(),
            });
        }

        self.board.load(records)?;
        self.names = names;
        self.ids = ids;
        self.net_components = settings.platform(Platform::NetComponents);
        self.ic_source = settings.platform(Platform::IcSource);
        debug!(suppliers = self.names.len(), "export board loaded");
        Ok(())
    }

    pub fn begin_drag(&mut self, supplier: &str) -> BoardResult<()> {
        let id = self.id_of(supplier)?;
        self.board.begin_drag(id)
    }

    /// Pointer over a tier container's empty area.
    pub fn hover_tier(&mut self, tier: ExportTier) {
        self.board.hover(HoverTarget::Bucket(tier.key()));
    }

    /// Pointer over another supplier's badge.
    pub fn hover_supplier(&mut self, supplier: &str) {
        match self.ids.get(supplier) {
            Some(id) => self.board.hover(HoverTarget::Item(*id)),
            None => {
                warn!(supplier = %supplier, "hover over unknown supplier ignored");
                self.board.hover(HoverTarget::None);
            }
        }
    }

    pub fn hover_none(&mut self) {
        self.board.hover(HoverTarget::None);
    }

    pub fn cancel_drag(&mut self) {
        let _ = self.board.end_drag(false);
    }

    /// Drop the dragged supplier.
    ///
    /// Returns a tier-change event when the supplier crossed tiers; in-tier
    /// reorders commit locally and surface through [`Self::settings`] on the
    /// next save instead.
    pub fn drop_supplier(&mut self) -> Option<SupplierTierChanged> {
        let committed = self.board.end_drag(true)?;
        let from = ExportTier::from_key(&committed.from_bucket)?;
        let to = ExportTier::from_key(&committed.to_bucket)?;
        if from == to {
            return None;
        }

        let supplier = self.names.get(&committed.item)?.clone();
        debug!(supplier = %supplier, ?from, ?to, "supplier moved");
        Some(SupplierTierChanged {
            supplier,
            from,
            to,
            occurred_at: committed.occurred_at,
        })
    }

    pub fn set_platform(&mut self, platform: Platform, settings: PlatformSettings) {
        match platform {
            Platform::NetComponents => self.net_components = settings,
            Platform::IcSource => self.ic_source = settings,
        }
    }

    pub fn platform(&self, platform: Platform) -> PlatformSettings {
        match platform {
            Platform::NetComponents => self.net_components,
            Platform::IcSource => self.ic_source,
        }
    }

    /// Overflow badges for one platform.
    ///
    /// A disabled platform never overflows; otherwise a tier overflows when
    /// its ceiling is positive and the tier's parts total exceeds it.
    pub fn overflow(&self, platform: Platform) -> PlatformOverflow {
        let settings = self.platform(platform);
        if !settings.enabled {
            return PlatformOverflow::default();
        }

        let limits = BucketLimits::from([
            (ExportTier::Stock.key(), settings.max_stock),
            (ExportTier::Available.key(), settings.max_available),
        ]);
        let aggregates = project(self.board.partition(), self.board.registry(), &limits);
        PlatformOverflow {
            stock: aggregates
                .get(&ExportTier::Stock.key())
                .is_some_and(|a| a.is_over_limit),
            available: aggregates
                .get(&ExportTier::Available.key())
                .is_some_and(|a| a.is_over_limit),
        }
    }

    /// Total parts in one tier (container header badge).
    pub fn parts_in(&self, tier: ExportTier) -> u64 {
        self.board
            .aggregates()
            .get(&tier.key())
            .map(|a| a.weight_sum)
            .unwrap_or(0)
    }

    /// Total parts selected for export (stock + available; tiers are disjoint
    /// by construction, so a plain sum is already deduplicated).
    pub fn total_selected_parts(&self) -> u64 {
        self.parts_in(ExportTier::Stock) + self.parts_in(ExportTier::Available)
    }

    /// Supplier names in one tier, in board order.
    pub fn tier_suppliers(&self, tier: ExportTier) -> Vec<String> {
        self.board
            .partition()
            .bucket(&tier.key())
            .map(|bucket| {
                bucket
                    .order()
                    .iter()
                    .filter_map(|id| self.names.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pool view under a search query: case-insensitive contains filter.
    ///
    /// Presentation only — the underlying pool order and all drop semantics
    /// stay defined on the full, unfiltered order.
    pub fn filtered_pool(&self, query: &str) -> Vec<String> {
        let q = query.trim().to_lowercase();
        let pool = self.tier_suppliers(ExportTier::Pool);
        if q.is_empty() {
            return pool;
        }
        pool.into_iter()
            .filter(|name| name.to_lowercase().contains(&q))
            .collect()
    }

    /// Current configuration as the persistable settings document, with the
    /// tier lists reflecting the board's order.
    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            export_netcomponents: self.net_components.enabled,
            export_icsource: self.ic_source.enabled,
            netcomponents_max_stock: self.net_components.max_stock,
            netcomponents_max_available: self.net_components.max_available,
            icsource_max_stock: self.ic_source.max_stock,
            icsource_max_available: self.ic_source.max_available,
            stock_suppliers: self.tier_suppliers(ExportTier::Stock),
            available_suppliers: self.tier_suppliers(ExportTier::Available),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn id_of(&self, supplier: &str) -> BoardResult<ItemId> {
        self.ids
            .get(supplier)
            .copied()
            .ok_or_else(|| BoardError::invariant(format!("unknown supplier: {supplier}")))
    }
}

impl Default for ExportBoard {
    fn default() -> Self {
        Self::new()
    }
}
