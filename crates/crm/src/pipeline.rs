use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use partdesk_board::{Board, HoverTarget, LoadRecord};
use partdesk_core::{BoardResult, BucketKey, ItemId};
use partdesk_events::Event;

/// Account status lifecycle; one pipeline lane per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    New,
    Active,
    Slow,
    Inactive,
    Archived,
}

impl AccountStatus {
    /// All statuses, in lane display order.
    pub const ALL: [AccountStatus; 5] = [
        AccountStatus::New,
        AccountStatus::Active,
        AccountStatus::Slow,
        AccountStatus::Inactive,
        AccountStatus::Archived,
    ];

    pub fn key(self) -> BucketKey {
        BucketKey::from(match self {
            AccountStatus::New => "new",
            AccountStatus::Active => "active",
            AccountStatus::Slow => "slow",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Archived => "archived",
        })
    }

    pub fn from_key(key: &BucketKey) -> Option<Self> {
        match key.as_str() {
            "new" => Some(AccountStatus::New),
            "active" => Some(AccountStatus::Active),
            "slow" => Some(AccountStatus::Slow),
            "inactive" => Some(AccountStatus::Inactive),
            "archived" => Some(AccountStatus::Archived),
            _ => None,
        }
    }

    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            AccountStatus::New => "New",
            AccountStatus::Active => "Active",
            AccountStatus::Slow => "Slow",
            AccountStatus::Inactive => "Inactive",
            AccountStatus::Archived => "Archived",
        }
    }
}

/// A CRM account as rendered on a pipeline card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCard {
    pub account_id: ItemId,
    pub name: String,
    pub email: Option<String>,
    pub status: AccountStatus,
}

/// Event: an account moved to a different lane.
///
/// The host translates this into the status PATCH; reorders within a lane do
/// not change status and therefore do not produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatusChanged {
    pub account_id: ItemId,
    pub from: AccountStatus,
    pub to: AccountStatus,
    pub occurred_at: DateTime<Utc>,
}

impl Event for AccountStatusChanged {
    fn event_type(&self) -> &'static str {
        "crm.account.status_changed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// One rendered pipeline lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    pub status: AccountStatus,
    pub label: &'static str,
    pub cards: Vec<AccountCard>,
}

/// The CRM pipeline board: accounts in status lanes.
///
/// Accounts all weigh 1, so lane aggregates are card counts. The engine owns
/// membership and order; this adapter keeps the card payloads and the
/// status-lane mapping.
#[derive(Debug)]
pub struct PipelineBoard {
    board: Board,
    cards: HashMap<ItemId, AccountCard>,
}

impl PipelineBoard {
    pub fn new() -> Self {
        Self {
            board: Board::new(AccountStatus::ALL.map(AccountStatus::key)),
            cards: HashMap::new(),
        }
    }

    /// Replace the board content from a fresh account fetch.
    pub fn load(&mut self, accounts: Vec<AccountCard>) -> BoardResult<()> {
        let records = accounts
            .iter()
            .map(|card| LoadRecord {
                id: card.account_id,
                weight: 1,
                bucket: card.status.key(),
            })
            .collect();
        self.board.load(records)?;
        self.cards = accounts
            .into_iter()
            .map(|card| (card.account_id, card))
            .collect();
        Ok(())
    }

    pub fn begin_drag(&mut self, account_id: ItemId) -> BoardResult<()> {
        self.board.begin_drag(account_id)
    }

    /// Pointer over a lane's empty area.
    pub fn hover_lane(&mut self, status: AccountStatus) {
        self.board.hover(HoverTarget::Bucket(status.key()));
    }

    /// Pointer over another account's card.
    pub fn hover_card(&mut self, account_id: ItemId) {
        self.board.hover(HoverTarget::Item(account_id));
    }

    /// Pointer left every valid target.
    pub fn hover_none(&mut self) {
        self.board.hover(HoverTarget::None);
    }

    pub fn cancel_drag(&mut self) {
        let _ = self.board.end_drag(false);
    }

    /// Drop the dragged card.
    ///
    /// Returns a status-change intent when the account landed in a different
    /// lane; in-lane reorders commit locally but need no PATCH.
    pub fn drop_card(&mut self) -> Option<AccountStatusChanged> {
        let committed = self.board.end_drag(true)?;
        let from = AccountStatus::from_key(&committed.from_bucket)?;
        let to = AccountStatus::from_key(&committed.to_bucket)?;

        if let Some(card) = self.cards.get_mut(&committed.item) {
            card.status = to;
        }
        if from == to {
            return None;
        }

        debug!(account = %committed.item, from = from.label(), to = to.label(), "account moved");
        Some(AccountStatusChanged {
            account_id: committed.item,
            from,
            to,
            occurred_at: committed.occurred_at,
        })
    }

    /// Lanes in display order, cards in lane order.
    pub fn lanes(&self) -> Vec<Lane> {
        AccountStatus::ALL
            .iter()
            .map(|status| {
                let cards = self
                    .board
                    .partition()
                    .bucket(&status.key())
                    .map(|bucket| {
                        bucket
                            .order()
                            .iter()
                            .filter_map(|id| self.cards.get(id).cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                Lane {
                    status: *status,
                    label: status.label(),
                    cards,
                }
            })
            .collect()
    }

    /// Card count per lane (lane header badges).
    pub fn lane_counts(&self) -> HashMap<AccountStatus, usize> {
        self.board
            .aggregates()
            .into_iter()
            .filter_map(|(key, aggregate)| {
                AccountStatus::from_key(&key).map(|status| (status, aggregate.item_count))
            })
            .collect()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Default for PipelineBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partdesk_core::BoardError;

    fn account(name: &str, status: AccountStatus) -> AccountCard {
        AccountCard {
            account_id: ItemId::new(),
            name: name.to_string(),
            email: None,
            status,
        }
    }

    fn loaded(cards: Vec<AccountCard>) -> PipelineBoard {
        let mut board = PipelineBoard::new();
        board.load(cards).unwrap();
        board
    }

    #[test]
    fn lanes_come_back_in_display_order_with_their_cards() {
        let a = account("Acme", AccountStatus::New);
        let b = account("Initech", AccountStatus::Slow);
        let board = loaded(vec![a.clone(), b.clone()]);

        let lanes = board.lanes();
        assert_eq!(lanes.len(), 5);
        assert_eq!(lanes[0].label, "New");
        assert_eq!(lanes[0].cards, vec![a]);
        assert_eq!(lanes[2].cards, vec![b]);
        assert!(lanes[4].cards.is_empty());
    }

    #[test]
    fn cross_lane_drop_yields_a_status_change_intent() {
        let a = account("Acme", AccountStatus::New);
        let x = account("Initech", AccountStatus::Slow);
        let mut board = loaded(vec![a.clone(), x.clone()]);

        board.begin_drag(a.account_id).unwrap();
        board.hover_card(x.account_id);
        let change = board.drop_card().unwrap();

        assert_eq!(change.account_id, a.account_id);
        assert_eq!(change.from, AccountStatus::New);
        assert_eq!(change.to, AccountStatus::Slow);
        assert_eq!(change.event_type(), "crm.account.status_changed");

        // Inserted immediately before the hovered card; lane counts shifted.
        let lanes = board.lanes();
        assert!(lanes[0].cards.is_empty());
        assert_eq!(
            lanes[2].cards.iter().map(|c| c.account_id).collect::<Vec<_>>(),
            vec![a.account_id, x.account_id]
        );
        assert_eq!(lanes[2].cards[0].status, AccountStatus::Slow);
    }

    #[test]
    fn in_lane_reorder_needs_no_patch() {
        let a = account("Acme", AccountStatus::Active);
        let b = account("Initech", AccountStatus::Active);
        let mut board = loaded(vec![a.clone(), b.clone()]);

        board.begin_drag(b.account_id).unwrap();
        board.hover_card(a.account_id);
        assert!(board.drop_card().is_none());

        let lanes = board.lanes();
        assert_eq!(
            lanes[1].cards.iter().map(|c| c.account_id).collect::<Vec<_>>(),
            vec![b.account_id, a.account_id]
        );
    }

    #[test]
    fn dropping_back_on_the_own_lane_preserves_position() {
        let a = account("Acme", AccountStatus::Active);
        let b = account("Initech", AccountStatus::Active);
        let mut board = loaded(vec![a.clone(), b.clone()]);

        board.begin_drag(b.account_id).unwrap();
        board.hover_lane(AccountStatus::Active);
        assert!(board.drop_card().is_none());

        let lanes = board.lanes();
        assert_eq!(
            lanes[1].cards.iter().map(|c| c.account_id).collect::<Vec<_>>(),
            vec![a.account_id, b.account_id]
        );
    }

    #[test]
    fn lane_counts_track_moves() {
        let a = account("Acme", AccountStatus::New);
        let mut board = loaded(vec![a.clone()]);

        board.begin_drag(a.account_id).unwrap();
        board.hover_lane(AccountStatus::Archived);
        board.drop_card().unwrap();

        let counts = board.lane_counts();
        assert_eq!(counts[&AccountStatus::New], 0);
        assert_eq!(counts[&AccountStatus::Archived], 1);
    }

    #[test]
    fn begin_drag_rejects_unknown_accounts() {
        let mut board = PipelineBoard::new();
        let ghost = ItemId::new();
        assert_eq!(
            board.begin_drag(ghost).unwrap_err(),
            BoardError::UnknownItem(ghost)
        );
    }

    #[test]
    fn status_round_trips_through_bucket_keys() {
        for status in AccountStatus::ALL {
            assert_eq!(AccountStatus::from_key(&status.key()), Some(status));
        }
        assert_eq!(AccountStatus::from_key(&BucketKey::from("pool")), None);
    }
}
