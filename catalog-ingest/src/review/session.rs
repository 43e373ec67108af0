//! Reconciliation session state machine
//!
//! Per item: `Pending → {Confirmed | Edited | Skipped}`. Confirmed, edited and
//! skipped are reachable from each other; nothing returns to `Pending`.
//! Confirmed and edited items are "ready" for import.
//!
//! Tier membership is captured once when the session is created. Later edits
//! change confidence values but never move an item between tiers.

use crate::models::{ConfidenceTier, FieldConfidence, ImportItem, ParsedCandidate};
use crate::parser::FolderNameParser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Review session errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Review item not found: {0}")]
    ItemNotFound(usize),
}

/// Per-item review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Confirmed,
    Edited,
    Skipped,
}

impl ReviewStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReviewStatus::Confirmed | ReviewStatus::Edited)
    }
}

/// Bulk action over one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierAction {
    #[serde(alias = "confirmAll")]
    ConfirmAll,
    #[serde(alias = "skipAll")]
    SkipAll,
}

/// Single-item action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Confirm,
    Skip,
}

/// One folder under review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Position in the batch
    pub id: usize,
    pub folder_name: String,
    pub candidate: ParsedCandidate,
    /// Tier at session creation
    pub tier: ConfidenceTier,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub edited: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// In-memory review of one batch of folder names
///
/// Owns its items exclusively; the source name list is kept untouched.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    folder_names: Vec<String>,
    items: Vec<ReviewItem>,
    human_verified: u8,
}

impl ReviewSession {
    /// Parse every name and classify it
    pub fn new(folder_names: Vec<String>, parser: &FolderNameParser) -> Self {
        let items = folder_names
            .iter()
            .enumerate()
            .map(|(id, name)| {
                let candidate = parser.smart_parse(name);
                ReviewItem {
                    id,
                    folder_name: name.clone(),
                    tier: candidate.tier,
                    candidate,
                    status: ReviewStatus::Pending,
                }
            })
            .collect();

        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            folder_names,
            items,
            human_verified: parser.heuristics().human_verified,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The names the session was created from, unchanged
    pub fn folder_names(&self) -> &[String] {
        &self.folder_names
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: usize) -> Option<&ReviewItem> {
        self.items.get(id)
    }

    /// Set every item of `tier` to confirmed/skipped regardless of status.
    /// Returns the number of items in the tier.
    pub fn apply_tier_action(&mut self, tier: ConfidenceTier, action: TierAction) -> usize {
        let status = match action {
            TierAction::ConfirmAll => ReviewStatus::Confirmed,
            TierAction::SkipAll => ReviewStatus::Skipped,
        };

        let mut affected = 0;
        for item in self.items.iter_mut().filter(|i| i.tier == tier) {
            item.status = status;
            affected += 1;
        }

        tracing::debug!(tier = %tier, ?action, affected, "Applied tier action");
        affected
    }

    /// Operator correction: fields overwritten and marked human-verified
    pub fn edit_item(
        &mut self,
        id: usize,
        studio: &str,
        model: &str,
    ) -> Result<&ReviewItem, ReviewError> {
        let verified = self.human_verified;
        let item = self.items.get_mut(id).ok_or(ReviewError::ItemNotFound(id))?;

        item.candidate.studio = studio.trim().to_string();
        item.candidate.model = model.trim().to_string();
        item.candidate.confidence = FieldConfidence::from_fields(verified, verified);
        item.status = ReviewStatus::Edited;

        Ok(item)
    }

    /// Confirm or skip one item; field values are left alone
    pub fn item_action(
        &mut self,
        id: usize,
        action: ItemAction,
    ) -> Result<&ReviewItem, ReviewError> {
        let item = self.items.get_mut(id).ok_or(ReviewError::ItemNotFound(id))?;

        item.status = match action {
            ItemAction::Confirm => ReviewStatus::Confirmed,
            ItemAction::Skip => ReviewStatus::Skipped,
        };

        Ok(item)
    }

    /// Confirmed and edited items, in batch order
    pub fn ready_items(&self) -> Vec<&ReviewItem> {
        self.items.iter().filter(|i| i.status.is_ready()).collect()
    }

    /// Ready items as executor input
    pub fn to_import_items(&self) -> Vec<ImportItem> {
        self.ready_items()
            .into_iter()
            .map(|item| ImportItem {
                folder_name: item.folder_name.clone(),
                studio: item.candidate.studio.clone(),
                model: item.candidate.model.clone(),
                title: item.candidate.title.clone(),
            })
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.items {
            match item.status {
                ReviewStatus::Pending => counts.pending += 1,
                ReviewStatus::Confirmed => counts.confirmed += 1,
                ReviewStatus::Edited => counts.edited += 1,
                ReviewStatus::Skipped => counts.skipped += 1,
            }
        }
        counts
    }

    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for item in &self.items {
            match item.tier {
                ConfidenceTier::High => counts.high += 1,
                ConfidenceTier::Medium => counts.medium += 1,
                ConfidenceTier::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            session_id: self.session_id,
            started_at: self.started_at,
            items: self.items.clone(),
            status_counts: self.status_counts(),
            tier_counts: self.tier_counts(),
        }
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub items: Vec<ReviewItem>,
    pub status_counts: StatusCounts,
    pub tier_counts: TierCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(names: &[&str]) -> ReviewSession {
        ReviewSession::new(
            names.iter().map(|s| s.to_string()).collect(),
            &FolderNameParser::default(),
        )
    }

    #[test]
    fn test_new_session_is_pending_with_tiers() {
        let s = session(&["[MetArt][Emma]Summer", "Emma @ MetArt", "random"]);

        assert_eq!(s.len(), 3);
        assert!(s.items().iter().all(|i| i.status == ReviewStatus::Pending));
        assert_eq!(s.item(0).unwrap().tier, ConfidenceTier::High);
        assert_eq!(s.item(1).unwrap().tier, ConfidenceTier::Medium);
        assert_eq!(s.item(2).unwrap().tier, ConfidenceTier::Low);
        assert_eq!(s.tier_counts(), TierCounts { high: 1, medium: 1, low: 1 });
        assert!(s.ready_items().is_empty());
    }

    #[test]
    fn test_confirm_all_high_uses_captured_tier() {
        let mut s = session(&["[MetArt][Emma]A", "random", "[X-Art][Lily]B"]);

        // editing a low item raises its confidence but not its tier
        s.edit_item(1, "MetArt", "Anna").unwrap();
        assert_eq!(s.item(1).unwrap().candidate.confidence.overall, 95);
        assert_eq!(s.item(1).unwrap().tier, ConfidenceTier::Low);

        let affected = s.apply_tier_action(ConfidenceTier::High, TierAction::ConfirmAll);
        assert_eq!(affected, 2);

        let ready: Vec<usize> = s
            .ready_items()
            .iter()
            .filter(|i| i.status == ReviewStatus::Confirmed)
            .map(|i| i.id)
            .collect();
        assert_eq!(ready, vec![0, 2]);
    }

    #[test]
    fn test_tier_action_overrides_status() {
        let mut s = session(&["[MetArt][Emma]A", "[X-Art][Lily]B"]);
        s.item_action(0, ItemAction::Skip).unwrap();
        s.edit_item(1, "X-Art", "Lily").unwrap();

        s.apply_tier_action(ConfidenceTier::High, TierAction::ConfirmAll);
        assert!(s.items().iter().all(|i| i.status == ReviewStatus::Confirmed));

        s.apply_tier_action(ConfidenceTier::High, TierAction::SkipAll);
        assert!(s.ready_items().is_empty());
    }

    #[test]
    fn test_edit_forces_human_verified_confidence() {
        let mut s = session(&["Emma @ MetArt"]);
        let item = s.edit_item(0, " Met Art ", "Emma").unwrap();

        assert_eq!(item.status, ReviewStatus::Edited);
        assert_eq!(item.candidate.studio, "Met Art");
        assert_eq!(item.candidate.confidence.studio, 95);
        assert_eq!(item.candidate.confidence.model, 95);
        assert_eq!(item.candidate.confidence.overall, 95);
        assert_eq!(item.candidate.title, "Emma @ MetArt");
    }

    #[test]
    fn test_confirm_keeps_values() {
        let mut s = session(&["Emma @ MetArt"]);
        let before = s.item(0).unwrap().candidate.clone();

        let item = s.item_action(0, ItemAction::Confirm).unwrap();
        assert_eq!(item.status, ReviewStatus::Confirmed);
        assert_eq!(item.candidate, before);
    }

    #[test]
    fn test_transitions_between_terminal_states() {
        let mut s = session(&["random"]);

        s.item_action(0, ItemAction::Skip).unwrap();
        s.edit_item(0, "MetArt", "").unwrap();
        assert_eq!(s.item(0).unwrap().status, ReviewStatus::Edited);
        s.item_action(0, ItemAction::Skip).unwrap();
        s.item_action(0, ItemAction::Confirm).unwrap();
        assert_eq!(s.item(0).unwrap().status, ReviewStatus::Confirmed);
    }

    #[test]
    fn test_unknown_item_is_reported() {
        let mut s = session(&["random"]);
        assert_eq!(
            s.item_action(5, ItemAction::Confirm).unwrap_err(),
            ReviewError::ItemNotFound(5)
        );
        assert_eq!(s.edit_item(9, "a", "b").unwrap_err(), ReviewError::ItemNotFound(9));
    }

    #[test]
    fn test_ready_items_in_batch_order() {
        let mut s = session(&["a1", "[MetArt][Emma]b", "c3", "d4"]);
        s.item_action(3, ItemAction::Confirm).unwrap();
        s.edit_item(0, "MetArt", "Emma").unwrap();
        s.item_action(2, ItemAction::Skip).unwrap();

        let ids: Vec<usize> = s.ready_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert_eq!(
            s.status_counts(),
            StatusCounts { pending: 1, confirmed: 1, edited: 1, skipped: 1 }
        );
    }

    #[test]
    fn test_source_names_untouched_and_import_items() {
        let names = vec!["Emma @ MetArt".to_string(), "[X-Art][]Sunset".to_string()];
        let mut s = ReviewSession::new(names.clone(), &FolderNameParser::default());

        s.edit_item(0, "Studio", "Model").unwrap();
        s.item_action(1, ItemAction::Confirm).unwrap();

        assert_eq!(s.folder_names(), names.as_slice());

        let items = s.to_import_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].folder_name, "Emma @ MetArt");
        assert_eq!(items[0].studio, "Studio");
        assert_eq!(items[1].studio, "X-Art");
        assert_eq!(items[1].model, "");
        assert_eq!(items[1].title, "Sunset");
    }

    #[test]
    fn test_action_deserialization() {
        let action: TierAction = serde_json::from_str("\"confirmAll\"").unwrap();
        assert_eq!(action, TierAction::ConfirmAll);
        let action: TierAction = serde_json::from_str("\"skip_all\"").unwrap();
        assert_eq!(action, TierAction::SkipAll);
        let action: ItemAction = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(action, ItemAction::Skip);
    }
}
