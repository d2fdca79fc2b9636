use super::media_client::MediaRecord;
use serde::Serialize;

/// Lifecycle of one input file's result position. `Failed` is terminal and
/// distinct from `Unset`: a failed slot once held a placeholder, a file the
/// type gate excluded never gets a slot at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Unset,
    Placeholder(String),
    Saved(MediaRecord),
    Failed,
}

/// What compaction emits to the caller: either an optimistic placeholder
/// (temporary preview URL only) or the saved record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MediaItem {
    Placeholder { url: String },
    Saved(MediaRecord),
}

/// The authoritative ordered result list, indexed by original file position.
/// Exactly one task owns the board at any time: the orchestrator during the
/// synchronous gate phase, then the aggregator task for the rest of the run.
#[derive(Debug)]
pub struct SlotBoard {
    slots: Vec<Slot>,
}

impl SlotBoard {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::Unset; len],
        }
    }

    pub fn set(&mut self, index: usize, slot: Slot) {
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = slot;
        } else {
            log::error!(
                "Slot index {} out of range (board has {} slots)",
                index,
                self.slots.len()
            );
        }
    }

    /// Rebuild the caller-facing list from scratch: all live slots in index
    /// order, `Unset` and `Failed` positions removed. Always recomputed in
    /// full so a late completion can never be clobbered by stale state.
    pub fn compact(&self) -> Vec<MediaItem> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Placeholder(url) => Some(MediaItem::Placeholder { url: url.clone() }),
                Slot::Saved(record) => Some(MediaItem::Saved(record.clone())),
                Slot::Unset | Slot::Failed => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> MediaRecord {
        MediaRecord {
            id,
            url: format!("http://cdn.test/{}.jpg", id),
            link: format!("http://site.test/?p={}", id),
            alt: String::new(),
            caption: String::new(),
        }
    }

    #[test]
    fn compact_preserves_index_order() {
        let mut board = SlotBoard::new(4);
        board.set(3, Slot::Saved(record(3)));
        board.set(1, Slot::Placeholder("blob:one".to_string()));
        board.set(0, Slot::Saved(record(0)));

        let items = board.compact();
        assert_eq!(
            items,
            vec![
                MediaItem::Saved(record(0)),
                MediaItem::Placeholder {
                    url: "blob:one".to_string()
                },
                MediaItem::Saved(record(3)),
            ]
        );
    }

    #[test]
    fn failed_and_unset_slots_are_omitted() {
        let mut board = SlotBoard::new(3);
        board.set(0, Slot::Placeholder("blob:a".to_string()));
        board.set(1, Slot::Failed);
        // index 2 stays Unset

        let items = board.compact();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0],
            MediaItem::Placeholder {
                url: "blob:a".to_string()
            }
        );
    }

    #[test]
    fn failed_is_distinguishable_from_unset() {
        let mut board = SlotBoard::new(2);
        board.set(0, Slot::Failed);
        assert_ne!(Slot::Failed, Slot::Unset);
        assert!(board.compact().is_empty());
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut board = SlotBoard::new(1);
        board.set(5, Slot::Failed);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn media_item_serializes_untagged() {
        let placeholder = MediaItem::Placeholder {
            url: "blob:x".to_string(),
        };
        let json = serde_json::to_value(&placeholder).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "blob:x" }));

        let saved = MediaItem::Saved(record(5));
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["id"], 5);
    }
}
