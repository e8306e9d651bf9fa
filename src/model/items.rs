//! List items wrapping media records, and the builders that turn record
//! lists into snapshots

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use super::media::MediaRecord;
use super::snapshot::{SectionKind, Snapshot, SnapshotDiff, SnapshotItem};

/// How list identities are assigned when a snapshot is built
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IdentityStrategy {
    /// Keyed by track id, so an unchanged record keeps its identity across rebuilds
    #[default]
    Stable,
    /// A new random identity on every build; every rebuild diffs as remove + insert
    Fresh,
}

/// List identity of an item. Never the business identity of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemId {
    /// `occurrence` disambiguates a track listed more than once
    Keyed { track_id: i64, occurrence: u32 },
    Fresh(Uuid),
}

impl ItemId {
    /// Assign one id per record, unique within the returned list
    pub fn assign(records: &[MediaRecord], strategy: IdentityStrategy) -> Vec<ItemId> {
        match strategy {
            IdentityStrategy::Fresh => records.iter().map(|_| ItemId::Fresh(Uuid::new_v4())).collect(),
            IdentityStrategy::Stable => {
                let mut seen: HashMap<i64, u32> = HashMap::new();
                records
                    .iter()
                    .map(|r| {
                        let occurrence = seen.entry(r.track_id).or_insert(0);
                        let id = ItemId::Keyed {
                            track_id: r.track_id,
                            occurrence: *occurrence,
                        };
                        *occurrence += 1;
                        id
                    })
                    .collect()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MasterSection {
    Main,
}

impl SectionKind for MasterSection {
    const ALL: &'static [Self] = &[MasterSection::Main];
}

/// The favorites strip has a single implicit partition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FavoriteSection {
    Strip,
}

impl SectionKind for FavoriteSection {
    const ALL: &'static [Self] = &[FavoriteSection::Strip];
}

/// Something that happened to a displayed item
#[derive(Clone, Debug, PartialEq)]
pub enum ItemAction {
    FavoriteToggled { track_id: i64, is_favorite: bool },
}

pub type ItemNotifications = UnboundedReceiver<ItemAction>;

/// A row of the main list
#[derive(Clone, Debug)]
pub struct ListItem {
    pub id: ItemId,
    pub media: MediaRecord,
    notifier: UnboundedSender<ItemAction>,
}

impl ListItem {
    /// Create an item together with the receiving end of its notification channel
    pub fn new(id: ItemId, media: MediaRecord) -> (Self, ItemNotifications) {
        let (notifier, notifications) = mpsc::unbounded();
        let item = Self {
            id,
            media,
            notifier,
        };
        (item, notifications)
    }

    /// Report that the favorite flag of this item's record changed.
    ///
    /// Returns false when nobody listens anymore (the list was rebuilt).
    pub fn notify(&self, action: ItemAction) -> bool {
        self.notifier.unbounded_send(action).is_ok()
    }
}

impl PartialEq for ListItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ListItem {}

impl Hash for ListItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl SnapshotItem for ListItem {
    type Id = ItemId;

    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

/// A cell of the favorites strip
#[derive(Clone, Debug)]
pub struct FavoriteItem {
    pub id: ItemId,
    pub media: MediaRecord,
}

impl PartialEq for FavoriteItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FavoriteItem {}

impl Hash for FavoriteItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl SnapshotItem for FavoriteItem {
    type Id = ItemId;

    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

pub type MainSnapshot = Snapshot<MasterSection, ListItem>;
pub type MainDiff = SnapshotDiff<MasterSection, ListItem>;
pub type FavoriteSnapshot = Snapshot<FavoriteSection, FavoriteItem>;
pub type FavoriteDiff = SnapshotDiff<FavoriteSection, FavoriteItem>;

/// A freshly built main snapshot and the notification receivers of its items
pub struct MainBuild {
    pub snapshot: MainSnapshot,
    pub notifications: Vec<ItemNotifications>,
}

/// Wrap `records` into a single-section main snapshot, keeping their order
pub fn build_main_snapshot(records: &[MediaRecord], strategy: IdentityStrategy) -> MainBuild {
    let ids = ItemId::assign(records, strategy);
    let (items, notifications): (Vec<ListItem>, Vec<ItemNotifications>) = ids
        .into_iter()
        .zip(records)
        .map(|(id, record)| ListItem::new(id, record.clone()))
        .unzip();

    let mut snapshot = MainSnapshot::new();
    snapshot.append_items(MasterSection::Main, items);
    MainBuild {
        snapshot,
        notifications,
    }
}

/// Wrap favorite records into the strip snapshot, keeping their order
pub fn build_favorite_snapshot(records: &[MediaRecord], strategy: IdentityStrategy) -> FavoriteSnapshot {
    let ids = ItemId::assign(records, strategy);
    let items = ids.into_iter().zip(records).map(|(id, record)| FavoriteItem {
        id,
        media: record.clone(),
    });

    let mut snapshot = FavoriteSnapshot::new();
    snapshot.append_items(FavoriteSection::Strip, items);
    snapshot
}
