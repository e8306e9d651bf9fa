//! Messages crossing the boundary between the coordinator and the view
//!
//! The view sends [`Command`]s in; the coordinator answers with
//! [`PresentationEvent`]s. Nothing else is shared between the two.

use tokio::sync::mpsc;

use crate::model::{FavoriteDiff, FavoriteSnapshot, MainDiff, MainSnapshot, MediaRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingState {
    Started,
    Stopped,
}

/// What the "retry" button of an error alert does
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryAction {
    Search(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorState {
    pub title: Option<String>,
    pub message: Option<String>,
    pub retry: Option<RetryAction>,
}

#[derive(Clone, Debug)]
pub enum PresentationEvent {
    Loading(LoadingState),
    Error(ErrorState),
    MainList {
        snapshot: MainSnapshot,
        diff: MainDiff,
    },
    Favorites {
        has_favorites: bool,
        snapshot: FavoriteSnapshot,
        diff: FavoriteDiff,
    },
    /// Open the detail view for a record
    Navigate(MediaRecord),
    /// A record's content changed without affecting list identity
    RecordUpdated(MediaRecord),
}

/// User intent forwarded from the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Preload,
    QueryChanged(String),
    SearchSubmitted(String),
    SearchCancelled,
    Select(usize),
    SelectFavorite(usize),
    ToggleFavorite(usize),
    ToggleFavoriteRecord(i64),
    Retry(RetryAction),
}

pub type EventSender = mpsc::UnboundedSender<PresentationEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PresentationEvent>;

pub type CommandSender = mpsc::UnboundedSender<Command>;
pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

pub fn command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}
