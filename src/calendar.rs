//! Calendar and timeline views over the user's own posts, plus My Posts tab
//! state.
//!
//! DESIGN
//! ======
//! Everything here is a pure function of an already-fetched post list; the
//! Posts and Calendar tabs share one `by_creator` fetch. Backend timestamps
//! look like `2024-05-02 08:30:00.000Z`; RFC 3339 with a `T` separator is
//! accepted too. Only the wall-clock fields are read, so dates are UTC days.

use std::collections::BTreeMap;

use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

use crate::posts::Post;

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;

/// Calendar day of a backend timestamp.
#[must_use]
pub fn date_of(created: &str) -> Option<Date> {
    let head = created.get(..10)?;
    match Date::parse(head, format_description!("[year]-[month]-[day]")) {
        Ok(date) => Some(date),
        Err(_) => None,
    }
}

/// Date and time of a backend timestamp, to the second.
#[must_use]
pub fn created_at(created: &str) -> Option<PrimitiveDateTime> {
    let date = date_of(created)?;
    let sep = created.get(10..11)?;
    if sep != " " && sep != "T" {
        return None;
    }
    let clock = created.get(11..19)?;
    match Time::parse(clock, format_description!("[hour]:[minute]:[second]")) {
        Ok(time) => Some(PrimitiveDateTime::new(date, time)),
        Err(_) => None,
    }
}

/// Dot and highlight flags for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayMark {
    pub has_posts: bool,
    pub selected: bool,
}

/// Marks for every day that has posts, plus the selected day.
#[must_use]
pub fn marks(posts: &[Post], selected: Option<Date>) -> BTreeMap<Date, DayMark> {
    let mut out: BTreeMap<Date, DayMark> = BTreeMap::new();
    for date in posts.iter().filter_map(|p| date_of(&p.created)) {
        out.entry(date).or_default().has_posts = true;
    }
    if let Some(date) = selected {
        out.entry(date).or_default().selected = true;
    }
    out
}

/// Posts created on `date`, in list order.
#[must_use]
pub fn posts_on(posts: &[Post], date: Date) -> Vec<&Post> {
    posts
        .iter()
        .filter(|p| date_of(&p.created) == Some(date))
        .collect()
}

/// All posts newest first. Posts with unreadable timestamps sink to the end.
#[must_use]
pub fn timeline(posts: &[Post]) -> Vec<&Post> {
    let mut out: Vec<&Post> = posts.iter().collect();
    out.sort_by(|a, b| created_at(&b.created).cmp(&created_at(&a.created)));
    out
}

// =============================================================================
// TAB STATE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarMode {
    #[default]
    Calendar,
    Timeline,
}

impl CalendarMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Calendar => Self::Timeline,
            Self::Timeline => Self::Calendar,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MyPostsTab {
    #[default]
    Posts,
    Collections,
    Calendar,
}

impl MyPostsTab {
    /// Whether the tab renders the user's post list.
    #[must_use]
    pub fn needs_posts(self) -> bool {
        matches!(self, Self::Posts | Self::Calendar)
    }

    #[must_use]
    pub fn needs_collections(self) -> bool {
        self == Self::Collections
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Posts => "Posts",
            Self::Collections => "Collections",
            Self::Calendar => "Calendar",
        }
    }

    /// Editor the tab's "new" button opens.
    #[must_use]
    pub fn create_route(self) -> crate::routes::Route {
        use crate::routes::{Route, Target};
        match self {
            Self::Collections => Route::CollectionEditor(Target::New),
            Self::Posts | Self::Calendar => Route::PostEditor(Target::New),
        }
    }
}
