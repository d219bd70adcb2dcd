//! Ranking and sizing for the podium and the full list.
//!
//! Only geometry lives here; the DOM layer turns these numbers into styles.

use crate::config::{ImagePaths, LayoutConfig};
use crate::leaderboard::document::LeaderboardEntry;
use crate::leaderboard::icons::{resolve_icon, IconMap, ResolvedIcon};

pub const PODIUM_SIZE: usize = 3;

/// A leaderboard entry merged with its icon and placed at a rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub entry: LeaderboardEntry,
    pub icon: ResolvedIcon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodiumSlot {
    pub ranked: RankedEntry,
    /// Bar height in px.
    pub bar_height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub ranked: RankedEntry,
    /// Row width as a percentage of the container.
    pub width_percent: f32,
}

/// Everything the renderer needs for both views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardView {
    pub podium: Vec<PodiumSlot>,
    pub rows: Vec<ListRow>,
}

/// Descending by wins. `sort_by` is stable, so ties keep document order.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.wins.cmp(&a.wins));
    entries
}

pub fn podium_bar_height(wins: u32, max_wins: u32, layout: &LayoutConfig) -> f32 {
    if max_wins == 0 {
        return layout.podium_min_height;
    }
    let scaled = wins as f32 / max_wins as f32 * layout.podium_max_height;
    scaled.max(layout.podium_min_height)
}

pub fn list_width_percent(wins: u32, max_wins: u32, layout: &LayoutConfig) -> f32 {
    if max_wins == 0 {
        return layout.list_min_width;
    }
    let ratio = (wins as f32 / max_wins as f32).clamp(0.0, 1.0);
    let width = layout.list_min_width + ratio * (layout.list_max_width - layout.list_min_width);
    width.clamp(layout.list_min_width, layout.list_max_width)
}

impl LeaderboardView {
    /// Merge entries with icons, rank them and size both views.
    pub fn build(
        entries: Vec<LeaderboardEntry>,
        icons: &IconMap,
        images: &ImagePaths,
        layout: &LayoutConfig,
    ) -> Self {
        let ranked: Vec<RankedEntry> = rank_entries(entries)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let icon = resolve_icon(&entry.group_id, &entry.group_name, icons, images);
                RankedEntry { rank: i + 1, entry, icon }
            })
            .collect();

        let max_wins = ranked.first().map(|r| r.entry.wins).unwrap_or(0);
        let max_top = ranked
            .iter()
            .take(PODIUM_SIZE)
            .map(|r| r.entry.wins)
            .max()
            .unwrap_or(0);

        let podium = ranked
            .iter()
            .take(PODIUM_SIZE)
            .map(|r| PodiumSlot {
                bar_height: podium_bar_height(r.entry.wins, max_top, layout),
                ranked: r.clone(),
            })
            .collect();

        let rows = ranked
            .into_iter()
            .map(|r| ListRow {
                width_percent: list_width_percent(r.entry.wins, max_wins, layout),
                ranked: r,
            })
            .collect();

        Self { podium, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, wins: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            group_id: id.into(),
            group_name: id.to_uppercase(),
            wins,
            twitter_link: None,
            youtube_link: None,
        }
    }

    fn build(entries: Vec<LeaderboardEntry>) -> LeaderboardView {
        LeaderboardView::build(
            entries,
            &IconMap::new(),
            &ImagePaths::default(),
            &LayoutConfig::default(),
        )
    }

    #[test]
    fn ties_keep_document_order() {
        let ranked = rank_entries(vec![entry("a", 5), entry("b", 9), entry("c", 5), entry("d", 9)]);
        let ids: Vec<_> = ranked.iter().map(|e| e.group_id.as_str()).collect();
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }

    #[test]
    fn podium_takes_at_most_three() {
        let view = build(vec![entry("a", 1), entry("b", 2)]);
        assert_eq!(view.podium.len(), 2);
        let view = build((0..6).map(|i| entry(&format!("g{i}"), i)).collect());
        assert_eq!(view.podium.len(), 3);
        assert_eq!(view.podium[0].ranked.entry.wins, 5);
        assert_eq!(view.podium[2].ranked.rank, 3);
        assert_eq!(view.rows.len(), 6);
    }

    #[test]
    fn podium_heights_scale_with_floor() {
        let layout = LayoutConfig::default();
        assert_eq!(podium_bar_height(20, 20, &layout), layout.podium_max_height);
        assert_eq!(podium_bar_height(10, 20, &layout), 100.0);
        assert_eq!(podium_bar_height(1, 20, &layout), layout.podium_min_height);
        assert_eq!(podium_bar_height(0, 0, &layout), layout.podium_min_height);
    }

    #[test]
    fn list_width_bounds() {
        let layout = LayoutConfig::default();
        assert_eq!(list_width_percent(0, 40, &layout), 75.0);
        assert_eq!(list_width_percent(40, 40, &layout), 100.0);
        assert_eq!(list_width_percent(20, 40, &layout), 87.5);
        assert_eq!(list_width_percent(0, 0, &layout), 75.0);
    }

    #[test]
    fn empty_leaderboard_builds_empty_view() {
        let view = build(Vec::new());
        assert!(view.is_empty());
        assert!(view.podium.is_empty());
    }
}
