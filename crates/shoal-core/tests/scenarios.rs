// End-to-end checks of both pipelines, run natively with `cargo test`.

use shoal_core::directory::DirectoryCache;
use shoal_core::fish::{School, Viewport};
use shoal_core::leaderboard::{icons_or_empty, leaderboard_from, LeaderboardView};
use shoal_core::preload::PreloadPlan;
use shoal_core::{FetchError, FishConfig, ImagePaths, LayoutConfig, Status};

fn render(lb: &str, icons: Result<String, FetchError>) -> LeaderboardView {
    let doc = leaderboard_from(Ok(lb.to_string())).expect("leaderboard parses");
    let icons = icons_or_empty(icons);
    LeaderboardView::build(doc.entries, &icons, &ImagePaths::default(), &LayoutConfig::default())
}

const ABG: &str = r#"{"leaderboard":[
    {"groupId":"g1","groupName":"Alpha","wins":10},
    {"groupId":"g2","groupName":"Beta","wins":25},
    {"groupId":"g3","groupName":"Gamma","wins":5}
]}"#;

#[test]
fn podium_orders_by_wins_with_default_icons() {
    let view = render(ABG, Ok("{}".to_string()));
    let podium: Vec<(&str, u32)> = view
        .podium
        .iter()
        .map(|s| (s.ranked.entry.group_name.as_str(), s.ranked.entry.wins))
        .collect();
    assert_eq!(podium, [("Beta", 25), ("Alpha", 10), ("Gamma", 5)]);
    let default_icon = ImagePaths::default().default_icon;
    assert!(view.rows.iter().all(|r| r.ranked.icon.url == default_icon));
}

#[test]
fn icon_server_error_still_renders() {
    let view = render(ABG, Err(FetchError::Status(500)));
    assert_eq!(view.rows.len(), 3);
    assert!(view.rows.iter().all(|r| !r.ranked.icon.url.is_empty()));
}

#[test]
fn garbage_icon_document_still_renders() {
    let view = render(ABG, Ok("not json".to_string()));
    assert_eq!(view.podium.len(), 3);
}

#[test]
fn leaderboard_failures_surface() {
    assert!(leaderboard_from(Err(FetchError::Network("offline".into()))).is_err());
    assert!(matches!(
        leaderboard_from(Ok(r#"{"rows": []}"#.into())),
        Err(FetchError::Format(_))
    ));
}

#[test]
fn list_widths_are_monotone_and_bounded() {
    let entries: Vec<String> = (0..40)
        .map(|i| format!(r#"{{"groupId":"g{i}","groupName":"G{i}","wins":{}}}"#, (i * 7) % 23))
        .collect();
    let json = format!(r#"{{"leaderboard":[{}]}}"#, entries.join(","));
    let view = render(&json, Ok("[]".into()));
    let mut pairs: Vec<(u32, f32)> = view
        .rows
        .iter()
        .map(|r| (r.ranked.entry.wins, r.width_percent))
        .collect();
    assert!(pairs.iter().all(|(_, w)| (75.0..=100.0).contains(w)));
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn podium_is_stable_on_ties() {
    let json = r#"[
        {"groupId":"a","groupName":"A","wins":3},
        {"groupId":"b","groupName":"B","wins":7},
        {"groupId":"c","groupName":"C","wins":3},
        {"groupId":"d","groupName":"D","wins":3}
    ]"#;
    let view = render(json, Ok("{}".into()));
    let ids: Vec<_> = view.podium.iter().map(|s| s.ranked.entry.group_id.as_str()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

fn directory_json(total: usize, verified: usize) -> String {
    let groups: Vec<serde_json::Value> = (0..total)
        .map(|i| {
            // Verified groups sit at the end so eviction has to reach past the rest.
            let tags: Vec<&str> = if i >= total - verified {
                vec!["FISH_VERIFIED"]
            } else if i % 3 == 0 {
                vec!["FISH_CERTIFIED"]
            } else {
                vec![]
            };
            serde_json::json!({
                "group_id": format!("g{i}"),
                "group_name": format!("Group {i}"),
                "icon_url": format!("https://cdn.example/{i}.png"),
                "tags": tags,
            })
        })
        .collect();
    serde_json::json!({ "community_groups": groups }).to_string()
}

#[test]
fn directory_keeps_sixty_verified_and_forty_next_best() {
    let mut cache = DirectoryCache::default();
    let kept = cache.accept(Ok(directory_json(150, 60)), 0.0);
    assert_eq!(kept.len(), 100);
    let verified = kept.iter().filter(|g| g.status() == Status::Verified).count();
    assert_eq!(verified, 60);
    // 90 non-verified groups, 30 of them certified: all 30 make the cut, then 10 known.
    let certified = kept.iter().filter(|g| g.status() == Status::Certified).count();
    assert_eq!(certified, 30);
}

#[test]
fn directory_cap_holds_for_large_inputs() {
    let mut cache = DirectoryCache::default();
    let kept = cache.accept(Ok(directory_json(400, 10)), 0.0);
    assert_eq!(kept.len(), 100);
    assert!(cache.groups().len() <= 100);
}

#[test]
fn empty_directory_yields_one_fallback_fish() {
    let cfg = FishConfig::default();
    let mut cache = DirectoryCache::default();
    let groups = cache.accept(Ok(r#"{"community_groups": []}"#.into()), 0.0);
    let plan = PreloadPlan::from_groups(&groups);

    let mut school = School::new(Viewport::new(1280.0, 720.0), cfg, 17);
    school.spawn_placeholders(&ImagePaths::default().known_placeholder);
    school.begin_resolve(plan.len());
    school.finish("images/fish/known.png");
    assert_eq!(school.len(), 1);
    school.frame(0.5);
}

#[test]
fn full_fish_pipeline_resolves_every_slot() {
    let cfg = FishConfig::default();
    let mut cache = DirectoryCache::default();
    let groups = cache.accept(Ok(directory_json(23, 4)), 0.0);
    let plan = PreloadPlan::from_groups(&groups);
    assert_eq!(plan.first().map(|i| i.status), Some(Status::Verified));

    let mut school = School::new(Viewport::new(1280.0, 720.0), cfg, 5);
    school.spawn_placeholders("p.png");
    school.begin_resolve(plan.len());
    for (slot, item) in plan.items().iter().enumerate() {
        school.resolve_slot(slot, item);
    }
    assert!(school.finish("fallback.png").is_empty());
    assert_eq!(school.len(), 23);
    assert!(school.iter().all(|f| !f.is_placeholder()));
}
