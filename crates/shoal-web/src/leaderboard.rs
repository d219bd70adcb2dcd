//! Leaderboard page: fetch both documents, then render podium and list.

use shoal_core::leaderboard::{
    icons_or_empty, leaderboard_from, placeholder_for_tags, LeaderboardEntry, ListRow, PodiumSlot,
};
use shoal_core::{FetchError, GlobalSettings, LeaderboardView, SiteConfig};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::dom;
use crate::net::fetch_text;

/// Visual podium order: second, first, third.
fn podium_order(rank: usize) -> &'static str {
    match rank {
        1 => "2",
        2 => "1",
        _ => "3",
    }
}

pub async fn run(config: SiteConfig) {
    let doc = match dom::document() {
        Ok(doc) => doc,
        Err(err) => {
            log::error!("leaderboard: {err:?}");
            return;
        }
    };
    let ids = &config.elements;
    let (podium, list) = match (doc.get_element_by_id(&ids.podium), doc.get_element_by_id(&ids.list)) {
        (Some(podium), Some(list)) => (podium, list),
        (podium, list) => {
            log::error!("leaderboard: missing #{} or #{}", ids.podium, ids.list);
            if let Some(host) = podium.or(list) {
                let _ = show_message(&doc, &host, "Leaderboard is unavailable on this page.");
            }
            return;
        }
    };
    let _ = show_message(&doc, &list, "Loading leaderboard...");

    // Both documents settle before anything is merged.
    let board = fetch_text(&config.leaderboard_url).await;
    let icons = fetch_text(&config.icons_url).await;

    let document = match leaderboard_from(board) {
        Ok(document) => document,
        Err(err) => {
            log::error!("leaderboard: {err}");
            dom::clear(&podium);
            if let Err(js) = show_error(&doc, &list, &err) {
                log::error!("leaderboard: could not render error: {js:?}");
            }
            return;
        }
    };
    let icons = icons_or_empty(icons);
    let view = LeaderboardView::build(document.entries, &icons, &config.images, &config.layout);
    log::info!("leaderboard: {} groups, {} icons", view.rows.len(), icons.len());

    let rendered = render_podium(&doc, &podium, &view.podium, &config)
        .and_then(|_| render_list(&doc, &list, &view.rows, &config))
        .and_then(|_| wire_toggles(&doc, &config, &podium, &list));
    if let Err(err) = rendered {
        log::error!("leaderboard: render failed: {err:?}");
    }

    if let Err(err) = attach_social(&doc, &config, document.settings.as_ref()) {
        log::warn!("leaderboard: social embeds failed: {err:?}");
    }
}

fn show_message(doc: &Document, host: &Element, text: &str) -> Result<(), JsValue> {
    dom::clear(host);
    host.append_child(&dom::text_el(doc, "p", "leaderboard-message", text)?.into())?;
    Ok(())
}

fn show_error(doc: &Document, host: &Element, err: &FetchError) -> Result<(), JsValue> {
    dom::clear(host);
    let block = dom::el(doc, "div", "leaderboard-error")?;
    block.append_child(&dom::text_el(doc, "p", "", err.user_message())?.into())?;
    let retry = dom::text_el(doc, "button", "leaderboard-retry", "Retry")?;
    retry.set_attribute("type", "button")?;
    dom::on_click(&retry, dom::reload_page)?;
    block.append_child(&retry)?;
    host.append_child(&block)?;
    Ok(())
}

fn icon(doc: &Document, class: &str, url: &str, tags: &[String], name: &str, config: &SiteConfig) -> Result<Element, JsValue> {
    let fallback = placeholder_for_tags(tags, &config.images);
    Ok(dom::image_with_fallback(doc, class, url, name, fallback)?.into())
}

fn render_podium(doc: &Document, host: &Element, slots: &[PodiumSlot], config: &SiteConfig) -> Result<(), JsValue> {
    dom::clear(host);
    for slot in slots {
        let ranked = &slot.ranked;
        let entry = &ranked.entry;
        let place = dom::el(doc, "div", &format!("podium-place rank-{}", ranked.rank))?;
        dom::set_style(&place, "order", podium_order(ranked.rank));

        place.append_child(&icon(doc, "podium-icon", &ranked.icon.url, &ranked.icon.tags, &entry.group_name, config)?.into())?;
        place.append_child(&dom::text_el(doc, "div", "podium-name", &entry.group_name)?.into())?;

        let bar = dom::el(doc, "div", "podium-bar")?;
        dom::set_style(&bar, "height", &format!("{:.0}px", slot.bar_height));
        bar.append_child(&dom::text_el(doc, "span", "podium-wins", &entry.wins.to_string())?.into())?;
        bar.append_child(&dom::text_el(doc, "span", "podium-rank", &ranked.rank.to_string())?.into())?;
        place.append_child(&bar)?;

        host.append_child(&place)?;
    }
    Ok(())
}

fn render_list(doc: &Document, host: &Element, rows: &[ListRow], config: &SiteConfig) -> Result<(), JsValue> {
    dom::clear(host);
    if rows.is_empty() {
        return show_message(doc, host, "No results yet.");
    }
    for row in rows {
        let ranked = &row.ranked;
        let entry = &ranked.entry;
        let item = dom::el(doc, "div", "leaderboard-row")?;
        dom::set_style(&item, "width", &format!("{:.1}%", row.width_percent));

        item.append_child(&dom::text_el(doc, "span", "row-rank", &format!("#{}", ranked.rank))?.into())?;
        item.append_child(&icon(doc, "row-icon", &ranked.icon.url, &ranked.icon.tags, &entry.group_name, config)?.into())?;
        item.append_child(&dom::text_el(doc, "span", "row-name", &entry.group_name)?.into())?;
        append_links(doc, &item, entry)?;
        item.append_child(&dom::text_el(doc, "span", "row-wins", &format!("{} wins", entry.wins))?.into())?;

        host.append_child(&item)?;
    }
    Ok(())
}

fn append_links(doc: &Document, row: &Element, entry: &LeaderboardEntry) -> Result<(), JsValue> {
    let links = [("X", &entry.twitter_link), ("YouTube", &entry.youtube_link)];
    for (label, link) in links {
        let Some(href) = link.as_deref().map(str::trim).filter(|l| !l.is_empty()) else {
            continue;
        };
        let anchor = dom::text_el(doc, "a", "row-link", label)?;
        anchor.set_attribute("href", href)?;
        anchor.set_attribute("target", "_blank")?;
        anchor.set_attribute("rel", "noopener noreferrer")?;
        row.append_child(&anchor)?;
    }
    Ok(())
}

/// Podium/list toggle buttons are optional; without them both views stay.
fn wire_toggles(doc: &Document, config: &SiteConfig, podium: &Element, list: &Element) -> Result<(), JsValue> {
    let ids = &config.elements;
    let (Some(show_podium), Some(show_list)) = (
        doc.get_element_by_id(&ids.podium_toggle),
        doc.get_element_by_id(&ids.list_toggle),
    ) else {
        return Ok(());
    };
    let (p, l) = (podium.clone(), list.clone());
    dom::on_click(&show_podium, move || {
        dom::set_visible(&p, true);
        dom::set_visible(&l, false);
    })?;
    let (p, l) = (podium.clone(), list.clone());
    dom::on_click(&show_list, move || {
        dom::set_visible(&p, false);
        dom::set_visible(&l, true);
    })?;
    Ok(())
}

#[cfg(feature = "social")]
fn attach_social(
    doc: &Document,
    config: &SiteConfig,
    settings: Option<&GlobalSettings>,
) -> Result<(), JsValue> {
    use shoal_core::{plan_embeds, SocialEmbed};

    let embeds = plan_embeds(settings);
    if embeds.is_empty() {
        return Ok(());
    }
    let Some(host) = doc.get_element_by_id(&config.elements.social) else {
        log::debug!("leaderboard: no #{} container, skipping embeds", config.elements.social);
        return Ok(());
    };
    for embed in embeds {
        let (platform, node) = match embed {
            SocialEmbed::TwitterTimeline { url, handle } => {
                let anchor = dom::text_el(doc, "a", "twitter-timeline", &format!("Posts by @{handle}"))?;
                anchor.set_attribute("href", &url)?;
                anchor.set_attribute("data-height", "480")?;
                ("twitter", anchor)
            }
            SocialEmbed::YouTubeFrame { src } => {
                let frame = dom::el(doc, "iframe", "youtube-embed")?;
                frame.set_attribute("src", &src)?;
                frame.set_attribute("title", "YouTube")?;
                frame.set_attribute("loading", "lazy")?;
                frame.set_attribute("allowfullscreen", "")?;
                ("youtube", frame)
            }
            SocialEmbed::YouTubeLink { url, label } => {
                let anchor = dom::text_el(doc, "a", "youtube-link", &label)?;
                anchor.set_attribute("href", &url)?;
                anchor.set_attribute("target", "_blank")?;
                anchor.set_attribute("rel", "noopener noreferrer")?;
                ("youtube", anchor)
            }
        };
        // One embed per platform, even if the page already carries one.
        if host.query_selector(&format!("[data-embed=\"{platform}\"]"))?.is_some() {
            continue;
        }
        node.set_attribute("data-embed", platform)?;
        host.append_child(&node)?;
    }
    Ok(())
}

#[cfg(not(feature = "social"))]
fn attach_social(_: &Document, _: &SiteConfig, settings: Option<&GlobalSettings>) -> Result<(), JsValue> {
    if settings.is_some_and(|s| !s.is_empty()) {
        log::debug!("leaderboard: built without social embeds");
    }
    Ok(())
}
