//! Social embeds attached beside the leaderboard: at most one per platform.

use url::Url;

use crate::leaderboard::GlobalSettings;

const TWITTER_HOSTS: &[&str] = &["twitter.com", "x.com"];
const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialEmbed {
    /// Link-based timeline; the platform widget script upgrades the anchor.
    TwitterTimeline { url: String, handle: String },
    /// Inline player for a video or a channel's uploads.
    YouTubeFrame { src: String },
    /// Channel handles cannot be embedded as a player; render a link card.
    YouTubeLink { url: String, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported host {0:?}")]
    UnsupportedHost(String),
    #[error("url {0:?} does not name an account, channel or video")]
    MissingTarget(String),
}

fn parse(raw: &str) -> Result<Url, EmbedError> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Url::parse(&candidate).map_err(|err| EmbedError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

/// Host without `www.` / `m.` / `mobile.` prefixes.
fn bare_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    ["www.", "m.", "mobile."]
        .iter()
        .find_map(|p| host.strip_prefix(p).map(str::to_string))
        .unwrap_or(host)
}

fn segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn twitter_embed(raw: &str) -> Result<SocialEmbed, EmbedError> {
    let url = parse(raw)?;
    let host = bare_host(&url);
    if !TWITTER_HOSTS.contains(&host.as_str()) {
        return Err(EmbedError::UnsupportedHost(host));
    }
    let handle = segments(&url)
        .into_iter()
        .next()
        .map(|h| h.trim_start_matches('@').to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| EmbedError::MissingTarget(raw.to_string()))?;
    Ok(SocialEmbed::TwitterTimeline {
        url: format!("https://twitter.com/{handle}"),
        handle,
    })
}

pub fn youtube_embed(raw: &str) -> Result<SocialEmbed, EmbedError> {
    let url = parse(raw)?;
    let host = bare_host(&url);
    if !YOUTUBE_HOSTS.contains(&host.as_str()) {
        return Err(EmbedError::UnsupportedHost(host));
    }
    let parts = segments(&url);
    let frame = |path: String| SocialEmbed::YouTubeFrame {
        src: format!("https://www.youtube-nocookie.com/embed/{path}"),
    };

    if host == "youtu.be" {
        return parts
            .first()
            .map(|id| frame(id.clone()))
            .ok_or_else(|| EmbedError::MissingTarget(raw.to_string()));
    }

    match parts.first().map(String::as_str) {
        Some("watch") => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| frame(v.into_owned()))
            .ok_or_else(|| EmbedError::MissingTarget(raw.to_string())),
        Some("embed") | Some("shorts") | Some("live") if parts.len() > 1 => Ok(frame(parts[1].clone())),
        // Channel ids start with "UC"; their uploads playlist swaps that for "UU".
        Some("channel") if parts.len() > 1 => match parts[1].strip_prefix("UC") {
            Some(rest) => Ok(frame(format!("videoseries?list=UU{rest}"))),
            None => Ok(SocialEmbed::YouTubeLink {
                url: url.to_string(),
                label: parts[1].clone(),
            }),
        },
        Some(handle) if handle.starts_with('@') => Ok(SocialEmbed::YouTubeLink {
            url: format!("https://www.youtube.com/{handle}"),
            label: handle.to_string(),
        }),
        _ => Err(EmbedError::MissingTarget(raw.to_string())),
    }
}

/// Embeds for whichever links are present. Bad links are logged and skipped.
pub fn plan_embeds(settings: Option<&GlobalSettings>) -> Vec<SocialEmbed> {
    let Some(settings) = settings else {
        return Vec::new();
    };
    let mut embeds = Vec::with_capacity(2);
    if let Some(link) = settings.twitter() {
        match twitter_embed(link) {
            Ok(embed) => embeds.push(embed),
            Err(err) => log::warn!("social: skipping twitter embed: {err}"),
        }
    }
    if let Some(link) = settings.youtube() {
        match youtube_embed(link) {
            Ok(embed) => embeds.push(embed),
            Err(err) => log::warn!("social: skipping youtube embed: {err}"),
        }
    }
    embeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_accepts_x_and_bare_hosts() {
        let e = twitter_embed("https://x.com/ShoalFish").unwrap();
        assert_eq!(
            e,
            SocialEmbed::TwitterTimeline {
                url: "https://twitter.com/ShoalFish".into(),
                handle: "ShoalFish".into()
            }
        );
        assert!(twitter_embed("www.twitter.com/@shoal").is_ok());
        assert!(matches!(twitter_embed("https://x.com/"), Err(EmbedError::MissingTarget(_))));
        assert!(matches!(
            twitter_embed("https://example.com/shoal"),
            Err(EmbedError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn youtube_forms() {
        let src = |e: SocialEmbed| match e {
            SocialEmbed::YouTubeFrame { src } => src,
            other => panic!("expected frame, got {other:?}"),
        };
        assert!(src(youtube_embed("https://www.youtube.com/watch?v=abc123").unwrap()).ends_with("/embed/abc123"));
        assert!(src(youtube_embed("https://youtu.be/xyz").unwrap()).ends_with("/embed/xyz"));
        assert!(src(youtube_embed("https://youtube.com/channel/UC42").unwrap()).ends_with("videoseries?list=UU42"));
        assert!(matches!(
            youtube_embed("https://youtube.com/@shoal").unwrap(),
            SocialEmbed::YouTubeLink { .. }
        ));
        assert!(youtube_embed("https://youtube.com/").is_err());
    }

    #[test]
    fn malformed_url_is_an_error_not_a_panic() {
        assert!(matches!(youtube_embed("http://[::1"), Err(EmbedError::InvalidUrl { .. })));
    }

    #[test]
    fn plan_skips_bad_and_absent_links() {
        assert!(plan_embeds(None).is_empty());
        assert!(plan_embeds(Some(&GlobalSettings::default())).is_empty());
        let settings = GlobalSettings {
            twitter_link: Some("https://example.com/nope".into()),
            youtube_link: Some("https://youtu.be/v1".into()),
        };
        let embeds = plan_embeds(Some(&settings));
        assert_eq!(embeds.len(), 1);
        assert!(matches!(embeds[0], SocialEmbed::YouTubeFrame { .. }));
    }
}
