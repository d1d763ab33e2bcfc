use crate::screens::reels::{EMPTY_MESSAGE, Reel, ReelsScreen};

use super::{action_button, escape};

fn render_reel(reel: &Reel, visible: bool) -> String {
    let post = &reel.post;
    let id = post.id.to_string();
    let video = post.video_url.as_deref().unwrap_or_default();
    let playback = if visible {
        "autoplay muted loop playsinline"
    } else {
        r#"muted loop playsinline preload="none""#
    };
    let music = post
        .music
        .map(|t| {
            format!(
                r#"<span class="music">&#9835; {} &middot; {}</span>"#,
                escape(t.title),
                escape(t.artist)
            )
        })
        .unwrap_or_default();
    let play = if visible {
        String::new()
    } else {
        action_button("/reels/show", &[("post_id", id.as_str())], "Play", "btn small")
    };
    let heart = if reel.liked { "&#9829;" } else { "&#9825;" };
    format!(
        r#"<article class="reel{}">
    <video src="{}" {playback}></video>
    <div class="overlay">
        <strong>@{}</strong>
        <p>{}</p>
        {music}
    </div>
    <div class="reel-actions">{}{play}</div>
</article>"#,
        if visible { " active" } else { "" },
        escape(video),
        escape(&post.author.name),
        escape(post.text.as_deref().unwrap_or_default()),
        action_button(
            "/reels/like",
            &[("post_id", id.as_str())],
            &format!("{heart} {}", post.likes),
            if reel.liked { "like liked" } else { "like" }
        ),
    )
}

pub(super) fn render(screen: &ReelsScreen) -> String {
    if screen.reels().is_empty() {
        return format!(r#"<p class="empty">{EMPTY_MESSAGE}</p>"#);
    }
    let reels: String = screen
        .reels()
        .iter()
        .map(|reel| render_reel(reel, screen.visible() == Some(reel.post.id)))
        .collect();
    format!(r#"<section class="reels">{reels}</section>"#)
}
