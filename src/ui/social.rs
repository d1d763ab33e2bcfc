use std::time::Instant;

use crate::fixtures::{Comment, Story, TRACKS};
use crate::screens::social::{
    AuthorProfile, Composer, FeedPost, PROFILE_BIO, PROFILE_FOLLOWERS, PROFILE_FOLLOWING, PhotoFilter,
    SocialScreen,
};

use super::{action_button, escape};

fn filter_style(filter: PhotoFilter) -> String {
    match filter.css() {
        "" => String::new(),
        css => format!(r#" style="filter: {css}""#),
    }
}

fn render_profile(profile: &AuthorProfile<'_>) -> String {
    let grid: String = profile
        .images
        .iter()
        .map(|url| format!(r#"<img src="{}" alt="" loading="lazy">"#, escape(url)))
        .collect();
    format!(
        r#"<header class="screen-header">{}<h1>{}</h1></header>
<section class="author card">
    <img class="avatar large" src="{}" alt="">
    <div class="stats">
        <div><strong>{}</strong><span>Posts</span></div>
        <div><strong>{PROFILE_FOLLOWERS}</strong><span>Followers</span></div>
        <div><strong>{PROFILE_FOLLOWING}</strong><span>Following</span></div>
    </div>
    <p class="bio">{PROFILE_BIO}</p>
</section>
<section class="grid">{grid}</section>"#,
        action_button("/social/profile-close", &[], "&larr;", "icon"),
        escape(&profile.author.name),
        escape(&profile.author.avatar),
        profile.post_count,
    )
}

fn render_story_viewer(story: &Story, progress: f64) -> String {
    format!(
        r#"<div class="story-viewer">
    <div class="progress"><span style="width: {:.0}%"></span></div>
    <header><img class="avatar" src="{}" alt=""><strong>{}</strong>{}</header>
    <img class="story-content" src="{}" alt="">
</div>"#,
        progress * 100.0,
        escape(story.avatar),
        escape(story.name),
        action_button("/social/story-close", &[], "&times;", "icon"),
        escape(story.content_url),
    )
}

fn render_stories(stories: &[Story]) -> String {
    let items: String = stories
        .iter()
        .map(|story| {
            let id = story.id.to_string();
            let label = format!(
                r#"<img class="avatar ring" src="{}" alt=""><span>{}</span>"#,
                escape(story.avatar),
                escape(story.name)
            );
            action_button("/social/story", &[("story_id", id.as_str())], &label, "story")
        })
        .collect();
    format!(r#"<section class="stories">{items}</section>"#)
}

fn compose_button(action: &str, label: &str, class: &str) -> String {
    format!(
        r#"<button type="submit" formaction="/social/compose" name="action" value="{}" class="{class}">{label}</button>"#,
        escape(action)
    )
}

fn render_composer(composer: &Composer) -> String {
    let mut extras = String::new();
    if let Some(url) = &composer.image_url {
        extras.push_str(&format!(
            r#"<div class="preview"><img src="{}" alt=""{}>{}{}</div>"#,
            escape(url),
            filter_style(composer.filter),
            compose_button("edit-image", "Edit", "btn small"),
            compose_button("remove-image", "&times;", "icon"),
        ));
    }
    if composer.editor_open {
        let filters: String = PhotoFilter::ALL
            .into_iter()
            .map(|f| {
                let class = if f == composer.filter { "chip active" } else { "chip" };
                compose_button(&format!("filter:{}", f.label()), f.label(), class)
            })
            .collect();
        extras.push_str(&format!(
            r#"<div class="filters">{filters}{}</div>"#,
            compose_button("close-editor", "Done", "btn small")
        ));
    }
    if let Some(location) = &composer.location {
        extras.push_str(&format!(
            r#"<span class="chip">&#128205; {}{}</span>"#,
            escape(location),
            compose_button("remove-location", "&times;", "icon")
        ));
    }
    if let Some(track) = composer.music {
        extras.push_str(&format!(
            r#"<span class="chip">&#9835; {} &middot; {}{}</span>"#,
            escape(track.title),
            escape(track.artist),
            compose_button("remove-music", "&times;", "icon")
        ));
    }
    if composer.music_picker_open {
        let tracks: String = TRACKS
            .iter()
            .enumerate()
            .map(|(i, t)| {
                compose_button(
                    &format!("music:{i}"),
                    &format!("{} &middot; {}", escape(t.title), escape(t.artist)),
                    "track",
                )
            })
            .collect();
        extras.push_str(&format!(
            r#"<div class="music-picker">{tracks}{}</div>"#,
            compose_button("close-music", "Cancel", "link")
        ));
    }

    format!(
        r#"<form method="post" action="/social/post" class="card post-composer">
    <textarea name="text" rows="2" placeholder="What's on your mind, traveller?">{}</textarea>
    {extras}
    <div class="composer-tools">
        {}{}{}{}
        <button type="submit" class="btn primary"{}>Post</button>
    </div>
</form>"#,
        escape(&composer.text),
        compose_button("attach-image", "Photo", "tool"),
        compose_button("camera", "Camera", "tool"),
        compose_button("location", "Location", "tool"),
        compose_button("music", "Music", "tool"),
        if composer.image_url.is_some() || !composer.text.trim().is_empty() {
            ""
        } else {
            " disabled"
        },
    )
}

fn render_comments(post_id: &str, comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| {
            let fields = [("post_id", post_id), ("comment_id", c.id.as_str())];
            let replies = if c.replies.is_empty() {
                String::new()
            } else {
                format!(r#"<div class="replies">{}</div>"#, render_comments(post_id, &c.replies))
            };
            format!(
                r#"<div class="comment"><p><strong>{}</strong> {}</p><div class="comment-actions">{}{}</div>{replies}</div>"#,
                escape(&c.user),
                escape(&c.text),
                action_button("/social/comment-like", &fields, &format!("&#9825; {}", c.likes), "link"),
                action_button("/social/reply", &fields, "Reply", "link"),
            )
        })
        .collect()
}

fn render_post(entry: &FeedPost) -> String {
    let post = &entry.post;
    let id = post.id.to_string();
    let fields = [("post_id", id.as_str())];

    let location = post
        .location
        .as_deref()
        .map(|l| format!(r#" &middot; {}"#, escape(l)))
        .unwrap_or_default();
    let text = post
        .text
        .as_deref()
        .map(|t| format!("<p>{}</p>", escape(t)))
        .unwrap_or_default();
    let image = post
        .image_url
        .as_deref()
        .map(|u| format!(r#"<img class="post-image" src="{}" alt="" loading="lazy">"#, escape(u)))
        .unwrap_or_default();
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

    let comments = if entry.comments_open {
        let (placeholder, banner) = match &entry.reply_to {
            Some(target) => (
                format!("Replying to @{}", escape(&target.user)),
                format!(
                    r#"<div class="reply-banner">Replying to @{}{}</div>"#,
                    escape(&target.user),
                    action_button("/social/reply-cancel", &fields, "Cancel", "link")
                ),
            ),
            None => ("Add a comment".to_string(), String::new()),
        };
        format!(
            r#"<section class="comments">{}{banner}
    <form method="post" action="/social/comment" class="composer">
        <input type="hidden" name="post_id" value="{id}">
        <input type="text" name="text" placeholder="{placeholder}" autocomplete="off">
        <button type="submit" class="btn small">Post</button>
    </form>
</section>"#,
            render_comments(&id, &post.comments)
        )
    } else {
        String::new()
    };

    let heart = if entry.liked { "&#9829;" } else { "&#9825;" };
    let author = format!(
        r#"<img class="avatar" src="{}" alt=""><strong>{}</strong>"#,
        escape(&post.author.avatar),
        escape(&post.author.name)
    );
    format!(
        r#"<article class="post card">
    <header>{}<span class="meta">{}{location}</span></header>
    {text}{image}{music}
    <footer class="post-actions">{}{}{}</footer>
    {comments}
</article>"#,
        action_button("/social/profile", &fields, &author, "author"),
        escape(&post.timestamp),
        action_button(
            "/social/like",
            &fields,
            &format!("{heart} {}", post.likes),
            if entry.liked { "like liked" } else { "like" }
        ),
        action_button(
            "/social/comments",
            &fields,
            &format!("&#128172; {}", post.comments.len()),
            "link"
        ),
        action_button("/social/share", &[], "Share", "link"),
    )
}

pub(super) fn render(screen: &SocialScreen, now: Instant) -> String {
    if let Some(profile) = screen.profile() {
        return render_profile(&profile);
    }
    let viewer = screen
        .active_story(now)
        .map(|story| render_story_viewer(story, screen.story_progress(now)))
        .unwrap_or_default();
    let posts: String = screen.posts().iter().map(render_post).collect();
    format!(
        r#"<header class="screen-header"><h1>Vayama Social</h1>{}</header>
{viewer}{}{}
<section class="feed">{posts}</section>"#,
        action_button("/social/inbox", &[], "Messages", "icon"),
        render_stories(screen.stories()),
        render_composer(screen.composer()),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::screens::social::ComposeAction;

    fn screen() -> SocialScreen {
        SocialScreen::mount(Duration::from_secs(5))
    }

    #[test]
    fn test_feed_renders_nested_comments_when_open() {
        let now = Instant::now();
        let mut s = screen();
        assert!(!render(&s, now).contains("Thank you!"));
        s.toggle_comments(1).unwrap();
        s.start_reply(1, "c1-1").unwrap();
        let html = render(&s, now);
        assert!(html.contains("Thank you!"));
        assert!(html.contains("Replying to @JaneDoe"));
    }

    #[test]
    fn test_story_viewer_and_profile_page() {
        let now = Instant::now();
        let mut s = screen();
        s.open_story(2, now).unwrap();
        assert!(render(&s, now).contains("story-viewer"));
        assert!(!render(&s, now + Duration::from_secs(5)).contains("story-viewer"));

        s.open_profile(1).unwrap();
        let html = render(&s, now);
        assert!(html.contains(PROFILE_FOLLOWERS));
        assert_eq!(html.matches("<img src=").count(), 1);
    }

    #[test]
    fn test_composer_preview_uses_filter() {
        let mut s = screen();
        s.compose(ComposeAction::AttachImage, "").unwrap();
        s.compose(ComposeAction::Filter(PhotoFilter::Invert), "").unwrap();
        let html = render(&s, Instant::now());
        assert!(html.contains("filter: invert(100%)"));
        assert!(!html.contains(r#"class="btn primary" disabled"#));
    }
}
