//! Social feed: stories, posts, nested comments and the post composer.

use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::fixtures::{self, Author, Comment, FEED_AVATAR, FEED_HANDLE, Post, STORIES, Story, TRACKS, Track};

pub const MOCK_LOCATION: &str = "Freetown, Sierra Leone";
pub const CAMERA_NOTICE: &str = "Camera access is a mock feature. Select from gallery.";
pub const SHARE_NOTICE: &str = "Share feature is a mock.";

/// Mock audience figures shown on every author page.
pub const PROFILE_FOLLOWERS: &str = "1.2k";
pub const PROFILE_FOLLOWING: &str = "340";
pub const PROFILE_BIO: &str =
    "Travel enthusiast exploring the world, one Vayama trip at a time! \u{1f4cd} Sierra Leone";

/// New local posts are numbered from here, clear of the seed ids.
const FIRST_LOCAL_POST_ID: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SocialError {
    #[error("no post with id {0}")]
    UnknownPost(u64),
    #[error("no comment with id {0}")]
    UnknownComment(String),
    #[error("no story with id {0}")]
    UnknownStory(u32),
    #[error("no track at index {0}")]
    UnknownTrack(usize),
    #[error("unknown composer action: {0}")]
    UnknownAction(String),
    #[error("please add some text or an image to your post")]
    EmptyPost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoFilter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Contrast,
}

impl PhotoFilter {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Grayscale,
        Self::Sepia,
        Self::Invert,
        Self::Contrast,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
            Self::Invert => "Invert",
            Self::Contrast => "Contrast",
        }
    }

    /// CSS `filter` value; empty for no filter.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Grayscale => "grayscale(100%)",
            Self::Sepia => "sepia(100%)",
            Self::Invert => "invert(100%)",
            Self::Contrast => "contrast(200%)",
        }
    }
}

impl FromStr for PhotoFilter {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| SocialError::UnknownAction(format!("filter:{s}")))
    }
}

/// A composer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    AttachImage,
    RemoveImage,
    OpenEditor,
    CloseEditor,
    Filter(PhotoFilter),
    Camera,
    AddLocation,
    RemoveLocation,
    OpenMusic,
    CloseMusic,
    ChooseMusic(usize),
    RemoveMusic,
}

impl FromStr for ComposeAction {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("filter:") {
            return name.parse().map(Self::Filter);
        }
        if let Some(index) = s.strip_prefix("music:") {
            return index
                .parse()
                .map(Self::ChooseMusic)
                .map_err(|_| SocialError::UnknownAction(s.to_string()));
        }
        Ok(match s {
            "attach-image" => Self::AttachImage,
            "remove-image" => Self::RemoveImage,
            "edit-image" => Self::OpenEditor,
            "close-editor" => Self::CloseEditor,
            "camera" => Self::Camera,
            "location" => Self::AddLocation,
            "remove-location" => Self::RemoveLocation,
            "music" => Self::OpenMusic,
            "close-music" => Self::CloseMusic,
            "remove-music" => Self::RemoveMusic,
            other => return Err(SocialError::UnknownAction(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    pub image_url: Option<String>,
    pub filter: PhotoFilter,
    pub location: Option<String>,
    pub music: Option<Track>,
    pub editor_open: bool,
    pub music_picker_open: bool,
}

impl Composer {
    #[must_use]
    pub fn can_post(&self) -> bool {
        !self.text.trim().is_empty() || self.image_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTarget {
    pub comment_id: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct FeedPost {
    pub post: Post,
    pub liked: bool,
    pub comments_open: bool,
    pub reply_to: Option<ReplyTarget>,
}

/// Author page opened from the feed.
#[derive(Debug, Clone)]
pub struct AuthorProfile<'a> {
    pub author: &'a Author,
    pub post_count: usize,
    pub images: Vec<&'a str>,
}

fn find_comment<'a>(comments: &'a [Comment], id: &str) -> Option<&'a Comment> {
    comments
        .iter()
        .find_map(|c| if c.id == id { Some(c) } else { find_comment(&c.replies, id) })
}

fn find_comment_mut<'a>(comments: &'a mut [Comment], id: &str) -> Option<&'a mut Comment> {
    for comment in comments {
        if comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_comment_mut(&mut comment.replies, id) {
            return Some(found);
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct SocialScreen {
    posts: Vec<FeedPost>,
    composer: Composer,
    story: Option<(u32, Instant)>,
    profile: Option<String>,
    story_ttl: Duration,
    next_post_id: u64,
    next_comment_id: u64,
    uploads: u64,
}

impl SocialScreen {
    /// Mount with the non-video seed posts.
    #[must_use]
    pub fn mount(story_ttl: Duration) -> Self {
        let posts = fixtures::posts()
            .into_iter()
            .filter(|p| !p.is_video())
            .map(|post| FeedPost {
                post,
                liked: false,
                comments_open: false,
                reply_to: None,
            })
            .collect();
        Self {
            posts,
            composer: Composer::default(),
            story: None,
            profile: None,
            story_ttl,
            next_post_id: FIRST_LOCAL_POST_ID,
            next_comment_id: 1,
            uploads: 0,
        }
    }

    #[must_use]
    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    #[must_use]
    pub fn stories(&self) -> &'static [Story] {
        &STORIES
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    fn post_mut(&mut self, id: u64) -> Result<&mut FeedPost, SocialError> {
        self.posts
            .iter_mut()
            .find(|p| p.post.id == id)
            .ok_or(SocialError::UnknownPost(id))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Stories
    // ─────────────────────────────────────────────────────────────────────

    pub fn open_story(&mut self, id: u32, now: Instant) -> Result<(), SocialError> {
        if !STORIES.iter().any(|s| s.id == id) {
            return Err(SocialError::UnknownStory(id));
        }
        self.story = Some((id, now));
        Ok(())
    }

    pub fn close_story(&mut self) {
        self.story = None;
    }

    /// Story shown at `now`; the viewer closes itself after the story time.
    #[must_use]
    pub fn active_story(&self, now: Instant) -> Option<&'static Story> {
        let (id, opened) = self.story?;
        if now.saturating_duration_since(opened) >= self.story_ttl {
            return None;
        }
        STORIES.iter().find(|s| s.id == id)
    }

    /// Fraction of the story time elapsed, 0.0 to 1.0.
    #[must_use]
    pub fn story_progress(&self, now: Instant) -> f64 {
        match self.story {
            Some((_, opened)) if !self.story_ttl.is_zero() => {
                (now.saturating_duration_since(opened).as_secs_f64() / self.story_ttl.as_secs_f64())
                    .min(1.0)
            }
            _ => 1.0,
        }
    }

    /// When the open story will close.
    #[must_use]
    pub fn story_closes_at(&self) -> Option<Instant> {
        self.story.map(|(_, opened)| opened + self.story_ttl)
    }

    pub fn tick(&mut self, now: Instant) {
        if self.story.is_some() && self.active_story(now).is_none() {
            self.story = None;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Posts and comments
    // ─────────────────────────────────────────────────────────────────────

    /// Toggle the like on a post and return its new count.
    pub fn toggle_like(&mut self, post_id: u64) -> Result<u32, SocialError> {
        let entry = self.post_mut(post_id)?;
        entry.liked = !entry.liked;
        entry.post.likes = if entry.liked {
            entry.post.likes + 1
        } else {
            entry.post.likes.saturating_sub(1)
        };
        Ok(entry.post.likes)
    }

    pub fn toggle_comments(&mut self, post_id: u64) -> Result<bool, SocialError> {
        let entry = self.post_mut(post_id)?;
        entry.comments_open = !entry.comments_open;
        Ok(entry.comments_open)
    }

    pub fn like_comment(&mut self, post_id: u64, comment_id: &str) -> Result<u32, SocialError> {
        let entry = self.post_mut(post_id)?;
        let comment = find_comment_mut(&mut entry.post.comments, comment_id)
            .ok_or_else(|| SocialError::UnknownComment(comment_id.to_string()))?;
        comment.likes += 1;
        Ok(comment.likes)
    }

    /// Address the next comment on this post as a reply.
    pub fn start_reply(&mut self, post_id: u64, comment_id: &str) -> Result<(), SocialError> {
        let entry = self.post_mut(post_id)?;
        let user = find_comment(&entry.post.comments, comment_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| SocialError::UnknownComment(comment_id.to_string()))?;
        entry.reply_to = Some(ReplyTarget {
            comment_id: comment_id.to_string(),
            user,
        });
        entry.comments_open = true;
        Ok(())
    }

    pub fn cancel_reply(&mut self, post_id: u64) -> Result<(), SocialError> {
        self.post_mut(post_id)?.reply_to = None;
        Ok(())
    }

    /// Post a comment as the demo user. Blank text is ignored.
    pub fn add_comment(&mut self, post_id: u64, text: &str) -> Result<bool, SocialError> {
        let text = text.trim();
        let id = format!("{FEED_HANDLE}-{}", self.next_comment_id);
        let entry = self.post_mut(post_id)?;
        if text.is_empty() {
            return Ok(false);
        }

        let comment = Comment {
            id,
            user: FEED_HANDLE.to_string(),
            text: text.to_string(),
            likes: 0,
            replies: Vec::new(),
        };
        match entry.reply_to.take() {
            Some(target) => {
                let parent = find_comment_mut(&mut entry.post.comments, &target.comment_id)
                    .ok_or(SocialError::UnknownComment(target.comment_id))?;
                parent.replies.push(comment);
            }
            None => entry.post.comments.push(comment),
        }
        self.next_comment_id += 1;
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Author profile
    // ─────────────────────────────────────────────────────────────────────

    pub fn open_profile(&mut self, post_id: u64) -> Result<(), SocialError> {
        let name = self.post_mut(post_id)?.post.author.name.clone();
        self.profile = Some(name);
        Ok(())
    }

    pub fn close_profile(&mut self) {
        self.profile = None;
    }

    #[must_use]
    pub fn profile(&self) -> Option<AuthorProfile<'_>> {
        let name = self.profile.as_deref()?;
        let by_author: Vec<&Post> = self
            .posts
            .iter()
            .map(|p| &p.post)
            .filter(|p| p.author.name == name)
            .collect();
        let author = &by_author.first().copied()?.author;
        let post_count = by_author.len();
        Some(AuthorProfile {
            author,
            post_count,
            images: by_author.into_iter().filter_map(|p| p.image_url.as_deref()).collect(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Composer
    // ─────────────────────────────────────────────────────────────────────

    /// Apply a composer action. Returns a notification to show, if any.
    pub fn compose(&mut self, action: ComposeAction, text: &str) -> Result<Option<&'static str>, SocialError> {
        text.clone_into(&mut self.composer.text);
        let composer = &mut self.composer;
        match action {
            ComposeAction::AttachImage => {
                self.uploads += 1;
                composer.image_url = Some(format!(
                    "https://picsum.photos/seed/vayama_upload{}/600/400",
                    self.uploads
                ));
                composer.filter = PhotoFilter::None;
            }
            ComposeAction::RemoveImage => {
                composer.image_url = None;
                composer.filter = PhotoFilter::None;
                composer.editor_open = false;
            }
            ComposeAction::OpenEditor => composer.editor_open = composer.image_url.is_some(),
            ComposeAction::CloseEditor => composer.editor_open = false,
            ComposeAction::Filter(filter) => {
                composer.filter = filter;
                composer.editor_open = false;
            }
            ComposeAction::Camera => return Ok(Some(CAMERA_NOTICE)),
            ComposeAction::AddLocation => composer.location = Some(MOCK_LOCATION.to_string()),
            ComposeAction::RemoveLocation => composer.location = None,
            ComposeAction::OpenMusic => composer.music_picker_open = true,
            ComposeAction::CloseMusic => composer.music_picker_open = false,
            ComposeAction::ChooseMusic(index) => {
                let track = TRACKS.get(index).copied().ok_or(SocialError::UnknownTrack(index))?;
                composer.music = Some(track);
                composer.music_picker_open = false;
            }
            ComposeAction::RemoveMusic => composer.music = None,
        }
        Ok(None)
    }

    /// Publish the composer as a new post at the top of the feed.
    pub fn publish(&mut self, text: &str) -> Result<u64, SocialError> {
        text.clone_into(&mut self.composer.text);
        if !self.composer.can_post() {
            return Err(SocialError::EmptyPost);
        }

        let composer = std::mem::take(&mut self.composer);
        let id = self.next_post_id;
        self.next_post_id += 1;
        let text = composer.text.trim();

        self.posts.insert(
            0,
            FeedPost {
                post: Post {
                    id,
                    author: Author {
                        name: FEED_HANDLE.to_string(),
                        avatar: FEED_AVATAR.to_string(),
                    },
                    timestamp: "Just now".to_string(),
                    location: composer.location,
                    text: (!text.is_empty()).then(|| text.to_string()),
                    image_url: composer.image_url,
                    video_url: None,
                    likes: 0,
                    comments: Vec::new(),
                    music: composer.music,
                },
                liked: false,
                comments_open: false,
                reply_to: None,
            },
        );
        tracing::debug!(post_id = id, "Post published");
        Ok(id)
    }
}
