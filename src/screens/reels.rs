//! Short-video feed.

use crate::fixtures::{self, Post};
use crate::screens::social::SocialError;

pub const EMPTY_MESSAGE: &str = "No reels available right now.";

#[derive(Debug, Clone)]
pub struct Reel {
    pub post: Post,
    pub liked: bool,
}

#[derive(Debug, Clone)]
pub struct ReelsScreen {
    reels: Vec<Reel>,
    visible: Option<u64>,
}

impl ReelsScreen {
    #[must_use]
    pub fn mount() -> Self {
        Self::from_posts(fixtures::posts())
    }

    /// Build from any posts; only videos are kept.
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let reels: Vec<Reel> = posts
            .into_iter()
            .filter(Post::is_video)
            .map(|post| Reel { post, liked: false })
            .collect();
        let visible = reels.first().map(|r| r.post.id);
        Self { reels, visible }
    }

    #[must_use]
    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    /// Id of the reel that plays.
    #[must_use]
    pub fn visible(&self) -> Option<u64> {
        self.visible
    }

    pub fn show(&mut self, id: u64) -> Result<(), SocialError> {
        if !self.reels.iter().any(|r| r.post.id == id) {
            return Err(SocialError::UnknownPost(id));
        }
        self.visible = Some(id);
        Ok(())
    }

    /// Toggle the like on a reel and return its new count.
    pub fn toggle_like(&mut self, id: u64) -> Result<u32, SocialError> {
        let reel = self
            .reels
            .iter_mut()
            .find(|r| r.post.id == id)
            .ok_or(SocialError::UnknownPost(id))?;
        reel.liked = !reel.liked;
        reel.post.likes = if reel.liked {
            reel.post.likes + 1
        } else {
            reel.post.likes.saturating_sub(1)
        };
        Ok(reel.post.likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_video_visible() {
        let reels = ReelsScreen::mount();
        assert_eq!(reels.reels().len(), 3);
        assert_eq!(reels.visible(), Some(101));
    }

    #[test]
    fn test_like_toggles_count() {
        let mut reels = ReelsScreen::mount();
        assert_eq!(reels.toggle_like(103), Ok(542));
        assert_eq!(reels.toggle_like(103), Ok(541));
        assert_eq!(reels.toggle_like(1), Err(SocialError::UnknownPost(1)));
    }

    #[test]
    fn test_no_videos_means_empty() {
        let reels = ReelsScreen::from_posts(
            fixtures::posts().into_iter().filter(|p| !p.is_video()).collect(),
        );
        assert!(reels.reels().is_empty());
        assert!(reels.visible().is_none());
    }
}
