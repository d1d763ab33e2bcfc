//! Static demo data.
//!
//! Everything a user can browse without the remote planner comes from here:
//! feed posts and stories, inbox conversations, canned booking results and
//! the profile's histories.

use crate::itinerary::BookingType;

// ─────────────────────────────────────────────────────────────────────────────
// Demo user
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoUser {
    pub name: &'static str,
    pub email: &'static str,
    pub country: &'static str,
    pub wallet_balance: &'static str,
}

pub const DEMO_USER: DemoUser = DemoUser {
    name: "Alex Doe",
    email: "alex.doe@example.com",
    country: "Sierra Leone",
    wallet_balance: "$100.00",
};

/// Handle the demo user posts and comments as.
pub const FEED_HANDLE: &str = "alex_doe";
pub const FEED_AVATAR: &str = "https://picsum.photos/seed/user3/200";

// ─────────────────────────────────────────────────────────────────────────────
// Social feed
// ─────────────────────────────────────────────────────────────────────────────

/// A music track that can be attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
}

/// Tracks offered by the composer's music picker.
pub const TRACKS: [Track; 4] = [
    Track {
        title: "Freetown Breeze",
        artist: "Salone Beats",
    },
    Track {
        title: "Highlife Fusion",
        artist: "Krio Jazz Collective",
    },
    Track {
        title: "Palm Wine Grooves",
        artist: "Acoustic Africa",
    },
    Track {
        title: "Sunset Riddim",
        artist: "Beachside Reggae",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

/// A feed comment. Replies nest arbitrarily deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub likes: u32,
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub author: Author,
    pub timestamp: String,
    pub location: Option<String>,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub music: Option<Track>,
}

impl Post {
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.video_url.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Story {
    pub id: u32,
    pub name: &'static str,
    pub avatar: &'static str,
    pub content_url: &'static str,
}

pub static STORIES: [Story; 6] = [
    Story {
        id: 1,
        name: "Your Story",
        avatar: "https://picsum.photos/seed/my_story/200",
        content_url: "https://picsum.photos/seed/story_content1/400/800",
    },
    Story {
        id: 2,
        name: "JaneDoe",
        avatar: "https://picsum.photos/seed/4/200",
        content_url: "https://picsum.photos/seed/story_content2/400/800",
    },
    Story {
        id: 3,
        name: "AfricanFoodie",
        avatar: "https://picsum.photos/seed/user2/200",
        content_url: "https://picsum.photos/seed/story_content3/400/800",
    },
    Story {
        id: 4,
        name: "SLTrips",
        avatar: "https://picsum.photos/seed/user1/200",
        content_url: "https://picsum.photos/seed/story_content4/400/800",
    },
    Story {
        id: 5,
        name: "TravelPro",
        avatar: "https://picsum.photos/seed/user5/200",
        content_url: "https://picsum.photos/seed/story_content5/400/800",
    },
    Story {
        id: 6,
        name: "LocalGuide",
        avatar: "https://picsum.photos/seed/user6/200",
        content_url: "https://picsum.photos/seed/story_content6/400/800",
    },
];

fn author(name: &str, avatar: &str) -> Author {
    Author {
        name: name.to_string(),
        avatar: avatar.to_string(),
    }
}

fn comment(id: &str, user: &str, text: &str, likes: u32, replies: Vec<Comment>) -> Comment {
    Comment {
        id: id.to_string(),
        user: user.to_string(),
        text: text.to_string(),
        likes,
        replies,
    }
}

/// Seed posts: three videos for the reels view, then the photo/text feed.
#[must_use]
pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: 101,
            author: author("VayamaAdventures", "https://picsum.photos/seed/user101/200"),
            timestamp: "30m ago".to_string(),
            location: Some("Tokeh Beach".to_string()),
            text: Some(
                "Waves crashing, sun setting. This is the life! \u{1f30a}\u{2600}\u{fe0f} #SierraLeone #BeachVibes"
                    .to_string(),
            ),
            image_url: None,
            video_url: Some(
                "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4".to_string(),
            ),
            likes: 352,
            comments: vec![comment("vc1-1", "JaneDoe", "Looks amazing!", 2, vec![])],
            music: Some(Track {
                title: "Ocean Drive",
                artist: "Lighthouse",
            }),
        },
        Post {
            id: 102,
            author: author("AfricanFoodie", "https://picsum.photos/seed/user2/200"),
            timestamp: "1h ago".to_string(),
            location: Some("Freetown Market".to_string()),
            text: Some(
                "The hustle and bustle of a Freetown market is something else! So many colors and sounds."
                    .to_string(),
            ),
            image_url: None,
            video_url: Some(
                "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerMeltdowns.mp4"
                    .to_string(),
            ),
            likes: 210,
            comments: vec![comment(
                "vc2-1",
                "TravelPro",
                "I can almost smell the spices!",
                4,
                vec![],
            )],
            music: Some(Track {
                title: "Market Day",
                artist: "Krio Jazz Collective",
            }),
        },
        Post {
            id: 103,
            author: author("SierraLeoneTrips", "https://picsum.photos/seed/user1/200"),
            timestamp: "4h ago".to_string(),
            location: Some("Outamba-Kilimi National Park".to_string()),
            text: Some("Exploring the incredible nature of Sierra Leone.".to_string()),
            image_url: None,
            video_url: Some(
                "https://storage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4".to_string(),
            ),
            likes: 541,
            comments: vec![],
            music: Some(Track {
                title: "Jungle Beat",
                artist: "Salone Beats",
            }),
        },
        Post {
            id: 1,
            author: author("SierraLeoneTrips", "https://picsum.photos/seed/user1/200"),
            timestamp: "2h ago".to_string(),
            location: Some("Lumley Beach, Freetown".to_string()),
            text: Some(
                "Just captured this incredible sunset at Lumley Beach! Freetown never disappoints. #SaloneTravel #Vayama"
                    .to_string(),
            ),
            image_url: Some("https://picsum.photos/seed/post1/600/400".to_string()),
            video_url: None,
            likes: 124,
            comments: vec![
                comment(
                    "c1-1",
                    "JaneDoe",
                    "Stunning shot! \u{1f60d}",
                    5,
                    vec![comment("c1-1-1", "SierraLeoneTrips", "Thank you!", 2, vec![])],
                ),
                comment("c1-2", "TravelPro", "I need to visit next year.", 3, vec![]),
            ],
            music: Some(TRACKS[0]),
        },
        Post {
            id: 2,
            author: author("AfricanFoodie", "https://picsum.photos/seed/user2/200"),
            timestamp: "5h ago".to_string(),
            location: Some("Freetown, Sierra Leone".to_string()),
            text: Some(
                "Trying out the famous Jollof Rice here in Freetown. The spice is perfect! Highly recommend this spot."
                    .to_string(),
            ),
            image_url: Some("https://picsum.photos/seed/post2/600/400".to_string()),
            video_url: None,
            likes: 88,
            comments: vec![comment("c2-1", FEED_HANDLE, "That looks delicious!", 1, vec![])],
            music: None,
        },
        Post {
            id: 3,
            author: author(FEED_HANDLE, FEED_AVATAR),
            timestamp: "1d ago".to_string(),
            location: None,
            text: Some(
                "My trip to Bo was amazing! The AI planner on Vayama made it so easy to organize everything. So impressed!"
                    .to_string(),
            ),
            image_url: None,
            video_url: None,
            likes: 45,
            comments: vec![],
            music: None,
        },
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Inbox
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversation {
    pub id: u32,
    pub name: &'static str,
    pub last_message: &'static str,
    pub time: &'static str,
    pub unread: u32,
    pub online: bool,
    pub avatar: &'static str,
}

pub static CONVERSATIONS: [Conversation; 4] = [
    Conversation {
        id: 1,
        name: "Trip to Bo",
        last_message: "See you there!",
        time: "10:42 AM",
        unread: 2,
        online: true,
        avatar: "https://picsum.photos/seed/1/200",
    },
    Conversation {
        id: 2,
        name: "Family Group",
        last_message: "Alex: Are we meeting for dinner?",
        time: "Yesterday",
        unread: 0,
        online: false,
        avatar: "https://picsum.photos/seed/2/200",
    },
    Conversation {
        id: 3,
        name: "Hotel Concierge",
        last_message: "Your booking is confirmed.",
        time: "Mar 15",
        unread: 0,
        online: true,
        avatar: "https://picsum.photos/seed/3/200",
    },
    Conversation {
        id: 4,
        name: "Jane Doe",
        last_message: "Great, thanks!",
        time: "Mar 14",
        unread: 0,
        online: false,
        avatar: "https://picsum.photos/seed/4/200",
    },
];

#[must_use]
pub fn conversation(id: u32) -> Option<&'static Conversation> {
    CONVERSATIONS.iter().find(|c| c.id == id)
}

/// Which side of a thread wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Me,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxMessage {
    pub side: Side,
    pub text: String,
    pub time: String,
    pub read: bool,
}

/// Thread every conversation opens with.
#[must_use]
pub fn seed_thread() -> Vec<InboxMessage> {
    [
        (Side::Other, "Hey, are you ready for the trip tomorrow?", "10:40 AM"),
        (Side::Me, "Almost! Just packing my last few things. So excited!", "10:41 AM"),
        (Side::Other, "Awesome! I have the tickets. I'll pick you up at 8 AM.", "10:41 AM"),
        (Side::Me, "Perfect. See you there!", "10:42 AM"),
    ]
    .into_iter()
    .map(|(side, text, time)| InboxMessage {
        side,
        text: text.to_string(),
        time: time.to_string(),
        read: true,
    })
    .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking
// ─────────────────────────────────────────────────────────────────────────────

/// One canned search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingOption {
    pub id: u32,
    pub name: &'static str,
    pub price: &'static str,
    /// Rating, ETA, cuisine or duration, depending on the category.
    pub detail: &'static str,
}

static RIDE_RESULTS: [BookingOption; 1] = [BookingOption {
    id: 1,
    name: "Standard Ride",
    price: "Le 50,000",
    detail: "5 mins away",
}];

static HOTEL_RESULTS: [BookingOption; 2] = [
    BookingOption {
        id: 1,
        name: "Radisson Blu",
        price: "$150/night",
        detail: "\u{2605}\u{2605}\u{2605}\u{2605}\u{2605}",
    },
    BookingOption {
        id: 2,
        name: "The Country Lodge",
        price: "$120/night",
        detail: "\u{2605}\u{2605}\u{2605}\u{2605}\u{2606}",
    },
];

static FOOD_RESULTS: [BookingOption; 1] = [BookingOption {
    id: 1,
    name: "Tess restaurant",
    price: "Avg. Le 150,000",
    detail: "Local",
}];

static FLIGHT_RESULTS: [BookingOption; 2] = [
    BookingOption {
        id: 1,
        name: "SL Airways F501",
        price: "$250",
        detail: "1h 30m",
    },
    BookingOption {
        id: 2,
        name: "Afri-Jet A102",
        price: "$220",
        detail: "1h 45m",
    },
];

static ACTIVITY_RESULTS: [BookingOption; 1] = [BookingOption {
    id: 1,
    name: "Beach Tour",
    price: "$25",
    detail: "3 hours",
}];

/// Canned results for a category search.
#[must_use]
pub fn booking_results(category: BookingType) -> &'static [BookingOption] {
    match category {
        BookingType::Ride => &RIDE_RESULTS,
        BookingType::Hotel => &HOTEL_RESULTS,
        BookingType::Food => &FOOD_RESULTS,
        BookingType::Flight => &FLIGHT_RESULTS,
        BookingType::Activity => &ACTIVITY_RESULTS,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

pub const TOP_UP_METHODS: [&str; 3] = ["Bank/Debit Card", "Bitcoin", "Ethereum"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingHistoryItem {
    pub id: u32,
    pub booking_type: BookingType,
    pub details: &'static str,
    pub date: &'static str,
    pub status: BookingStatus,
}

pub static BOOKING_HISTORY: [BookingHistoryItem; 4] = [
    BookingHistoryItem {
        id: 1,
        booking_type: BookingType::Flight,
        details: "Freetown to Bo",
        date: "2024-07-20",
        status: BookingStatus::Completed,
    },
    BookingHistoryItem {
        id: 2,
        booking_type: BookingType::Hotel,
        details: "Radisson Blu, 1 night",
        date: "2024-07-20",
        status: BookingStatus::Completed,
    },
    BookingHistoryItem {
        id: 3,
        booking_type: BookingType::Activity,
        details: "Beach Tour",
        date: "2024-07-21",
        status: BookingStatus::Confirmed,
    },
    BookingHistoryItem {
        id: 4,
        booking_type: BookingType::Ride,
        details: "Airport Transfer",
        date: "2024-07-19",
        status: BookingStatus::Cancelled,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: u32,
    pub item: &'static str,
    pub amount: &'static str,
    pub date: &'static str,
}

impl PaymentRecord {
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.amount.starts_with('+')
    }
}

pub static PAYMENT_HISTORY: [PaymentRecord; 3] = [
    PaymentRecord {
        id: 1,
        item: "Flight to Bo",
        amount: "-$250.00",
        date: "2024-07-20",
    },
    PaymentRecord {
        id: 2,
        item: "Radisson Blu Hotel",
        amount: "-$150.00",
        date: "2024-07-20",
    },
    PaymentRecord {
        id: 3,
        item: "Wallet Top-up",
        amount: "+$500.00",
        date: "2024-07-19",
    },
];
