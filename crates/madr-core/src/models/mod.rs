//! Data models for the madr content API.
//!
//! - `Event`, `Banner`, `GalleryItem`, `Kajian`: public content
//! - `Donation`, `DonationCategory`, `DonationSummary`: donation records, the public
//!   counter and the chart aggregation
//! - `AboutContent`: the single "about" record and its image list encoding
//! - `ContactForm`, `UploadFile`, `MediaSource`: outgoing payloads
//! - `User`, `LoginRequest`, `LoginResponse`: authentication

pub mod about;
pub mod banner;
pub mod contact;
pub mod donation;
pub mod event;
pub mod gallery;
pub mod kajian;
pub mod media;
pub mod stats;
pub mod user;

pub use about::{parse_image_list, AboutContent, UpdateAboutRequest, MAX_ABOUT_IMAGES};
pub use banner::{Banner, BannerType, CreateBannerRequest, UpdateBannerRequest};
pub use contact::ContactForm;
pub use donation::{
    totals_by_category, CategorySummary, CategoryTotal, CreateDonationRequest, Donation,
    DonationCategory, DonationCategoryInfo, DonationSummary, PaymentStatus, UpdateDonationRequest,
};
pub use event::{CreateEventRequest, Event, UpdateEventRequest};
pub use gallery::{CreateGalleryRequest, GalleryItem};
pub use kajian::{Kajian, RecentVideos, SyncResponse, YoutubeVideo};
pub use media::{MediaSource, UploadFile, UploadResponse};
pub use stats::DashboardStats;
pub use user::{LoginRequest, LoginResponse, User};
