//! madr - terminal admin console for the madr content API.
//!
//! Lists, creates and deletes events, banners, gallery items, donations and
//! kajian videos, edits the "about" page and shows dashboard counts.

mod app;
mod commands;
mod render;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

#[derive(Parser)]
#[command(name = "madr", version, about = "Admin console for the madr content API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Dashboard counts
    Stats,
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(subcommand)]
    Banners(BannersCommand),
    #[command(subcommand)]
    Gallery(GalleryCommand),
    #[command(subcommand)]
    Donations(DonationsCommand),
    #[command(subcommand)]
    About(AboutCommand),
    #[command(subcommand)]
    Kajian(KajianCommand),
    /// Upload a file and print its public URL
    Upload { path: PathBuf },
    /// Send a message through the public contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

#[derive(Args)]
struct PageArgs {
    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    page: u32,
}

#[derive(Subcommand)]
enum EventsCommand {
    List(PageArgs),
    Show { id: i64 },
    Create {
        #[arg(long)]
        title: String,
        /// RFC 3339 date, e.g. 2026-04-01T19:30:00+07:00
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct MediaArgs {
    /// Local file to upload with the form
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Existing media URL
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum BannersCommand {
    List(PageArgs),
    Create {
        #[arg(long)]
        title: String,
        /// image or video
        #[arg(long = "type", default_value = "image")]
        kind: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum GalleryCommand {
    List(PageArgs),
    Add {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum DonationsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// pending, success or failed
        #[arg(long)]
        status: Option<String>,
    },
    /// Totals per category as a bar chart
    Chart {
        #[arg(long)]
        status: Option<String>,
    },
    /// Public totals of successful donations
    Summary,
    Categories,
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum AboutCommand {
    Show {
        /// Read the public page instead of the admin record
        #[arg(long)]
        public: bool,
    },
    Set {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Image URL; repeat for several
        #[arg(long = "image")]
        images: Vec<String>,
        #[arg(long)]
        years_active: Option<i64>,
        #[arg(long)]
        active_members: Option<i64>,
    },
}

#[derive(Subcommand)]
enum KajianCommand {
    List(PageArgs),
    /// Videos from the last 30 days, straight from the channel
    Recent,
    /// Pull recent videos from the YouTube channel
    Sync {
        #[arg(long, default_value_t = madr_core::api::kajian::DEFAULT_SYNC_DAYS)]
        days: u32,
    },
    Delete { id: i64 },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut app = App::new()?;
    info!(api = %app.config.api_url, "madr starting");

    let result = run(&mut app, cli.command).await;
    app.flush_notifications();
    app.sync_session()?;
    result
}

async fn run(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Login { username } => commands::login(app, username).await,
        Command::Logout => {
            app.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => commands::whoami(app),
        Command::Stats => commands::stats(app).await,
        Command::Events(cmd) => match cmd {
            EventsCommand::List(args) => commands::list_events(app, args.page).await,
            EventsCommand::Show { id } => commands::show_event(app, id).await,
            EventsCommand::Create {
                title,
                date,
                location,
                description,
            } => commands::create_event(app, title, &date, location, description).await,
            EventsCommand::Update {
                id,
                title,
                date,
                location,
                description,
            } => commands::update_event(app, id, title, date.as_deref(), location, description).await,
            EventsCommand::Delete { id } => commands::delete_event(app, id).await,
        },
        Command::Banners(cmd) => match cmd {
            BannersCommand::List(args) => commands::list_banners(app, args.page).await,
            BannersCommand::Create { title, kind, media } => {
                commands::create_banner(app, title, &kind, media.file, media.url).await
            }
            BannersCommand::Delete { id } => commands::delete_banner(app, id).await,
        },
        Command::Gallery(cmd) => match cmd {
            GalleryCommand::List(args) => commands::list_gallery(app, args.page).await,
            GalleryCommand::Add { title, media } => {
                commands::add_gallery_item(app, title, media.file, media.url).await
            }
            GalleryCommand::Delete { id } => commands::delete_gallery_item(app, id).await,
        },
        Command::Donations(cmd) => match cmd {
            DonationsCommand::List { page, status } => {
                commands::list_donations(app, page.page, status).await
            }
            DonationsCommand::Chart { status } => commands::donation_chart(app, status).await,
            DonationsCommand::Summary => commands::donation_summary(app).await,
            DonationsCommand::Categories => commands::donation_categories(app).await,
            DonationsCommand::Delete { id } => commands::delete_donation(app, id).await,
        },
        Command::About(cmd) => match cmd {
            AboutCommand::Show { public } => commands::show_about(app, public).await,
            AboutCommand::Set {
                title,
                subtitle,
                description,
                images,
                years_active,
                active_members,
            } => {
                let request = madr_core::models::UpdateAboutRequest {
                    title,
                    subtitle,
                    description,
                    years_active,
                    active_members,
                    ..Default::default()
                };
                let request = if images.is_empty() {
                    request
                } else {
                    request.with_images(&images)
                };
                commands::update_about(app, request).await
            }
        },
        Command::Kajian(cmd) => match cmd {
            KajianCommand::List(args) => commands::list_kajian(app, args.page).await,
            KajianCommand::Recent => commands::recent_videos(app).await,
            KajianCommand::Sync { days } => commands::sync_kajian(app, days).await,
            KajianCommand::Delete { id } => commands::delete_kajian(app, id).await,
        },
        Command::Upload { path } => commands::upload(app, &path).await,
        Command::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let form = madr_core::models::ContactForm {
                name,
                email,
                subject,
                message,
                honeypot: None,
            };
            commands::contact(app, &form).await
        }
    }
}
