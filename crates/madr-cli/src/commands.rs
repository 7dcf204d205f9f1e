//! One function per CLI command.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use madr_core::api::{ApiError, Page, PageQuery};
use madr_core::list::ListController;
use madr_core::models::{
    totals_by_category, BannerType, ContactForm, CreateBannerRequest, CreateEventRequest,
    CreateGalleryRequest, DashboardStats, MediaSource, PaymentStatus, UpdateAboutRequest,
    UpdateEventRequest, UploadFile,
};
use madr_core::{Mutation, QueryKey, QueryOptions};

use crate::app::App;
use crate::render;

/// Dashboard counts stay fresh this long.
const STATS_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Rows fetched for the donation chart.
const CHART_SAMPLE_SIZE: u32 = 100;

/// Error for display: the user-facing text, not the debug chain.
fn user_error(e: &ApiError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

/// Load one page of `resource` through the query cache into a list view.
async fn load_page<T, F, Fut>(
    app: &App,
    resource: &'static str,
    page: u32,
    filter: Option<String>,
    fetch: F,
) -> ListController<T>
where
    T: Send + Sync + 'static,
    F: FnOnce(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'static,
{
    let mut list = ListController::new(resource, app.config.page_size());
    if filter.is_some() {
        list.set_filter(filter);
    }
    let ticket = list.set_page(page);
    let result = ListController::fetch(&app.cache, &ticket, fetch).await;
    list.complete(&ticket, result);
    list
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let date = DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("Invalid date '{}', expected RFC 3339", raw))?;
    Ok(date.with_timezone(&Utc))
}

fn media_source(file: Option<std::path::PathBuf>, url: Option<String>) -> Result<MediaSource> {
    match (file, url) {
        (Some(path), _) => {
            let file = UploadFile::from_path(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(MediaSource::File(file))
        }
        (None, Some(url)) => Ok(MediaSource::Url(url)),
        (None, None) => anyhow::bail!("Pass either --file or --url"),
    }
}

fn parse_status(status: Option<String>) -> Result<Option<PaymentStatus>> {
    status
        .map(|s| s.parse::<PaymentStatus>().map_err(anyhow::Error::msg))
        .transpose()
}

pub async fn login(app: &mut App, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| app.config.last_username.clone()) {
        Some(name) => name,
        None => {
            eprint!("Username: ");
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim().to_string()
        }
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", username))?;
    app.login(&username, password).await
}

pub fn whoami(app: &App) -> Result<()> {
    match app.client().session().filter(|s| s.is_valid()) {
        Some(session) => {
            let user = session.user();
            println!("{} <{}> ({})", user.display_name(), user.email, user.role);
            if let Some(minutes) = session.data().minutes_until_expiry() {
                println!("Session expires in {} minutes", minutes);
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

pub async fn stats(app: &App) -> Result<()> {
    app.require_login()?;
    let key = QueryKey::new("stats");
    let api = app.client().clone();
    let stats = app
        .cache
        .get(&key, QueryOptions::stale_after(STATS_STALE_TIME), move || async move {
            api.stats().dashboard().await
        })
        .await
        .map_err(|e| user_error(&e))?;
    let age = app
        .cache
        .peek::<DashboardStats>(&key)
        .and_then(|s| s.age_display());
    render::stats(&stats, age.as_deref());
    Ok(())
}

pub async fn list_events(app: &App, page: u32) -> Result<()> {
    let api = app.client().clone();
    let list = load_page(app, "events", page, None, move |q| async move {
        api.events().list(&q).await
    })
    .await;
    render::list(&list, "No events yet", render::EVENT_HEADER, render::event_row);
    Ok(())
}

pub async fn show_event(app: &App, id: i64) -> Result<()> {
    let api = app.client().clone();
    let event = app
        .cache
        .get(&QueryKey::new("event").push(id), QueryOptions::default(), move || async move {
            api.events().get(id).await
        })
        .await
        .map_err(|e| user_error(&e))?;
    render::event_detail(&event);
    Ok(())
}

pub async fn create_event(
    app: &App,
    title: String,
    date: &str,
    location: String,
    description: String,
) -> Result<()> {
    app.require_login()?;
    let request = CreateEventRequest {
        title,
        description,
        date: parse_date(date)?,
        location,
    };
    let api = app.client();
    let event = app
        .mutations
        .execute(&Mutation::create_event(), api.events().create(&request))
        .await
        .map_err(|e| user_error(&e))?;
    println!("Created event #{}", event.id);
    Ok(())
}

pub async fn update_event(
    app: &App,
    id: i64,
    title: Option<String>,
    date: Option<&str>,
    location: Option<String>,
    description: Option<String>,
) -> Result<()> {
    app.require_login()?;
    let request = UpdateEventRequest {
        title,
        description,
        date: date.map(parse_date).transpose()?,
        location,
    };
    let api = app.client();
    app.mutations
        .execute(&Mutation::update_event(id), api.events().update(id, &request))
        .await
        .map_err(|e| user_error(&e))?;
    Ok(())
}

pub async fn delete_event(app: &App, id: i64) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::delete_event(), api.events().delete(id))
        .await
        .map_err(|e| user_error(&e))
}

pub async fn list_banners(app: &App, page: u32) -> Result<()> {
    let api = app.client().clone();
    let list = load_page(app, "banners", page, None, move |q| async move {
        api.banners().list(&q).await
    })
    .await;
    let base = app.client().base_url();
    render::list(&list, "No banners yet", render::BANNER_HEADER, |b| {
        render::banner_row(base, b)
    });
    Ok(())
}

pub async fn create_banner(
    app: &App,
    title: String,
    kind: &str,
    file: Option<std::path::PathBuf>,
    url: Option<String>,
) -> Result<()> {
    app.require_login()?;
    let request = CreateBannerRequest {
        title,
        kind: kind.parse::<BannerType>().map_err(anyhow::Error::msg)?,
        media: media_source(file, url)?,
    };
    let api = app.client();
    let banner = app
        .mutations
        .execute(&Mutation::create_banner(), api.banners().create(&request))
        .await
        .map_err(|e| user_error(&e))?;
    println!("Created banner #{}", banner.id);
    Ok(())
}

pub async fn delete_banner(app: &App, id: i64) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::delete_banner(), api.banners().delete(id))
        .await
        .map_err(|e| user_error(&e))
}

pub async fn list_gallery(app: &App, page: u32) -> Result<()> {
    let api = app.client().clone();
    let list = load_page(app, "gallery", page, None, move |q| async move {
        api.gallery().list(&q).await
    })
    .await;
    let base = app.client().base_url();
    render::list(&list, "No gallery items yet", render::GALLERY_HEADER, |item| {
        render::gallery_row(base, item)
    });
    Ok(())
}

pub async fn add_gallery_item(
    app: &App,
    title: String,
    file: Option<std::path::PathBuf>,
    url: Option<String>,
) -> Result<()> {
    app.require_login()?;
    let request = CreateGalleryRequest {
        title,
        image: media_source(file, url)?,
    };
    let api = app.client();
    let item = app
        .mutations
        .execute(&Mutation::create_gallery_item(), api.gallery().create(&request))
        .await
        .map_err(|e| user_error(&e))?;
    println!("Added gallery item #{}", item.id);
    Ok(())
}

pub async fn delete_gallery_item(app: &App, id: i64) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::delete_gallery_item(), api.gallery().delete(id))
        .await
        .map_err(|e| user_error(&e))
}

pub async fn list_donations(app: &App, page: u32, status: Option<String>) -> Result<()> {
    app.require_login()?;
    let status = parse_status(status)?;
    let api = app.client().clone();
    let list = load_page(
        app,
        "donations",
        page,
        status.map(|s| s.to_string()),
        move |q| async move { api.donations().list(&q).await },
    )
    .await;
    render::list(&list, "No donations found", render::DONATION_HEADER, render::donation_row);
    Ok(())
}

pub async fn donation_chart(app: &App, status: Option<String>) -> Result<()> {
    app.require_login()?;
    let status = parse_status(status)?;
    let page = app
        .client()
        .donations()
        .list_by_status(CHART_SAMPLE_SIZE, 0, status)
        .await
        .map_err(|e| user_error(&e))?;
    render::donation_chart(&totals_by_category(&page.items));
    if page.total > page.items.len() as u64 {
        println!("\n(latest {} of {} donations)", page.items.len(), page.total);
    }
    Ok(())
}

/// Public totals; works without a session.
pub async fn donation_summary(app: &App) -> Result<()> {
    let summary = app
        .client()
        .donations()
        .summary()
        .await
        .map_err(|e| user_error(&e))?;
    render::donation_summary(&summary);
    Ok(())
}

pub async fn donation_categories(app: &App) -> Result<()> {
    app.require_login()?;
    let categories = app
        .client()
        .donations()
        .categories()
        .await
        .map_err(|e| user_error(&e))?;
    render::categories(&categories);
    Ok(())
}

pub async fn delete_donation(app: &App, id: i64) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::delete_donation(), api.donations().delete(id))
        .await
        .map_err(|e| user_error(&e))
}

pub async fn show_about(app: &App, public: bool) -> Result<()> {
    let about = if public {
        app.client()
            .about()
            .fetch_public()
            .await
            .map_err(|e| user_error(&e))?
    } else {
        app.require_login()?;
        Some(
            app.client()
                .about()
                .fetch()
                .await
                .map_err(|e| user_error(&e))?,
        )
    };
    match about {
        Some(about) => render::about(app.client().base_url(), &about),
        None => println!("No about content yet"),
    }
    Ok(())
}

pub async fn update_about(app: &App, request: UpdateAboutRequest) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::update_about(), api.about().update(&request))
        .await
        .map_err(|e| user_error(&e))?;
    Ok(())
}

pub async fn list_kajian(app: &App, page: u32) -> Result<()> {
    let api = app.client().clone();
    let list = load_page(app, "kajian", page, None, move |q| async move {
        api.kajian().list(&q).await
    })
    .await;
    render::list(&list, "No kajian videos yet", render::KAJIAN_HEADER, render::kajian_row);
    Ok(())
}

pub async fn recent_videos(app: &App) -> Result<()> {
    let videos = app
        .client()
        .kajian()
        .recent_videos()
        .await
        .map_err(|e| user_error(&e))?;
    render::recent_videos(&videos);
    Ok(())
}

pub async fn sync_kajian(app: &App, days: u32) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    let response = app
        .mutations
        .execute(&Mutation::sync_kajian(), api.kajian().sync(days))
        .await
        .map_err(|e| user_error(&e))?;
    println!("{} ({} videos)", response.message, response.synced);
    Ok(())
}

pub async fn delete_kajian(app: &App, id: i64) -> Result<()> {
    app.require_login()?;
    let api = app.client();
    app.mutations
        .execute(&Mutation::delete_kajian(), api.kajian().delete(id))
        .await
        .map_err(|e| user_error(&e))
}

pub async fn upload(app: &App, path: &Path) -> Result<()> {
    app.require_login()?;
    let file = UploadFile::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let url = app
        .client()
        .uploads()
        .upload(&file)
        .await
        .map_err(|e| user_error(&e))?;
    println!("{}", url);
    Ok(())
}

pub async fn contact(app: &App, form: &ContactForm) -> Result<()> {
    app.client()
        .contact()
        .submit(form)
        .await
        .map_err(|e| user_error(&e))?;
    println!("Message sent");
    Ok(())
}
