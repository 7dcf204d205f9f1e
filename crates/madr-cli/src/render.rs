//! Plain-text rendering of lists, records and the donation chart.

use madr_core::list::ListController;
use madr_core::models::{
    AboutContent, Banner, CategoryTotal, DashboardStats, Donation, DonationCategory,
    DonationSummary, Event, GalleryItem, Kajian, YoutubeVideo,
};
use madr_core::utils::{format_date, format_rupiah, resolve_media_url, truncate};

/// Width of the longest bar in the donation chart.
const CHART_WIDTH: usize = 40;

/// Print the rows of a list view, or its empty or error state, followed
/// by the pagination line when there is more than one page.
pub fn list<T>(list: &ListController<T>, empty_text: &str, header: &str, row: impl Fn(&T) -> String)
where
    T: Send + Sync + 'static,
{
    if let Some(message) = list.error() {
        eprintln!("Error: {}", message);
        return;
    }
    for line in list_lines(list, empty_text, header, row) {
        println!("{}", line);
    }
}

fn list_lines<T>(
    list: &ListController<T>,
    empty_text: &str,
    header: &str,
    row: impl Fn(&T) -> String,
) -> Vec<String>
where
    T: Send + Sync + 'static,
{
    let Some(page) = list.current() else {
        return Vec::new();
    };
    if page.is_empty() {
        let line = if page.total > 0 {
            format!(
                "Page {} is beyond the last page ({})",
                page.current_page(),
                page.total_pages
            )
        } else {
            empty_text.to_string()
        };
        return vec![line];
    }

    let mut lines = vec![header.to_string(), "-".repeat(header.chars().count())];
    lines.extend(list.rows().iter().map(row));
    if let Some(label) = list.page_label() {
        lines.push(String::new());
        lines.push(format!("{} ({} total)", label, page.total));
    }
    lines
}

pub const EVENT_HEADER: &str = "   ID  Date               Title                          Location";

pub fn event_row(event: &Event) -> String {
    format!(
        "{:>5}  {:<17}  {:<30} {}",
        event.id,
        format_date(&event.date),
        truncate(&event.title, 30),
        truncate(&event.location, 30)
    )
}

pub fn event_detail(event: &Event) {
    println!("{} (#{})", event.title, event.id);
    println!("Date:     {}", format_date(&event.date));
    println!("Location: {}", event.location);
    if !event.description.trim().is_empty() {
        println!("\n{}", event.description);
    }
}

pub const BANNER_HEADER: &str = "   ID  Type   Title                          Media";

pub fn banner_row(api_base: &str, banner: &Banner) -> String {
    format!(
        "{:>5}  {:<5}  {:<30} {}",
        banner.id,
        banner.kind.as_str(),
        truncate(&banner.title, 30),
        resolve_media_url(api_base, &banner.media_url).unwrap_or_default()
    )
}

pub const GALLERY_HEADER: &str = "   ID  Title                          Image";

pub fn gallery_row(api_base: &str, item: &GalleryItem) -> String {
    format!(
        "{:>5}  {:<30} {}",
        item.id,
        truncate(&item.title, 30),
        resolve_media_url(api_base, &item.image_url).unwrap_or_default()
    )
}

pub const DONATION_HEADER: &str =
    "   ID  Donor                 Category         Amount           Status   Date";

pub fn donation_row(donation: &Donation) -> String {
    format!(
        "{:>5}  {:<20}  {:<15}  {:>15}  {:<7}  {}",
        donation.id,
        truncate(donation.donor_display(), 20),
        truncate(donation.category_name(), 15),
        format_rupiah(donation.amount),
        donation.payment_status.as_str(),
        donation
            .created_at
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default()
    )
}

pub const KAJIAN_HEADER: &str = "   ID  Published    Title";

pub fn kajian_row(kajian: &Kajian) -> String {
    format!(
        "{:>5}  {}   {}",
        kajian.id,
        kajian.published_at.format("%d/%m/%Y"),
        truncate(&kajian.title, 60)
    )
}

pub fn categories(categories: &[DonationCategory]) {
    if categories.is_empty() {
        println!("No donation categories");
        return;
    }
    for category in categories {
        if category.description.trim().is_empty() {
            println!("{:>5}  {}", category.id, category.name);
        } else {
            println!("{:>5}  {}: {}", category.id, category.name, category.description);
        }
    }
}

/// Horizontal bar chart of donation totals, scaled to the largest total.
pub fn donation_chart(totals: &[CategoryTotal]) {
    if totals.is_empty() {
        println!("No donation data available");
        return;
    }
    let label_width = totals.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);
    let widths = bar_widths(totals);
    for (total, width) in totals.iter().zip(widths) {
        println!(
            "{:<label_width$}  {:<chart$}  {}",
            total.name,
            "█".repeat(width),
            format_rupiah(total.amount),
            label_width = label_width,
            chart = CHART_WIDTH,
        );
    }
}

/// Bar length per total. All bars are empty when nothing is positive.
fn bar_widths(totals: &[CategoryTotal]) -> Vec<usize> {
    let max = totals.iter().map(|t| t.amount).fold(0.0_f64, f64::max);
    totals
        .iter()
        .map(|total| {
            if max > 0.0 && total.amount > 0.0 {
                ((total.amount / max) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            }
        })
        .collect()
}

pub fn donation_summary(summary: &DonationSummary) {
    println!("Total donations: {}", format_rupiah(summary.total_amount));
    println!("Transactions:    {}", summary.total_transactions);
    println!();
    donation_chart(&summary.totals());
}

pub fn recent_videos(videos: &[YoutubeVideo]) {
    if videos.is_empty() {
        println!("No videos in the last 30 days");
        return;
    }
    for video in videos {
        println!(
            "{}   {}",
            video.published_at.format("%d/%m/%Y"),
            truncate(&video.title, 60)
        );
        println!("             {}", video.watch_url());
    }
}

pub fn stats(stats: &DashboardStats, age: Option<&str>) {
    println!("Events:    {}", stats.total_events);
    println!("Banners:   {}", stats.total_banners);
    println!("Gallery:   {}", stats.total_gallery);
    println!("Donations: {}", stats.total_donations);
    if let Some(age) = age {
        println!("\nUpdated {}", age);
    }
}

pub fn about(api_base: &str, about: &AboutContent) {
    println!("{}", about.title);
    if let Some(ref subtitle) = about.subtitle {
        println!("{}", subtitle);
    }
    for text in [&about.description, &about.additional_description].into_iter().flatten() {
        println!("\n{}", text);
    }
    if let Some(years) = about.years_active {
        println!("\nYears active:   {}", years);
    }
    if let Some(members) = about.active_members {
        println!("Active members: {}", members);
    }
    let images = about.images();
    if !images.is_empty() {
        println!("\nImages:");
        for image in images {
            println!("  {}", resolve_media_url(api_base, &image).unwrap_or(image));
        }
    }
}
