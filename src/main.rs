//! brunch - query the bottomless brunch directory from the command line
//!
//! Loads the venue list and suburb groups, applies the requested facets and
//! sort through the same controller the TUI uses, and prints the result as
//! text or JSON.
//!
//! Module structure:
//! - `domain/` - Venues, filter state, suburb groups, store
//! - `io/` - Data loading and favourites persistence
//! - `services/` - Predicate, sort, view sync, controller
//! - `infra/` - Configuration

use anyhow::Result;
use brunch_directory::domain::{PriceBand, SortKey, Venue, Weekday};
use brunch_directory::infra::Config;
use brunch_directory::io::{FavouritesStore, Loader};
use brunch_directory::services::{Action, Controller};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Find a bottomless brunch
#[derive(Parser, Debug)]
#[command(name = "brunch", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Venue list (path or URL), overrides config
    #[arg(long)]
    venues: Option<String>,

    /// Suburb groups (path or URL), overrides config; "" disables grouping
    #[arg(long)]
    suburb_groups: Option<String>,

    /// Match venue name or suburb
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long)]
    cuisine: Vec<String>,

    /// Exact suburb name
    #[arg(long)]
    suburb: Vec<String>,

    /// Every suburb in the named group
    #[arg(long)]
    suburb_group: Vec<String>,

    /// Day the brunch runs (mon, tuesday, 3, ...)
    #[arg(short, long)]
    day: Vec<Weekday>,

    /// Price band: $, $$, $$$ or $$$$ (or 1-4)
    #[arg(short, long)]
    price: Option<PriceBand>,

    /// az, za, price-asc, price-desc or suburb
    #[arg(long)]
    sort: Option<SortKey>,

    /// Only list favourite venues
    #[arg(long)]
    favourites_only: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the suburb groups and exit
    #[arg(long)]
    list_groups: bool,
}

#[derive(Serialize)]
struct Listing<'a> {
    status: String,
    sort: &'static str,
    count: usize,
    venues: Vec<VenueSummary<'a>>,
}

#[derive(Serialize)]
struct VenueSummary<'a> {
    id: String,
    name: &'a str,
    suburb: &'a str,
    cuisine: &'a str,
    from_price: Option<f64>,
    days: String,
    rating: Option<f64>,
    favourite: bool,
    maps_url: String,
    main_image: Option<&'a str>,
    images: &'a [String],
    packages: &'a [brunch_directory::domain::Package],
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for the listing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), git = env!("GIT_HASH"), "brunch_starting");

    let mut config = Config::load(args.config.as_deref());
    if let Some(venues) = &args.venues {
        config = config.with_venues(venues.as_str());
    }
    if let Some(groups) = &args.suburb_groups {
        config = config.with_suburb_groups(groups.as_str());
    }
    info!(
        config_file = %config.config_file(),
        venues = %config.venues(),
        suburb_groups = %config.suburb_groups(),
        favourites = %config.favourites_file(),
        "config_loaded"
    );

    let loader = Loader::new(config.http_timeout())?;
    let groups_source = config.suburb_groups_source();
    let (store, _report) = loader.load_store(&config.venues_source(), groups_source.as_ref()).await?;

    if args.list_groups {
        print_groups(&store, args.json)?;
        return Ok(());
    }

    let favourites = FavouritesStore::load(config.favourites_file());
    let mut controller = Controller::new(store, favourites, args.sort.unwrap_or(config.default_sort()));
    apply_filters(&mut controller, &args);

    let venues: Vec<&Venue> = controller
        .visible()
        .filter(|v| !args.favourites_only || controller.is_favourite(v.id))
        .collect();
    let status = if args.favourites_only {
        format!("{} favourite venues shown", venues.len())
    } else {
        controller.status().to_string()
    };

    if args.json {
        let listing = Listing {
            status,
            sort: controller.sort_key().as_str(),
            count: venues.len(),
            venues: venues.iter().map(|v| summarise(v, controller.is_favourite(v.id))).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        println!("{status}");
        for venue in venues {
            println!("{}", text_line(venue, controller.is_favourite(venue.id)));
        }
    }

    Ok(())
}

fn apply_filters(controller: &mut Controller, args: &Args) {
    if let Some(search) = &args.search {
        controller.dispatch(Action::SetSearch(search.clone()));
    }
    for cuisine in &args.cuisine {
        if !controller.filter().has_cuisine(cuisine) {
            controller.dispatch(Action::ToggleCuisine(cuisine.clone()));
        }
    }
    for suburb in &args.suburb {
        if !controller.filter().has_suburb(suburb.trim()) {
            controller.dispatch(Action::ToggleSuburb(suburb.trim().to_string()));
        }
    }
    for label in &args.suburb_group {
        let Some(group) = controller.store().groups().find(label) else {
            warn!(group = %label, "suburb_group_unknown");
            continue;
        };
        let suburbs: Vec<String> = group
            .suburbs
            .iter()
            .filter(|s| !controller.filter().has_suburb(s))
            .cloned()
            .collect();
        for suburb in suburbs {
            controller.dispatch(Action::ToggleSuburb(suburb));
        }
    }
    for &day in &args.day {
        if !controller.filter().days().contains(day) {
            controller.dispatch(Action::ToggleDay(day));
        }
    }
    if let Some(band) = args.price {
        controller.dispatch(Action::TogglePrice(band));
    }
}

fn summarise(venue: &Venue, favourite: bool) -> VenueSummary<'_> {
    VenueSummary {
        id: venue.id.to_string(),
        name: &venue.name,
        suburb: &venue.suburb,
        cuisine: &venue.cuisine,
        from_price: venue.min_price(),
        days: venue.days().describe(),
        rating: venue.rating,
        favourite,
        maps_url: venue.maps_url(),
        main_image: venue.main_image(),
        images: &venue.images,
        packages: &venue.packages,
    }
}

fn text_line(venue: &Venue, favourite: bool) -> String {
    let star = if favourite { "* " } else { "" };
    let mut line = format!("{star}{} | {} | {}", venue.name, venue.suburb, venue.cuisine);
    if let Some(price) = venue.min_price() {
        line.push_str(&format!(" | from ${price:.0}"));
    }
    let days = venue.days().describe();
    if !days.is_empty() {
        line.push_str(&format!(" | {days}"));
    }
    if let Some(rating) = venue.rating {
        line.push_str(&format!(" | rated {rating:.1}"));
    }
    line
}

fn print_groups(store: &brunch_directory::domain::VenueStore, json: bool) -> Result<()> {
    if json {
        let groups: Vec<serde_json::Value> = store
            .groups()
            .iter()
            .map(|g| serde_json::json!({ "label": g.label, "suburbs": g.suburbs }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }
    for group in store.groups().iter() {
        println!("{} ({})", group.label, group.suburbs.join(", "));
    }
    Ok(())
}
