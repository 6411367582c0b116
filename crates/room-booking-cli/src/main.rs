//! `roombook` CLI — browse rooms, check availability and book from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Rooms suited to a party of 6 that have a whiteboard
//! roombook rooms --people 6 --tag whiteboard
//!
//! # Half-hour grid and free ranges for one room-day
//! roombook slots --room room-3 --date 2024-01-01
//!
//! # Is 10:00-11:00 free?
//! roombook check --room room-3 --date 2024-01-01 --start 10:00 --end 11:00
//!
//! # Book it
//! roombook book --room room-3 --date 2024-01-01 --start 10:00 --end 11:00 \
//!     --name "Jane Doe" --email jane@company.com --people 4
//!
//! # Every Monday and Wednesday for 4 weeks
//! roombook recur --room room-3 --date 2024-01-01 --start 10:00 --end 11:00 \
//!     --name "Jane Doe" --email jane@company.com --people 4 --type custom --weeks 4 --days 1,3
//!
//! # Load a state file and list its bookings
//! roombook --seed state.json bookings
//!
//! # Chat with the assistant
//! echo "I need a room for 6 people today from 3-4pm" | roombook chat
//! ```
//!
//! Without `--seed` the store starts with the demo bookings on `--today`
//! (default: the local date). Each invocation works on its own in-memory store.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use room_booking::freebusy::{FreeRange, SlotStatus};
use room_booking::intake::GREETING;
use room_booking::slots::parse_date;
use room_booking::weekday::weekday_from_index;
use room_booking::{
    find_conflicts, generate_recurring_dates, parse_intent, submit, BookingDetails,
    BookingRequest, BookingStore, ClockTime, Conversation, FlowState, PeopleFilter,
    RecurrenceConfig, Room, StoreSeed, TimeRange,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roombook", version, about = "Meeting-room availability and booking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON state file: `{ "rooms": [...], "bookings": [...] }` (rooms optional)
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD) for the demo data and "today"/"tomorrow"
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List rooms, optionally only those suited to a party size
    Rooms {
        #[arg(long)]
        people: Option<u32>,
        /// Keep only rooms carrying this tag (case-insensitive)
        #[arg(long)]
        tag: Option<String>,
    },
    /// List every booking in the store
    Bookings,
    /// Show the half-hour grid and free ranges for one room-day
    Slots {
        #[arg(long)]
        room: String,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Check whether a time range is free
    Check {
        #[command(flatten)]
        slot: SlotArgs,
    },
    /// Book a single time range
    Book {
        #[command(flatten)]
        slot: SlotArgs,
        #[command(flatten)]
        who: WhoArgs,
    },
    /// Book a time range on every date of a recurrence pattern
    Recur {
        #[command(flatten)]
        slot: SlotArgs,
        #[command(flatten)]
        who: WhoArgs,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Print the dates a recurrence pattern expands to
    Dates {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Extract booking fields from free text
    Parse {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Chat with the booking assistant, one message per stdin line
    ///
    /// While rooms are on offer, `book <room-id>` picks one.
    Chat,
}

#[derive(Args)]
struct SlotArgs {
    #[arg(long)]
    room: String,
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// Start time, HH:MM
    #[arg(long)]
    start: ClockTime,
    /// End time, HH:MM (exclusive)
    #[arg(long)]
    end: ClockTime,
}

#[derive(Args)]
struct WhoArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    people: u32,
}

#[derive(Args)]
struct PatternArgs {
    #[arg(long = "type", value_enum)]
    kind: Repeat,
    #[arg(long)]
    weeks: u32,
    /// Weekday numbers for `custom`, 0 = Sunday, comma-separated
    #[arg(long, value_delimiter = ',')]
    days: Vec<u8>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Repeat {
    Daily,
    Weekly,
    Custom,
}

impl PatternArgs {
    fn config(&self) -> Result<RecurrenceConfig> {
        if !matches!(self.kind, Repeat::Custom) && !self.days.is_empty() {
            bail!("--days only applies to --type custom");
        }
        let config = match self.kind {
            Repeat::Daily => RecurrenceConfig::daily(self.weeks),
            Repeat::Weekly => RecurrenceConfig::weekly(self.weeks),
            Repeat::Custom => {
                let days = self
                    .days
                    .iter()
                    .map(|&i| {
                        weekday_from_index(i)
                            .with_context(|| format!("Weekday must be 0-6, got {}", i))
                    })
                    .collect::<Result<Vec<_>>>()?;
                RecurrenceConfig::custom(&days, self.weeks)
            }
        };
        config.validate()?;
        Ok(config)
    }
}

impl SlotArgs {
    fn range(&self) -> Result<TimeRange> {
        Ok(TimeRange::new(self.start, self.end)?)
    }

    fn request(
        &self,
        who: WhoArgs,
        recurrence: Option<RecurrenceConfig>,
    ) -> Result<BookingRequest> {
        Ok(BookingRequest {
            room_id: self.room.clone(),
            date: self.date,
            range: self.range()?,
            details: BookingDetails {
                full_name: who.name,
                email: who.email,
                people_count: who.people,
            },
            recurrence,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    room_id: &'a str,
    date: NaiveDate,
    start_time: ClockTime,
    end_time: ClockTime,
    available: bool,
    conflicts: Vec<ConflictEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictEntry {
    booking_id: String,
    start_time: ClockTime,
    end_time: ClockTime,
    overlap_minutes: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayReport<'a> {
    room_id: &'a str,
    date: NaiveDate,
    slots: Vec<SlotStatus>,
    free: Vec<FreeRange>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let store = load_store(cli.seed.as_deref(), today)?;
    debug!(rooms = store.list_rooms().len(), bookings = store.len(), %today, "store ready");

    match cli.command {
        Commands::Rooms { people, tag } => {
            let rooms: Vec<&Room> = match people {
                Some(n) => store
                    .rooms()
                    .filter_by_people(PeopleFilter::for_people(n))
                    .into_iter()
                    .filter(|room| room.fits(n))
                    .collect(),
                None => store.list_rooms().iter().collect(),
            };
            let rooms: Vec<&Room> = match tag.as_deref() {
                Some(tag) => rooms.into_iter().filter(|room| room.has_tag(tag)).collect(),
                None => rooms,
            };
            print_json(&rooms)?;
        }
        Commands::Bookings => print_json(&store.get_bookings())?,
        Commands::Slots { room, date } => {
            require_room(&store, &room)?;
            // Blocks that already started are only greyed out when looking at the real today.
            let now = cli.today.is_none().then(|| Local::now().naive_local());
            print_json(&DayReport {
                room_id: &room,
                date,
                slots: store.slot_statuses(&room, date, now),
                free: store.free_ranges(&room, date),
            })?;
        }
        Commands::Check { slot } => {
            require_room(&store, &slot.room)?;
            let range = slot.range()?;
            let day = store.get_bookings_for_room(&slot.room, slot.date);
            let conflicts: Vec<ConflictEntry> = find_conflicts(&day, &slot.room, slot.date, range)
                .into_iter()
                .map(|c| ConflictEntry {
                    booking_id: c.booking.id.clone(),
                    start_time: c.booking.start_time,
                    end_time: c.booking.end_time,
                    overlap_minutes: c.overlap_minutes,
                })
                .collect();
            print_json(&CheckReport {
                room_id: &slot.room,
                date: slot.date,
                start_time: range.start,
                end_time: range.end,
                available: conflicts.is_empty(),
                conflicts,
            })?;
        }
        Commands::Book { slot, who } => {
            let request = slot.request(who, None)?;
            let submission = submit(&store, &request).context("Booking failed")?;
            print_json(&submission)?;
        }
        Commands::Recur { slot, who, pattern } => {
            let request = slot.request(who, Some(pattern.config()?))?;
            let submission = submit(&store, &request).context("Recurring booking failed")?;
            print_json(&submission)?;
        }
        Commands::Dates { date, pattern } => {
            print_json(&generate_recurring_dates(date, &pattern.config()?))?;
        }
        Commands::Parse { text } => {
            print_json(&parse_intent(&text.join(" "), today))?;
        }
        Commands::Chat => run_chat(&store, today)?,
    }

    Ok(())
}

fn run_chat(store: &BookingStore, today: NaiveDate) -> Result<()> {
    let mut chat = Conversation::new(today);
    println!("{}", GREETING);

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let pick = text
            .strip_prefix("book ")
            .filter(|_| chat.state() == FlowState::ShowingOptions);
        let reply = match pick {
            Some(room_id) => match chat.choose_room(room_id.trim()) {
                Ok(reply) => reply.to_string(),
                Err(err) => err.to_string(),
            },
            None => chat.handle_message(store, text).to_string(),
        };
        println!("\n{}", reply);
    }

    Ok(())
}

fn load_store(seed: Option<&Path>, today: NaiveDate) -> Result<BookingStore> {
    match seed {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
            let seed = StoreSeed::from_json(&raw)
                .with_context(|| format!("Invalid seed file: {}", path.display()))?;
            BookingStore::from_seed(seed)
                .with_context(|| format!("Rejected seed file: {}", path.display()))
        }
        None => Ok(BookingStore::with_demo_data(today)),
    }
}

fn require_room(store: &BookingStore, room_id: &str) -> Result<()> {
    store
        .get_room_by_id(room_id)
        .map(|_| ())
        .with_context(|| format!("Unknown room: {}", room_id))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{}", json);
    Ok(())
}

/// Install a compact stderr subscriber. `RUST_LOG` overrides the default filter.
fn init_logger(verbose: bool) {
    let default = if verbose {
        "room_booking=debug,roombook=debug,warn"
    } else {
        "room_booking=info,roombook=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
