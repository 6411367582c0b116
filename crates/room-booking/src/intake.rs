//! Conversational intake: collect booking fields from chat messages until a
//! request is complete, then hand it to the store.
//!
//! Each message is run through [`parse_intent`] and merged over what was
//! already collected. The conversation asks for whatever is still missing,
//! offers rooms that are free, and only books through
//! [`BookingStore::add_booking`], so no check is ever skipped.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::booking::{Booking, NewBooking, TimeRange};
use crate::error::{BookingError, Result};
use crate::intent::{parse_intent, BookingIntent};
use crate::slots::{format_date, format_time, ClockTime};
use crate::store::{BookingStore, RoomSuggestion};

pub const GREETING: &str = "Hi! I can help you find and book a meeting room. \
Just tell me what you need, for example: \"I need a room for 6 people today from 3-4pm\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Greeting,
    NeedDetails,
    ShowingOptions,
    NeedName,
    NeedEmail,
    Confirming,
    Done,
}

/// The assistant's answer to one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    AskEverything,
    AskPeople,
    AskDate,
    AskTime,
    /// The requested range is inverted or leaves the bookable grid.
    TimeNotBookable {
        start: ClockTime,
        end: ClockTime,
    },
    NoRooms,
    Suggestions {
        people: u32,
        date: NaiveDate,
        range: TimeRange,
        rooms: Vec<RoomSuggestion>,
    },
    AskName { room_name: String },
    AskNameAgain,
    AskEmail { full_name: String },
    AskEmailAgain,
    Summary(Summary),
    Booked(Booking),
    /// The store refused the booking; carries its message.
    Declined(String),
    StartOver,
    /// The conversation already produced a booking.
    Finished,
}

/// Everything the booker is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub room_name: String,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub people: u32,
    pub full_name: String,
    pub email: String,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::AskEverything => write!(
                f,
                "I'd be happy to help! Could you tell me:\n- How many people?\n\
                 - What date? (today, tomorrow)\n- What time range?"
            ),
            Reply::AskPeople => write!(f, "How many people will be attending the meeting?"),
            Reply::AskDate => write!(
                f,
                "What date would you like? You can say \"today\" or \"tomorrow\"."
            ),
            Reply::AskTime => write!(
                f,
                "What time range works? For example, \"2-3pm\" or \"10am to 11:30am\"."
            ),
            Reply::TimeNotBookable { start, end } => write!(
                f,
                "I can't book {} to {}. Rooms are available from 8:00 AM to 6:00 PM \
                 in half-hour steps. What time range works?",
                format_time(*start),
                format_time(*end)
            ),
            Reply::NoRooms => write!(
                f,
                "I couldn't find any available rooms matching your criteria. \
                 Try a different time, date, or adjust the number of people."
            ),
            Reply::Suggestions {
                people,
                date,
                range,
                rooms,
            } => {
                write!(
                    f,
                    "I found {} room{} available for {} people on {} from {} to {}:",
                    rooms.len(),
                    if rooms.len() == 1 { "" } else { "s" },
                    people,
                    format_date(*date),
                    format_time(range.start),
                    format_time(range.end)
                )?;
                for s in rooms {
                    write!(
                        f,
                        "\n- {} ({}, {}-{} people, {})",
                        s.room.name,
                        s.room.id,
                        s.room.capacity_min,
                        s.room.capacity_max,
                        s.room.tags.join(", ")
                    )?;
                }
                Ok(())
            }
            Reply::AskName { room_name } => {
                write!(f, "Great choice! {} it is. What's your full name?", room_name)
            }
            Reply::AskNameAgain => write!(f, "Please provide your full name (first and last)."),
            Reply::AskEmail { full_name } => {
                write!(f, "Great, {}! What's your email address?", full_name)
            }
            Reply::AskEmailAgain => write!(f, "Please provide a valid email address."),
            Reply::Summary(s) => write!(
                f,
                "Here's your booking summary:\n\n- Room: {}\n- Date: {}\n- Time: {} - {}\n\
                 - People: {}\n- Name: {}\n- Email: {}\n\n\
                 Shall I confirm this reservation? (yes/no)",
                s.room_name,
                format_date(s.date),
                format_time(s.range.start),
                format_time(s.range.end),
                s.people,
                s.full_name,
                s.email
            ),
            Reply::Booked(b) => write!(
                f,
                "You're booked! {} on {} from {} to {}. Reference: {}",
                b.room_id,
                format_date(b.date),
                format_time(b.start_time),
                format_time(b.end_time),
                b.id
            ),
            Reply::Declined(message) => write!(f, "{}", message),
            Reply::StartOver => write!(
                f,
                "No problem! What would you like to change? \
                 You can start over by telling me your requirements."
            ),
            Reply::Finished => write!(
                f,
                "Your room is booked. Start a new conversation to make another booking."
            ),
        }
    }
}

/// One chat session's collected fields and position in the flow.
#[derive(Debug, Clone)]
pub struct Conversation {
    today: NaiveDate,
    state: FlowState,
    collected: BookingIntent,
    full_name: Option<String>,
    suggestions: Vec<RoomSuggestion>,
    selected: Option<RoomSuggestion>,
    booking: Option<Booking>,
}

impl Conversation {
    /// A fresh conversation; `today` anchors relative date words.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            state: FlowState::Greeting,
            collected: BookingIntent::default(),
            full_name: None,
            suggestions: Vec::new(),
            selected: None,
            booking: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn collected(&self) -> &BookingIntent {
        &self.collected
    }

    pub fn suggestions(&self) -> &[RoomSuggestion] {
        &self.suggestions
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    /// Handle one free-text message from the user.
    pub fn handle_message(&mut self, store: &BookingStore, text: &str) -> Reply {
        if self.state == FlowState::Done {
            return Reply::Finished;
        }

        let intent = parse_intent(text, self.today);
        let gave_email = intent.email.is_some();
        self.collected.merge(intent);

        let looks_like_name = text.split_whitespace().count() >= 2;
        if self.state == FlowState::NeedName && !gave_email && looks_like_name {
            self.full_name = Some(text.trim().to_string());
        }

        let reply = self.next_reply(store, text);
        debug!(state = ?self.state, "intake advanced");
        reply
    }

    /// Pick one of the rooms last offered.
    ///
    /// # Errors
    /// Returns `BookingError::UnknownRoom` if `room_id` was not among the offered rooms.
    pub fn choose_room(&mut self, room_id: &str) -> Result<Reply> {
        let choice = self
            .suggestions
            .iter()
            .find(|s| s.room.id == room_id)
            .cloned()
            .ok_or_else(|| BookingError::UnknownRoom(room_id.to_string()))?;

        self.collected.date = Some(choice.date);
        self.collected.start_time = Some(choice.start_time);
        self.collected.end_time = Some(choice.end_time);
        let room_name = choice.room.name.clone();
        self.selected = Some(choice);
        self.state = FlowState::NeedName;
        Ok(Reply::AskName { room_name })
    }

    fn next_reply(&mut self, store: &BookingStore, text: &str) -> Reply {
        let c = &self.collected;
        if c.people_count.is_none() && c.date.is_none() && c.start_time.is_none() {
            return self.ask(Reply::AskEverything);
        }
        let Some(people) = c.people_count else {
            return self.ask(Reply::AskPeople);
        };
        let Some(date) = c.date else {
            return self.ask(Reply::AskDate);
        };
        let (Some(start), Some(end)) = (c.start_time, c.end_time) else {
            return self.ask(Reply::AskTime);
        };

        match self.state {
            FlowState::NeedName => match &self.full_name {
                Some(name) => {
                    let full_name = name.clone();
                    self.state = FlowState::NeedEmail;
                    Reply::AskEmail { full_name }
                }
                None => Reply::AskNameAgain,
            },
            FlowState::NeedEmail => match self.summary() {
                Some(summary) => {
                    self.state = FlowState::Confirming;
                    Reply::Summary(summary)
                }
                None => Reply::AskEmailAgain,
            },
            FlowState::Confirming => self.confirm(store, text),
            _ => {
                let Ok(range) = TimeRange::bookable(start, end) else {
                    self.collected.start_time = None;
                    self.collected.end_time = None;
                    self.suggestions.clear();
                    return self.ask(Reply::TimeNotBookable { start, end });
                };
                let rooms = store.find_available_rooms(people, date, range);
                if rooms.is_empty() {
                    self.suggestions.clear();
                    return self.ask(Reply::NoRooms);
                }
                self.suggestions = rooms.clone();
                self.state = FlowState::ShowingOptions;
                Reply::Suggestions {
                    people,
                    date,
                    range,
                    rooms,
                }
            }
        }
    }

    fn ask(&mut self, reply: Reply) -> Reply {
        self.state = FlowState::NeedDetails;
        reply
    }

    fn summary(&self) -> Option<Summary> {
        let selected = self.selected.as_ref()?;
        Some(Summary {
            room_name: selected.room.name.clone(),
            date: self.collected.date?,
            range: TimeRange::unchecked(self.collected.start_time?, self.collected.end_time?),
            people: self.collected.people_count?,
            full_name: self.full_name.clone()?,
            email: self.collected.email.clone()?,
        })
    }

    fn confirm(&mut self, store: &BookingStore, text: &str) -> Reply {
        let answer = text.trim().to_lowercase();
        if !matches!(answer.as_str(), "yes" | "y" | "confirm") {
            self.reset();
            return Reply::StartOver;
        }

        let room_id = self.selected.as_ref().map(|s| s.room.id.clone());
        let (Some(summary), Some(room_id)) = (self.summary(), room_id) else {
            return self.ask(Reply::Declined("Something went wrong. Please try again.".to_string()));
        };

        let candidate = NewBooking {
            room_id,
            date: summary.date,
            start_time: summary.range.start,
            end_time: summary.range.end,
            full_name: summary.full_name,
            email: summary.email,
            people_count: summary.people,
            recurrence_group_id: None,
        };
        match store.add_booking(candidate) {
            Ok(booking) => {
                self.state = FlowState::Done;
                self.booking = Some(booking.clone());
                Reply::Booked(booking)
            }
            Err(err) => self.ask(Reply::Declined(err.to_string())),
        }
    }

    fn reset(&mut self) {
        self.state = FlowState::Greeting;
        self.collected = BookingIntent::default();
        self.full_name = None;
        self.suggestions.clear();
        self.selected = None;
    }
}
