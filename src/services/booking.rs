//! A fake appointment booking service

use std::error::Error;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::traits::BookingService;

/// The first bookable hour of a day
pub const FIRST_HOUR: u32 = 9;
/// Slots end at this hour
pub const LAST_HOUR: u32 = 17;

const SLOT_AVAILABILITY: f64 = 0.7;
const BOOKING_SUCCESS: f64 = 0.9;


/// A one-hour appointment slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlot {
    pub id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub slot_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub purpose: String,
}


/// A booking service that makes up its answers
pub struct MockBookingService {
    rng: Mutex<StdRng>,
    slots_latency: Duration,
    booking_latency: Duration,
}

impl MockBookingService {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A service that always gives the same answers to the same sequence of calls
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            slots_latency: Duration::from_millis(500),
            booking_latency: Duration::from_secs(1),
        }
    }

    /// Change the simulated network latency
    pub fn with_latency(mut self, slots_latency: Duration, booking_latency: Duration) -> Self {
        self.slots_latency = slots_latency;
        self.booking_latency = booking_latency;
        self
    }

    fn roll(&self, probability: f64) -> bool {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen_bool(probability)
    }

    /// The slots of a day, with a random availability
    pub fn generate_slots(&self, date: NaiveDate) -> Vec<BookingSlot> {
        (FIRST_HOUR..LAST_HOUR)
            .filter_map(|hour| {
                let start_time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                let end_time = NaiveTime::from_hms_opt(hour + 1, 0, 0)?;
                Some(BookingSlot {
                    id: format!("slot-{}-{}", date, hour),
                    start_time,
                    end_time,
                    available: self.roll(SLOT_AVAILABILITY),
                })
            })
            .collect()
    }
}

impl Default for MockBookingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingService for MockBookingService {
    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<BookingSlot>, Box<dyn Error>> {
        tokio::time::sleep(self.slots_latency).await;
        Ok(self.generate_slots(date))
    }

    async fn book(&self, request: &BookingRequest) -> Result<(), Box<dyn Error>> {
        tokio::time::sleep(self.booking_latency).await;
        if self.roll(BOOKING_SUCCESS) == false {
            log::warn!("Booking of {} for {} failed", request.slot_id, request.customer_email);
            return Err("Booking failed. Please try again.".into());
        }
        log::info!("Slot {} booked for {}", request.slot_id, request.customer_name);
        Ok(())
    }
}
