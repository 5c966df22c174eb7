//! A fake analytics feed, and the reports computed from it

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::traits::AnalyticsFeed;


/// How far back a report goes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Timeframe::Week, Timeframe::Month, Timeframe::Quarter, Timeframe::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
            Timeframe::Quarter => "90d",
            Timeframe::Year => "1y",
        }
    }

    /// The number of days covered
    pub fn days(&self) -> u32 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Quarter => 90,
            Timeframe::Year => 365,
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown timeframe {:?} (expected one of 7d, 30d, 90d, 1y)", s).into())
    }
}


/// The figures of a single day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub revenue: u32,
    pub leads: u32,
    pub conversions: u32,
}


/// An analytics feed that makes up its figures
pub struct MockAnalyticsFeed {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl MockAnalyticsFeed {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A feed that always generates the same figures
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            latency: Duration::from_secs(1),
        }
    }

    /// Change the simulated network latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Generate the figures of `days` days, starting from `today` and going back in time
    pub fn generate(&self, days: u32, today: NaiveDate) -> Vec<DailyMetrics> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..days)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
            .map(|date| DailyMetrics {
                date,
                revenue: rng.gen_range(5000..15000),
                leads: rng.gen_range(20..70),
                conversions: rng.gen_range(5..25),
            })
            .collect()
    }
}

impl Default for MockAnalyticsFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsFeed for MockAnalyticsFeed {
    async fn analytics(&self, timeframe: Timeframe) -> Result<Vec<DailyMetrics>, Box<dyn Error>> {
        tokio::time::sleep(self.latency).await;
        log::debug!("Generating analytics for the last {} days", timeframe.days());
        Ok(self.generate(timeframe.days(), Utc::now().date_naive()))
    }
}


/// Render metrics as CSV, one line per day
pub fn export_csv(data: &[DailyMetrics]) -> String {
    let mut lines = vec!["Date,Revenue,Leads,Conversions".to_string()];
    lines.extend(data.iter().map(|day| {
        format!("{},{},{},{}", day.date.format("%-m/%-d/%Y"), day.revenue, day.leads, day.conversions)
    }));
    lines.join("\n")
}


/// Totals and ratios over a set of daily metrics
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_revenue: u64,
    pub total_leads: u64,
    pub total_conversions: u64,
    /// Conversions per lead, in percent (0 if there was no lead)
    pub conversion_rate: f64,
    /// Revenue of the most recent day compared to the day before, in percent
    pub revenue_growth: Option<f64>,
}

/// Summarize metrics, ordered most recent first (like [`AnalyticsFeed::analytics`] returns them)
pub fn summarize(data: &[DailyMetrics]) -> MetricsSummary {
    let total_revenue: u64 = data.iter().map(|day| day.revenue as u64).sum();
    let total_leads: u64 = data.iter().map(|day| day.leads as u64).sum();
    let total_conversions: u64 = data.iter().map(|day| day.conversions as u64).sum();

    let conversion_rate = if total_leads == 0 {
        0.0
    } else {
        total_conversions as f64 / total_leads as f64 * 100.0
    };

    let revenue_growth = match data {
        [latest, previous, ..] if previous.revenue != 0 => {
            Some((latest.revenue as f64 - previous.revenue as f64) / previous.revenue as f64 * 100.0)
        },
        _ => None,
    };

    MetricsSummary { total_revenue, total_leads, total_conversions, conversion_rate, revenue_growth }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: (i32, u32, u32), revenue: u32, leads: u32, conversions: u32) -> DailyMetrics {
        DailyMetrics {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            revenue,
            leads,
            conversions,
        }
    }

    #[test]
    fn timeframes() {
        assert_eq!("90d".parse::<Timeframe>().unwrap(), Timeframe::Quarter);
        assert_eq!(Timeframe::Year.days(), 365);
        assert!("2w".parse::<Timeframe>().is_err());
    }

    #[test]
    fn generated_figures() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let data = MockAnalyticsFeed::seeded(5).generate(30, today);

        assert_eq!(data.len(), 30);
        assert_eq!(data[0].date, today);
        assert_eq!(data[1].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        for day in &data {
            assert!((5000..15000).contains(&day.revenue));
            assert!((20..70).contains(&day.leads));
            assert!((5..25).contains(&day.conversions));
        }

        assert_eq!(MockAnalyticsFeed::seeded(5).generate(30, today), data);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_covers_the_timeframe() {
        let feed = MockAnalyticsFeed::seeded(9);
        let started = tokio::time::Instant::now();
        let data = feed.analytics(Timeframe::Week).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(data.len(), 7);
        assert!(data[0].date > data[6].date);
    }

    #[test]
    fn csv_export() {
        let data = vec![day((2024, 3, 20), 12000, 40, 10), day((2024, 3, 19), 8000, 25, 5)];
        assert_eq!(export_csv(&data), "Date,Revenue,Leads,Conversions\n3/20/2024,12000,40,10\n3/19/2024,8000,25,5");
        assert_eq!(export_csv(&[]), "Date,Revenue,Leads,Conversions");
    }

    #[test]
    fn summary() {
        let data = vec![day((2024, 3, 20), 12000, 40, 10), day((2024, 3, 19), 8000, 40, 10)];
        let summary = summarize(&data);
        assert_eq!(summary.total_revenue, 20000);
        assert_eq!(summary.total_leads, 80);
        assert_eq!(summary.total_conversions, 20);
        assert_eq!(summary.conversion_rate, 25.0);
        assert_eq!(summary.revenue_growth, Some(50.0));

        let single = summarize(&data[..1]);
        assert_eq!(single.revenue_growth, None);
        assert_eq!(summarize(&[]).conversion_rate, 0.0);
    }
}
