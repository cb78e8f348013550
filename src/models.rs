use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNNAMED_ITEM: &str = "Unnamed Item";

/// One logged food item. Entries are never mutated after creation; the list
/// is edited by adding and removing whole entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub calories: i64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Entry {
    pub fn new(name: &str, calories: i64, timestamp: i64) -> Self {
        let name = if name.trim().is_empty() {
            UNNAMED_ITEM.to_string()
        } else {
            name.to_string()
        };
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            calories,
            timestamp,
        }
    }
}

/// Calorie ceilings derived from body weight: sedentary maintenance plus
/// deficits for one and two pounds of loss per week, floored at 1200.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Targets {
    pub maintenance: i64,
    pub one_lb: i64,
    pub two_lb: i64,
}

impl Targets {
    pub fn for_goal(&self, goal: Goal) -> i64 {
        match goal {
            Goal::Maintenance => self.maintenance,
            Goal::OneLb => self.one_lb,
            Goal::TwoLb => self.two_lb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Maintenance,
    OneLb,
    TwoLb,
}

/// The whole session state: everything that survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerData {
    pub entries: Vec<Entry>,
    pub weight: f64,
    pub goal: Goal,
}

impl Default for TrackerData {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            weight: 150.0,
            goal: Goal::default(),
        }
    }
}

impl TrackerData {
    /// Inserts an entry, keeping the list sorted ascending by timestamp.
    pub fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.entries.sort_by_key(|entry| entry.timestamp);
    }
}

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    #[serde(default)]
    pub name: String,
    pub calories: i64,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: Goal,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    pub total_today: i64,
    pub weight: f64,
    pub goal: Goal,
    pub goal_target: i64,
    pub remaining: i64,
    pub targets: Targets,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Serialize)]
pub struct DayPoint {
    pub date: String,
    pub total: i64,
    pub rolling_avg: i64,
}

/// Daily report. The engine never fails; an empty entry list yields the
/// explicit `no_data` variant instead of averages over nothing.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DailyReport {
    NoData,
    Ready {
        days: Vec<DayPoint>,
        overall_average: i64,
        projected_monthly_change: f64,
    },
}

#[derive(Debug, Serialize)]
pub struct CumulativePoint {
    pub label: String,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct CumulativeSeries {
    pub points: Vec<CumulativePoint>,
    pub maintenance: i64,
    pub one_lb: i64,
    pub two_lb: i64,
}
