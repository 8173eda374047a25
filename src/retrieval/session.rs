//! Class-session records
//!
//! Studio class sessions as supplied by the dashboard, rendered into
//! retrieval documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::retrieval::document::CorpusRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Yoga,
    Pilates,
    Barre,
    Cycle,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Yoga => "yoga",
            ClassType::Pilates => "pilates",
            ClassType::Barre => "barre",
            ClassType::Cycle => "cycle",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Lunch,
    Afternoon,
    Afterwork,
    Evening,
    Weekend,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Lunch => "lunch",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Afterwork => "afterwork",
            TimeSlot::Evening => "evening",
            TimeSlot::Weekend => "weekend",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled class with its booking outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub class_type: ClassType,
    pub time_slot: TimeSlot,
    pub base_price: f64,
    pub actual_price: f64,
    pub capacity: u32,
    pub booked: u32,
    pub attended: u32,
    pub cancellations: u32,
    pub revenue: f64,
    /// Average days between booking and the session.
    pub booking_lead_time_days: f64,
}

impl CorpusRecord for ClassSession {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn text_fields(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.instructor_name.clone(),
            self.class_type.to_string(),
            self.time_slot.to_string(),
            format!(
                "price {} capacity {} booked {} attended {}",
                self.actual_price, self.capacity, self.booked, self.attended
            ),
            format!(
                "revenue {} cancellations {} lead time {} days",
                self.revenue, self.cancellations, self.booking_lead_time_days
            ),
        ]
    }
}

/// Read a JSON array of sessions from `path`.
pub fn load_sessions(path: &Path) -> Result<Vec<ClassSession>, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
