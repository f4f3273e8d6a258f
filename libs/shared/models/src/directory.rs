use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub clinic_id: Option<i64>,
}

/// Doctor as presented by the public directory, with the clinic name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorListing {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
    pub clinic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
