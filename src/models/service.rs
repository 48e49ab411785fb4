use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Hotel,
    Hospital,
    School,
    Salon,
    Gym,
    Pharmacy,
    Grocery,
    Electrician,
    Plumber,
    Mechanic,
    Tailor,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Restaurant,
        Category::Hotel,
        Category::Hospital,
        Category::School,
        Category::Salon,
        Category::Gym,
        Category::Pharmacy,
        Category::Grocery,
        Category::Electrician,
        Category::Plumber,
        Category::Mechanic,
        Category::Tailor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Hospital => "hospital",
            Category::School => "school",
            Category::Salon => "salon",
            Category::Gym => "gym",
            Category::Pharmacy => "pharmacy",
            Category::Grocery => "grocery",
            Category::Electrician => "electrician",
            Category::Plumber => "plumber",
            Category::Mechanic => "mechanic",
            Category::Tailor => "tailor",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Restaurant => "Restaurants & Cafes",
            Category::Hotel => "Hotels & Lodging",
            Category::Hospital => "Hospitals & Clinics",
            Category::School => "Schools & Tutoring",
            Category::Salon => "Salons & Beauty",
            Category::Gym => "Gyms & Fitness",
            Category::Pharmacy => "Pharmacies",
            Category::Grocery => "Grocery Stores",
            Category::Electrician => "Electricians",
            Category::Plumber => "Plumbers",
            Category::Mechanic => "Auto Mechanics",
            Category::Tailor => "Tailors",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 3] = [
        ServiceStatus::Pending,
        ServiceStatus::Verified,
        ServiceStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::Verified => "verified",
            ServiceStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSubmission {
    pub first_name: String,
    pub last_name: Option<String>,
    pub address: String,
    pub phone_number1: String,
    pub phone_number2: Option<String>,
    pub category: Category,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub status: ServiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub address: String,
    pub phone_number1: String,
    pub phone_number2: Option<String>,
    pub category: Category,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub status: ServiceStatus,
    pub owner_id: Option<String>,
    pub created_at: String,
}

impl Service {
    pub fn from_submission(submission: ServiceSubmission, owner_id: Option<String>) -> Self {
        Service {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: submission.first_name,
            last_name: submission.last_name,
            address: submission.address,
            phone_number1: submission.phone_number1,
            phone_number2: submission.phone_number2,
            category: submission.category,
            images: submission.images,
            description: submission.description,
            status: submission.status,
            owner_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceFilter {
    pub category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: &'static str,
}
