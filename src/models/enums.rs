//! Shared enums matching the database and the trained model's vocabulary.
//!
//! Wire strings are load-bearing: `WorkType` and `SmokingStatus` values feed
//! the feature encoder, which expects the exact category names the model was
//! trained on (including the lowercase `children` and the space in
//! `formerly smoked`).

use serde::{Deserialize, Serialize};

/// Account role. Patients create and read their own screenings;
/// admins read everything and create nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PATIENT")]
    Patient,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Patient => "PATIENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "PATIENT" => Some(UserRole::Patient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Risk band derived from model probability via fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// Ordinal rank for "highest risk" aggregation.
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }
}

/// Employment category as the model was trained on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    #[serde(rename = "Private")]
    Private,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    #[serde(rename = "Govt_job")]
    GovtJob,
    #[serde(rename = "children")]
    Children,
    #[serde(rename = "Never_worked")]
    NeverWorked,
}

impl WorkType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Private => "Private",
            WorkType::SelfEmployed => "Self-employed",
            WorkType::GovtJob => "Govt_job",
            WorkType::Children => "children",
            WorkType::NeverWorked => "Never_worked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Private" => Some(WorkType::Private),
            "Self-employed" => Some(WorkType::SelfEmployed),
            "Govt_job" => Some(WorkType::GovtJob),
            "children" => Some(WorkType::Children),
            "Never_worked" => Some(WorkType::NeverWorked),
            _ => None,
        }
    }

    /// Parse a stored value, falling back to `Private` for anything
    /// unrecognized. The fallback keeps old rows scoreable but is logged
    /// as an encoding anomaly so data-entry drift is visible.
    pub fn parse_lossy(s: &str) -> Self {
        WorkType::from_str(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "unknown work_type, falling back to Private");
            WorkType::Private
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidenceType {
    Urban,
    Rural,
}

impl ResidenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResidenceType::Urban => "Urban",
            ResidenceType::Rural => "Rural",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Urban" => Some(ResidenceType::Urban),
            "Rural" => Some(ResidenceType::Rural),
            _ => None,
        }
    }

    pub fn parse_lossy(s: &str) -> Self {
        ResidenceType::from_str(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "unknown residence_type, falling back to Urban");
            ResidenceType::Urban
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingStatus {
    #[serde(rename = "formerly smoked")]
    FormerlySmoked,
    #[serde(rename = "never smoked")]
    NeverSmoked,
    #[serde(rename = "smokes")]
    Smokes,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl SmokingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SmokingStatus::FormerlySmoked => "formerly smoked",
            SmokingStatus::NeverSmoked => "never smoked",
            SmokingStatus::Smokes => "smokes",
            SmokingStatus::Unknown => "Unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "formerly smoked" => Some(SmokingStatus::FormerlySmoked),
            "never smoked" => Some(SmokingStatus::NeverSmoked),
            "smokes" => Some(SmokingStatus::Smokes),
            "Unknown" => Some(SmokingStatus::Unknown),
            _ => None,
        }
    }

    /// Parse a stored value, falling back to `never smoked` for anything
    /// unrecognized. Logged for the same reason as `WorkType::parse_lossy`.
    pub fn parse_lossy(s: &str) -> Self {
        SmokingStatus::from_str(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "unknown smoking_status, falling back to never smoked");
            SmokingStatus::NeverSmoked
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_type_round_trip() {
        for wt in [
            WorkType::Private,
            WorkType::SelfEmployed,
            WorkType::GovtJob,
            WorkType::Children,
            WorkType::NeverWorked,
        ] {
            assert_eq!(WorkType::from_str(wt.as_str()), Some(wt));
        }
        assert_eq!(WorkType::from_str("Retired"), None);
    }

    #[test]
    fn work_type_lossy_falls_back_to_private() {
        assert_eq!(WorkType::parse_lossy("Retired"), WorkType::Private);
        // Deterministic across repeated calls with the same unknown value
        assert_eq!(WorkType::parse_lossy("Retired"), WorkType::Private);
        assert_eq!(WorkType::parse_lossy("children"), WorkType::Children);
    }

    #[test]
    fn smoking_status_lossy_falls_back_to_never_smoked() {
        assert_eq!(SmokingStatus::parse_lossy("vapes"), SmokingStatus::NeverSmoked);
        assert_eq!(SmokingStatus::parse_lossy("Unknown"), SmokingStatus::Unknown);
    }

    #[test]
    fn serde_uses_model_vocabulary() {
        assert_eq!(
            serde_json::to_string(&WorkType::SelfEmployed).unwrap(),
            "\"Self-employed\""
        );
        assert_eq!(
            serde_json::to_string(&SmokingStatus::FormerlySmoked).unwrap(),
            "\"formerly smoked\""
        );
        assert_eq!(serde_json::to_string(&UserRole::Patient).unwrap(), "\"PATIENT\"");
        let wt: WorkType = serde_json::from_str("\"children\"").unwrap();
        assert_eq!(wt, WorkType::Children);
        // Strict at the request boundary: unknown categories are rejected,
        // the lossy fallback only applies to stored rows.
        assert!(serde_json::from_str::<WorkType>("\"Retired\"").is_err());
    }

    #[test]
    fn risk_level_rank_is_ordinal() {
        assert!(RiskLevel::High.rank() > RiskLevel::Medium.rank());
        assert!(RiskLevel::Medium.rank() > RiskLevel::Low.rank());
    }
}
