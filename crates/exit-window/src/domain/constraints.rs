use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Three-valued checklist answer for sub-fields that take no part in blocker logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ternary {
    Yes,
    No,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Ternary {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HousingStatus {
    Aligned,
    NoticeRequired,
    LockedIn,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HousingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::NoticeRequired => "notice-required",
            Self::LockedIn => "locked-in",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeStability {
    Stable,
    Unstable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl IncomeStability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Unstable => "unstable",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunwayStatus {
    Secure,
    Tight,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RunwayStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Secure => "secure",
            Self::Tight => "tight",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependentsCoverage {
    Supported,
    Unsupported,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DependentsCoverage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Unsupported => "unsupported",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthcareContinuity {
    Secured,
    AtRisk,
    #[default]
    #[serde(other)]
    Unknown,
}

impl HealthcareContinuity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Secured => "secured",
            Self::AtRisk => "at-risk",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegalBlocker {
    Present,
    Clear,
    #[default]
    #[serde(other)]
    Unknown,
}

impl LegalBlocker {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Clear => "clear",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HousingConstraint {
    pub status: HousingStatus,
    #[serde(
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(
        deserialize_with = "deserialize_optional_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub notice_days: Option<u32>,
    pub move_out_notice_sent: Ternary,
    pub new_place_secured: Ternary,
    pub utilities_transfer_planned: Ternary,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeConstraint {
    pub stability: IncomeStability,
    pub employer_notified: Ternary,
    pub final_pay_known: Ternary,
    pub benefits_adjusted: Ternary,
    pub backup_income_ready: Ternary,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashRunwayConstraint {
    pub status: RunwayStatus,
    /// Months of runway; absence means the user has not stated it, which is not the same as zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<f64>,
    pub move_costs_covered: Ternary,
    pub emergency_buffer_ready: Ternary,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DependentsConstraint {
    pub coverage: DependentsCoverage,
    pub care_arranged: Ternary,
    pub records_transferred: Ternary,
    pub backup_care_ready: Ternary,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthcareConstraint {
    pub continuity: HealthcareContinuity,
    pub coverage_active: Ternary,
    pub meds_stocked: Ternary,
    pub records_ready: Ternary,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalConstraint {
    pub blocker: LegalBlocker,
    pub ids_valid: Ternary,
    pub mail_forwarding_set: Ternary,
    pub insurance_proof_ready: Ternary,
    pub note: String,
}

/// Full set of user-declared relocation constraints. `Default` is the all-unknown record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    pub housing: HousingConstraint,
    pub income: IncomeConstraint,
    pub cash_runway: CashRunwayConstraint,
    pub dependents: DependentsConstraint,
    pub healthcare: HealthcareConstraint,
    pub legal: LegalConstraint,
}

/// Section-level replacement; sections left as `None` keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstraintPatch {
    pub housing: Option<HousingConstraint>,
    pub income: Option<IncomeConstraint>,
    pub cash_runway: Option<CashRunwayConstraint>,
    pub dependents: Option<DependentsConstraint>,
    pub healthcare: Option<HealthcareConstraint>,
    pub legal: Option<LegalConstraint>,
}

impl ConstraintPatch {
    pub fn is_empty(&self) -> bool {
        self.housing.is_none()
            && self.income.is_none()
            && self.cash_runway.is_none()
            && self.dependents.is_none()
            && self.healthcare.is_none()
            && self.legal.is_none()
    }
}

impl Constraints {
    pub fn apply(&mut self, patch: ConstraintPatch) {
        let ConstraintPatch {
            housing,
            income,
            cash_runway,
            dependents,
            healthcare,
            legal,
        } = patch;

        if let Some(section) = housing {
            self.housing = section;
        }
        if let Some(section) = income {
            self.income = section;
        }
        if let Some(section) = cash_runway {
            self.cash_runway = section;
        }
        if let Some(section) = dependents {
            self.dependents = section;
        }
        if let Some(section) = healthcare {
            self.healthcare = section;
        }
        if let Some(section) = legal {
            self.legal = section;
        }
    }
}

/// Identifies one constraint section, e.g. for change-log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    Housing,
    Income,
    CashRunway,
    Dependents,
    Healthcare,
    Legal,
}

impl ConstraintKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Housing,
            Self::Income,
            Self::CashRunway,
            Self::Dependents,
            Self::Healthcare,
            Self::Legal,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Income => "income",
            Self::CashRunway => "cashRunway",
            Self::Dependents => "dependents",
            Self::Healthcare => "healthcare",
            Self::Legal => "legal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Income => "Income",
            Self::CashRunway => "Cash runway",
            Self::Dependents => "Dependents",
            Self::Healthcare => "Healthcare",
            Self::Legal => "Legal",
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Blank or unreadable dates read as "no date", matching what the intake form stores for a
/// cleared field. Dates are checked again on the way in through the CLI.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let date = match value {
        Some(serde_json::Value::String(raw)) if !raw.trim().is_empty() => match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(err) => {
                warn!(error = %err, "unreadable date dropped");
                None
            }
        },
        _ => None,
    };
    Ok(date)
}

/// Whole day counts, accepting integral floats (`30.0`) as written by number inputs.
pub fn deserialize_optional_days<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let days = value.as_ref().and_then(|value| {
        value.as_u64().and_then(|days| u32::try_from(days).ok()).or_else(|| {
            value
                .as_f64()
                .filter(|days| days.fract() == 0.0 && *days >= 0.0 && *days <= f64::from(u32::MAX))
                .map(|days| days as u32)
        })
    });
    if days.is_none() && value.as_ref().is_some_and(|value| !value.is_null()) {
        warn!("unreadable notice days dropped");
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_all_unknown() {
        let constraints = Constraints::default();
        assert_eq!(constraints.housing.status, HousingStatus::Unknown);
        assert_eq!(constraints.income.stability, IncomeStability::Unknown);
        assert_eq!(constraints.cash_runway.status, RunwayStatus::Unknown);
        assert_eq!(constraints.cash_runway.months, None);
        assert_eq!(constraints.dependents.coverage, DependentsCoverage::Unknown);
        assert_eq!(
            constraints.healthcare.continuity,
            HealthcareContinuity::Unknown
        );
        assert_eq!(constraints.legal.blocker, LegalBlocker::Unknown);
        assert_eq!(constraints.legal.ids_valid, Ternary::Unknown);
    }

    #[test]
    fn reads_camel_case_payload_with_kebab_values() {
        let payload = json!({
            "housing": { "status": "notice-required", "leaseEndDate": "2025-06-30", "noticeDays": 30 },
            "cashRunway": { "status": "tight", "months": 2.5 },
            "healthcare": { "continuity": "at-risk" }
        });

        let constraints: Constraints = serde_json::from_value(payload).expect("payload parses");

        assert_eq!(constraints.housing.status, HousingStatus::NoticeRequired);
        assert_eq!(
            constraints.housing.lease_end_date,
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(constraints.housing.notice_days, Some(30));
        assert_eq!(constraints.cash_runway.months, Some(2.5));
        assert_eq!(
            constraints.healthcare.continuity,
            HealthcareContinuity::AtRisk
        );
        assert_eq!(constraints.income, IncomeConstraint::default());
    }

    #[test]
    fn unrecognized_enum_values_read_as_unknown() {
        let payload = json!({
            "legal": { "blocker": "maybe" },
            "income": { "stability": "volatile", "employerNotified": "perhaps" }
        });

        let constraints: Constraints = serde_json::from_value(payload).expect("payload parses");

        assert_eq!(constraints.legal.blocker, LegalBlocker::Unknown);
        assert_eq!(constraints.income.stability, IncomeStability::Unknown);
        assert_eq!(constraints.income.employer_notified, Ternary::Unknown);
    }

    #[test]
    fn blank_lease_end_date_reads_as_absent() {
        let payload = json!({ "housing": { "status": "aligned", "leaseEndDate": "  " } });

        let constraints: Constraints = serde_json::from_value(payload).expect("payload parses");

        assert_eq!(constraints.housing.lease_end_date, None);
    }

    #[test]
    fn unreadable_housing_values_fall_back_without_failing_the_record() {
        let payload = json!({
            "housing": { "status": "aligned", "leaseEndDate": "30/06/2025", "noticeDays": 30.0 },
            "legal": { "blocker": "present" }
        });

        let constraints: Constraints = serde_json::from_value(payload).expect("payload parses");

        assert_eq!(constraints.housing.status, HousingStatus::Aligned);
        assert_eq!(constraints.housing.lease_end_date, None);
        assert_eq!(constraints.housing.notice_days, Some(30));
        assert_eq!(constraints.legal.blocker, LegalBlocker::Present);

        let fractional: HousingConstraint =
            serde_json::from_value(json!({ "noticeDays": 12.5, "leaseEndDate": 20250630 }))
                .expect("payload parses");
        assert_eq!(fractional.notice_days, None);
        assert_eq!(fractional.lease_end_date, None);
    }

    #[test]
    fn patch_replaces_only_supplied_sections() {
        let mut constraints = Constraints::default();
        constraints.income.stability = IncomeStability::Stable;

        constraints.apply(ConstraintPatch {
            legal: Some(LegalConstraint {
                blocker: LegalBlocker::Clear,
                ..LegalConstraint::default()
            }),
            ..ConstraintPatch::default()
        });

        assert_eq!(constraints.legal.blocker, LegalBlocker::Clear);
        assert_eq!(constraints.income.stability, IncomeStability::Stable);
    }
}
