//! Static institution profiles. Compiled in, not user-editable.

use serde::Serialize;

use crate::models::certificate::FieldName;

/// How to address one target institution.
#[derive(Debug, Clone, Serialize)]
pub struct InstitutionProfile {
    pub name: &'static str,
    pub reference_code: &'static str,
    pub mailing_address: &'static str,
    pub purpose_statement: &'static str,
    pub tone: &'static str,
    /// Fields this institution cares most about; highlighted on the review form.
    pub key_fields: &'static [FieldName],
}

impl InstitutionProfile {
    pub fn is_key_field(&self, field: FieldName) -> bool {
        self.key_fields.contains(&field)
    }
}

/// Used whenever a requested institution is not in the table.
pub const DEFAULT_INSTITUTION: &str = "Bank/Financial";

/// All supported institutions, in selector order.
pub static INSTITUTIONS: [InstitutionProfile; 7] = [
    InstitutionProfile {
        name: "Social Security Administration",
        reference_code: "SSA Form SSA-721",
        mailing_address: "Social Security Administration\nP.O. Box 33003\nBaltimore, MD 21290-3003",
        purpose_statement: "notification of death to stop benefit payments and initiate survivor benefits review",
        tone: "formal government",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::Ssn,
            FieldName::DateOfDeath,
            FieldName::DateOfBirth,
            FieldName::NextOfKin,
        ],
    },
    InstitutionProfile {
        name: "Medicare/Medicaid",
        reference_code: "CMS Death Notification",
        mailing_address: "Centers for Medicare & Medicaid Services\n7500 Security Boulevard\nBaltimore, MD 21244",
        purpose_statement: "notification of death to terminate Medicare/Medicaid coverage",
        tone: "formal government",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::Ssn,
            FieldName::DateOfDeath,
            FieldName::DateOfBirth,
        ],
    },
    InstitutionProfile {
        name: "IRS",
        reference_code: "IRS Final Return Notification",
        mailing_address: "Internal Revenue Service\nCincinnati, OH 45999",
        purpose_statement: "notification of death for tax record purposes and to authorise estate representative",
        tone: "formal legal",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::Ssn,
            FieldName::DateOfDeath,
            FieldName::Address,
            FieldName::NextOfKin,
        ],
    },
    InstitutionProfile {
        name: "Bank/Financial",
        reference_code: "Account Closure / Estate Administration Request",
        mailing_address: "[Bank Name and Branch Address]",
        purpose_statement: "notification of account holder death and initiation of estate administration process",
        tone: "formal professional",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::DateOfDeath,
            FieldName::Address,
            FieldName::NextOfKin,
            FieldName::CertificateNumber,
        ],
    },
    InstitutionProfile {
        name: "Insurance Company",
        reference_code: "Death Claim Notification",
        mailing_address: "[Insurance Company Name]\n[Claims Department Address]",
        purpose_statement: "formal death notification to initiate life insurance claim process",
        tone: "formal professional",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::DateOfDeath,
            FieldName::DateOfBirth,
            FieldName::Ssn,
            FieldName::CauseOfDeath,
            FieldName::CertificateNumber,
        ],
    },
    InstitutionProfile {
        name: "DMV",
        reference_code: "Driver Licence Cancellation Notice",
        mailing_address: "[State] Department of Motor Vehicles\n[DMV Address]",
        purpose_statement: "notification of death to cancel driving licence and vehicle registration",
        tone: "formal government",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::DateOfDeath,
            FieldName::DateOfBirth,
            FieldName::Address,
        ],
    },
    InstitutionProfile {
        name: "Utilities",
        reference_code: "Account Holder Death Notification",
        mailing_address: "[Utility Provider Name]\nCustomer Services Department",
        purpose_statement: "notification of account holder death to transfer or close utility accounts",
        tone: "professional",
        key_fields: &[
            FieldName::DeceasedName,
            FieldName::DateOfDeath,
            FieldName::Address,
            FieldName::NextOfKin,
        ],
    },
];

pub fn institution_names() -> impl Iterator<Item = &'static str> {
    INSTITUTIONS.iter().map(|p| p.name)
}

/// Exact-name lookup.
pub fn find_profile(name: &str) -> Option<&'static InstitutionProfile> {
    INSTITUTIONS.iter().find(|p| p.name == name)
}

/// Exact-name lookup, falling back to the `Bank/Financial` profile.
pub fn profile_or_default(name: &str) -> &'static InstitutionProfile {
    find_profile(name).unwrap_or_else(default_profile)
}

pub fn default_profile() -> &'static InstitutionProfile {
    INSTITUTIONS
        .iter()
        .find(|p| p.name == DEFAULT_INSTITUTION)
        .unwrap_or(&INSTITUTIONS[3])
}
