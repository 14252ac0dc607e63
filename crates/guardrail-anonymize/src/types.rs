//! Core types for anonymization

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Entity types that can be detected and anonymized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Person,
    Email,
    CreditCard,
    SSN,
    PhoneNumber,
    IpAddress,
    Url,
    ApiKey,
    AwsAccessKey,
    Location,
    Organization,
    Date,
    MedicalRecordNumber,
    AccountNumber,
    LicensePlate,
    DateOfBirth,
    BankAccount,
    DriverLicense,
    Passport,
    Address,
    PostalCode,
}

impl EntityType {
    /// Lower-snake-case entity type identifier, as carried in placeholders
    /// (`__<entity_type>_<n>__`) and `DetectedEntity::entity_type` (§4.8).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Email => "email",
            EntityType::CreditCard => "credit_card",
            EntityType::SSN => "id_card_number",
            EntityType::PhoneNumber => "phone_number",
            EntityType::IpAddress => "ip_address",
            EntityType::Url => "url",
            EntityType::ApiKey => "api_key",
            EntityType::AwsAccessKey => "aws_access_key",
            EntityType::Location => "location",
            EntityType::Organization => "organization",
            EntityType::Date => "date",
            EntityType::MedicalRecordNumber => "medical_record_number",
            EntityType::AccountNumber => "account_number",
            EntityType::LicensePlate => "license_plate",
            EntityType::DateOfBirth => "date_of_birth",
            EntityType::BankAccount => "bank_account",
            EntityType::DriverLicense => "driver_license",
            EntityType::Passport => "passport",
            EntityType::Address => "address",
            EntityType::PostalCode => "postal_code",
        }
    }

    /// Parse a lower-snake-case entity type identifier back into its enum,
    /// used when rebuilding a placeholder's entity type from its text.
    pub fn from_str_id(s: &str) -> Option<Self> {
        Some(match s {
            "person" => EntityType::Person,
            "email" => EntityType::Email,
            "credit_card" => EntityType::CreditCard,
            "id_card_number" => EntityType::SSN,
            "phone_number" => EntityType::PhoneNumber,
            "ip_address" => EntityType::IpAddress,
            "url" => EntityType::Url,
            "api_key" => EntityType::ApiKey,
            "aws_access_key" => EntityType::AwsAccessKey,
            "location" => EntityType::Location,
            "organization" => EntityType::Organization,
            "date" => EntityType::Date,
            "medical_record_number" => EntityType::MedicalRecordNumber,
            "account_number" => EntityType::AccountNumber,
            "license_plate" => EntityType::LicensePlate,
            "date_of_birth" => EntityType::DateOfBirth,
            "bank_account" => EntityType::BankAccount,
            "driver_license" => EntityType::DriverLicense,
            "passport" => EntityType::Passport,
            "address" => EntityType::Address,
            "postal_code" => EntityType::PostalCode,
            _ => return None,
        })
    }
}

/// A detected entity in the input text
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch {
    /// Type of entity detected
    pub entity_type: EntityType,
    /// Start byte position in text
    pub start: usize,
    /// End byte position in text
    pub end: usize,
    /// The matched text
    pub value: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

/// Stored mapping between placeholder and original value
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMapping {
    /// Type of entity
    pub entity_type: EntityType,
    /// Original PII value
    pub original_value: String,
    /// Placeholder used in anonymized text
    pub placeholder: String,
    /// Confidence score from detection
    pub confidence: f32,
    /// When this mapping was created
    pub timestamp: SystemTime,
    /// When this mapping expires (for TTL)
    pub expires_at: Option<SystemTime>,
}

/// A placeholder token found in text during deanonymization
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// The full placeholder text (e.g., "[PERSON_1]")
    pub text: String,
    /// Start byte position in text
    pub start: usize,
    /// End byte position in text
    pub end: usize,
}
