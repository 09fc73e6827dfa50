//! Core types for ChatWarden

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message from a game session.
///
/// Created by the boundary layer and never mutated afterwards; every
/// pipeline run receives its own clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub message_id: String,

    /// Raw text content of the message
    pub content: String,

    /// Identifier of the author
    pub user_id: u64,

    /// Display name of the author, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new chat message timestamped now
    pub fn new(message_id: impl Into<String>, content: impl Into<String>, user_id: u64) -> Self {
        Self {
            message_id: message_id.into(),
            content: content.into(),
            user_id,
            user_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the author's display name
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }
}

/// Categories of personally identifiable information recognized by the
/// entity-extraction oracle.
///
/// The wire labels match the upstream token-classification model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PiiCategory {
    #[serde(rename = "ACCOUNTNUM")]
    AccountNumber,
    #[serde(rename = "BUILDINGNUM")]
    BuildingNumber,
    #[serde(rename = "CITY")]
    City,
    #[serde(rename = "CREDITCARDNUMBER")]
    CreditCardNumber,
    #[serde(rename = "DATEOFBIRTH")]
    DateOfBirth,
    #[serde(rename = "DRIVERLICENSENUM")]
    DriverLicenseNumber,
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "GIVENNAME")]
    GivenName,
    #[serde(rename = "IDCARDNUM")]
    IdCardNumber,
    #[serde(rename = "PASSWORD")]
    Password,
    #[serde(rename = "SOCIALNUM")]
    SocialSecurityNumber,
    #[serde(rename = "STREET")]
    Street,
    #[serde(rename = "SURNAME")]
    Surname,
    #[serde(rename = "TAXNUM")]
    TaxNumber,
    #[serde(rename = "TELEPHONENUM")]
    TelephoneNumber,
    #[serde(rename = "USERNAME")]
    Username,
    #[serde(rename = "ZIPCODE")]
    ZipCode,
}

impl PiiCategory {
    /// Parse a classifier entity label into a PII category.
    ///
    /// Returns `None` for labels outside the PII enumeration, which the
    /// pipeline treats as "no PII detected" for that entity.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "ACCOUNTNUM" => Some(Self::AccountNumber),
            "BUILDINGNUM" => Some(Self::BuildingNumber),
            "CITY" => Some(Self::City),
            "CREDITCARDNUMBER" => Some(Self::CreditCardNumber),
            "DATEOFBIRTH" => Some(Self::DateOfBirth),
            "DRIVERLICENSENUM" => Some(Self::DriverLicenseNumber),
            "EMAIL" => Some(Self::Email),
            "GIVENNAME" => Some(Self::GivenName),
            "IDCARDNUM" => Some(Self::IdCardNumber),
            "PASSWORD" => Some(Self::Password),
            "SOCIALNUM" => Some(Self::SocialSecurityNumber),
            "STREET" => Some(Self::Street),
            "SURNAME" => Some(Self::Surname),
            "TAXNUM" => Some(Self::TaxNumber),
            "TELEPHONENUM" => Some(Self::TelephoneNumber),
            "USERNAME" => Some(Self::Username),
            "ZIPCODE" => Some(Self::ZipCode),
            _ => None,
        }
    }

    /// Wire label for this category
    pub fn label(&self) -> &'static str {
        match self {
            Self::AccountNumber => "ACCOUNTNUM",
            Self::BuildingNumber => "BUILDINGNUM",
            Self::City => "CITY",
            Self::CreditCardNumber => "CREDITCARDNUMBER",
            Self::DateOfBirth => "DATEOFBIRTH",
            Self::DriverLicenseNumber => "DRIVERLICENSENUM",
            Self::Email => "EMAIL",
            Self::GivenName => "GIVENNAME",
            Self::IdCardNumber => "IDCARDNUM",
            Self::Password => "PASSWORD",
            Self::SocialSecurityNumber => "SOCIALNUM",
            Self::Street => "STREET",
            Self::Surname => "SURNAME",
            Self::TaxNumber => "TAXNUM",
            Self::TelephoneNumber => "TELEPHONENUM",
            Self::Username => "USERNAME",
            Self::ZipCode => "ZIPCODE",
        }
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Harm categories returned by the content-moderation oracle.
///
/// Labels follow the upstream text-moderation model's short codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HarmCategory {
    /// Benign content
    #[serde(rename = "OK")]
    #[default]
    Ok,
    /// Sexual content
    #[serde(rename = "S")]
    Sexual,
    /// Hate speech
    #[serde(rename = "H")]
    Hate,
    /// Violence
    #[serde(rename = "V")]
    Violence,
    /// Harassment
    #[serde(rename = "HR")]
    Harassment,
    /// Self-harm
    #[serde(rename = "SH")]
    SelfHarm,
    /// Sexual content involving minors
    #[serde(rename = "S3")]
    SexualMinors,
    /// Threatening hate speech
    #[serde(rename = "H2")]
    HateThreatening,
    /// Graphic violence
    #[serde(rename = "V2")]
    ViolenceGraphic,
}

impl HarmCategory {
    /// Parse a classifier label into a harm category
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "OK" => Some(Self::Ok),
            "S" => Some(Self::Sexual),
            "H" => Some(Self::Hate),
            "V" => Some(Self::Violence),
            "HR" => Some(Self::Harassment),
            "SH" => Some(Self::SelfHarm),
            "S3" => Some(Self::SexualMinors),
            "H2" => Some(Self::HateThreatening),
            "V2" => Some(Self::ViolenceGraphic),
            _ => None,
        }
    }

    /// Wire label for this category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Sexual => "S",
            Self::Hate => "H",
            Self::Violence => "V",
            Self::Harassment => "HR",
            Self::SelfHarm => "SH",
            Self::SexualMinors => "S3",
            Self::HateThreatening => "H2",
            Self::ViolenceGraphic => "V2",
        }
    }
}

impl std::fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Remedial actions a moderation run can recommend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Warning,
    Mute,
    Kick,
    Ban,
    DeleteMessage,
    AccountRestriction,
}

/// The chosen remedial action plus a human-readable justification.
///
/// Also the structured output contract for the moderation-action judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModAction {
    /// The action to take
    pub action: ActionKind,

    /// Why this action was chosen
    pub reason: String,
}

impl ModAction {
    /// Create a new moderation action
    pub fn new(action: ActionKind, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }
}

/// Community actions the intent judge can classify a message as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunityAction {
    // Positive actions
    Encouragement,
    HelpfulAdvice,
    WelcomeNewcomer,
    TeamCoordination,
    Appreciation,
    Celebration,
    KnowledgeSharing,
    // Negative actions
    Trolling,
    Griefing,
    Spamming,
    Exclusion,
    Bragging,
    ArgumentStarting,
    Bullying,
    ShowOff,
    PutDown,
}

impl CommunityAction {
    /// Whether this action benefits the community (earns points) rather
    /// than harming it (loses points)
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Self::Encouragement
                | Self::HelpfulAdvice
                | Self::WelcomeNewcomer
                | Self::TeamCoordination
                | Self::Appreciation
                | Self::Celebration
                | Self::KnowledgeSharing
        )
    }

    /// Wire label for this action
    pub fn label(&self) -> &'static str {
        match self {
            Self::Encouragement => "ENCOURAGEMENT",
            Self::HelpfulAdvice => "HELPFUL_ADVICE",
            Self::WelcomeNewcomer => "WELCOME_NEWCOMER",
            Self::TeamCoordination => "TEAM_COORDINATION",
            Self::Appreciation => "APPRECIATION",
            Self::Celebration => "CELEBRATION",
            Self::KnowledgeSharing => "KNOWLEDGE_SHARING",
            Self::Trolling => "TROLLING",
            Self::Griefing => "GRIEFING",
            Self::Spamming => "SPAMMING",
            Self::Exclusion => "EXCLUSION",
            Self::Bragging => "BRAGGING",
            Self::ArgumentStarting => "ARGUMENT_STARTING",
            Self::Bullying => "BULLYING",
            Self::ShowOff => "SHOW_OFF",
            Self::PutDown => "PUT_DOWN",
        }
    }
}

impl std::fmt::Display for CommunityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Community intent classification for a message.
///
/// Invariant: `reason` is present only when `intent` is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityIntent {
    /// Classified action, or `None` when no clear intent was detected
    #[serde(default)]
    pub intent: Option<CommunityAction>,

    /// Explanation for the classification
    #[serde(default)]
    pub reason: Option<String>,
}

impl CommunityIntent {
    /// Drop any reason that arrived without an intent, restoring the
    /// intent/reason invariant when the judge violates it
    pub fn normalized(mut self) -> Self {
        if self.intent.is_none() {
            self.reason = None;
        }
        self
    }
}

/// A single label/confidence pair from a classifier response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    /// Raw category label as returned by the classifier
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f64,
}

impl LabelScore {
    /// Create a new label/score pair
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Three-way sentiment label distribution.
///
/// Missing labels default their probability to zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentScores {
    /// The documented fallback distribution when the sentiment oracle
    /// fails: all confidence mass on neutral, yielding score 0
    pub fn all_neutral() -> Self {
        Self {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
        }
    }
}
