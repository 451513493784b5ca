//! Personal information records and their nested place of residence.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use super::identity::IdentityId;
use super::ownership::{OwnedResource, ResourceId};

/// Minimum length of a first or last name.
pub const NAME_MIN: usize = 2;
/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 50;

/// Validation errors for personal information fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonInformationValidationError {
    #[error("{field} must be between {min} and {max} characters", min = NAME_MIN, max = NAME_MAX)]
    NameLength { field: &'static str },
    #[error("{field} may only contain letters")]
    NameCharacters { field: &'static str },
    #[error("gender must be either 'Male' or 'Female'")]
    UnknownGender,
    #[error("birthday must look like DD-MM-YYYY")]
    Birthday,
    #[error("personal code must be 11 digits with a valid month and day")]
    PersonalCode,
    #[error("phone number must not be empty")]
    EmptyPhoneNumber,
    #[error("email address is not valid")]
    Email,
    #[error("{field} must not be empty")]
    EmptyAddressField { field: &'static str },
    #[error("{field} must be a positive number")]
    AddressNumber { field: &'static str },
}

impl PersonInformationValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength { field }
            | Self::NameCharacters { field }
            | Self::EmptyAddressField { field }
            | Self::AddressNumber { field } => field,
            Self::UnknownGender => "gender",
            Self::Birthday => "birthday",
            Self::PersonalCode => "personalCode",
            Self::EmptyPhoneNumber => "phoneNumber",
            Self::Email => "email",
        }
    }

    /// Machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameLength { .. } => "length",
            Self::NameCharacters { .. } => "characters",
            Self::EmptyPhoneNumber | Self::EmptyAddressField { .. } => "empty",
            Self::AddressNumber { .. } => "range",
            Self::UnknownGender | Self::Birthday | Self::PersonalCode | Self::Email => "format",
        }
    }
}

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|error| panic!("pattern {pattern} failed to compile: {error}"))
    })
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static BIRTHDAY_RE: OnceLock<Regex> = OnceLock::new();
static PERSONAL_CODE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

// Values are output-only; the only way in is each type's validating `new`.
macro_rules! string_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = String)]
        pub struct $name(String);

        impl $name {
            /// Borrow the value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value!(
    /// First or last name: 2–50 ASCII letters.
    PersonName
);
string_value!(
    /// Birthday as `DD-MM-YYYY`, separated by `-`, `/`, `.` or a space.
    Birthday
);
string_value!(
    /// Eleven-digit personal code with an embedded month and day.
    PersonalCode
);
string_value!(
    /// Contact phone number.
    PhoneNumber
);
string_value!(
    /// Contact email address.
    ///
    /// Only [`Email::new`] constructs one; raw JSON does not deserialise:
    /// ```compile_fail
    /// let _: persona::domain::Email = serde_json::from_str("\"not-an-email\"").unwrap();
    /// ```
    Email
);

impl PersonName {
    /// Validate a name for the given request field.
    pub fn new(value: &str, field: &'static str) -> Result<Self, PersonInformationValidationError> {
        let length = value.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&length) {
            return Err(PersonInformationValidationError::NameLength { field });
        }
        if !compiled(&NAME_RE, "^[a-zA-Z]*$").is_match(value) {
            return Err(PersonInformationValidationError::NameCharacters { field });
        }
        Ok(Self(value.to_owned()))
    }
}

impl Birthday {
    /// Validate a birthday string.
    pub fn new(value: &str) -> Result<Self, PersonInformationValidationError> {
        let pattern = r"^(0[1-9]|[12][0-9]|3[01])[- /.](0[1-9]|1[012])[- /.](19|20)\d\d$";
        if compiled(&BIRTHDAY_RE, pattern).is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(PersonInformationValidationError::Birthday)
        }
    }
}

impl PersonalCode {
    /// Validate a personal code.
    pub fn new(value: &str) -> Result<Self, PersonInformationValidationError> {
        let pattern = "^[0-9][0-9]{2}(0[1-9]|1[0-2])(0[1-9]|[1-2][0-9]|3[0-1])[0-9]{4}$";
        if compiled(&PERSONAL_CODE_RE, pattern).is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(PersonInformationValidationError::PersonalCode)
        }
    }
}

impl PhoneNumber {
    /// Accept any non-blank phone number.
    pub fn new(value: &str) -> Result<Self, PersonInformationValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PersonInformationValidationError::EmptyPhoneNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl Email {
    /// Validate an email address.
    pub fn new(value: &str) -> Result<Self, PersonInformationValidationError> {
        let pattern = r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$";
        if compiled(&EMAIL_RE, pattern).is_match(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(PersonInformationValidationError::Email)
        }
    }
}

/// Gender recorded on a personal information record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse the exact labels `Male` or `Female`.
    pub fn parse(value: &str) -> Result<Self, PersonInformationValidationError> {
        match value {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => Err(PersonInformationValidationError::UnknownGender),
        }
    }
}

/// Address nested inside a personal information record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOfResidence {
    city: String,
    street: String,
    house_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    apartment_number: Option<u32>,
}

impl PlaceOfResidence {
    /// Validate an address.
    pub fn new(
        city: &str,
        street: &str,
        house_number: u32,
        apartment_number: Option<u32>,
    ) -> Result<Self, PersonInformationValidationError> {
        let city = non_blank(city, "city")?;
        let street = non_blank(street, "street")?;
        if house_number == 0 {
            return Err(PersonInformationValidationError::AddressNumber {
                field: "houseNumber",
            });
        }
        if apartment_number == Some(0) {
            return Err(PersonInformationValidationError::AddressNumber {
                field: "apartmentNumber",
            });
        }
        Ok(Self {
            city,
            street,
            house_number,
            apartment_number,
        })
    }

    /// City.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Street.
    pub fn street(&self) -> &str {
        &self.street
    }

    /// House number.
    pub fn house_number(&self) -> u32 {
        self.house_number
    }

    /// Apartment number, when the address has one.
    pub fn apartment_number(&self) -> Option<u32> {
        self.apartment_number
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, PersonInformationValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(PersonInformationValidationError::EmptyAddressField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Validated field values for creating or replacing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInformationDraft {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub gender: Gender,
    pub birthday: Birthday,
    pub personal_code: PersonalCode,
    pub phone_number: PhoneNumber,
    pub email: Email,
    pub place_of_residence: PlaceOfResidence,
}

/// A personal information record owned by one identity.
///
/// The owner id is never serialised; clients only see the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonInformation {
    id: ResourceId,
    #[serde(skip)]
    owner_id: IdentityId,
    first_name: PersonName,
    last_name: PersonName,
    gender: Gender,
    birthday: Birthday,
    personal_code: PersonalCode,
    phone_number: PhoneNumber,
    email: Email,
    place_of_residence: PlaceOfResidence,
}

impl PersonInformation {
    /// First name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Gender.
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Nested address.
    pub fn place_of_residence(&self) -> &PlaceOfResidence {
        &self.place_of_residence
    }
}

impl OwnedResource for PersonInformation {
    type Draft = PersonInformationDraft;

    const KIND: &'static str = "person information";

    fn id(&self) -> ResourceId {
        self.id
    }

    fn owner_id(&self) -> IdentityId {
        self.owner_id
    }

    fn from_draft(id: ResourceId, owner: IdentityId, draft: Self::Draft) -> Self {
        let PersonInformationDraft {
            first_name,
            last_name,
            gender,
            birthday,
            personal_code,
            phone_number,
            email,
            place_of_residence,
        } = draft;
        Self {
            id,
            owner_id: owner,
            first_name,
            last_name,
            gender,
            birthday,
            personal_code,
            phone_number,
            email,
            place_of_residence,
        }
    }

    fn apply(self, draft: Self::Draft) -> Self {
        Self::from_draft(self.id, self.owner_id, draft)
    }
}
