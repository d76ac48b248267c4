//! Recipient and roster models.
//!
//! A [`Roster`] keeps recipients in the order they were read. That order is the
//! stable iteration order used by every stage that walks recipients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Most hours one recipient can log in a period.
pub const MAX_HOURS: u32 = 10_000;

/// A person sharing in the tip pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Display name, unique within a roster.
    pub name: String,
    /// Hours worked during the period.
    pub hours: Decimal,
}

impl Recipient {
    /// Creates a recipient.
    pub fn new(name: impl Into<String>, hours: Decimal) -> Self {
        Self {
            name: name.into(),
            hours,
        }
    }
}

/// An ordered set of recipients with unique names.
///
/// # Example
///
/// ```
/// use tip_engine::models::{Recipient, Roster};
/// use rust_decimal::Decimal;
///
/// let roster = Roster::new(vec![
///     Recipient::new("Alice", Decimal::from(5)),
///     Recipient::new("Bob", Decimal::from(3)),
/// ])
/// .unwrap();
/// assert_eq!(roster.total_hours(), Decimal::from(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Recipient>", into = "Vec<Recipient>")]
pub struct Roster {
    recipients: Vec<Recipient>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate names and hours that are negative
    /// or above [`MAX_HOURS`].
    pub fn new(recipients: Vec<Recipient>) -> EngineResult<Self> {
        let max_hours = Decimal::from(MAX_HOURS);
        for (i, recipient) in recipients.iter().enumerate() {
            if recipient.hours < Decimal::ZERO {
                return Err(EngineError::InvalidRecipient {
                    name: recipient.name.clone(),
                    message: format!("hours cannot be negative ({})", recipient.hours),
                });
            }
            if recipient.hours > max_hours {
                return Err(EngineError::InvalidRecipient {
                    name: recipient.name.clone(),
                    message: format!(
                        "{} hours is more than the {} hour limit",
                        recipient.hours, MAX_HOURS
                    ),
                });
            }
            if recipients[..i].iter().any(|r| r.name == recipient.name) {
                return Err(EngineError::InvalidRecipient {
                    name: recipient.name.clone(),
                    message: "name appears more than once".to_string(),
                });
            }
        }
        Ok(Self { recipients })
    }

    /// Recipients in roster order.
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Iterates recipients in roster order.
    pub fn iter(&self) -> std::slice::Iter<'_, Recipient> {
        self.recipients.iter()
    }

    /// Number of recipients.
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    /// Returns true if the roster has no recipients.
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Sum of everyone's hours.
    ///
    /// Every recipient is capped at [`MAX_HOURS`], so the sum stays far inside
    /// the range of `Decimal`.
    pub fn total_hours(&self) -> Decimal {
        self.recipients.iter().map(|r| r.hours).sum()
    }

    /// Position of a recipient by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.recipients.iter().position(|r| r.name == name)
    }
}

impl TryFrom<Vec<Recipient>> for Roster {
    type Error = EngineError;

    fn try_from(recipients: Vec<Recipient>) -> EngineResult<Self> {
        Roster::new(recipients)
    }
}

impl From<Roster> for Vec<Recipient> {
    fn from(roster: Roster) -> Self {
        roster.recipients
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Recipient;
    type IntoIter = std::slice::Iter<'a, Recipient>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipients.iter()
    }
}
