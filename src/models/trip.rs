//! Trip model and the add-trip form.

use super::Comment;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::PathBuf;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum number of media files attached to one trip.
pub const MAX_TRIP_MEDIA: usize = 10;

/// A logged trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Trip {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    /// Owner's username; present on feed and city listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub city: String,
    pub country: String,
    #[serde(with = "crate::time_utils::flexible_date")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub start_date: NaiveDate,
    #[serde(with = "crate::time_utils::flexible_date")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default)]
    pub favorite_restaurants: Option<String>,
    #[serde(default)]
    pub favorite_attractions: Option<String>,
    #[serde(default)]
    pub other_notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number[] | number"))]
    pub likes: Likes,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Trip {
    pub fn like_count(&self) -> usize {
        self.likes.count()
    }

    pub fn is_liked_by(&self, user_id: u64) -> bool {
        self.likes.contains(user_id)
    }

    pub fn is_owned_by(&self, user_id: u64) -> bool {
        self.user_id == user_id
    }

    /// URL of the cover photo, if the trip has any photos.
    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(|p| p.url.as_str())
    }
}

/// Trip photo reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct Photo {
    pub url: String,
}

/// The set of users who liked a trip.
///
/// Older backends report likes as a bare count. Those likes are kept as
/// `unattributed` so the total still renders, but cannot be toggled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Likes {
    users: BTreeSet<u64>,
    unattributed: u32,
}

impl Likes {
    pub fn count(&self) -> usize {
        self.users.len() + self.unattributed as usize
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.users.contains(&user_id)
    }

    /// Flip `user_id`'s membership. Returns true if the user now likes the trip.
    pub fn toggle(&mut self, user_id: u64) -> bool {
        if self.users.remove(&user_id) {
            false
        } else {
            self.users.insert(user_id);
            true
        }
    }

    pub fn user_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.users.iter().copied()
    }
}

impl FromIterator<u64> for Likes {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
            unattributed: 0,
        }
    }
}

/// Likes with unattributed entries serialize as a bare count, since a list
/// of ids cannot represent them.
impl Serialize for Likes {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if self.unattributed > 0 {
            s.serialize_u64(self.count() as u64)
        } else {
            s.collect_seq(self.users.iter())
        }
    }
}

impl<'de> Deserialize<'de> for Likes {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Users(Vec<u64>),
            Count(u32),
        }

        Ok(match Repr::deserialize(d)? {
            Repr::Users(ids) => ids.into_iter().collect(),
            Repr::Count(unattributed) => Likes {
                users: BTreeSet::new(),
                unattributed,
            },
        })
    }
}

/// Add-trip form contents, validated before submission.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_trip_dates", skip_on_field_errors = true))]
pub struct NewTrip {
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,
    #[validate(required(message = "End date is required"))]
    pub end_date: Option<NaiveDate>,
    pub accommodation: String,
    pub favorite_restaurants: String,
    pub favorite_attractions: String,
    pub other_notes: String,
    /// Local files uploaded as trip photos
    #[validate(length(max = 10, message = "At most 10 media files can be attached"))]
    pub media: Vec<PathBuf>,
}

fn validate_trip_dates(trip: &NewTrip) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (trip.start_date, trip.end_date) {
        if end < start {
            return Err(ValidationError::new("date_order")
                .with_message("End date must not be before start date".into()));
        }
    }
    Ok(())
}

impl NewTrip {
    /// Text fields as `(form field, value)` pairs, trimmed.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
        vec![
            ("city", self.city.trim().to_string()),
            ("country", self.country.trim().to_string()),
            ("start_date", date(self.start_date).unwrap_or_default()),
            ("end_date", date(self.end_date).unwrap_or_default()),
            ("accommodation", self.accommodation.trim().to_string()),
            (
                "favorite_restaurants",
                self.favorite_restaurants.trim().to_string(),
            ),
            (
                "favorite_attractions",
                self.favorite_attractions.trim().to_string(),
            ),
            ("other_notes", self.other_notes.trim().to_string()),
        ]
    }
}
