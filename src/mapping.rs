//! Airtable record → typed entity mapping.
//!
//! Mapping never fails: every field has a fallback, so a malformed cell
//! degrades that one attribute instead of the whole read. Field access goes
//! through [`FieldReader`], one accessor per field class (text, timestamp,
//! counter, tag list), applied uniformly to leads, messages and posts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

use crate::airtable::RawRecord;
use crate::types::{Engagement, Lead, LeadStatus, Message, Post};

/// Airtable column names.
pub mod fields {
    pub const LEAD_CUSTOM_ID: &str = "ID";
    pub const LEAD_NAME: &str = "Name";
    pub const LEAD_EMAIL: &str = "Email";
    pub const LEAD_COMPANY: &str = "Company";
    pub const LEAD_OWNER: &str = "Owner";
    pub const LEAD_LINKEDIN: &str = "LinkedIn";
    pub const LEAD_PROFILE_PIC: &str = "Profile Pic";
    pub const LEAD_STATUS: &str = "Status";
    pub const LEAD_CREATED: &str = "Created";

    pub const MESSAGE_CONTENT: &str = "Content";
    pub const MESSAGE_RECIPIENT: &str = "Recipient";
    pub const MESSAGE_CREATED: &str = "Created";

    pub const POST_TITLE: &str = "Title";
    pub const POST_CONTENT: &str = "Content";
    pub const POST_AUTHOR: &str = "Author";
    pub const POST_PUBLISHED_AT: &str = "Published At";
    pub const POST_LINKEDIN_URL: &str = "LinkedIn URL";
    pub const POST_LIKES: &str = "Likes";
    pub const POST_COMMENTS: &str = "Comments";
    pub const POST_SHARES: &str = "Shares";
    pub const POST_TAGS: &str = "Tags";
    pub const POST_LEAD_ID: &str = "Lead ID";
}

/// Render a timestamp the way the dashboard front end expects (`...T..:..:..sssZ`).
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the date shapes Airtable produces for date, date-time and
/// created-time columns. Naive values are read as UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        // Epoch milliseconds.
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Typed, never-failing accessors over one record's fields.
pub struct FieldReader<'a> {
    record: &'a RawRecord,
    now: DateTime<Utc>,
}

impl<'a> FieldReader<'a> {
    /// `now` is substituted for missing or unparseable timestamps.
    pub fn new(record: &'a RawRecord, now: DateTime<Utc>) -> Self {
        Self { record, now }
    }

    /// Non-empty text; numbers and booleans are rendered as text.
    pub fn optional_text(&self, field: &str) -> Option<String> {
        match self.record.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> String {
        self.optional_text(field).unwrap_or_default()
    }

    /// Plain URL text, or the first entry of an attachment column.
    pub fn url(&self, field: &str) -> Option<String> {
        if let Some(Value::Array(items)) = self.record.get(field) {
            return items.iter().find_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("url")
                    .and_then(|u| u.as_str())
                    .filter(|u| !u.is_empty())
                    .map(str::to_string),
                _ => None,
            });
        }
        self.optional_text(field)
    }

    pub fn timestamp(&self, field: &str) -> String {
        let parsed = self.record.get(field).and_then(|value| {
            let ts = parse_timestamp(value);
            if ts.is_none() {
                log::debug!(
                    "record {}: unparseable {} value {}, using current time",
                    self.record.id,
                    field,
                    value
                );
            }
            ts
        });
        format_timestamp(parsed.unwrap_or(self.now))
    }

    /// Non-negative counter; anything that is not a number reads as 0.
    pub fn count(&self, field: &str) -> u64 {
        match self.record.get(field) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
            _ => 0,
        }
    }

    /// Comma-separated text or a multiple-select list, trimmed, empties dropped.
    /// `None` when the column yields no tags.
    pub fn tags(&self, field: &str) -> Option<Vec<String>> {
        let tags: Vec<String> = match self.record.get(field)? {
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => return None,
        };
        if tags.is_empty() {
            None
        } else {
            Some(tags)
        }
    }

    /// Unknown or missing values become `New`.
    pub fn status(&self, field: &str) -> LeadStatus {
        match self.record.get(field) {
            Some(Value::String(s)) if !s.is_empty() => {
                LeadStatus::from_stored(s).unwrap_or_else(|| {
                    log::warn!(
                        "record {}: unknown lead status {:?}, treating as New",
                        self.record.id,
                        s
                    );
                    LeadStatus::New
                })
            }
            _ => LeadStatus::New,
        }
    }
}

// ============================================================================
// Entity mappers
// ============================================================================

pub fn lead_from_record(record: &RawRecord, now: DateTime<Utc>) -> Lead {
    let f = FieldReader::new(record, now);
    Lead {
        id: record.id.clone(),
        custom_id: f
            .optional_text(fields::LEAD_CUSTOM_ID)
            .unwrap_or_else(|| record.id.clone()),
        name: f.text(fields::LEAD_NAME),
        email: f.text(fields::LEAD_EMAIL),
        company: f.optional_text(fields::LEAD_COMPANY),
        owner: f.optional_text(fields::LEAD_OWNER),
        linkedin: f.optional_text(fields::LEAD_LINKEDIN),
        profile_pic: f.url(fields::LEAD_PROFILE_PIC),
        status: f.status(fields::LEAD_STATUS),
        created_at: f.timestamp(fields::LEAD_CREATED),
    }
}

pub fn message_from_record(record: &RawRecord, now: DateTime<Utc>) -> Message {
    let f = FieldReader::new(record, now);
    Message {
        id: record.id.clone(),
        content: f.text(fields::MESSAGE_CONTENT),
        recipient: f.text(fields::MESSAGE_RECIPIENT),
        created_at: f.timestamp(fields::MESSAGE_CREATED),
    }
}

pub fn post_from_record(record: &RawRecord, now: DateTime<Utc>) -> Post {
    let f = FieldReader::new(record, now);
    Post {
        id: record.id.clone(),
        title: f.text(fields::POST_TITLE),
        content: f.text(fields::POST_CONTENT),
        author: f.text(fields::POST_AUTHOR),
        published_at: f.timestamp(fields::POST_PUBLISHED_AT),
        linkedin_url: f.url(fields::POST_LINKEDIN_URL),
        engagement: Engagement::non_zero(
            f.count(fields::POST_LIKES),
            f.count(fields::POST_COMMENTS),
            f.count(fields::POST_SHARES),
        ),
        tags: f.tags(fields::POST_TAGS),
        lead_id: f.optional_text(fields::POST_LEAD_ID),
    }
}

/// Map a whole page with one shared "now", so fallbacks within a read agree.
pub fn map_records<T>(records: &[RawRecord], map: fn(&RawRecord, DateTime<Utc>) -> T) -> Vec<T> {
    let now = Utc::now();
    records.iter().map(|r| map(r, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> RawRecord {
        RawRecord {
            id: "recABC".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_lead_gets_every_default() {
        let before = Utc::now();
        let leads = map_records(&[record(json!({}))], lead_from_record);
        let lead = &leads[0];
        assert_eq!(lead.id, "recABC");
        assert_eq!(lead.custom_id, "recABC");
        assert_eq!(lead.name, "");
        assert_eq!(lead.email, "");
        assert_eq!(lead.company, None);
        assert_eq!(lead.owner, None);
        assert_eq!(lead.linkedin, None);
        assert_eq!(lead.profile_pic, None);
        assert_eq!(lead.status, LeadStatus::New);

        let created = DateTime::parse_from_rfc3339(&lead.created_at)
            .unwrap()
            .with_timezone(&Utc);
        assert!(created >= before - chrono::Duration::seconds(1));
        assert!(created <= Utc::now() + chrono::Duration::seconds(1));
    }

    #[test]
    fn lead_fields_are_copied() {
        let lead = lead_from_record(
            &record(json!({
                "ID": "L-9",
                "Name": "Grace Hopper",
                "Email": "grace@navy.mil",
                "Company": "USN",
                "Owner": "Sam",
                "LinkedIn": "https://linkedin.com/in/grace",
                "Profile Pic": [{ "id": "att1", "url": "https://cdn.example/grace.png" }],
                "Status": "Qualified",
                "Created": "2024-02-03T04:05:06.789Z"
            })),
            fixed_now(),
        );
        assert_eq!(lead.custom_id, "L-9");
        assert_eq!(lead.name, "Grace Hopper");
        assert_eq!(lead.company.as_deref(), Some("USN"));
        assert_eq!(lead.profile_pic.as_deref(), Some("https://cdn.example/grace.png"));
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.created_at, "2024-02-03T04:05:06.789Z");
    }

    #[test]
    fn numeric_custom_id_is_rendered_as_text() {
        let lead = lead_from_record(&record(json!({ "ID": 42 })), fixed_now());
        assert_eq!(lead.custom_id, "42");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let lead = lead_from_record(
            &record(json!({ "ID": "", "Company": "", "Status": "" })),
            fixed_now(),
        );
        assert_eq!(lead.custom_id, "recABC");
        assert_eq!(lead.company, None);
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn unknown_status_falls_back_to_new() {
        let lead = lead_from_record(&record(json!({ "Status": "Archived" })), fixed_now());
        assert_eq!(lead.status, LeadStatus::New);
        let lead = lead_from_record(&record(json!({ "Status": 3 })), fixed_now());
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn bad_date_uses_mapping_time() {
        let msg = message_from_record(
            &record(json!({ "Content": "hi", "Recipient": "L-1", "Created": "not a date" })),
            fixed_now(),
        );
        assert_eq!(msg.created_at, "2025-06-01T12:00:00.000Z");
        assert_eq!(msg.content, "hi");
        assert_eq!(msg.recipient, "L-1");
    }

    #[test]
    fn timestamp_shapes_normalize() {
        let now = fixed_now();
        let f_rec = record(json!({
            "a": "2024-05-06",
            "b": "2024-05-06T07:08:09",
            "c": "2024-05-06T09:08:09+02:00",
            "d": 1_700_000_000_000i64
        }));
        let f = FieldReader::new(&f_rec, now);
        assert_eq!(f.timestamp("a"), "2024-05-06T00:00:00.000Z");
        assert_eq!(f.timestamp("b"), "2024-05-06T07:08:09.000Z");
        assert_eq!(f.timestamp("c"), "2024-05-06T07:08:09.000Z");
        assert_eq!(f.timestamp("d"), "2023-11-14T22:13:20.000Z");
        assert_eq!(f.timestamp("missing"), "2025-06-01T12:00:00.000Z");
    }

    #[test]
    fn engagement_absent_when_counters_zero_or_unset() {
        let post = post_from_record(
            &record(json!({ "Likes": 0, "Comments": 0, "Shares": 0 })),
            fixed_now(),
        );
        assert_eq!(post.engagement, None);
        let post = post_from_record(&record(json!({})), fixed_now());
        assert_eq!(post.engagement, None);
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("engagement").is_none());
    }

    #[test]
    fn single_like_produces_engagement() {
        let post = post_from_record(&record(json!({ "Likes": 1 })), fixed_now());
        assert_eq!(
            post.engagement,
            Some(Engagement {
                likes: 1,
                comments: 0,
                shares: 0
            })
        );
    }

    #[test]
    fn malformed_counters_read_as_zero() {
        let post = post_from_record(
            &record(json!({ "Likes": "lots", "Comments": -4, "Shares": "7" })),
            fixed_now(),
        );
        assert_eq!(
            post.engagement,
            Some(Engagement {
                likes: 0,
                comments: 0,
                shares: 7
            })
        );
    }

    #[test]
    fn tags_split_trim_and_drop_empties() {
        let post = post_from_record(
            &record(json!({ "Tags": "ai, sales,  growth ," })),
            fixed_now(),
        );
        assert_eq!(
            post.tags,
            Some(vec!["ai".to_string(), "sales".to_string(), "growth".to_string()])
        );
    }

    #[test]
    fn tags_accept_multiple_select_and_omit_when_empty() {
        let post = post_from_record(
            &record(json!({ "Tags": [" b2b ", "", "saas"] })),
            fixed_now(),
        );
        assert_eq!(post.tags, Some(vec!["b2b".to_string(), "saas".to_string()]));

        let post = post_from_record(&record(json!({ "Tags": " , ," })), fixed_now());
        assert_eq!(post.tags, None);
        let post = post_from_record(&record(json!({ "Tags": 5 })), fixed_now());
        assert_eq!(post.tags, None);
    }

    #[test]
    fn post_defaults_and_references() {
        let post = post_from_record(
            &record(json!({
                "Author": "L-3",
                "Lead ID": "L-3",
                "LinkedIn URL": "https://linkedin.com/posts/1",
                "Published At": "2024-09-10T10:00:00.000Z"
            })),
            fixed_now(),
        );
        assert_eq!(post.title, "");
        assert_eq!(post.content, "");
        assert_eq!(post.author, "L-3");
        assert_eq!(post.lead_id.as_deref(), Some("L-3"));
        assert_eq!(post.linkedin_url.as_deref(), Some("https://linkedin.com/posts/1"));
        assert_eq!(post.published_at, "2024-09-10T10:00:00.000Z");
    }
}
