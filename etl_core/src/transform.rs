//! Pure transformers from raw API payloads to normalized records.
//!
//! A transformer either returns a fully populated record or `None`; it never
//! fills a missing required field with a default. `fetched_at` is stamped here.

use crate::models::{
    ActivityRecord, AdviceRecord, AdviceSlip, BoredActivity, DogImage, DogImageRecord,
    QuoteEntry, RawActivity,
};
use chrono::Utc;
use sha2::{Digest, Sha256};

/// Breed used when an image URL has no `breeds/<slug>` segment.
pub const UNKNOWN_BREED: &str = "Unknown";

pub fn transform_advice(raw: &AdviceSlip) -> Option<AdviceRecord> {
    let advice_id = raw.id?;
    let advice_text = non_blank(raw.advice.as_deref())?.trim().to_string();
    Some(AdviceRecord {
        advice_id,
        advice_text,
        fetched_at: Utc::now(),
    })
}

pub fn transform_activity(raw: &RawActivity) -> Option<ActivityRecord> {
    match raw {
        RawActivity::Quotes(entries) => transform_quote_to_activity(entries),
        RawActivity::Bored(activity) => transform_bored_activity(activity),
    }
}

/// Quotes carry no participant, price or accessibility data; those columns get
/// fixed defaults.
pub fn transform_quote_to_activity(entries: &[QuoteEntry]) -> Option<ActivityRecord> {
    let first = entries.first()?;
    let text = non_blank(first.q.as_deref())?;
    let author = non_blank(first.a.as_deref())?;
    Some(ActivityRecord {
        activity_key: content_key(text),
        activity: text.to_string(),
        activity_type: format!("Quote by {author}"),
        participants: 1,
        price: 0.0,
        accessibility: 0.0,
        fetched_at: Utc::now(),
    })
}

pub fn transform_bored_activity(raw: &BoredActivity) -> Option<ActivityRecord> {
    let key = non_blank(raw.key.as_deref())?;
    let activity = non_blank(raw.activity.as_deref())?;
    let kind = non_blank(raw.kind.as_deref())?;

    let participants = i32::try_from(raw.participants?).ok().filter(|p| *p >= 0)?;
    let price = raw.price.filter(|p| p.is_finite() && *p >= 0.0)?;
    let accessibility = raw
        .accessibility
        .filter(|a| (0.0..=1.0).contains(a))?;

    let activity_key = key
        .trim()
        .parse::<i64>()
        .unwrap_or_else(|_| content_key(key));

    Some(ActivityRecord {
        activity_key,
        activity: activity.to_string(),
        activity_type: kind.to_string(),
        participants,
        price,
        accessibility,
        fetched_at: Utc::now(),
    })
}

pub fn transform_dog_image(raw: &DogImage) -> Option<DogImageRecord> {
    let url = non_blank(raw.image_url.as_deref())?;
    Some(DogImageRecord {
        breed: extract_breed_from_url(url),
        image_url: url.to_string(),
        fetched_at: Utc::now(),
    })
}

/// Breed name from a dog image URL such as
/// `https://images.dog.ceo/breeds/husky-siberian/n02110185_1469.jpg`.
pub fn extract_breed_from_url(url: &str) -> String {
    let mut parts = url.split('/');
    let slug = parts
        .by_ref()
        .position(|p| p == "breeds")
        .and_then(|_| parts.next())
        .filter(|s| !s.is_empty());

    match slug {
        Some(slug) => title_case(&slug.replace('-', " ")),
        None => UNKNOWN_BREED.to_string(),
    }
}

/// Deterministic natural key for free text: the first 8 bytes of SHA-256 over
/// the trimmed text, as a non-negative i64.
pub fn content_key(text: &str) -> i64 {
    let digest = Sha256::digest(text.trim().as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(head) & i64::MAX
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.trim().is_empty())
}
