use crate::models::{ActivityRecord, AdviceRecord, DogImageRecord};
use crate::store::traits::{SqlParam, Statement, Upsert};

pub const ADVICE_TABLE: &str = "advice_quotes";
pub const ACTIVITY_TABLE: &str = "activities";
pub const DOG_IMAGE_TABLE: &str = "dog_images";

pub const UPSERT_ADVICE: &str = r#"
INSERT INTO advice_quotes (advice_id, advice_text, fetched_at)
VALUES ($1, $2, $3)
ON CONFLICT (advice_id) DO NOTHING
"#;

pub const UPSERT_ACTIVITY: &str = r#"
INSERT INTO activities (activity_key, activity, type, participants, price, accessibility, fetched_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (activity_key) DO NOTHING
"#;

pub const UPSERT_DOG_IMAGE: &str = r#"
INSERT INTO dog_images (breed, image_url, fetched_at)
VALUES ($1, $2, $3)
ON CONFLICT (image_url) DO NOTHING
"#;

impl Upsert for AdviceRecord {
    fn table(&self) -> &'static str {
        ADVICE_TABLE
    }

    fn upsert(&self) -> Statement {
        Statement {
            sql: UPSERT_ADVICE,
            params: vec![
                SqlParam::I64(self.advice_id),
                SqlParam::String(self.advice_text.clone()),
                SqlParam::Timestamp(self.fetched_at),
            ],
        }
    }
}

impl Upsert for ActivityRecord {
    fn table(&self) -> &'static str {
        ACTIVITY_TABLE
    }

    fn upsert(&self) -> Statement {
        Statement {
            sql: UPSERT_ACTIVITY,
            params: vec![
                SqlParam::I64(self.activity_key),
                SqlParam::String(self.activity.clone()),
                SqlParam::String(self.activity_type.clone()),
                SqlParam::I32(self.participants),
                SqlParam::F64(self.price),
                SqlParam::F64(self.accessibility),
                SqlParam::Timestamp(self.fetched_at),
            ],
        }
    }
}

impl Upsert for DogImageRecord {
    fn table(&self) -> &'static str {
        DOG_IMAGE_TABLE
    }

    fn upsert(&self) -> Statement {
        Statement {
            sql: UPSERT_DOG_IMAGE,
            params: vec![
                SqlParam::String(self.breed.clone()),
                SqlParam::String(self.image_url.clone()),
                SqlParam::Timestamp(self.fetched_at),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn placeholder_count(sql: &str) -> usize {
        (1..=16).filter(|i| sql.contains(&format!("${i}"))).count()
    }

    #[test]
    fn advice_upsert_targets_natural_key() {
        let now = Utc::now();
        let stmt = AdviceRecord {
            advice_id: 7,
            advice_text: "Floss".to_string(),
            fetched_at: now,
        }
        .upsert();
        assert!(stmt.sql.contains("ON CONFLICT (advice_id) DO NOTHING"));
        assert_eq!(placeholder_count(stmt.sql), stmt.params.len());
        assert_eq!(stmt.params[0], SqlParam::I64(7));
        assert_eq!(stmt.params[2], SqlParam::Timestamp(now));
    }

    #[test]
    fn activity_upsert_binds_every_column() {
        let stmt = ActivityRecord {
            activity_key: 42,
            activity: "Read".to_string(),
            activity_type: "Quote by Someone".to_string(),
            participants: 1,
            price: 0.0,
            accessibility: 0.0,
            fetched_at: Utc::now(),
        }
        .upsert();
        assert!(stmt.sql.contains("ON CONFLICT (activity_key) DO NOTHING"));
        assert_eq!(placeholder_count(stmt.sql), 7);
        assert_eq!(stmt.params.len(), 7);
        assert_eq!(stmt.params[3], SqlParam::I32(1));
    }

    #[test]
    fn dog_image_upsert_is_keyed_by_url() {
        let rec = DogImageRecord {
            breed: "Beagle".to_string(),
            image_url: "https://images.dog.ceo/breeds/beagle/1.jpg".to_string(),
            fetched_at: Utc::now(),
        };
        let stmt = rec.upsert();
        assert_eq!(rec.table(), DOG_IMAGE_TABLE);
        assert!(stmt.sql.contains("ON CONFLICT (image_url) DO NOTHING"));
        assert_eq!(
            stmt.params[1],
            SqlParam::String("https://images.dog.ceo/breeds/beagle/1.jpg".to_string())
        );
    }
}
