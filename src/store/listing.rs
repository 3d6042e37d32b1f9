/// Bucket listing and date-label derivation
///
/// A snapshot is stored as `<prefix><YYYY-MM-DD>.png`. Listing the bucket
/// yields the set of dates that have a snapshot; the labels double as the
/// key fragments used to download them later.
use aws_sdk_s3::Client;
use chrono::NaiveDate;

use super::StoreError;

/// File suffix shared by every snapshot object
const SNAPSHOT_SUFFIX: &str = ".png";

/// List the snapshot dates under `prefix`, newest first.
///
/// Continuation tokens are followed until the listing is exhausted, so
/// buckets larger than one listing page are fully covered. An empty bucket
/// (or prefix with no matches) yields an empty vector, not an error.
pub async fn list_dates(
    client: &Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<String>, StoreError> {
    let mut labels = Vec::new();
    let mut continuation: Option<String> = None;

    loop {
        let mut request = client.list_objects_v2().bucket(bucket).prefix(prefix);
        if let Some(token) = continuation.take() {
            request = request.continuation_token(token);
        }

        let page = request
            .send()
            .await
            .map_err(|e| StoreError::List(e.to_string()))?;

        for object in page.contents() {
            let Some(key) = object.key() else { continue };

            if let Some(label) = date_label(key, prefix) {
                if NaiveDate::parse_from_str(&label, "%Y-%m-%d").is_err() {
                    eprintln!("⚠️  Key {} does not look like a dated snapshot", key);
                }
                labels.push(label);
            }
        }

        match page.next_continuation_token() {
            Some(token) => continuation = Some(token.to_string()),
            None => break,
        }
    }

    sort_newest_first(&mut labels);
    Ok(labels)
}

/// Derive a date label from an object key.
///
/// Returns `None` for keys outside the prefix or without the snapshot
/// suffix (pseudo-folder markers, stray uploads).
pub fn date_label(key: &str, prefix: &str) -> Option<String> {
    let label = key.strip_prefix(prefix)?.strip_suffix(SNAPSHOT_SUFFIX)?;
    if label.is_empty() {
        return None;
    }
    Some(label.to_string())
}

/// Rebuild the object key for a date label. Exact inverse of `date_label`.
pub fn object_key(label: &str, prefix: &str) -> String {
    format!("{prefix}{label}{SNAPSHOT_SUFFIX}")
}

/// Sort labels so the most recent date comes first.
///
/// Descending lexical order matches descending chronological order because
/// the labels are zero-padded ISO dates.
fn sort_newest_first(labels: &mut [String]) {
    labels.sort_unstable_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_strips_prefix_and_suffix() {
        assert_eq!(
            date_label("truecolor/2024-03-15.png", "truecolor/"),
            Some("2024-03-15".to_string())
        );
        assert_eq!(
            date_label("2024-03-15.png", ""),
            Some("2024-03-15".to_string())
        );
    }

    #[test]
    fn test_label_skips_foreign_keys() {
        // Wrong prefix, wrong suffix, and a bare pseudo-folder marker
        assert_eq!(date_label("archive/2024-03-15.png", "truecolor/"), None);
        assert_eq!(date_label("2024-03-15.jpg", ""), None);
        assert_eq!(date_label("truecolor/.png", "truecolor/"), None);
    }

    #[test]
    fn test_object_key_round_trip() {
        let prefix = "truecolor/";
        let key = "truecolor/2023-12-31.png";

        let label = date_label(key, prefix).unwrap();
        assert_eq!(object_key(&label, prefix), key);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut labels = vec![
            "2024-01-01".to_string(),
            "2024-03-15".to_string(),
            "2023-12-31".to_string(),
        ];

        sort_newest_first(&mut labels);

        assert_eq!(labels, ["2024-03-15", "2024-01-01", "2023-12-31"]);
    }

    #[tokio::test]
    async fn test_list_without_region_is_an_error() {
        // The stub client cannot build a request; the failure must come back
        // as a value the UI can show, never a panic.
        let client = crate::store::test_client();
        let result = list_dates(&client, "penage-true-color-images", "").await;

        assert!(matches!(result, Err(StoreError::List(_))));
    }
}
