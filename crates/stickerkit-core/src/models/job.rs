use chrono::Utc;
use uuid::Uuid;

/// Generate a unique file stem for one conversion job.
///
/// Format: `{base}_{unix_millis}_{uuid}`. The timestamp keeps names sortable, the
/// 128-bit random part keeps concurrent jobs from colliding.
pub fn generate_job_id(base: &str) -> String {
    format!(
        "{}_{}_{}",
        base,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_job_id_format() {
        let id = generate_job_id("video");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "video");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 32);
    }

    #[test]
    fn test_job_ids_are_unique() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_job_id("gif")).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
