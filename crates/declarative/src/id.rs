//! Region-prefixed resource ids (`region:id`).

/// Prefix `id` with `region`. An empty region leaves the id bare.
pub fn transform_id(region: &str, id: &str) -> String {
    if region.is_empty() {
        id.to_string()
    } else {
        format!("{region}:{id}")
    }
}

/// The remote id, without any region prefix.
pub fn extract_id(value: &str) -> &str {
    value.split_once(':').map_or(value, |(_, id)| id)
}

/// The region prefix, if any.
pub fn extract_region(value: &str) -> Option<&str> {
    value.split_once(':').map(|(region, _)| region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_and_extract() {
        let id = transform_id("aws/us-east-1", "u42");
        assert_eq!(id, "aws/us-east-1:u42");
        assert_eq!(extract_id(&id), "u42");
        assert_eq!(extract_region(&id), Some("aws/us-east-1"));
    }

    #[test]
    fn test_bare_ids() {
        assert_eq!(transform_id("", "u42"), "u42");
        assert_eq!(extract_id("u42"), "u42");
        assert_eq!(extract_region("u42"), None);
    }
}
