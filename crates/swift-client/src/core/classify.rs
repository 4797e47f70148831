use crate::data::ResourceLevel;
use crate::error::DomainError;

/// Name a failure status for the level it was returned at.
///
/// Only the pairs below are classified. Every other status, including 5xx and
/// unlisted 4xx, yields `None` and is passed through to the caller as a
/// response envelope.
pub fn classify(level: ResourceLevel, status: u16, action: impl Into<String>) -> Option<DomainError> {
    message_for(level, status).map(|message| DomainError {
        status,
        message,
        level,
        action: action.into(),
    })
}

fn message_for(level: ResourceLevel, status: u16) -> Option<&'static str> {
    use ResourceLevel::*;

    let message = match (level, status) {
        (Account, 401) => "Unauthorized",

        (Container, 404) => "Container not found",
        (Container, 409) => "Conflict! Container not empty",

        (Object, 400) => "Bad request",
        (Object, 401) => "Unauthorized",
        (Object, 404) => "Not found",
        (Object, 408) => "Timeout",
        (Object, 411) => {
            "Content length required, missing Transfer-Encoding or Content-Length request header."
        }
        (Object, 422) => "Sent ETag does not match remote ETag.",

        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_not_found() {
        let err = classify(ResourceLevel::Object, 404, "GET http://h/c/o").unwrap();
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "Not found");
        assert_eq!(err.level, ResourceLevel::Object);
        assert_eq!(err.action, "GET http://h/c/o");
    }

    #[test]
    fn test_account_unauthorized() {
        let err = classify(ResourceLevel::Account, 401, "GET http://h").unwrap();
        assert_eq!(err.message, "Unauthorized");
    }

    #[test]
    fn test_container_codes() {
        assert_eq!(
            classify(ResourceLevel::Container, 409, "").unwrap().message,
            "Conflict! Container not empty"
        );
        assert_eq!(
            classify(ResourceLevel::Container, 404, "").unwrap().message,
            "Container not found"
        );
    }

    #[test]
    fn test_unlisted_pairs_pass_through() {
        assert!(classify(ResourceLevel::Container, 500, "").is_none());
        assert!(classify(ResourceLevel::Account, 404, "").is_none());
        assert!(classify(ResourceLevel::Container, 401, "").is_none());
        assert!(classify(ResourceLevel::Object, 403, "").is_none());
        assert!(classify(ResourceLevel::Object, 200, "").is_none());
    }

    #[test]
    fn test_object_table_is_complete() {
        for status in [400, 401, 404, 408, 411, 422] {
            assert!(
                classify(ResourceLevel::Object, status, "").is_some(),
                "object {status} should be classified"
            );
        }
    }
}
