//! Shared building blocks for the account service crates.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn logging_init_is_idempotent() {
        utils::logging::init_logging(true);
        utils::logging::init_logging(false);
    }
}
