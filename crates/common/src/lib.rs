pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        assert_eq!(h.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn message_serializes_reassigned_count() {
        let m = types::DeletedResponse::new("employee deleted", 3);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["message"], "employee deleted");
        assert_eq!(v["reassigned"], 3);
    }
}
