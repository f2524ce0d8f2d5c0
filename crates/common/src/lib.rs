//! Shared plumbing for the courier risk workspace: logging setup, runtime
//! environment checks, and wire types that more than one crate serves.

pub mod env;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let h = types::Health::ok();
        let v = serde_json::to_value(&h).expect("serialize health");
        assert_eq!(v["status"], "ok");
    }
}
