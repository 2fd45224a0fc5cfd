/// Request id for a script-originated bound call: 32 lowercase hex digits.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
