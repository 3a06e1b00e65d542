/// User data handed to handlers and templates (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: Option<String>,
}
