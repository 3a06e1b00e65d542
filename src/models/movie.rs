#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
}

/// Title and year that already passed form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    pub year: String,
}

impl MovieInput {
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
        }
    }
}

/// Demo fixture inserted by `watchlist forge`.
pub const DEMO_MOVIES: [(&str, &str); 10] = [
    ("My Neighbor Totoro", "1988"),
    ("Dead Poets Society", "1989"),
    ("A Perfect World", "1993"),
    ("Leon", "1994"),
    ("Mahjong", "1996"),
    ("Swallowtail Butterfly", "1996"),
    ("King of Comedy", "1999"),
    ("Devils on the Doorstep", "1999"),
    ("WALL-E", "2008"),
    ("The Pork of Music", "2012"),
];

pub const DEMO_USER_NAME: &str = "Grey Li";
