//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through `html_escape`; the page skeleton lives in [`layout`].

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::movie::Movie;

/// Values every page needs: the header owner, nav state and pending flashes.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Display name of the first user row, if there is one
    pub owner_name: Option<String>,
    pub authenticated: bool,
    pub flashes: Vec<String>,
}

impl PageContext {
    fn heading(&self) -> String {
        match &self.owner_name {
            Some(name) => format!("{}'s Watchlist", text(name)),
            None => "Watchlist".to_string(),
        }
    }
}

fn nav(ctx: &PageContext) -> String {
    let mut links = String::from(r#"<li><a href="/">Home</a></li>"#);
    if ctx.authenticated {
        links.push_str(r#"<li><a href="/settings">Settings</a></li>"#);
        links.push_str(r#"<li><a href="/logout">Logout</a></li>"#);
    } else {
        links.push_str(r#"<li><a href="/login">Login</a></li>"#);
    }
    format!("<nav><ul>{links}</ul></nav>")
}

fn flashes(ctx: &PageContext) -> String {
    ctx.flashes
        .iter()
        .map(|message| format!(r#"<div class="alert">{}</div>"#, text(message)))
        .collect()
}

pub fn layout(ctx: &PageContext, content: &str) -> String {
    let heading = ctx.heading();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
    <link rel="stylesheet" href="/static/style.css" type="text/css">
</head>
<body>
    <h2>{heading}</h2>
    {nav}
    {flashes}
    {content}
    <footer>
        <small>&copy; 2018 <a href="http://helloflask.com/book/3">HelloFlask</a></small>
    </footer>
</body>
</html>
"#,
        nav = nav(ctx),
        flashes = flashes(ctx),
    )
}

pub fn index(ctx: &PageContext, movies: &[Movie]) -> String {
    let mut content = format!("<p>{} Titles</p>\n", movies.len());

    if ctx.authenticated {
        content.push_str(
            r#"<form method="post">
    Name <input type="text" name="title" autocomplete="off" required>
    Year <input type="text" name="year" autocomplete="off" required>
    <input class="btn" type="submit" name="submit" value="Add">
</form>
"#,
        );
    }

    content.push_str("<ul class=\"movie-list\">\n");
    for movie in movies {
        let actions = if ctx.authenticated {
            format!(
                r#"<a class="btn" href="/movie/edit/{id}">Edit</a>
            <form class="inline-form" method="post" action="/movie/delete/{id}">
                <input class="btn" type="submit" name="delete" value="Delete" onclick="return confirm('Are you sure?')">
            </form>"#,
                id = movie.id
            )
        } else {
            String::new()
        };

        content.push_str(&format!(
            r#"<li>{title} - {year}
        <span class="float-right">
            {actions}
            <a class="imdb" href="https://www.imdb.com/find?q={query}" target="_blank" title="Find this movie on IMDb">IMDb</a>
        </span>
    </li>
"#,
            title = text(&movie.title),
            year = text(&movie.year),
            query = attr(&urlencoding::encode(&movie.title)),
        ));
    }
    content.push_str("</ul>\n");

    layout(ctx, &content)
}

pub fn login(ctx: &PageContext) -> String {
    layout(
        ctx,
        r#"<h3>Login</h3>
<form method="post">
    Username<br>
    <input type="text" name="username" required><br><br>
    Password<br>
    <input type="password" name="password" required><br><br>
    <input class="btn" type="submit" name="submit" value="Submit">
</form>
"#,
    )
}

pub fn settings(ctx: &PageContext, current_name: &str) -> String {
    layout(
        ctx,
        &format!(
            r#"<h3>Settings</h3>
<form method="post">
    Your Name <input type="text" name="name" autocomplete="off" required value="{}">
    <input class="btn" type="submit" name="submit" value="Save">
</form>
"#,
            attr(current_name)
        ),
    )
}

pub fn edit(ctx: &PageContext, movie: &Movie) -> String {
    layout(
        ctx,
        &format!(
            r#"<h3>Edit item</h3>
<form method="post">
    Name <input type="text" name="title" autocomplete="off" required value="{title}">
    Year <input type="text" name="year" autocomplete="off" required value="{year}">
    <input class="btn" type="submit" name="submit" value="Update">
</form>
"#,
            title = attr(&movie.title),
            year = attr(&movie.year),
        ),
    )
}

pub fn not_found(ctx: &PageContext) -> String {
    layout(
        ctx,
        r#"<ul class="movie-list">
    <li>
        Page Not Found - 404
        <span class="float-right">
            <a href="/">Go Back</a>
        </span>
    </li>
</ul>
"#,
    )
}

pub fn no_admin(ctx: &PageContext) -> String {
    layout(
        ctx,
        r#"<ul class="movie-list">
    <li>
        No admin account configured. Run <code>watchlist admin</code> on the server first.
    </li>
</ul>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: &str) -> Movie {
        Movie {
            id: 7,
            title: title.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn index_escapes_titles() {
        let ctx = PageContext::default();
        let html = index(&ctx, &[movie("<script>alert(1)</script>", "2019")]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("1 Titles"));
    }

    #[test]
    fn index_hides_mutations_when_anonymous() {
        let ctx = PageContext::default();
        let html = index(&ctx, &[movie("Leon", "1994")]);
        assert!(!html.contains("/movie/edit/7"));
        assert!(!html.contains(r#"name="title""#));
        assert!(html.contains(r#"href="/login""#));

        let ctx = PageContext {
            authenticated: true,
            ..PageContext::default()
        };
        let html = index(&ctx, &[movie("Leon", "1994")]);
        assert!(html.contains("/movie/edit/7"));
        assert!(html.contains(r#"action="/movie/delete/7""#));
        assert!(html.contains(r#"href="/logout""#));
    }

    #[test]
    fn imdb_link_is_url_encoded() {
        let html = index(&PageContext::default(), &[movie("WALL-E & Eve", "2008")]);
        assert!(html.contains("find?q=WALL-E%20%26%20Eve"));
    }

    #[test]
    fn layout_shows_owner_and_flashes() {
        let ctx = PageContext {
            owner_name: Some("Grey Li".to_string()),
            authenticated: false,
            flashes: vec!["Item created.".to_string()],
        };
        let html = login(&ctx);
        assert!(html.contains("<title>Grey Li's Watchlist</title>"));
        assert!(html.contains(r#"<div class="alert">Item created.</div>"#));
    }

    #[test]
    fn edit_prefills_attributes() {
        let html = edit(&PageContext::default(), &movie(r#"Say "Hi""#, "1999"));
        assert!(html.contains(r#"value="Say &quot;Hi&quot;""#));
        assert!(html.contains(r#"value="1999""#));
    }
}
