//! Terminal rendering of feed state.

use std::fmt::Write;

use colored::{ColoredString, Colorize};
use funfacts_feed::{CATEGORIES, Fact, FactForm, FeedSnapshot, lookup};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_FEED_MESSAGE: &str = "No facts for this category yet! Create the first one ✌️";

/// Category name on its registry color.
///
/// Panics if the category is not registered.
pub fn category_tag(name: &str) -> ColoredString {
    let (r, g, b) = lookup(name).rgb();
    format!(" {} ", name.to_uppercase())
        .white()
        .bold()
        .on_truecolor(r, g, b)
}

pub fn render_fact(fact: &Fact, voting: bool) -> String {
    let mut out = format!(
        "{} {} {} {}\n    👍 {}  🤯 {}  ⛔️ {}",
        format!("#{}", fact.id).dimmed(),
        fact.text,
        format!("({})", fact.source).blue().underline(),
        category_tag(&fact.category),
        fact.votes_interesting,
        fact.votes_mindblowing,
        fact.votes_false,
    );
    if voting {
        out.push_str(&format!("  {}", "voting...".italic()));
    }
    out
}

/// The whole feed view: loading message, empty message, or the list with
/// its footer.
pub fn render_feed(snapshot: &FeedSnapshot) -> String {
    if snapshot.loading {
        return LOADING_MESSAGE.to_string();
    }
    if snapshot.facts.is_empty() {
        return EMPTY_FEED_MESSAGE.to_string();
    }

    let mut out = String::new();
    for fact in &snapshot.facts {
        let _ = writeln!(out, "{}", render_fact(fact, snapshot.is_voting(fact.id)));
    }
    let _ = write!(
        out,
        "\nThere are {} facts in the database. Add your own!",
        snapshot.facts.len()
    );
    out
}

pub fn render_categories() -> String {
    CATEGORIES
        .iter()
        .map(|c| format!("{} {}", category_tag(c.name), c.color.dimmed()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_form(form: &FactForm) -> String {
    if !form.is_visible() {
        return "Form closed. Type `form` to share a fact.".dimmed().to_string();
    }

    let remaining = form.remaining_chars();
    let counter = if remaining < 0 {
        remaining.to_string().red()
    } else {
        remaining.to_string().normal()
    };
    let category = if form.category.is_empty() {
        "Choose category:".dimmed().to_string()
    } else {
        form.category.clone()
    };
    let status = if form.is_uploading() {
        "posting..."
    } else {
        "type `post` to submit"
    };

    format!(
        "text:     {}\n          {} characters left\nsource:   {}\ncategory: {}\n{}",
        form.text,
        counter,
        form.source,
        category,
        status.italic()
    )
}
