//! Text layout of the movie details modal.

use moviefav_api::omdb::MovieDetail;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::theme::{Palette, parse_score, rating_color};

/// IMDb page of a title.
#[must_use]
pub fn imdb_url(imdb_id: &str) -> String {
    format!("https://www.imdb.com/title/{imdb_id}/")
}

/// Builds the modal body. Fields OMDB reported as missing are omitted.
#[must_use]
pub fn detail_lines(movie: &MovieDetail, is_favorite: bool, palette: &Palette) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(palette.muted)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            movie.title.clone(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  ({})  [{}]", movie.year, movie.media_type.label())),
    ]));

    let facts: Vec<&str> = [&movie.rated, &movie.runtime]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    if !facts.is_empty() {
        lines.push(Line::from(facts.join("  \u{b7}  ")));
    }
    if let Some(released) = &movie.released {
        lines.push(Line::from(format!("Released: {released}")));
    }

    let favorite = if is_favorite {
        Span::styled("\u{2665} In favorites", Style::default().fg(palette.favorite))
    } else {
        Span::styled("\u{2661} Not in favorites", Style::default().fg(palette.muted))
    };
    lines.push(Line::from(favorite));
    lines.push(Line::default());

    let ratings = rating_lines(movie, label);
    if !ratings.is_empty() {
        lines.push(Line::from(Span::styled("Ratings", label)));
        lines.extend(ratings);
        lines.push(Line::default());
    }

    if let Some(plot) = &movie.plot {
        lines.push(Line::from(Span::styled("Plot", label)));
        lines.push(Line::from(plot.clone()));
        lines.push(Line::default());
    }

    let fields = [
        ("Genre", &movie.genre),
        ("Director", &movie.director),
        ("Writer", &movie.writer),
        ("Actors", &movie.actors),
        ("Language", &movie.language),
        ("Country", &movie.country),
        ("Awards", &movie.awards),
        ("Seasons", &movie.total_seasons),
        ("DVD", &movie.dvd),
        ("Box Office", &movie.box_office),
        ("Production", &movie.production),
        ("Website", &movie.website),
        ("Poster", &movie.poster),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            lines.push(Line::from(vec![
                Span::styled(format!("{name}: "), label),
                Span::raw(value.clone()),
            ]));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        imdb_url(&movie.imdb_id),
        Style::default().fg(palette.muted),
    )));
    lines
}

/// IMDb, Metascore and Rotten Tomatoes lines, each coloured by score.
fn rating_lines(movie: &MovieDetail, label: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(rating) = &movie.imdb_rating {
        let votes = movie.imdb_votes.as_deref().unwrap_or("votes");
        lines.push(score_line("IMDb", format!("{rating}/10 ({votes})"), parse_score(rating, 1.0), label));
    }
    if let Some(metascore) = &movie.metascore {
        lines.push(score_line(
            "Metascore",
            format!("{metascore}/100"),
            parse_score(metascore, 10.0),
            label,
        ));
    }
    if let Some(tomatoes) = movie.rotten_tomatoes() {
        lines.push(score_line(
            "Rotten Tomatoes",
            String::from(tomatoes),
            parse_score(tomatoes, 10.0),
            label,
        ));
    }
    lines
}

fn score_line(source: &str, text: String, score: Option<f32>, label: Style) -> Line<'static> {
    let style = score.map_or_else(Style::default, |s| Style::default().fg(rating_color(s)));
    Line::from(vec![
        Span::styled(format!("  {source}: "), label),
        Span::styled(text, style),
    ])
}
