//! External database URLs synthesized from id attributes.

use crate::attributes::AttributeStore;

/// Build the URL for a `url`-typed field from the id family named by
/// `attribute`. Returns `None` when the id is unknown or the family does not
/// apply to the release type.
pub fn synthesize_url(attribute: &str, attributes: &AttributeStore) -> Option<String> {
    let id = |name: &str| {
        attributes
            .get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "0")
    };
    let is_movie = attributes
        .get("type")
        .map(|t| t.eq_ignore_ascii_case("movie"))
        .unwrap_or(false);

    match attribute {
        "imdb" | "imdb_with_tt" => {
            id("imdb_with_tt").map(|imdb| format!("https://www.imdb.com/title/{}", imdb))
        }
        "tmdb" => id("tmdb").map(|tmdb| {
            let kind = if is_movie { "movie" } else { "tv" };
            format!("https://www.themoviedb.org/{}/{}", kind, tmdb)
        }),
        "tvdb" => id("tvdb").map(|tvdb| format!("https://www.thetvdb.com/?id={}&tab=series", tvdb)),
        "mal" => id("mal").map(|mal| format!("https://myanimelist.net/anime/{}", mal)),
        "tvmaze" if !is_movie => {
            id("tvmaze").map(|tvmaze| format!("https://www.tvmaze.com/shows/{}", tvmaze))
        }
        _ => None,
    }
}
