//! Reading and normalising the six-column movie CSV.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::{LoadError, MovieRecord};

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "movie_id",
    "title",
    "director",
    "genre",
    "actors",
    "description",
];

/// Parse the CSV file at `path`.
pub fn parse_csv(path: &Path) -> Result<Vec<MovieRecord>, LoadError> {
    tracing::info!(path = %path.display(), "Loading and validating CSV");
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_reader(file)?;
    tracing::info!(records = records.len(), "Loaded records from CSV");
    Ok(records)
}

/// Parse CSV text from any reader.
///
/// Fails fast when any required column is absent, naming every missing one.
/// Missing cells read as empty strings; `actors` is split on `|`.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<MovieRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut index = [0usize; 6];
    let mut missing = Vec::new();
    for (slot, column) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        match headers.iter().position(|h| h == column) {
            Some(i) => *slot = i,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    let [movie_id, title, director, genre, actors, description] = index;

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (n, result) in rdr.records().enumerate() {
        let row = result?;
        let cell = |i: usize| row.get(i).unwrap_or("").to_string();

        let id = cell(movie_id).trim().to_string();
        if id.is_empty() {
            // header is line 1
            return Err(LoadError::MissingMovieId { line: n + 2 });
        }
        if !seen.insert(id.clone()) {
            return Err(LoadError::DuplicateMovieId(id));
        }

        records.push(MovieRecord {
            movie_id: id,
            title: cell(title),
            director: cell(director),
            genre: cell(genre),
            actors: split_actors(row.get(actors).unwrap_or("")),
            description: cell(description),
        });
    }

    Ok(records)
}

/// Split a pipe-delimited cast list, trimming each name and dropping blanks.
pub fn split_actors(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "movie_id,title,director,genre,actors,description\n";

    #[test]
    fn test_split_actors_trims_each_entry() {
        assert_eq!(split_actors("A | B|C"), ["A", "B", "C"]);
        assert_eq!(split_actors("Keanu Reeves"), ["Keanu Reeves"]);
        assert!(split_actors("").is_empty());
        assert!(split_actors(" | ").is_empty());
    }

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{HEADER}1,The Matrix,Wachowski Sisters,Sci-Fi,\"Keanu Reeves | Laurence Fishburne|Carrie-Anne Moss\",\"A hacker learns the truth, and more\"\n"
        );
        let records = parse_reader(csv.as_bytes()).expect("parse");

        assert_eq!(records.len(), 1);
        let matrix = &records[0];
        assert_eq!(matrix.movie_id, "1");
        assert_eq!(matrix.title, "The Matrix");
        assert_eq!(matrix.director, "Wachowski Sisters");
        assert_eq!(matrix.genre, "Sci-Fi");
        assert_eq!(
            matrix.actors,
            ["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"]
        );
        assert_eq!(matrix.description, "A hacker learns the truth, and more");
    }

    #[test]
    fn test_missing_values_default_to_empty() {
        let csv = format!("{HEADER}2,Untitled,,,,\n3,Short Row\n");
        let records = parse_reader(csv.as_bytes()).expect("parse");

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.director, "");
            assert_eq!(record.genre, "");
            assert_eq!(record.description, "");
            assert!(record.actors.is_empty());
        }
        assert_eq!(records[1].title, "Short Row");
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let csv = "title,actors,movie_id,description,genre,director\nHeat,Al Pacino|Robert De Niro,9,Cops and robbers,Crime,Michael Mann\n";
        let records = parse_reader(csv.as_bytes()).expect("parse");
        assert_eq!(records[0].movie_id, "9");
        assert_eq!(records[0].director, "Michael Mann");
        assert_eq!(records[0].actors, ["Al Pacino", "Robert De Niro"]);
    }

    #[test]
    fn test_missing_columns_are_all_listed() {
        let csv = "movie_id,title,genre\n1,Heat,Crime\n";
        let err = parse_reader(csv.as_bytes()).unwrap_err();

        match &err {
            LoadError::MissingColumns(cols) => {
                assert_eq!(cols, &["director", "actors", "description"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Missing required columns: [\"director\", \"actors\", \"description\"]"
        );
    }

    #[test]
    fn test_duplicate_movie_ids_are_rejected() {
        let csv = format!("{HEADER}1,Heat,Michael Mann,Crime,,\n1,Ronin,John Frankenheimer,Action,,\n");
        let err = parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateMovieId(ref id) if id == "1"));
    }

    #[test]
    fn test_blank_movie_id_is_rejected() {
        let csv = format!("{HEADER}1,Heat,Michael Mann,Crime,,\n ,Ronin,John Frankenheimer,Action,,\n");
        let err = parse_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingMovieId { line: 3 }));
    }

    #[test]
    fn test_parse_csv_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            "{HEADER}1,Inception,Christopher Nolan,Sci-Fi,Leonardo DiCaprio|Elliot Page,Dreams within dreams\n"
        )
        .expect("write");

        let records = parse_csv(file.path()).expect("parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actors, ["Leonardo DiCaprio", "Elliot Page"]);
    }

    #[test]
    fn test_parse_csv_reports_unreadable_path() {
        let err = parse_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
