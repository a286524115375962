use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

pub mod chart;
pub mod curve;
pub mod error;
pub mod plot;
pub mod scale;

use crate::error::{LoadError, ParseError};

pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

pub const MONTH_FORMAT: &str = "%Y-%m";

pub const GENRE_COLUMN: &str = "macro_genre";
pub const MONTH_COLUMN: &str = "month";
pub const COUNT_COLUMN: &str = "count";

/// One csv record before coercion, fields kept as raw text.
/// The 1-based line number is carried along for error reporting.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: usize,
    pub genre: String,
    pub month: String,
    pub count: String,
}

/// The main struct for the monthly genre count time series
#[derive(Debug, Clone)]
pub struct GenreTrends {
    pub genre: Vec<String>,
    pub month: Vec<NaiveDate>,
    pub count: Vec<f64>,
}

impl GenreTrends {
    pub fn new(capacity: usize) -> GenreTrends {
        let genre: Vec<String> = Vec::with_capacity(capacity);
        let month: Vec<NaiveDate> = Vec::with_capacity(capacity);
        let count: Vec<f64> = Vec::with_capacity(capacity);
        let trends: GenreTrends = GenreTrends {
            genre,
            month,
            count,
        };
        trends
    }

    pub fn len(&self) -> usize {
        self.genre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genre.is_empty()
    }

    /// Coerces the raw records: month under the strict year-month format,
    /// count as a non-negative integer.
    /// The first offending row fails the whole conversion, no row skipping.
    pub fn from_rows(rows: &[RawRow]) -> Result<GenreTrends, ParseError> {
        let mut trends = GenreTrends::new(rows.len());
        for r in rows {
            let month = parse_month(r.line, &r.month)?;
            let count = parse_count(r.line, &r.count)?;
            trends.genre.push(r.genre.clone());
            trends.month.push(month);
            trends.count.push(count);
        }
        Ok(trends)
    }

    /// Init a GenreTrends from csv, reading and coercing in one go.
    pub fn from_csv(fin: PathBuf) -> Result<GenreTrends, LoadError> {
        let rows = read_rows(fin)?;
        let trends = GenreTrends::from_rows(&rows)?;
        Ok(trends)
    }

    /// Partitions the rows into one series per genre.
    /// Group order follows the first occurrence of each genre,
    /// rows keep their input order within the group.
    pub fn group_by_genre(&self) -> Vec<GenreSeries> {
        let mut groups: Vec<GenreSeries> = Vec::new();
        for ((g, &m), &c) in self
            .genre
            .iter()
            .zip(self.month.iter())
            .zip(self.count.iter())
        {
            match groups.iter_mut().find(|s| s.genre == *g) {
                Some(series) => {
                    series.month.push(m);
                    series.count.push(c);
                }
                None => groups.push(GenreSeries {
                    genre: g.clone(),
                    month: vec![m],
                    count: vec![c],
                }),
            }
        }
        groups
    }

    /// writes the genre, month and count columns as a csv at the given path
    pub fn to_csv(&self, fout: PathBuf) -> std::io::Result<()> {
        let file = File::create(fout)?;
        let mut buf = BufWriter::new(file);
        buf.write_all(format!("{},{},{}\n", GENRE_COLUMN, MONTH_COLUMN, COUNT_COLUMN).as_bytes())?;
        for ((g, m), c) in self
            .genre
            .iter()
            .zip(self.month.iter())
            .zip(self.count.iter())
        {
            buf.write_all(format!("{},{},{}\n", g, m.format(MONTH_FORMAT), c).as_bytes())?;
        }
        Ok(())
    }
}

impl std::fmt::Display for GenreTrends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}\n", GENRE_COLUMN, MONTH_COLUMN, COUNT_COLUMN)?;
        for ((g, m), c) in self
            .genre
            .iter()
            .zip(self.month.iter())
            .zip(self.count.iter())
        {
            write!(f, "{},{},{}\n", g, m.format(MONTH_FORMAT), c)?
        }
        Ok(())
    }
}

/// One genre's ordered share of the table, see [`GenreTrends::group_by_genre`].
#[derive(Debug, Clone)]
pub struct GenreSeries {
    pub genre: String,
    pub month: Vec<NaiveDate>,
    pub count: Vec<f64>,
}

/// Reads the raw csv records, locating the required columns from the header
/// row; extra columns are tolerated. Fields stay text, coercion happens in
/// [`GenreTrends::from_rows`].
pub fn read_rows(fin: PathBuf) -> Result<Vec<RawRow>, LoadError> {
    let file = File::open(&fin)?;
    let buf = BufReader::new(file);
    let mut lines = buf.lines().enumerate();
    let header = match lines.next() {
        Some((_, l)) => l?,
        None => return Err(LoadError::MissingColumn(GENRE_COLUMN)),
    };
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let igenre = find_column(&columns, GENRE_COLUMN)?;
    let imonth = find_column(&columns, MONTH_COLUMN)?;
    let icount = find_column(&columns, COUNT_COLUMN)?;
    let mut rows: Vec<RawRow> = Vec::with_capacity(1000);
    for (i, l) in lines {
        let l = l?;
        if l.trim().is_empty() {
            continue;
        }
        let line = i + 1;
        let fields: Vec<&str> = l.split(',').collect();
        match (fields.get(igenre), fields.get(imonth), fields.get(icount)) {
            (Some(genre), Some(month), Some(count)) => rows.push(RawRow {
                line,
                genre: genre.trim().to_string(),
                month: month.trim().to_string(),
                count: count.trim().to_string(),
            }),
            _ => return Err(LoadError::MissingField { line }),
        }
    }
    log::debug!("read {} raw rows from {}", rows.len(), fin.display());
    Ok(rows)
}

fn find_column(columns: &[&str], name: &'static str) -> Result<usize, LoadError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or(LoadError::MissingColumn(name))
}

fn parse_month(line: usize, value: &str) -> Result<NaiveDate, ParseError> {
    let first_day = format!("{}-01", value);
    let month = match NaiveDate::parse_from_str(&first_day, "%Y-%m-%d") {
        Ok(m) => m,
        Err(_) => {
            return Err(ParseError::Month {
                line,
                value: value.to_string(),
            })
        }
    };
    // chrono accepts unpadded shapes such as 2020-1, the round trip does not
    if month.format(MONTH_FORMAT).to_string() != value {
        return Err(ParseError::Month {
            line,
            value: value.to_string(),
        });
    }
    Ok(month)
}

fn parse_count(line: usize, value: &str) -> Result<f64, ParseError> {
    match value.parse::<u64>() {
        Ok(c) => Ok(c as f64),
        Err(_) => Err(ParseError::Count {
            line,
            value: value.to_string(),
        }),
    }
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> (T, T) {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => panic!("could not iterate over slice"),
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    return (min, max);
}

/// picks the time tick format from the plotted span
pub fn suitable_xfmt(d: chrono::Duration) -> &'static str {
    let xfmt = if d > chrono::Duration::weeks(160) {
        "%Y"
    } else {
        "%Y-%m"
    };
    return xfmt;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_parses_to_first_day() {
        assert_eq!(parse_month(2, "2020-01").unwrap(), ymd(2020, 1, 1));
        assert_eq!(parse_month(3, "1999-12").unwrap(), ymd(1999, 12, 1));
    }

    #[test]
    fn month_rejects_other_shapes() {
        for bad in &["2020/01", "2020-1", "2020-13", "2020-01-01", "abc", ""] {
            assert!(
                matches!(parse_month(2, bad), Err(ParseError::Month { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn count_parses_non_negative_integers() {
        assert_eq!(parse_count(2, "0").unwrap(), 0.0);
        assert_eq!(parse_count(2, "10").unwrap(), 10.0);
        for bad in &["abc", "-3", "10.5", "1e3", ""] {
            assert!(
                matches!(parse_count(2, bad), Err(ParseError::Count { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let rows = vec![
            RawRow {
                line: 2,
                genre: "pop".to_string(),
                month: "2020-01".to_string(),
                count: "10".to_string(),
            },
            RawRow {
                line: 3,
                genre: "pop".to_string(),
                month: "2020-02".to_string(),
                count: "15".to_string(),
            },
            RawRow {
                line: 4,
                genre: "rock".to_string(),
                month: "2020-01".to_string(),
                count: "5".to_string(),
            },
        ];
        let trends = GenreTrends::from_rows(&rows).unwrap();
        let groups = trends.group_by_genre();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].genre, "pop");
        assert_eq!(groups[0].month, vec![ymd(2020, 1, 1), ymd(2020, 2, 1)]);
        assert_eq!(groups[0].count, vec![10.0, 15.0]);
        assert_eq!(groups[1].genre, "rock");
        assert_eq!(groups[1].count, vec![5.0]);
    }

    #[test]
    fn from_rows_fails_on_first_bad_row() {
        let rows = vec![
            RawRow {
                line: 2,
                genre: "pop".to_string(),
                month: "2020-01".to_string(),
                count: "10".to_string(),
            },
            RawRow {
                line: 3,
                genre: "pop".to_string(),
                month: "2020-02".to_string(),
                count: "abc".to_string(),
            },
        ];
        match GenreTrends::from_rows(&rows) {
            Err(ParseError::Count { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn min_and_max_over_dates_and_counts() {
        let months = vec![ymd(2020, 3, 1), ymd(2020, 1, 1), ymd(2020, 2, 1)];
        assert_eq!(min_and_max(&months[..]), (ymd(2020, 1, 1), ymd(2020, 3, 1)));
        let counts = vec![10.0, 15.0, 5.0];
        assert_eq!(min_and_max(&counts[..]), (5.0, 15.0));
    }

    #[test]
    fn xfmt_widens_with_span() {
        assert_eq!(suitable_xfmt(ymd(2022, 1, 1) - ymd(2020, 1, 1)), "%Y-%m");
        assert_eq!(suitable_xfmt(ymd(2030, 1, 1) - ymd(2020, 1, 1)), "%Y");
    }

    #[test]
    fn display_round_trips_the_columns() {
        let rows = vec![RawRow {
            line: 2,
            genre: "pop".to_string(),
            month: "2020-01".to_string(),
            count: "10".to_string(),
        }];
        let trends = GenreTrends::from_rows(&rows).unwrap();
        let text = trends.to_string();
        assert_eq!(text, "macro_genre,month,count\npop,2020-01,10\n");
    }
}
