use thiserror::Error;

/// The csv source could not be read into raw records.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read the csv source: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv header is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: record has too few fields")]
    MissingField { line: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A row field that does not match the expected shape.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line {line}: month '{value}' does not match YYYY-MM")]
    Month { line: usize, value: String },
    #[error("line {line}: count '{value}' is not a non-negative integer")]
    Count { line: usize, value: String },
}

/// The chart model could not be built or drawn.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no rows to plot")]
    EmptyData,
    #[error("drawing backend error: {0}")]
    Backend(String),
}
